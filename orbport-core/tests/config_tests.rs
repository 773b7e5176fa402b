//! Config file error-message, atomic-write-safety, and setup integration tests.

use assert_fs::prelude::*;
use orbport_core::{
    config::{self, CliConfig},
    ConfigError,
};
use predicates::prelude::*;
use std::fs;

fn internal() -> CliConfig {
    CliConfig {
        host: "https://orbs.internal.example".to_string(),
        token: Some("secret-token".to_string()),
        ..CliConfig::default()
    }
}

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let dir = home.path().join(".orbport");
    fs::create_dir_all(&dir).expect("mkdir");
    fs::write(dir.join("cli.yml"), b": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = config::load_at(home.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("cli.yml"), "must contain file path, got: {err}");
}

#[test]
fn load_wrong_type_yaml_returns_parse_error() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".orbport/cli.yml")
        .write_str("- this is a list, not a mapping\n")
        .expect("write");

    let err = config::load_at(home.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

#[test]
fn empty_file_loads_defaults() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".orbport/cli.yml").write_str("").expect("write");

    let cfg = config::load_at(home.path()).expect("load");
    assert_eq!(cfg, CliConfig::default());
}

// ---------------------------------------------------------------------------
// 2. Save
// ---------------------------------------------------------------------------

#[test]
fn save_then_load_returns_same_config() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    config::save_at(home.path(), &internal()).expect("save");

    home.child(".orbport/cli.yml").assert(predicate::path::exists());
    home.child(".orbport/cli.yml")
        .assert(predicate::str::contains("token: secret-token"));
    let loaded = config::load_at(home.path()).expect("load");
    assert_eq!(loaded, internal());
}

#[test]
fn save_cleans_up_tmp_file() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let path = config::save_at(home.path(), &internal()).expect("save");

    let tmp = path.with_file_name("cli.yml.tmp");
    assert!(!tmp.exists(), ".tmp must be removed after successful save");
}

#[test]
fn save_overwrites_previous_config() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    config::save_at(home.path(), &CliConfig::default()).expect("first save");
    config::save_at(home.path(), &internal()).expect("second save");

    let loaded = config::load_at(home.path()).expect("load");
    assert_eq!(loaded.host, "https://orbs.internal.example");
}

#[test]
fn missing_token_is_not_serialized() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    config::save_at(home.path(), &CliConfig::default()).expect("save");

    home.child(".orbport/cli.yml")
        .assert(predicate::str::contains("token").not());
}

#[test]
fn destination_endpoint_does_not_leak_into_source() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".orbport/cli.yml")
        .write_str("host: https://orbs.internal\nendpoint: https://orbs.internal/api/graphql\n")
        .expect("write");

    let cfg = config::load_at(home.path()).expect("load");
    assert_eq!(cfg.endpoint, "https://orbs.internal/api/graphql");
    assert_eq!(cfg.source_host, config::DEFAULT_HOST);
    assert_eq!(cfg.source_endpoint, config::DEFAULT_ENDPOINT);
}
