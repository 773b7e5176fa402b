use assert_cmd::Command;
use orbport_core::config;
use predicates::prelude::*;
use tempfile::TempDir;

fn orbport(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("orbport").expect("binary");
    cmd.env("HOME", home.path()).env("USERPROFILE", home.path());
    cmd
}

#[test]
fn setup_writes_config_file() {
    let home = TempDir::new().expect("home");

    orbport(&home)
        .args(["setup", "--host", "https://orbs.internal", "--token", "s3cret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registry host set to 'https://orbs.internal'"));

    let cfg = config::load_at(home.path()).expect("load");
    assert_eq!(cfg.host, "https://orbs.internal");
    assert_eq!(cfg.token.as_deref(), Some("s3cret"));
    assert_eq!(cfg.endpoint, config::DEFAULT_ENDPOINT);
}

#[test]
fn setup_keeps_unrelated_settings() {
    let home = TempDir::new().expect("home");
    let existing = orbport_core::CliConfig {
        source_host: "https://mirror.example".into(),
        timeout_secs: 5,
        ..Default::default()
    };
    config::save_at(home.path(), &existing).expect("seed");

    orbport(&home)
        .args([
            "setup",
            "--host",
            "https://orbs.internal",
            "--token",
            "s3cret",
            "--endpoint",
            "api/graphql",
        ])
        .assert()
        .success();

    let cfg = config::load_at(home.path()).expect("load");
    assert_eq!(cfg.source_host, "https://mirror.example");
    assert_eq!(cfg.timeout_secs, 5);
    assert_eq!(cfg.endpoint, "api/graphql");
}

#[test]
fn setup_requires_token() {
    let home = TempDir::new().expect("home");
    orbport(&home)
        .args(["setup", "--host", "https://orbs.internal"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--token"));
    assert!(!config::config_path_at(home.path()).exists());
}
