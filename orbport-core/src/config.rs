//! CLI configuration file.
//!
//! # Storage layout
//!
//! ```text
//! ~/.orbport/
//!   cli.yml      (mode 0600, written by `orbport setup`)
//! ```
//!
//! # API pattern
//!
//! Every function that touches the filesystem has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};

/// Public cloud registry, used as the default import source.
pub const DEFAULT_HOST: &str = "https://circleci.com";
/// GraphQL endpoint path relative to the host.
pub const DEFAULT_ENDPOINT: &str = "graphql-unstable";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const CONFIG_DIR: &str = ".orbport";
const CONFIG_FILE: &str = "cli.yml";

/// Contents of `~/.orbport/cli.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Destination registry host, including scheme.
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Registry orbs are copied from; defaults to the public cloud.
    #[serde(default = "default_host")]
    pub source_host: String,
    /// Endpoint on `source_host`; independent of `endpoint`.
    #[serde(default = "default_endpoint")]
    pub source_endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            endpoint: default_endpoint(),
            token: None,
            source_host: default_host(),
            source_endpoint: default_endpoint(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CliConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_owned()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `<home>/.orbport/cli.yml`. Pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(CONFIG_DIR).join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load `<home>/.orbport/cli.yml`.
///
/// A missing file yields [`CliConfig::default`]; malformed YAML is a
/// `ConfigError::Parse` carrying the path.
pub fn load_at(home: &Path) -> Result<CliConfig, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    if contents.trim().is_empty() {
        return Ok(CliConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<CliConfig, ConfigError> {
    load_at(&home()?)
}

// ---------------------------------------------------------------------------
// Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save the config to `<home>/.orbport/cli.yml`.
///
/// Write flow: serialize → `cli.yml.tmp` sibling → `chmod 0600` → `rename`.
/// The file holds an API token, so the directory is created `0700`.
pub fn save_at(home: &Path, config: &CliConfig) -> Result<PathBuf, ConfigError> {
    let dir = home.join(CONFIG_DIR);
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
        set_dir_permissions(&dir)?;
    }
    let path = config_path_at(home);
    let tmp_path = path.with_file_name(format!("{CONFIG_FILE}.tmp"));

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp_path, yaml).map_err(|e| io_err(&tmp_path, e))?;
    set_file_permissions(&tmp_path)?;
    if let Err(e) = std::fs::rename(&tmp_path, &path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_err(&path, e));
    }
    Ok(path)
}

/// `save_at` convenience wrapper.
pub fn save(config: &CliConfig) -> Result<PathBuf, ConfigError> {
    save_at(&home()?, config)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_path_is_correct() {
        let home = TempDir::new().expect("tempdir");
        assert!(config_path_at(home.path()).ends_with(".orbport/cli.yml"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let home = TempDir::new().expect("tempdir");
        let cfg = load_at(home.path()).expect("load");
        assert_eq!(cfg, CliConfig::default());
        assert_eq!(cfg.host, DEFAULT_HOST);
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let home = TempDir::new().expect("tempdir");
        let dir = home.path().join(".orbport");
        std::fs::create_dir_all(&dir).expect("mkdir");
        std::fs::write(dir.join("cli.yml"), "host: https://orbs.internal\ntoken: abc\n")
            .expect("write");

        let cfg = load_at(home.path()).expect("load");
        assert_eq!(cfg.host, "https://orbs.internal");
        assert_eq!(cfg.token.as_deref(), Some("abc"));
        assert_eq!(cfg.source_host, DEFAULT_HOST);
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn save_sets_file_permissions() {
        let home = TempDir::new().expect("tempdir");
        let path = save_at(home.path(), &CliConfig::default()).expect("save");
        assert!(path.exists());
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o600);
        }
    }

    #[test]
    fn home_not_found_error_message() {
        assert!(ConfigError::HomeNotFound.to_string().contains("home directory"));
    }
}
