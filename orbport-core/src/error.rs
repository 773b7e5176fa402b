//! Error types for orbport-core.

use std::path::PathBuf;

use thiserror::Error;

/// Message prefix the registry uses when it rejects orb source during import.
pub const CONFIG_SYNTAX_PREFIX: &str = "ERROR IN CONFIG FILE";

/// Failures reported by a registry collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The request never produced an HTTP response (DNS, connect, TLS, timeout).
    #[error("request to {address} failed: {message}")]
    Transport { address: String, message: String },

    /// The server answered with a non-200 status.
    #[error("failure calling GraphQL API: {status} {reason}")]
    Status { status: u16, reason: String },

    /// The response body was not the JSON shape we asked for.
    #[error("decoding response: {0}")]
    Decode(String),

    /// The server returned one or more GraphQL errors.
    #[error("{}", .messages.join("\n"))]
    Graphql { messages: Vec<String> },

    /// The registry rejected orb source as invalid configuration.
    #[error("{0}")]
    ConfigSyntax(String),

    /// Host or endpoint could not be turned into a request address.
    #[error("invalid registry address: {0}")]
    Address(String),
}

impl RegistryError {
    /// Classify a list of server error messages.
    ///
    /// A leading config-syntax message makes the whole failure a
    /// [`RegistryError::ConfigSyntax`].
    pub fn from_messages(messages: Vec<String>) -> Self {
        match messages.first() {
            Some(first) if first.starts_with(CONFIG_SYNTAX_PREFIX) => {
                RegistryError::ConfigSyntax(messages.join("\n"))
            }
            _ => RegistryError::Graphql { messages },
        }
    }

    pub fn is_config_syntax(&self) -> bool {
        matches!(self, RegistryError::ConfigSyntax(_))
    }
}

/// A user reference that does not name a namespace or an orb version.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("empty reference")]
    Empty,

    #[error("'{0}' is not a namespace or a namespace/orb@version reference")]
    MissingOrbName(String),

    #[error("'{0}' must have the form namespace/orb@version")]
    MalformedOrbName(String),

    #[error("'{0}' has an empty version after '@'")]
    EmptyVersion(String),
}

/// All errors that can arise from reading or writing the CLI config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, read-only filesystem, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with the file path and serde_yaml's line context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`, so `~/.orbport/` cannot be located.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
