//! orbport core library: domain types, registry interfaces, config, errors.
//!
//! - [`types`]: newtypes, orb/version records, reference parsing
//! - [`registry`]: [`SourceRegistry`] / [`DestinationRegistry`] and [`Lookup`]
//! - [`config`]: `~/.orbport/cli.yml` load / save
//! - [`error`]: [`RegistryError`], [`ReferenceError`], [`ConfigError`]

pub mod config;
pub mod error;
pub mod registry;
pub mod types;

pub use config::CliConfig;
pub use error::{ConfigError, ReferenceError, RegistryError};
pub use registry::{DestinationRegistry, Lookup, SourceRegistry};
pub use types::{
    Namespace, NamespaceId, NamespaceName, Orb, OrbId, OrbName, OrbVersion, OrbVersionRef,
    OrbVersionSummary, Reference,
};
