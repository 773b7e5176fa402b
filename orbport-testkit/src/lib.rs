//! Test doubles for the orbport crates.
//!
//! Dev-dependency only: [`MemoryRegistry`] stands in for both registry roles
//! in pipeline tests, and [`FakeGraphql`] serves canned GraphQL responses to
//! the HTTP client and the CLI.

pub mod graphql_server;
pub mod memory;

pub use graphql_server::{FakeGraphql, Route};
pub use memory::{Call, MemoryRegistry};

use orbport_core::{Orb, OrbName, OrbVersion};

/// A source-registry style orb version for `name@version`.
pub fn orb_version(name: &str, version: &str) -> OrbVersion {
    OrbVersion {
        id: None,
        version: version.to_owned(),
        orb: Orb::named(OrbName::from(name)),
        source: format!("description: {name} {version}\n"),
        created_at: None,
    }
}
