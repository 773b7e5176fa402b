//! # orbport-client
//!
//! GraphQL transport for orb registries.
//!
//! [`OrbRegistryClient`] implements the `orbport-core` registry traits with
//! blocking HTTP calls; one client per registry.

pub mod client;
pub mod graphql;
pub mod queries;

pub use client::OrbRegistryClient;
pub use graphql::{server_address, GraphqlClient};
