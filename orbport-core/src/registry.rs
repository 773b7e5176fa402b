//! Registry collaborator interfaces.
//!
//! The import pipeline talks to two registries: a source it reads orb
//! versions from, and a destination it checks and writes. Both are traits so
//! the pipeline can run against the GraphQL client or an in-memory fake.
//!
//! Queries whose answer may legitimately be "nothing" return [`Lookup`]. A
//! clean `NotFound` is never an error; only `Failed` aborts a run.

use crate::error::RegistryError;
use crate::types::{
    NamespaceId, NamespaceName, OrbId, OrbName, OrbVersion, OrbVersionRef,
};

/// Outcome of a registry query that may find nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Failed(RegistryError),
}

impl<T> Lookup<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(v) => Lookup::Found(f(v)),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Failed(e) => Lookup::Failed(e),
        }
    }
}

impl<T> From<Result<Option<T>, RegistryError>> for Lookup<T> {
    fn from(r: Result<Option<T>, RegistryError>) -> Self {
        match r {
            Ok(Some(v)) => Lookup::Found(v),
            Ok(None) => Lookup::NotFound,
            Err(e) => Lookup::Failed(e),
        }
    }
}

/// Read-only view of the registry orbs are copied from.
pub trait SourceRegistry {
    /// Fetch one orb version, with its orb and namespace metadata and source.
    fn resolve_orb_version(&self, reference: &OrbVersionRef) -> Lookup<OrbVersion>;

    /// The latest version of every orb in `namespace`, in registry order.
    fn list_namespace_orb_versions(&self, namespace: &NamespaceName) -> Lookup<Vec<OrbVersion>>;
}

/// The registry orbs are copied into.
pub trait DestinationRegistry {
    fn namespace_exists(&self, namespace: &NamespaceName) -> Result<bool, RegistryError>;

    fn orb_exists(&self, orb: &OrbName) -> Result<bool, RegistryError>;

    /// `Found(())` when the exact orb version is already published.
    fn orb_version_exists(&self, reference: &OrbVersionRef) -> Lookup<()>;

    fn create_namespace(&self, namespace: &NamespaceName) -> Result<NamespaceId, RegistryError>;

    /// Create `orb` (by its short name) under an existing namespace.
    fn create_orb(&self, orb: &OrbName, namespace_id: &NamespaceId) -> Result<OrbId, RegistryError>;

    fn lookup_namespace_id(&self, namespace: &NamespaceName) -> Lookup<NamespaceId>;

    fn lookup_orb_id(&self, orb: &OrbName) -> Lookup<OrbId>;

    fn import_orb_version(
        &self,
        orb_id: &OrbId,
        version: &str,
        source: &str,
    ) -> Result<(), RegistryError>;
}
