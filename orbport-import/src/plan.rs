//! Diff a desired set of orb versions against the destination registry.

use orbport_core::{DestinationRegistry, Lookup, NamespaceName, Orb, OrbName, OrbVersion};

use crate::dedupe::{OrderedMap, OrderedSet};
use crate::error::ImportError;

/// What an import would do to the destination registry.
///
/// `new_versions` and `already_existing_versions` partition the desired set;
/// `new_namespaces` and `new_orbs` hold each name at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    pub new_namespaces: Vec<NamespaceName>,
    pub new_orbs: Vec<Orb>,
    pub new_versions: Vec<OrbVersion>,
    pub already_existing_versions: Vec<OrbVersion>,
}

impl ImportPlan {
    /// `true` when applying the plan would not touch the registry.
    pub fn is_empty(&self) -> bool {
        self.new_namespaces.is_empty() && self.new_orbs.is_empty() && self.new_versions.is_empty()
    }

    /// Number of mutations `apply_plan` would issue.
    pub fn action_count(&self) -> usize {
        self.new_namespaces.len() + self.new_orbs.len() + self.new_versions.len()
    }
}

/// Build an [`ImportPlan`] for `versions`. Read-only.
///
/// Namespaces and orbs are checked once each, in first-seen order. Versions
/// are checked one by one in input order. Any query failure other than a
/// clean "not found" aborts planning.
pub fn generate_import_plan<D: DestinationRegistry + ?Sized>(
    destination: &D,
    versions: &[OrbVersion],
) -> Result<ImportPlan, ImportError> {
    let mut namespaces: OrderedSet<NamespaceName> = OrderedSet::new();
    let mut orbs: OrderedMap<OrbName, Orb> = OrderedMap::new();
    for v in versions {
        namespaces.insert(v.orb.namespace.name.clone());
        orbs.insert(v.orb.name.clone(), v.orb.clone());
    }

    let mut plan = ImportPlan::default();

    for ns in namespaces.iter() {
        let exists = destination
            .namespace_exists(ns)
            .map_err(|source| ImportError::NamespaceCheck {
                namespace: ns.clone(),
                source,
            })?;
        if !exists {
            plan.new_namespaces.push(ns.clone());
        }
    }

    for orb in orbs.values() {
        let exists = destination
            .orb_exists(&orb.name)
            .map_err(|source| ImportError::OrbCheck {
                orb: orb.name.clone(),
                source,
            })?;
        if !exists {
            plan.new_orbs.push(orb.clone());
        }
    }

    for v in versions {
        let reference = v.reference();
        match destination.orb_version_exists(&reference) {
            Lookup::Found(()) => plan.already_existing_versions.push(v.clone()),
            Lookup::NotFound => plan.new_versions.push(v.clone()),
            Lookup::Failed(source) => {
                return Err(ImportError::VersionCheck { reference, source });
            }
        }
    }

    tracing::debug!(
        namespaces = plan.new_namespaces.len(),
        orbs = plan.new_orbs.len(),
        versions = plan.new_versions.len(),
        existing = plan.already_existing_versions.len(),
        "generated import plan"
    );
    Ok(plan)
}
