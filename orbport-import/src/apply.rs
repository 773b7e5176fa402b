//! Realise an [`ImportPlan`] against the destination registry.
//!
//! Order is fixed: namespaces, then orbs, then versions, so a run that stops
//! early never leaves an orb without its namespace or a version without its
//! orb. The first failure ends the run; earlier writes are not rolled back.

use orbport_core::{DestinationRegistry, Lookup};

use crate::error::ImportError;
use crate::plan::ImportPlan;

/// Counts of what an apply run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub namespaces: usize,
    pub orbs: usize,
    pub versions: usize,
}

/// Apply `plan`, stopping at the first failure.
///
/// Namespace and orb ids are looked up fresh from the destination right
/// before they are needed; they may have been created earlier in this run.
pub fn apply_plan<D: DestinationRegistry + ?Sized>(
    destination: &D,
    plan: &ImportPlan,
) -> Result<ApplySummary, ImportError> {
    let mut summary = ApplySummary::default();

    for ns in &plan.new_namespaces {
        destination
            .create_namespace(ns)
            .map_err(|source| ImportError::CreateNamespace {
                namespace: ns.clone(),
                source,
            })?;
        tracing::info!(namespace = %ns, "created namespace");
        summary.namespaces += 1;
    }

    for orb in &plan.new_orbs {
        let namespace = &orb.namespace.name;
        let namespace_id = match destination.lookup_namespace_id(namespace) {
            Lookup::Found(id) => id,
            Lookup::NotFound => {
                return Err(ImportError::DestinationNamespaceMissing {
                    orb: orb.name.clone(),
                    namespace: namespace.clone(),
                })
            }
            Lookup::Failed(source) => {
                return Err(ImportError::CreateOrb {
                    orb: orb.name.clone(),
                    source,
                })
            }
        };
        destination
            .create_orb(&orb.name, &namespace_id)
            .map_err(|source| ImportError::CreateOrb {
                orb: orb.name.clone(),
                source,
            })?;
        tracing::info!(orb = %orb.name, "created orb");
        summary.orbs += 1;
    }

    for v in &plan.new_versions {
        let orb = &v.orb.name;
        let orb_id = match destination.lookup_orb_id(orb) {
            Lookup::Found(id) => id,
            Lookup::NotFound => {
                return Err(ImportError::DestinationOrbMissing { orb: orb.clone() })
            }
            Lookup::Failed(source) => {
                return Err(ImportError::OrbLookup {
                    orb: orb.clone(),
                    source,
                })
            }
        };
        destination
            .import_orb_version(&orb_id, &v.version, &v.source)
            .map_err(|source| ImportError::Publish {
                reference: v.reference(),
                source,
            })?;
        tracing::info!(orb = %orb, version = %v.version, "imported orb version");
        summary.versions += 1;
    }

    Ok(summary)
}
