//! Expand user references into the orb versions to import.

use orbport_core::{Lookup, OrbVersion, Reference, SourceRegistry};

use crate::error::ImportError;

/// Parse raw command-line references. Any malformed entry fails the lot.
pub fn parse_references<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Reference>, ImportError> {
    raw.iter()
        .map(|r| r.as_ref().parse::<Reference>().map_err(ImportError::from))
        .collect()
}

/// Resolve every reference against the source registry, in input order.
///
/// A namespace expands to the latest version of each of its orbs; an orb
/// reference yields exactly that version. Nothing is deduplicated here. The
/// first failure aborts the whole resolution.
pub fn versions_to_import<S: SourceRegistry + ?Sized>(
    source: &S,
    references: &[Reference],
) -> Result<Vec<OrbVersion>, ImportError> {
    let mut versions = Vec::new();
    for reference in references {
        match reference {
            Reference::OrbVersion(r) => match source.resolve_orb_version(r) {
                Lookup::Found(v) => versions.push(v),
                Lookup::NotFound => {
                    return Err(ImportError::OrbVersionNotFound {
                        reference: r.clone(),
                    })
                }
                Lookup::Failed(e) => {
                    return Err(ImportError::OrbInfo {
                        reference: r.clone(),
                        source: e,
                    })
                }
            },
            // TODO: an `--all-versions` flag would need a paged version query
            // per orb instead of the latest-only namespace listing.
            Reference::Namespace(ns) => match source.list_namespace_orb_versions(ns) {
                Lookup::Found(vs) => {
                    tracing::debug!(namespace = %ns, count = vs.len(), "expanded namespace");
                    versions.extend(vs);
                }
                Lookup::NotFound => {
                    return Err(ImportError::SourceNamespaceNotFound {
                        namespace: ns.clone(),
                    })
                }
                Lookup::Failed(e) => {
                    return Err(ImportError::ListNamespace {
                        namespace: ns.clone(),
                        source: e,
                    })
                }
            },
        }
    }
    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbport_core::{NamespaceName, RegistryError};
    use orbport_testkit::{orb_version, Call, MemoryRegistry};

    #[test]
    fn resolves_single_versioned_reference() {
        let source = MemoryRegistry::new();
        source.publish(orb_version("acme/build-tools", "1.2.0"));

        let refs = parse_references(&["acme/build-tools@1.2.0"]).expect("parse");
        let versions = versions_to_import(&source, &refs).expect("resolve");
        assert_eq!(versions, vec![orb_version("acme/build-tools", "1.2.0")]);
    }

    #[test]
    fn namespace_reference_keeps_source_order() {
        let source = MemoryRegistry::new();
        let ns = NamespaceName::from("acme");
        source.set_namespace_listing(
            &ns,
            vec![
                orb_version("acme/zeta", "2.0.0"),
                orb_version("acme/alpha", "0.1.0"),
            ],
        );

        let refs = parse_references(&["acme"]).expect("parse");
        let versions = versions_to_import(&source, &refs).expect("resolve");
        let names: Vec<_> = versions.iter().map(|v| v.reference().to_string()).collect();
        assert_eq!(names, vec!["acme/zeta@2.0.0", "acme/alpha@0.1.0"]);
    }

    #[test]
    fn results_concatenate_without_dedup() {
        let source = MemoryRegistry::new();
        source.publish(orb_version("acme/build-tools", "1.2.0"));
        source.set_namespace_listing(
            &NamespaceName::from("acme"),
            vec![orb_version("acme/build-tools", "1.2.0")],
        );

        let refs = parse_references(&["acme/build-tools@1.2.0", "acme"]).expect("parse");
        let versions = versions_to_import(&source, &refs).expect("resolve");
        assert_eq!(versions.len(), 2);
    }

    #[test]
    fn missing_orb_version_aborts_everything() {
        let source = MemoryRegistry::new();
        source.publish(orb_version("acme/build-tools", "1.2.0"));

        let refs = parse_references(&["acme/missing@1.0.0", "acme/build-tools@1.2.0"])
            .expect("parse");
        let err = versions_to_import(&source, &refs).unwrap_err();
        assert!(matches!(err, ImportError::OrbVersionNotFound { .. }), "got: {err}");
        assert_eq!(source.calls().len(), 1, "resolution stops at the first failure");
    }

    #[test]
    fn unknown_namespace_is_resolution_error() {
        let source = MemoryRegistry::new();
        let refs = parse_references(&["ghost"]).expect("parse");
        let err = versions_to_import(&source, &refs).unwrap_err();
        assert_eq!(
            err.to_string(),
            "list namespace orb versions: the namespace 'ghost' does not exist"
        );
    }

    #[test]
    fn transport_failure_is_wrapped() {
        let source = MemoryRegistry::new();
        let r: orbport_core::OrbVersionRef = "acme/build-tools@1.2.0".parse().expect("ref");
        source.fail_on(
            Call::ResolveOrbVersion(r),
            RegistryError::Decode("unexpected EOF".into()),
        );
        let refs = parse_references(&["acme/build-tools@1.2.0"]).expect("parse");
        let err = versions_to_import(&source, &refs).unwrap_err();
        assert_eq!(err.to_string(), "orb info: decoding response: unexpected EOF");
    }

    #[test]
    fn malformed_reference_fails_parse() {
        let err = parse_references(&["acme/build-tools@1.2.0", "acme/@"]).unwrap_err();
        assert!(matches!(err, ImportError::Reference(_)));
    }
}
