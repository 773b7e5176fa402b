//! Error types for orbport-import.

use std::io;

use thiserror::Error;

use orbport_core::{NamespaceName, OrbName, OrbVersionRef, ReferenceError, RegistryError};

/// Appended to version-import failures the registry classified as config syntax.
pub const CONFIG_SYNTAX_HINT: &str =
    "This can be caused by an orb using syntax that is not supported on your server version.";

/// All errors that can arise while resolving, planning, or applying an import.
#[derive(Debug, Error)]
pub enum ImportError {
    // -- resolution ---------------------------------------------------------
    /// A reference that is neither a namespace nor `namespace/orb@version`.
    #[error("invalid reference: {0}")]
    Reference(#[from] ReferenceError),

    #[error("orb info: no Orb '{reference}' was found; please check that the Orb reference is correct")]
    OrbVersionNotFound { reference: OrbVersionRef },

    #[error("orb info: {source}")]
    OrbInfo {
        reference: OrbVersionRef,
        #[source]
        source: RegistryError,
    },

    #[error("list namespace orb versions: the namespace '{namespace}' does not exist")]
    SourceNamespaceNotFound { namespace: NamespaceName },

    #[error("list namespace orb versions: {source}")]
    ListNamespace {
        namespace: NamespaceName,
        #[source]
        source: RegistryError,
    },

    // -- planning -----------------------------------------------------------
    #[error("namespace check failed: {source}")]
    NamespaceCheck {
        namespace: NamespaceName,
        #[source]
        source: RegistryError,
    },

    #[error("orb id check failed: {source}")]
    OrbCheck {
        orb: OrbName,
        #[source]
        source: RegistryError,
    },

    #[error("orb info check failed: {source}")]
    VersionCheck {
        reference: OrbVersionRef,
        #[source]
        source: RegistryError,
    },

    // -- applying -----------------------------------------------------------
    #[error("unable to create '{namespace}' namespace: {source}")]
    CreateNamespace {
        namespace: NamespaceName,
        #[source]
        source: RegistryError,
    },

    #[error(
        "unable to create '{orb}' orb: the namespace '{namespace}' does not exist. \
         Did you misspell the namespace, or maybe you meant to create the namespace first?"
    )]
    DestinationNamespaceMissing { orb: OrbName, namespace: NamespaceName },

    #[error("unable to create '{orb}' orb: {source}")]
    CreateOrb {
        orb: OrbName,
        #[source]
        source: RegistryError,
    },

    #[error("unable to get orb info at {orb}: the orb does not exist in the destination registry")]
    DestinationOrbMissing { orb: OrbName },

    #[error("unable to get orb info at {orb}: {source}")]
    OrbLookup {
        orb: OrbName,
        #[source]
        source: RegistryError,
    },

    #[error("unable to publish '{reference}': {source}{}", hint_suffix(.source))]
    Publish {
        reference: OrbVersionRef,
        #[source]
        source: RegistryError,
    },

    // -- output -------------------------------------------------------------
    #[error("writing import plan: {0}")]
    Output(#[from] io::Error),
}

fn hint_suffix(source: &RegistryError) -> String {
    if source.is_config_syntax() {
        format!("\n{CONFIG_SYNTAX_HINT}")
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> OrbVersionRef {
        "namespace1/orb@0.0.1".parse().expect("ref")
    }

    #[test]
    fn publish_error_carries_hint_for_config_syntax() {
        let err = ImportError::Publish {
            reference: reference(),
            source: RegistryError::from_messages(vec!["ERROR IN CONFIG FILE:\ntesterror".into()]),
        };
        assert_eq!(
            err.to_string(),
            "unable to publish 'namespace1/orb@0.0.1': ERROR IN CONFIG FILE:\ntesterror\n\
             This can be caused by an orb using syntax that is not supported on your server version."
        );
    }

    #[test]
    fn publish_error_without_hint() {
        let err = ImportError::Publish {
            reference: reference(),
            source: RegistryError::from_messages(vec!["testerror".into()]),
        };
        assert_eq!(err.to_string(), "unable to publish 'namespace1/orb@0.0.1': testerror");
    }

    #[test]
    fn not_found_message_names_reference() {
        let err = ImportError::OrbVersionNotFound {
            reference: reference(),
        };
        assert_eq!(
            err.to_string(),
            "orb info: no Orb 'namespace1/orb@0.0.1' was found; please check that the Orb reference is correct"
        );
    }
}
