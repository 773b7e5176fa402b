//! Domain types for orb registries.
//!
//! Names are newtypes so a namespace can never be passed where a
//! fully-qualified orb name is expected. Versions are opaque strings; nothing
//! in this crate orders them numerically.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReferenceError;

/// Registry alias that resolves to the most recently published version.
pub const VOLATILE_VERSION: &str = "volatile";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// The name of a namespace. Unique within a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespaceName(pub String);

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for NamespaceName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NamespaceName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A fully-qualified orb name, `namespace/orb`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrbName(pub String);

impl OrbName {
    /// The namespace segment (everything before the first `/`).
    pub fn namespace(&self) -> NamespaceName {
        match self.0.split_once('/') {
            Some((ns, _)) => NamespaceName::from(ns),
            None => NamespaceName::from(self.0.as_str()),
        }
    }

    /// The orb segment (everything after the first `/`).
    pub fn short_name(&self) -> &str {
        match self.0.split_once('/') {
            Some((_, name)) => name,
            None => &self.0,
        }
    }
}

impl fmt::Display for OrbName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for OrbName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrbName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Registry-assigned identifier of a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespaceId(pub String);

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for NamespaceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Registry-assigned identifier of an orb.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrbId(pub String);

impl fmt::Display for OrbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for OrbId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A named ownership scope for orbs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: NamespaceName,
}

/// One entry in an orb's version history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbVersionSummary {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A named, namespaced configuration module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orb {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<OrbId>,
    pub name: OrbName,
    pub namespace: Namespace,
    /// Known versions, newest first as returned by the registry.
    #[serde(default)]
    pub versions: Vec<OrbVersionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Orb {
    /// An orb record carrying only its identity.
    pub fn named(name: OrbName) -> Self {
        let namespace = Namespace {
            name: name.namespace(),
        };
        Self {
            id: None,
            name,
            namespace,
            versions: vec![],
            highest_version: None,
            created_at: None,
        }
    }

    /// Attach a version history; `highest_version` becomes its first entry.
    pub fn with_versions(mut self, versions: Vec<OrbVersionSummary>) -> Self {
        self.highest_version = versions.first().map(|v| v.version.clone());
        self.versions = versions;
        self
    }
}

/// An immutable release of an orb, including its source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbVersion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub version: String,
    pub orb: Orb,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl OrbVersion {
    /// The `namespace/orb@version` reference naming this release.
    pub fn reference(&self) -> OrbVersionRef {
        OrbVersionRef {
            orb: self.orb.name.clone(),
            version: self.version.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

/// A fully-qualified `namespace/orb@version` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrbVersionRef {
    pub orb: OrbName,
    pub version: String,
}

impl fmt::Display for OrbVersionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.orb, self.version)
    }
}

impl FromStr for OrbVersionRef {
    type Err = ReferenceError;

    /// Parses `namespace/orb@version`; a missing `@version` means `volatile`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (orb, version) = match s.split_once('@') {
            Some((orb, version)) => (orb, version),
            None => (s, VOLATILE_VERSION),
        };
        let Some((namespace, name)) = orb.split_once('/') else {
            return Err(ReferenceError::MissingOrbName(s.to_owned()));
        };
        if namespace.is_empty() || name.is_empty() || name.contains('/') {
            return Err(ReferenceError::MalformedOrbName(s.to_owned()));
        }
        if version.is_empty() {
            return Err(ReferenceError::EmptyVersion(s.to_owned()));
        }
        Ok(Self {
            orb: OrbName::from(orb),
            version: version.to_owned(),
        })
    }
}

/// A user-supplied import reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Every orb in the namespace, at its latest version.
    Namespace(NamespaceName),
    /// One specific orb version.
    OrbVersion(OrbVersionRef),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Namespace(ns) => ns.fmt(f),
            Reference::OrbVersion(r) => r.fmt(f),
        }
    }
}

impl FromStr for Reference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ReferenceError::Empty);
        }
        if !s.contains('/') {
            if s.contains('@') {
                return Err(ReferenceError::MissingOrbName(s.to_owned()));
            }
            return Ok(Reference::Namespace(NamespaceName::from(s)));
        }
        s.parse().map(Reference::OrbVersion)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn orb_name_splits_namespace_and_short_name() {
        let name = OrbName::from("acme/build-tools");
        assert_eq!(name.namespace(), NamespaceName::from("acme"));
        assert_eq!(name.short_name(), "build-tools");
    }

    #[test]
    fn bare_namespace_reference() {
        let r: Reference = "acme".parse().expect("parse");
        assert_eq!(r, Reference::Namespace(NamespaceName::from("acme")));
    }

    #[test]
    fn versioned_reference() {
        let r: Reference = "acme/build-tools@1.2.0".parse().expect("parse");
        let Reference::OrbVersion(r) = r else {
            panic!("expected orb version reference");
        };
        assert_eq!(r.orb, OrbName::from("acme/build-tools"));
        assert_eq!(r.version, "1.2.0");
        assert_eq!(r.to_string(), "acme/build-tools@1.2.0");
    }

    #[test]
    fn unversioned_reference_defaults_to_volatile() {
        let r: OrbVersionRef = "acme/build-tools".parse().expect("parse");
        assert_eq!(r.version, VOLATILE_VERSION);
    }

    #[rstest]
    #[case("")]
    #[case("/build-tools@1.0.0")]
    #[case("acme/@1.0.0")]
    #[case("acme/build-tools@")]
    #[case("acme@1.0.0")]
    #[case("acme/build/tools@1.0.0")]
    fn malformed_references_are_rejected(#[case] input: &str) {
        assert!(input.parse::<Reference>().is_err(), "accepted {input:?}");
    }

    #[test]
    fn with_versions_sets_highest_version() {
        let orb = Orb::named(OrbName::from("acme/build-tools")).with_versions(vec![
            OrbVersionSummary {
                version: "1.2.0".into(),
                created_at: None,
            },
            OrbVersionSummary {
                version: "1.1.0".into(),
                created_at: None,
            },
        ]);
        assert_eq!(orb.highest_version.as_deref(), Some("1.2.0"));
        assert_eq!(orb.namespace.name, NamespaceName::from("acme"));
    }
}
