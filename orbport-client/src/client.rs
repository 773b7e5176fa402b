//! [`OrbRegistryClient`]: the registry collaborators over GraphQL.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use orbport_core::{
    CliConfig, DestinationRegistry, Lookup, Namespace, NamespaceId, NamespaceName, Orb, OrbId,
    OrbName, OrbVersion, OrbVersionRef, OrbVersionSummary, RegistryError, SourceRegistry,
};

use crate::graphql::{check_errors, GraphqlClient, Request, ServerError};
use crate::queries;

/// A registry reachable over its GraphQL API.
///
/// Implements both [`SourceRegistry`] and [`DestinationRegistry`]; which role
/// it plays is decided by the caller.
#[derive(Debug, Clone)]
pub struct OrbRegistryClient {
    graphql: GraphqlClient,
}

impl OrbRegistryClient {
    pub fn new(graphql: GraphqlClient) -> Self {
        Self { graphql }
    }

    /// Client for the destination registry described by `config`.
    pub fn destination(config: &CliConfig) -> Result<Self, RegistryError> {
        GraphqlClient::new(
            &config.host,
            &config.endpoint,
            config.token.clone(),
            config.timeout(),
        )
        .map(Self::new)
    }

    /// Anonymous client for the source registry described by `config`.
    pub fn source(config: &CliConfig) -> Result<Self, RegistryError> {
        GraphqlClient::new(
            &config.source_host,
            &config.source_endpoint,
            None,
            config.timeout(),
        )
        .map(Self::new)
    }

    pub fn address(&self) -> &str {
        self.graphql.address()
    }

    fn fetch_orb_version(&self, reference: &OrbVersionRef) -> Lookup<OrbVersion> {
        let request = Request::new(queries::ORB_VERSION).var("orbVersionRef", reference.to_string());
        self.graphql
            .run::<OrbVersionData>(&request)
            .map(|data| data.orb_version.and_then(OrbVersionNode::into_orb_version))
            .into()
    }

    fn namespace_id(&self, namespace: &NamespaceName) -> Result<Option<NamespaceId>, RegistryError> {
        let request = Request::new(queries::REGISTRY_NAMESPACE).var("name", namespace.0.as_str());
        let data: RegistryNamespaceData = self.graphql.run(&request)?;
        Ok(data
            .registry_namespace
            .and_then(|ns| non_empty(ns.id))
            .map(NamespaceId))
    }

    fn orb_id(&self, orb: &OrbName) -> Result<Option<OrbId>, RegistryError> {
        let request = Request::new(queries::ORB_ID)
            .var("name", orb.0.as_str())
            .var("namespace", orb.namespace().0);
        let data: OrbIdData = self.graphql.run(&request)?;
        Ok(data.orb.and_then(|o| non_empty(o.id)).map(OrbId))
    }
}

impl SourceRegistry for OrbRegistryClient {
    fn resolve_orb_version(&self, reference: &OrbVersionRef) -> Lookup<OrbVersion> {
        self.fetch_orb_version(reference)
    }

    fn list_namespace_orb_versions(&self, namespace: &NamespaceName) -> Lookup<Vec<OrbVersion>> {
        let mut versions = Vec::new();
        let mut after = String::new();
        let mut seen_cursors = HashSet::from([after.clone()]);
        loop {
            let request = Request::new(queries::NAMESPACE_ORBS)
                .var("namespace", namespace.0.as_str())
                .var("after", after.as_str());
            let page = match self.graphql.run::<NamespaceOrbsData>(&request) {
                Ok(data) => data.registry_namespace,
                Err(e) => return Lookup::Failed(e),
            };
            let Some(page) = page.filter(|ns| !ns.id.is_empty()) else {
                return Lookup::NotFound;
            };

            let has_next_page = page.orbs.page_info.has_next_page;
            let cursor = page.orbs.edges.last().map(|edge| edge.cursor.clone());
            versions.extend(
                page.orbs
                    .edges
                    .into_iter()
                    .filter_map(|edge| edge.node.into_latest_version(namespace)),
            );

            if !has_next_page {
                break;
            }
            // A next page must start past every cursor already requested.
            match cursor {
                Some(cursor) if seen_cursors.insert(cursor.clone()) => after = cursor,
                _ => {
                    return Lookup::Failed(RegistryError::Decode(format!(
                        "namespace '{namespace}' listing made no progress past cursor '{after}'"
                    )))
                }
            }
        }
        tracing::debug!(namespace = %namespace, count = versions.len(), "listed namespace orbs");
        Lookup::Found(versions)
    }
}

impl DestinationRegistry for OrbRegistryClient {
    fn namespace_exists(&self, namespace: &NamespaceName) -> Result<bool, RegistryError> {
        self.namespace_id(namespace).map(|id| id.is_some())
    }

    fn orb_exists(&self, orb: &OrbName) -> Result<bool, RegistryError> {
        self.orb_id(orb).map(|id| id.is_some())
    }

    fn orb_version_exists(&self, reference: &OrbVersionRef) -> Lookup<()> {
        self.fetch_orb_version(reference).map(|_| ())
    }

    fn create_namespace(&self, namespace: &NamespaceName) -> Result<NamespaceId, RegistryError> {
        let request = Request::new(queries::IMPORT_NAMESPACE).var("name", namespace.0.as_str());
        let data: ImportNamespaceData = self.graphql.run(&request)?;
        check_errors(&data.import_namespace.errors)?;
        data.import_namespace
            .namespace
            .and_then(|ns| non_empty(ns.id))
            .map(NamespaceId)
            .ok_or_else(|| missing_id("importNamespace"))
    }

    fn create_orb(&self, orb: &OrbName, namespace_id: &NamespaceId) -> Result<OrbId, RegistryError> {
        let request = Request::new(queries::IMPORT_ORB)
            .var("name", orb.short_name())
            .var("registryNamespaceId", namespace_id.0.as_str());
        let data: ImportOrbData = self.graphql.run(&request)?;
        check_errors(&data.import_orb.errors)?;
        data.import_orb
            .orb
            .and_then(|o| non_empty(o.id))
            .map(OrbId)
            .ok_or_else(|| missing_id("importOrb"))
    }

    fn lookup_namespace_id(&self, namespace: &NamespaceName) -> Lookup<NamespaceId> {
        self.namespace_id(namespace).into()
    }

    fn lookup_orb_id(&self, orb: &OrbName) -> Lookup<OrbId> {
        self.orb_id(orb).into()
    }

    fn import_orb_version(
        &self,
        orb_id: &OrbId,
        version: &str,
        source: &str,
    ) -> Result<(), RegistryError> {
        let request = Request::new(queries::IMPORT_ORB_VERSION)
            .var("config", source)
            .var("orbId", orb_id.0.as_str())
            .var("version", version);
        let data: ImportOrbVersionData = self.graphql.run(&request)?;
        check_errors(&data.import_orb_version.errors)
    }
}

fn non_empty(id: String) -> Option<String> {
    (!id.is_empty()).then_some(id)
}

fn missing_id(field: &str) -> RegistryError {
    RegistryError::Decode(format!("{field} returned no id"))
}

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrbVersionData {
    #[serde(default)]
    orb_version: Option<OrbVersionNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrbVersionNode {
    #[serde(default)]
    id: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    orb: Option<OrbNode>,
    #[serde(default)]
    source: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl OrbVersionNode {
    /// `None` when the registry answered with an empty record.
    fn into_orb_version(self) -> Option<OrbVersion> {
        if self.id.is_empty() {
            return None;
        }
        let orb = self.orb?.into_orb();
        Some(OrbVersion {
            id: Some(self.id),
            version: self.version,
            orb,
            source: self.source,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrbNode {
    #[serde(default)]
    id: String,
    name: String,
    #[serde(default)]
    namespace: Option<NamespaceNode>,
    #[serde(default)]
    versions: Vec<VersionSummaryNode>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl OrbNode {
    fn into_orb(self) -> Orb {
        let name = OrbName::from(self.name);
        let namespace = self
            .namespace
            .map(|ns| NamespaceName::from(ns.name))
            .unwrap_or_else(|| name.namespace());
        let versions = self
            .versions
            .into_iter()
            .map(|v| OrbVersionSummary {
                version: v.version,
                created_at: v.created_at,
            })
            .collect();
        Orb {
            id: non_empty(self.id).map(OrbId),
            name,
            namespace: Namespace { name: namespace },
            versions: vec![],
            highest_version: None,
            created_at: self.created_at,
        }
        .with_versions(versions)
    }
}

#[derive(Debug, Deserialize)]
struct NamespaceNode {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionSummaryNode {
    version: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamespaceOrbsData {
    #[serde(default)]
    registry_namespace: Option<NamespaceOrbsPage>,
}

#[derive(Debug, Deserialize)]
struct NamespaceOrbsPage {
    #[serde(default)]
    id: String,
    orbs: OrbConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrbConnection {
    #[serde(default)]
    edges: Vec<OrbEdge>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
struct OrbEdge {
    cursor: String,
    node: NamespaceOrbNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamespaceOrbNode {
    #[serde(default)]
    id: String,
    name: String,
    #[serde(default)]
    versions: Vec<LatestVersionNode>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl NamespaceOrbNode {
    /// The orb's newest version, or `None` for an orb that never published.
    fn into_latest_version(self, namespace: &NamespaceName) -> Option<OrbVersion> {
        let latest = self.versions.into_iter().next()?;
        let orb = Orb {
            id: non_empty(self.id).map(OrbId),
            name: OrbName::from(self.name),
            namespace: Namespace {
                name: namespace.clone(),
            },
            versions: vec![],
            highest_version: None,
            created_at: self.created_at,
        }
        .with_versions(vec![OrbVersionSummary {
            version: latest.version.clone(),
            created_at: latest.created_at,
        }]);
        Some(OrbVersion {
            id: non_empty(latest.id),
            version: latest.version,
            orb,
            source: latest.source,
            created_at: latest.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestVersionNode {
    #[serde(default)]
    id: String,
    version: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryNamespaceData {
    #[serde(default)]
    registry_namespace: Option<IdNode>,
}

#[derive(Debug, Deserialize)]
struct OrbIdData {
    #[serde(default)]
    orb: Option<IdNode>,
}

#[derive(Debug, Deserialize)]
struct IdNode {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportNamespaceData {
    import_namespace: NamespacePayload,
}

#[derive(Debug, Deserialize)]
struct NamespacePayload {
    #[serde(default)]
    namespace: Option<IdNode>,
    #[serde(default)]
    errors: Vec<ServerError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportOrbData {
    import_orb: OrbPayload,
}

#[derive(Debug, Deserialize)]
struct OrbPayload {
    #[serde(default)]
    orb: Option<IdNode>,
    #[serde(default)]
    errors: Vec<ServerError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportOrbVersionData {
    import_orb_version: VersionPayload,
}

#[derive(Debug, Deserialize)]
struct VersionPayload {
    #[serde(default)]
    errors: Vec<ServerError>,
}
