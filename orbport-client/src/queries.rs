//! GraphQL documents sent to the orb registry.

pub const ORB_VERSION: &str = r#"query($orbVersionRef: String!) {
  orbVersion(orbVersionRef: $orbVersionRef) {
    id
    version
    orb {
      id
      createdAt
      name
      namespace {
        name
      }
      versions(count: 200) {
        createdAt
        version
      }
    }
    source
    createdAt
  }
}"#;

/// One page of a namespace's orbs, each with its latest version.
pub const NAMESPACE_ORBS: &str = r#"query namespaceOrbs($namespace: String, $after: String!) {
  registryNamespace(name: $namespace) {
    name
    id
    orbs(first: 20, after: $after) {
      edges {
        cursor
        node {
          versions(count: 1) {
            source
            id
            version
            createdAt
          }
          name
          id
          createdAt
        }
      }
      pageInfo {
        hasNextPage
      }
    }
  }
}"#;

pub const REGISTRY_NAMESPACE: &str = r#"query($name: String!) {
  registryNamespace(name: $name) {
    id
  }
}"#;

pub const ORB_ID: &str = r#"query($name: String!, $namespace: String) {
  orb(name: $name) {
    id
  }
  registryNamespace(name: $namespace) {
    id
  }
}"#;

pub const IMPORT_NAMESPACE: &str = r#"mutation($name: String!) {
  importNamespace(name: $name) {
    namespace {
      id
    }
    errors {
      message
      type
    }
  }
}"#;

pub const IMPORT_ORB: &str = r#"mutation($name: String!, $registryNamespaceId: UUID!) {
  importOrb(name: $name, registryNamespaceId: $registryNamespaceId) {
    orb {
      id
    }
    errors {
      message
      type
    }
  }
}"#;

pub const IMPORT_ORB_VERSION: &str = r#"mutation($config: String!, $orbId: UUID!, $version: String!) {
  importOrbVersion(orbId: $orbId, orbYaml: $config, version: $version) {
    orb {
      version
    }
    errors {
      message
    }
  }
}"#;
