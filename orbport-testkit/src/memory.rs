//! In-memory registry.
//!
//! Implements both registry roles over plain collections and records every
//! call it receives, so pipeline behaviour (ordering, fail-fast, query
//! counts) can be observed without a server.

use std::cell::RefCell;
use std::collections::BTreeMap;

use orbport_core::{
    DestinationRegistry, Lookup, NamespaceId, NamespaceName, OrbId, OrbName, OrbVersion,
    OrbVersionRef, RegistryError, SourceRegistry,
};

/// One recorded registry call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ResolveOrbVersion(OrbVersionRef),
    ListNamespaceOrbVersions(NamespaceName),
    NamespaceExists(NamespaceName),
    OrbExists(OrbName),
    OrbVersionExists(OrbVersionRef),
    CreateNamespace(NamespaceName),
    CreateOrb(OrbName),
    LookupNamespaceId(NamespaceName),
    LookupOrbId(OrbName),
    ImportOrbVersion(OrbVersionRef),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::CreateNamespace(_) | Call::CreateOrb(_) | Call::ImportOrbVersion(_)
        )
    }
}

#[derive(Debug, Default)]
struct State {
    namespaces: BTreeMap<NamespaceName, NamespaceId>,
    orbs: BTreeMap<OrbName, OrbId>,
    versions: Vec<OrbVersion>,
    listings: BTreeMap<NamespaceName, Vec<OrbVersion>>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn ensure_namespace(&mut self, namespace: &NamespaceName) -> NamespaceId {
        if let Some(id) = self.namespaces.get(namespace) {
            return id.clone();
        }
        let id = NamespaceId(self.next_id("ns"));
        self.namespaces.insert(namespace.clone(), id.clone());
        id
    }

    fn ensure_orb(&mut self, orb: &OrbName) -> OrbId {
        self.ensure_namespace(&orb.namespace());
        if let Some(id) = self.orbs.get(orb) {
            return id.clone();
        }
        let id = OrbId(self.next_id("orb"));
        self.orbs.insert(orb.clone(), id.clone());
        id
    }

    fn find_version(&self, reference: &OrbVersionRef) -> Option<&OrbVersion> {
        self.versions
            .iter()
            .find(|v| v.orb.name == reference.orb && v.version == reference.version)
    }
}

/// A registry held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    state: RefCell<State>,
    calls: RefCell<Vec<Call>>,
    failures: RefCell<Vec<(Call, RegistryError)>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a published version, creating its namespace and orb as needed.
    pub fn publish(&self, version: OrbVersion) -> &Self {
        let mut state = self.state.borrow_mut();
        state.ensure_orb(&version.orb.name);
        if state.find_version(&version.reference()).is_none() {
            state.versions.push(version);
        }
        self
    }

    pub fn add_namespace(&self, namespace: &NamespaceName) -> &Self {
        self.state.borrow_mut().ensure_namespace(namespace);
        self
    }

    pub fn add_orb(&self, orb: &OrbName) -> &Self {
        self.state.borrow_mut().ensure_orb(orb);
        self
    }

    /// What `list_namespace_orb_versions` answers for `namespace`.
    pub fn set_namespace_listing(&self, namespace: &NamespaceName, versions: Vec<OrbVersion>) -> &Self {
        self.state
            .borrow_mut()
            .listings
            .insert(namespace.clone(), versions);
        self
    }

    /// Make the first call equal to `call` fail with `error`.
    pub fn fail_on(&self, call: Call, error: RegistryError) -> &Self {
        self.failures.borrow_mut().push((call, error));
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn has_namespace(&self, namespace: &NamespaceName) -> bool {
        self.state.borrow().namespaces.contains_key(namespace)
    }

    pub fn has_orb(&self, orb: &OrbName) -> bool {
        self.state.borrow().orbs.contains_key(orb)
    }

    pub fn has_version(&self, reference: &OrbVersionRef) -> bool {
        self.state.borrow().find_version(reference).is_some()
    }

    /// Record `call`; returns the injected failure for it, if any.
    fn record(&self, call: Call) -> Result<(), RegistryError> {
        self.calls.borrow_mut().push(call.clone());
        let mut failures = self.failures.borrow_mut();
        match failures.iter().position(|(c, _)| *c == call) {
            Some(i) => Err(failures.remove(i).1),
            None => Ok(()),
        }
    }
}

fn conflict(message: String) -> RegistryError {
    RegistryError::Graphql {
        messages: vec![message],
    }
}

impl SourceRegistry for MemoryRegistry {
    fn resolve_orb_version(&self, reference: &OrbVersionRef) -> Lookup<OrbVersion> {
        if let Err(e) = self.record(Call::ResolveOrbVersion(reference.clone())) {
            return Lookup::Failed(e);
        }
        self.state
            .borrow()
            .find_version(reference)
            .cloned()
            .map_or(Lookup::NotFound, Lookup::Found)
    }

    fn list_namespace_orb_versions(&self, namespace: &NamespaceName) -> Lookup<Vec<OrbVersion>> {
        if let Err(e) = self.record(Call::ListNamespaceOrbVersions(namespace.clone())) {
            return Lookup::Failed(e);
        }
        let state = self.state.borrow();
        match state.listings.get(namespace) {
            Some(versions) => Lookup::Found(versions.clone()),
            None if state.namespaces.contains_key(namespace) => Lookup::Found(vec![]),
            None => Lookup::NotFound,
        }
    }
}

impl DestinationRegistry for MemoryRegistry {
    fn namespace_exists(&self, namespace: &NamespaceName) -> Result<bool, RegistryError> {
        self.record(Call::NamespaceExists(namespace.clone()))?;
        Ok(self.has_namespace(namespace))
    }

    fn orb_exists(&self, orb: &OrbName) -> Result<bool, RegistryError> {
        self.record(Call::OrbExists(orb.clone()))?;
        Ok(self.has_orb(orb))
    }

    fn orb_version_exists(&self, reference: &OrbVersionRef) -> Lookup<()> {
        if let Err(e) = self.record(Call::OrbVersionExists(reference.clone())) {
            return Lookup::Failed(e);
        }
        if self.has_version(reference) {
            Lookup::Found(())
        } else {
            Lookup::NotFound
        }
    }

    fn create_namespace(&self, namespace: &NamespaceName) -> Result<NamespaceId, RegistryError> {
        self.record(Call::CreateNamespace(namespace.clone()))?;
        if self.has_namespace(namespace) {
            return Err(conflict(format!("namespace {namespace} already exists")));
        }
        Ok(self.state.borrow_mut().ensure_namespace(namespace))
    }

    fn create_orb(&self, orb: &OrbName, namespace_id: &NamespaceId) -> Result<OrbId, RegistryError> {
        self.record(Call::CreateOrb(orb.clone()))?;
        let mut state = self.state.borrow_mut();
        if !state.namespaces.values().any(|id| id == namespace_id) {
            return Err(conflict(format!("no namespace with id {namespace_id}")));
        }
        if state.orbs.contains_key(orb) {
            return Err(conflict(format!("orb {orb} already exists")));
        }
        Ok(state.ensure_orb(orb))
    }

    fn lookup_namespace_id(&self, namespace: &NamespaceName) -> Lookup<NamespaceId> {
        if let Err(e) = self.record(Call::LookupNamespaceId(namespace.clone())) {
            return Lookup::Failed(e);
        }
        self.state
            .borrow()
            .namespaces
            .get(namespace)
            .cloned()
            .map_or(Lookup::NotFound, Lookup::Found)
    }

    fn lookup_orb_id(&self, orb: &OrbName) -> Lookup<OrbId> {
        if let Err(e) = self.record(Call::LookupOrbId(orb.clone())) {
            return Lookup::Failed(e);
        }
        self.state
            .borrow()
            .orbs
            .get(orb)
            .cloned()
            .map_or(Lookup::NotFound, Lookup::Found)
    }

    fn import_orb_version(
        &self,
        orb_id: &OrbId,
        version: &str,
        source: &str,
    ) -> Result<(), RegistryError> {
        let orb = self
            .state
            .borrow()
            .orbs
            .iter()
            .find(|(_, id)| *id == orb_id)
            .map(|(name, _)| name.clone())
            .ok_or_else(|| conflict(format!("no orb with id {orb_id}")))?;
        let reference = OrbVersionRef {
            orb: orb.clone(),
            version: version.to_owned(),
        };
        self.record(Call::ImportOrbVersion(reference.clone()))?;
        if self.has_version(&reference) {
            return Err(conflict(format!("{reference} already exists")));
        }
        self.state.borrow_mut().versions.push(OrbVersion {
            id: None,
            version: version.to_owned(),
            orb: orbport_core::Orb::named(orb),
            source: source.to_owned(),
            created_at: None,
        });
        Ok(())
    }
}
