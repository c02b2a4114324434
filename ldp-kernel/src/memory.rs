//! In-memory resource store
//!
//! `MemoryRepository` implements [`Repository`]/[`Session`] over plain maps.
//! It exists so that the resource model and the RDF layer can be exercised
//! and embedded without a real store: there is no persistence, no indexing
//! and no query support.
//!
//! Each session reads the workspace's committed state until its first
//! write, at which point it works on a private copy. `save` publishes the
//! copy; `refresh(false)` drops it. Saves are optimistic: a copy taken
//! before another session's save is rejected rather than published over it.

use crate::error::{Error, Result};
use crate::fixity::{DigestAlgorithm, FixityResult};
use crate::node::{child_path, parent_path, Node, NodeType, ReferenceKind, Version, VersionHistory};
use crate::session::{BoxIter, Repository, Session};
use crate::value::{Property, Value};
use chrono::{DateTime, Utc};
use ldp_vocab::internal;
use ldp_vocab::namespaces::DEFAULT_PREFIXES;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Name of the bootstrap version at the start of every history
pub const ROOT_VERSION: &str = "jcr:rootVersion";

/// Child segment under which frozen copies of a node are kept
pub const VERSIONS_SEGMENT: &str = "fcr:versions";

/// Name of the workspace every repository starts with
pub const DEFAULT_WORKSPACE: &str = "default";

#[derive(Debug, Clone, Default)]
struct WorkspaceState {
    /// Bumped on every save
    version: u64,
    nodes: BTreeMap<String, Node>,
    properties: FxHashMap<String, BTreeMap<String, Property>>,
    identifiers: FxHashMap<String, String>,
    histories: FxHashMap<String, VersionHistory>,
}

impl WorkspaceState {
    fn with_root() -> Self {
        let mut state = Self::default();
        let root = Node::new("/", Uuid::new_v4().to_string(), internal::MODE_ROOT)
            .with_mixin(internal::FEDORA_CONTAINER);
        state.insert_node(root);
        state
    }

    fn insert_node(&mut self, node: Node) {
        self.identifiers
            .insert(node.identifier.clone(), node.path.clone());
        self.nodes.insert(node.path.clone(), node);
    }

    fn node_mut(&mut self, path: &str) -> Result<&mut Node> {
        self.nodes
            .get_mut(path)
            .ok_or_else(|| Error::not_found(format!("node {path}")))
    }

    fn require(&self, path: &str) -> Result<&Node> {
        self.nodes
            .get(path)
            .ok_or_else(|| Error::not_found(format!("node {path}")))
    }

    fn children(&self, path: &str) -> Vec<Node> {
        self.nodes
            .values()
            .filter(|n| n.parent_path().as_deref() == Some(path))
            .cloned()
            .collect()
    }

    /// `path` and everything below it
    fn subtree(&self, path: &str) -> Vec<String> {
        let below = child_path(path, "");
        self.nodes
            .keys()
            .filter(|p| p.as_str() == path || p.starts_with(&below))
            .cloned()
            .collect()
    }

    fn put_property(&mut self, property: Property) -> Result<()> {
        self.require(&property.owner)?;
        self.properties
            .entry(property.owner.clone())
            .or_default()
            .insert(property.name.clone(), property);
        Ok(())
    }
}

#[derive(Debug)]
struct Registry {
    workspaces: BTreeMap<String, Arc<RwLock<WorkspaceState>>>,
    namespaces: BTreeMap<String, String>,
    node_types: BTreeMap<String, NodeType>,
}

impl Registry {
    fn new() -> Self {
        let mut workspaces = BTreeMap::new();
        workspaces.insert(
            DEFAULT_WORKSPACE.to_string(),
            Arc::new(RwLock::new(WorkspaceState::with_root())),
        );
        let namespaces = DEFAULT_PREFIXES
            .iter()
            .map(|(p, u)| (p.to_string(), u.to_string()))
            .collect();
        let node_types = builtin_node_types()
            .into_iter()
            .map(|t| (t.name.clone(), t))
            .collect();
        Self {
            workspaces,
            namespaces,
            node_types,
        }
    }
}

fn builtin_node_types() -> Vec<NodeType> {
    use internal::*;
    vec![
        NodeType::primary(NT_BASE, &[]),
        NodeType::primary(NT_HIERARCHY_NODE, &[NT_BASE]),
        NodeType::primary(NT_FOLDER, &[NT_HIERARCHY_NODE]),
        NodeType::primary(NT_FILE, &[NT_HIERARCHY_NODE]),
        NodeType::primary(NT_RESOURCE, &[NT_BASE]),
        NodeType::primary(NT_UNSTRUCTURED, &[NT_BASE]),
        NodeType::primary(NT_FROZEN_NODE, &[NT_BASE, MIX_REFERENCEABLE]),
        NodeType::primary(MODE_ROOT, &[NT_BASE]),
        NodeType::primary(MODE_SYSTEM, &[NT_BASE]),
        NodeType::mixin(MIX_CREATED, &[]),
        NodeType::mixin(MIX_LAST_MODIFIED, &[]),
        NodeType::mixin(MIX_REFERENCEABLE, &[]),
        NodeType::mixin(MIX_SIMPLE_VERSIONABLE, &[]),
        NodeType::mixin(MIX_VERSIONABLE, &[MIX_SIMPLE_VERSIONABLE, MIX_REFERENCEABLE]),
        NodeType::mixin(FEDORA_RESOURCE, &[MIX_CREATED, MIX_LAST_MODIFIED, MIX_REFERENCEABLE]),
        NodeType::mixin(FEDORA_CONTAINER, &[FEDORA_RESOURCE]),
        NodeType::mixin(FEDORA_BINARY, &[FEDORA_RESOURCE]),
        NodeType::mixin(FEDORA_NON_RDF_SOURCE_DESCRIPTION, &[FEDORA_RESOURCE]),
        NodeType::mixin(FEDORA_PAIRTREE, &[]),
        NodeType::mixin(FEDORA_BLANKNODE, &[]),
        NodeType::mixin(FEDORA_TOMBSTONE, &[]),
        NodeType::mixin(LDP_BASIC_CONTAINER, &[]),
        NodeType::mixin(LDP_DIRECT_CONTAINER, &[]),
        NodeType::mixin(LDP_INDIRECT_CONTAINER, &[]),
    ]
}

/// An in-memory repository of named workspaces.
///
/// Cloning is cheap and every clone sees the same data.
#[derive(Clone)]
pub struct MemoryRepository {
    registry: Arc<RwLock<Registry>>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.read();
        f.debug_struct("MemoryRepository")
            .field("workspaces", &registry.workspaces.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MemoryRepository {
    /// A repository holding only the `default` workspace with its root node
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RwLock::new(Registry::new())),
        }
    }

    /// Open a session with direct access to the mutation API
    pub fn open(&self, workspace: &str) -> Result<Arc<MemorySession>> {
        let committed = self
            .registry
            .read()
            .workspaces
            .get(workspace)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("workspace {workspace}")))?;
        tracing::debug!(workspace, "opened memory session");
        Ok(Arc::new(MemorySession {
            workspace: workspace.to_string(),
            registry: self.registry.clone(),
            committed,
            staged: RwLock::new(None),
            live: AtomicBool::new(true),
        }))
    }

    /// Add an empty workspace (root node only)
    pub fn create_workspace(&self, name: &str) -> Result<()> {
        let mut registry = self.registry.write();
        if registry.workspaces.contains_key(name) {
            return Err(Error::repository(format!("workspace {name} already exists")));
        }
        registry.workspaces.insert(
            name.to_string(),
            Arc::new(RwLock::new(WorkspaceState::with_root())),
        );
        Ok(())
    }

    pub fn register_namespace(&self, prefix: &str, uri: &str) {
        self.registry
            .write()
            .namespaces
            .insert(prefix.to_string(), uri.to_string());
    }

    pub fn register_node_type(&self, node_type: NodeType) {
        self.registry
            .write()
            .node_types
            .insert(node_type.name.clone(), node_type);
    }
}

impl Repository for MemoryRepository {
    fn login(&self, workspace: &str) -> Result<Arc<dyn Session>> {
        let session: Arc<dyn Session> = self.open(workspace)?;
        Ok(session)
    }

    fn workspace_names(&self) -> Result<Vec<String>> {
        Ok(self.registry.read().workspaces.keys().cloned().collect())
    }
}

/// Session over one workspace of a [`MemoryRepository`]
pub struct MemorySession {
    workspace: String,
    registry: Arc<RwLock<Registry>>,
    committed: Arc<RwLock<WorkspaceState>>,
    staged: RwLock<Option<WorkspaceState>>,
    live: AtomicBool,
}

impl std::fmt::Debug for MemorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySession")
            .field("workspace", &self.workspace)
            .field("live", &self.is_live())
            .finish()
    }
}

impl MemorySession {
    fn ensure_live(&self) -> Result<()> {
        if self.is_live() {
            Ok(())
        } else {
            Err(Error::repository(format!(
                "session on workspace {} is closed",
                self.workspace
            )))
        }
    }

    fn read<R>(&self, f: impl FnOnce(&WorkspaceState) -> R) -> Result<R> {
        self.ensure_live()?;
        let staged = self.staged.read();
        Ok(match staged.as_ref() {
            Some(state) => f(state),
            None => f(&self.committed.read()),
        })
    }

    fn write<R>(&self, f: impl FnOnce(&mut WorkspaceState) -> Result<R>) -> Result<R> {
        self.ensure_live()?;
        let mut staged = self.staged.write();
        let state = staged.get_or_insert_with(|| self.committed.read().clone());
        f(state)
    }

    /// Add a node under an existing parent. The node gets a fresh identifier.
    pub fn add_node(&self, path: &str, primary_type: &str) -> Result<Node> {
        let parent = parent_path(path).ok_or_else(|| Error::invalid_path(path))?;
        self.write(|state| {
            state.require(&parent)?;
            if state.nodes.contains_key(path) {
                return Err(Error::repository(format!("node {path} already exists")));
            }
            let node = Node::new(path, Uuid::new_v4().to_string(), primary_type);
            state.insert_node(node.clone());
            Ok(node)
        })
    }

    pub fn add_mixin(&self, path: &str, mixin: &str) -> Result<()> {
        self.write(|state| {
            let node = state.node_mut(path)?;
            if !node.mixin_types.iter().any(|m| m == mixin) {
                node.mixin_types.push(mixin.to_string());
            }
            Ok(())
        })
    }

    pub fn remove_mixin(&self, path: &str, mixin: &str) -> Result<()> {
        self.write(|state| {
            state.node_mut(path)?.mixin_types.retain(|m| m != mixin);
            Ok(())
        })
    }

    /// Remove a node and everything below it
    pub fn remove_node(&self, path: &str) -> Result<()> {
        self.write(|state| {
            state.require(path)?;
            for p in state.subtree(path) {
                if let Some(node) = state.nodes.remove(&p) {
                    state.identifiers.remove(&node.identifier);
                }
                state.properties.remove(&p);
                state.histories.remove(&p);
            }
            Ok(())
        })
    }

    /// Set or replace a property
    pub fn put_property(&self, property: Property) -> Result<()> {
        self.write(|state| state.put_property(property))
    }

    /// Set a single-valued property
    pub fn set_property(&self, path: &str, name: &str, value: Value) -> Result<()> {
        self.put_property(Property::single(path, name, value))
    }

    /// Set a multi-valued property
    pub fn set_values(&self, path: &str, name: &str, values: Vec<Value>) -> Result<()> {
        self.put_property(Property::multiple(path, name, values))
    }

    pub fn remove_property(&self, path: &str, name: &str) -> Result<Option<Property>> {
        self.write(|state| {
            state.require(path)?;
            Ok(state
                .properties
                .get_mut(path)
                .and_then(|props| props.remove(name)))
        })
    }

    /// Create a repository container (`nt:folder` + `fedora:Container`)
    pub fn create_container(&self, path: &str) -> Result<Node> {
        let node = self.add_node(path, internal::NT_FOLDER)?;
        self.add_mixin(path, internal::FEDORA_CONTAINER)?;
        self.stamp_created(&node)?;
        self.node(path)?
            .ok_or_else(|| Error::repository(format!("node {path} vanished after create")))
    }

    /// Create a binary: a description node at `path` and its content node
    /// below it. Returns the description node.
    pub fn create_binary(&self, path: &str, data: &[u8], mime_type: &str) -> Result<Node> {
        let description = self.add_node(path, internal::NT_FILE)?;
        self.add_mixin(path, internal::FEDORA_NON_RDF_SOURCE_DESCRIPTION)?;
        self.stamp_created(&description)?;

        let content_path = child_path(path, internal::CONTENT);
        let content = self.add_node(&content_path, internal::NT_RESOURCE)?;
        self.add_mixin(&content_path, internal::FEDORA_BINARY)?;
        self.stamp_created(&content)?;
        self.put_property(Property::single(&content_path, internal::DATA, Value::binary(data)))?;
        self.put_property(
            Property::single(&content_path, internal::MIME_TYPE, Value::string(mime_type))
                .protected(),
        )?;
        self.set_property(
            &content_path,
            internal::CONTENT_DIGEST,
            Value::uri(DigestAlgorithm::Sha1.digest_uri(data)),
        )?;
        self.set_property(
            &content_path,
            internal::CONTENT_SIZE,
            Value::Long(data.len() as i64),
        )?;
        self.node(path)?
            .ok_or_else(|| Error::repository(format!("node {path} vanished after create")))
    }

    fn stamp_created(&self, node: &Node) -> Result<()> {
        let now = Value::Date(Utc::now());
        self.put_property(
            Property::single(&node.path, internal::UUID, Value::string(&node.identifier)).protected(),
        )?;
        self.put_property(Property::single(&node.path, internal::CREATED, now.clone()).protected())?;
        self.put_property(Property::single(&node.path, internal::LAST_MODIFIED, now).protected())
    }

    /// Snapshot a `mix:versionable` node into a new version.
    pub fn checkin(&self, path: &str, labels: &[&str]) -> Result<Version> {
        self.checkin_at(path, labels, Utc::now())
    }

    /// [`MemorySession::checkin`] with an explicit creation time
    pub fn checkin_at(&self, path: &str, labels: &[&str], created: DateTime<Utc>) -> Result<Version> {
        self.write(|state| {
            let node = state.require(path)?.clone();
            if !node.declares_type(internal::MIX_VERSIONABLE) {
                return Err(Error::repository(format!("node {path} is not versionable")));
            }
            let versions_path = child_path(path, VERSIONS_SEGMENT);
            let history = state
                .histories
                .entry(path.to_string())
                .or_insert_with(|| VersionHistory {
                    root_version: ROOT_VERSION.to_string(),
                    versions: vec![Version {
                        name: ROOT_VERSION.to_string(),
                        frozen_path: child_path(&versions_path, ROOT_VERSION),
                        created,
                        labels: Vec::new(),
                    }],
                });
            let name = format!("1.{}", history.versions.len() - 1);
            let version = Version {
                name: name.clone(),
                frozen_path: child_path(&versions_path, &name),
                created,
                labels: labels.iter().map(|l| l.to_string()).collect(),
            };
            history.versions.push(version.clone());
            freeze(state, path, &version.frozen_path)?;
            tracing::debug!(path, version = %name, "checked in");
            Ok(version)
        })
    }

    /// Add a label to an existing version
    pub fn add_version_label(&self, path: &str, version: &str, label: &str) -> Result<()> {
        self.write(|state| {
            let history = state
                .histories
                .get_mut(path)
                .ok_or_else(|| Error::not_found(format!("version history of {path}")))?;
            let version = history
                .versions
                .iter_mut()
                .find(|v| v.name == version)
                .ok_or_else(|| Error::not_found(format!("version {version} of {path}")))?;
            version.labels.push(label.to_string());
            Ok(())
        })
    }
}

/// Copy the subtree at `source` to `target` as frozen nodes.
///
/// `fcr:` children (earlier snapshots) are not copied.
fn freeze(state: &mut WorkspaceState, source: &str, target: &str) -> Result<()> {
    if state.nodes.contains_key(target) {
        return Err(Error::repository(format!("frozen node {target} already exists")));
    }
    let versions_root = parent_path(target).ok_or_else(|| Error::invalid_path(target))?;
    if !state.nodes.contains_key(&versions_root) {
        let holder = Node::new(&versions_root, Uuid::new_v4().to_string(), internal::NT_FOLDER);
        state.insert_node(holder);
    }

    let mut stack = vec![(source.to_string(), target.to_string())];
    while let Some((from, to)) = stack.pop() {
        let live = state.require(&from)?.clone();
        let frozen = Node::new(&to, Uuid::new_v4().to_string(), internal::NT_FROZEN_NODE);
        state.insert_node(frozen);

        let mut props: Vec<Property> = state
            .properties
            .get(&from)
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default();
        props.push(Property::single(&to, internal::FROZEN_UUID, Value::string(&live.identifier)));
        props.push(Property::single(
            &to,
            internal::FROZEN_PRIMARY_TYPE,
            Value::Name(live.primary_type.clone()),
        ));
        props.push(Property::multiple(
            &to,
            internal::FROZEN_MIXIN_TYPES,
            live.mixin_types.iter().cloned().map(Value::Name).collect(),
        ));
        for mut prop in props {
            prop.owner = to.clone();
            prop.protected = true;
            state.put_property(prop)?;
        }

        for child in state.children(&from) {
            if child.name().starts_with("fcr:") {
                continue;
            }
            stack.push((child.path.clone(), child_path(&to, child.name())));
        }
    }
    Ok(())
}

impl Session for MemorySession {
    fn node(&self, path: &str) -> Result<Option<Node>> {
        self.read(|state| state.nodes.get(path).cloned())
    }

    fn node_by_identifier(&self, identifier: &str) -> Result<Option<Node>> {
        self.read(|state| {
            state
                .identifiers
                .get(identifier)
                .and_then(|path| state.nodes.get(path))
                .cloned()
        })
    }

    fn properties(&self, path: &str) -> Result<BoxIter<Property>> {
        let props: Vec<Property> = self.read(|state| {
            state
                .properties
                .get(path)
                .map(|p| p.values().cloned().collect())
                .unwrap_or_default()
        })?;
        Ok(Box::new(props.into_iter().map(Ok)))
    }

    fn property(&self, path: &str, name: &str) -> Result<Option<Property>> {
        self.read(|state| {
            state
                .properties
                .get(path)
                .and_then(|p| p.get(name))
                .cloned()
        })
    }

    fn children(&self, path: &str) -> Result<BoxIter<Node>> {
        let children = self.read(|state| state.children(path))?;
        Ok(Box::new(children.into_iter().map(Ok)))
    }

    fn node_type(&self, name: &str) -> Result<Option<NodeType>> {
        self.ensure_live()?;
        Ok(self.registry.read().node_types.get(name).cloned())
    }

    fn node_types(&self) -> Result<BoxIter<NodeType>> {
        self.ensure_live()?;
        let types: Vec<NodeType> = self.registry.read().node_types.values().cloned().collect();
        Ok(Box::new(types.into_iter().map(Ok)))
    }

    fn namespace_uri(&self, prefix: &str) -> Result<Option<String>> {
        self.ensure_live()?;
        Ok(self.registry.read().namespaces.get(prefix).cloned())
    }

    fn namespace_prefix(&self, uri: &str) -> Result<Option<String>> {
        self.ensure_live()?;
        Ok(self
            .registry
            .read()
            .namespaces
            .iter()
            .find(|(_, u)| u.as_str() == uri)
            .map(|(p, _)| p.clone()))
    }

    fn namespace_prefixes(&self) -> Result<Vec<(String, String)>> {
        self.ensure_live()?;
        Ok(self
            .registry
            .read()
            .namespaces
            .iter()
            .map(|(p, u)| (p.clone(), u.clone()))
            .collect())
    }

    fn references(&self, path: &str, kind: ReferenceKind) -> Result<BoxIter<Property>> {
        let refs: Vec<Property> = self.read(|state| {
            let Some(target) = state.nodes.get(path) else {
                return Vec::new();
            };
            let mut owners: Vec<&String> = state.properties.keys().collect();
            owners.sort();
            owners
                .into_iter()
                .flat_map(|owner| state.properties[owner].values())
                .filter(|p| {
                    p.values.iter().any(|v| {
                        kind.includes(v) && v.as_str() == Some(target.identifier.as_str())
                    })
                })
                .cloned()
                .collect()
        })?;
        Ok(Box::new(refs.into_iter().map(Ok)))
    }

    fn version_history(&self, path: &str) -> Result<Option<VersionHistory>> {
        self.read(|state| state.histories.get(path).cloned())
    }

    fn fixity(&self, path: &str, algorithm: DigestAlgorithm) -> Result<Vec<FixityResult>> {
        let data = self.read(|state| {
            state
                .properties
                .get(path)
                .and_then(|p| p.get(internal::DATA))
                .and_then(|p| match p.value() {
                    Some(Value::Binary(data)) => Some(data.clone()),
                    _ => None,
                })
        })?;
        let data = data.ok_or_else(|| Error::not_found(format!("binary content at {path}")))?;
        let location = format!("memory://{}{}", self.workspace, path);
        Ok(vec![FixityResult::new(
            location,
            algorithm.digest_uri(&data),
            data.len() as u64,
        )])
    }

    fn save(&self) -> Result<()> {
        self.ensure_live()?;
        let mut staged = self.staged.write();
        let Some(state) = staged.as_mut() else {
            return Ok(());
        };
        let mut committed = self.committed.write();
        if committed.version != state.version {
            tracing::debug!(
                workspace = %self.workspace,
                base = state.version,
                current = committed.version,
                "save rejected, workspace changed"
            );
            return Err(Error::repository(format!(
                "workspace {} was saved by another session since these changes were staged",
                self.workspace
            )));
        }
        state.version += 1;
        if let Some(state) = staged.take() {
            *committed = state;
        }
        tracing::debug!(workspace = %self.workspace, version = committed.version, "saved session changes");
        Ok(())
    }

    fn refresh(&self, keep_changes: bool) -> Result<()> {
        self.ensure_live()?;
        if !keep_changes {
            self.staged.write().take();
        }
        Ok(())
    }

    fn has_pending_changes(&self) -> Result<bool> {
        self.ensure_live()?;
        Ok(self.staged.read().is_some())
    }

    fn logout(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    fn workspace_name(&self) -> String {
        self.workspace.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> Arc<MemorySession> {
        MemoryRepository::new().open(DEFAULT_WORKSPACE).unwrap()
    }

    #[test]
    fn test_root_exists() {
        let s = session();
        let root = s.node("/").unwrap().unwrap();
        assert!(root.is_root());
        assert!(root.declares_type(internal::FEDORA_CONTAINER));
    }

    #[test]
    fn test_add_node_requires_parent() {
        let s = session();
        assert!(matches!(s.add_node("/a/b", internal::NT_FOLDER), Err(Error::NotFound(_))));
        s.create_container("/a").unwrap();
        s.create_container("/a/b").unwrap();
        assert!(matches!(s.add_node("/a/b", internal::NT_FOLDER), Err(Error::Repository(_))));

        let children: Vec<String> = s
            .children("/a")
            .unwrap()
            .map(|n| n.unwrap().path)
            .collect();
        assert_eq!(children, vec!["/a/b"]);
    }

    #[test]
    fn test_save_and_rollback() {
        let repo = MemoryRepository::new();
        let writer = repo.open(DEFAULT_WORKSPACE).unwrap();
        let reader = repo.open(DEFAULT_WORKSPACE).unwrap();

        writer.create_container("/a").unwrap();
        assert!(writer.has_pending_changes().unwrap());
        assert!(reader.node("/a").unwrap().is_none());

        writer.save().unwrap();
        assert!(!writer.has_pending_changes().unwrap());
        assert!(reader.node("/a").unwrap().is_some());

        writer.create_container("/b").unwrap();
        writer.refresh(false).unwrap();
        assert!(writer.node("/b").unwrap().is_none());
    }

    #[test]
    fn test_concurrent_saves_never_lose_a_write() {
        let repo = MemoryRepository::new();
        let a = repo.open(DEFAULT_WORKSPACE).unwrap();
        let b = repo.open(DEFAULT_WORKSPACE).unwrap();

        a.create_container("/from_a").unwrap();
        b.create_container("/from_b").unwrap();
        a.save().unwrap();
        assert!(matches!(b.save(), Err(Error::Repository(_))));
        assert!(b.has_pending_changes().unwrap());

        let reader = repo.open(DEFAULT_WORKSPACE).unwrap();
        assert!(reader.node("/from_a").unwrap().is_some());
        assert!(reader.node("/from_b").unwrap().is_none());

        // start over from the current state and the save goes through
        b.refresh(false).unwrap();
        b.create_container("/from_b").unwrap();
        b.save().unwrap();
        assert!(reader.node("/from_a").unwrap().is_some());
        assert!(reader.node("/from_b").unwrap().is_some());
    }

    #[test]
    fn test_logout_closes_session() {
        let s = session();
        s.logout();
        assert!(!s.is_live());
        assert!(matches!(s.node("/"), Err(Error::Repository(_))));
    }

    #[test]
    fn test_references_and_identifiers() {
        let s = session();
        let target = s.create_container("/t").unwrap();
        s.create_container("/a").unwrap();
        s.create_container("/b").unwrap();
        s.set_property("/a", "dc:relation", Value::Reference(target.identifier.clone()))
            .unwrap();
        s.set_property("/b", "dc:seeAlso", Value::WeakReference(target.identifier.clone()))
            .unwrap();

        assert_eq!(
            s.node_by_identifier(&target.identifier).unwrap().unwrap().path,
            "/t"
        );
        let owners = |kind| -> Vec<String> {
            s.references("/t", kind)
                .unwrap()
                .map(|p| p.unwrap().owner)
                .collect()
        };
        assert_eq!(owners(ReferenceKind::Strong), vec!["/a"]);
        assert_eq!(owners(ReferenceKind::Weak), vec!["/b"]);
        assert_eq!(owners(ReferenceKind::All), vec!["/a", "/b"]);
    }

    #[test]
    fn test_binary_and_fixity() {
        let s = session();
        s.create_binary("/bin", b"hello", "text/plain").unwrap();
        let content = "/bin/jcr:content";
        let digest = s.property(content, internal::CONTENT_DIGEST).unwrap().unwrap();
        assert_eq!(
            digest.value(),
            Some(&Value::uri("urn:sha1:aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"))
        );

        let results = s.fixity(content, DigestAlgorithm::Sha1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].computed_size, 5);
        assert_eq!(results[0].content_location, "memory://default/bin/jcr:content");
        assert!(matches!(s.fixity("/bin", DigestAlgorithm::Sha1), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_checkin_freezes_subtree() {
        let s = session();
        s.create_container("/v").unwrap();
        s.create_container("/v/child").unwrap();
        s.add_mixin("/v", internal::MIX_VERSIONABLE).unwrap();
        s.set_property("/v", "dc:title", Value::string("first")).unwrap();

        let v1 = s.checkin("/v", &["stable"]).unwrap();
        assert_eq!(v1.name, "1.0");
        assert_eq!(v1.frozen_path, "/v/fcr:versions/1.0");

        let frozen = s.node(&v1.frozen_path).unwrap().unwrap();
        assert_eq!(frozen.primary_type, internal::NT_FROZEN_NODE);
        let title = s.property(&v1.frozen_path, "dc:title").unwrap().unwrap();
        assert!(title.protected);
        assert!(s.node("/v/fcr:versions/1.0/child").unwrap().is_some());

        let v2 = s.checkin("/v", &[]).unwrap();
        assert_eq!(v2.name, "1.1");
        assert!(s.node("/v/fcr:versions/1.1/fcr:versions").unwrap().is_none());

        let history = s.version_history("/v").unwrap().unwrap();
        assert_eq!(history.versions.len(), 3);
        assert_eq!(history.versions[0].name, ROOT_VERSION);
    }

    #[test]
    fn test_checkin_requires_versionable() {
        let s = session();
        s.create_container("/plain").unwrap();
        assert!(matches!(s.checkin("/plain", &[]), Err(Error::Repository(_))));
    }
}
