//! Repository resources
//!
//! A [`Resource`] wraps one store node together with the session it was read
//! through. The [`ResourceKind`] tag decides the few places where behavior
//! differs: a binary and its description are two nodes describing one
//! logical resource, and navigation between them is explicit
//! ([`Resource::described_resource`], [`Resource::description`]).

use crate::error::{Error, Result};
use crate::fixity::{DigestAlgorithm, FixityResult};
use crate::node::{child_path, parent_path, Node, VersionHistory};
use crate::session::{BoxIter, Session};
use crate::types::type_closure;
use crate::value::{Property, Value};
use ldp_vocab::internal;
use std::fmt;
use std::sync::Arc;

/// What a node represents in the LDP model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// An RDF source that may hold children
    Container,
    /// Binary content (the `jcr:content` node)
    Binary,
    /// RDF description of a binary (the node above its content)
    Description,
    /// Pairtree, blank-node and tombstone nodes, and anything untyped
    Placeholder,
}

/// LDP membership behavior of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerVariant {
    Basic,
    Direct,
    Indirect,
}

impl ContainerVariant {
    /// Variant named by a type closure. Indirect wins over direct, direct
    /// over basic.
    fn from_types(types: &[String]) -> Option<Self> {
        let has = |name: &str| types.iter().any(|t| t == name);
        let found: Vec<ContainerVariant> = [
            (internal::LDP_INDIRECT_CONTAINER, ContainerVariant::Indirect),
            (internal::LDP_DIRECT_CONTAINER, ContainerVariant::Direct),
            (internal::LDP_BASIC_CONTAINER, ContainerVariant::Basic),
        ]
        .into_iter()
        .filter(|(name, _)| has(name))
        .map(|(_, variant)| variant)
        .collect();
        if found.len() > 1 {
            tracing::warn!(?found, "node has more than one container variant");
        }
        found.first().copied()
    }
}

/// A node read through a session, tagged with its kind.
///
/// Cloning is cheap.
#[derive(Clone)]
pub struct Resource {
    session: Arc<dyn Session>,
    node: Arc<Node>,
    kind: ResourceKind,
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.node.path)
            .field("kind", &self.kind)
            .finish()
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.session.workspace_name() == other.session.workspace_name()
    }
}

impl Resource {
    /// Wrap a node, classifying it from its declared types.
    pub fn from_node(session: Arc<dyn Session>, node: Node) -> Result<Self> {
        let declared = declared_types(session.as_ref(), &node)?;
        let kind = classify(&declared);
        Ok(Self {
            session,
            node: Arc::new(node),
            kind,
        })
    }

    /// Resource at an internal path, if the node exists
    pub fn at(session: &Arc<dyn Session>, path: &str) -> Result<Option<Self>> {
        match session.node(path)? {
            Some(node) => Ok(Some(Self::from_node(session.clone(), node)?)),
            None => Ok(None),
        }
    }

    /// Resource at an internal path; a missing node is an error
    pub fn require(session: &Arc<dyn Session>, path: &str) -> Result<Self> {
        Self::at(session, path)?.ok_or_else(|| Error::not_found(format!("resource {path}")))
    }

    /// Resource with a stable identifier
    pub fn by_identifier(session: &Arc<dyn Session>, identifier: &str) -> Result<Option<Self>> {
        match session.node_by_identifier(identifier)? {
            Some(node) => Ok(Some(Self::from_node(session.clone(), node)?)),
            None => Ok(None),
        }
    }

    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn path(&self) -> &str {
        &self.node.path
    }

    pub fn identifier(&self) -> &str {
        &self.node.identifier
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn is_root(&self) -> bool {
        self.node.is_root()
    }

    /// A historical snapshot rather than a live node
    pub fn is_frozen(&self) -> bool {
        is_frozen(&self.node)
    }

    /// Primary and mixin types as the node declares them, read from the
    /// `jcr:frozen*` properties for a frozen node.
    pub fn declared_types(&self) -> Result<Vec<String>> {
        declared_types(self.session.as_ref(), &self.node)
    }

    /// Declared types and all their supertypes, each once
    pub fn types(&self) -> Result<Vec<String>> {
        type_closure(self.session.as_ref(), &self.declared_types()?)
    }

    pub fn has_type(&self, name: &str) -> Result<bool> {
        Ok(self.types()?.iter().any(|t| t == name))
    }

    /// Declared directly, supertypes not considered
    pub fn declares_type(&self, name: &str) -> Result<bool> {
        Ok(self.declared_types()?.iter().any(|t| t == name))
    }

    pub fn is_blank_node(&self) -> Result<bool> {
        self.declares_type(internal::FEDORA_BLANKNODE)
    }

    /// Membership variant, supertypes of the declared types included
    pub fn container_variant(&self) -> Result<Option<ContainerVariant>> {
        Ok(ContainerVariant::from_types(&self.types()?))
    }

    /// The live node this snapshot was frozen from. A live resource is its
    /// own unfrozen resource.
    pub fn unfrozen_resource(&self) -> Result<Option<Resource>> {
        if !self.is_frozen() {
            return Ok(Some(self.clone()));
        }
        let uuid = self.session.property(self.path(), internal::FROZEN_UUID)?;
        match uuid.as_ref().and_then(Property::value).and_then(Value::as_str) {
            Some(id) => Self::by_identifier(&self.session, id),
            None => Ok(None),
        }
    }

    /// The binary a description describes; any other resource describes
    /// itself.
    pub fn described_resource(&self) -> Result<Resource> {
        if self.kind != ResourceKind::Description {
            return Ok(self.clone());
        }
        let content = child_path(self.path(), internal::CONTENT);
        Self::require(&self.session, &content)
    }

    /// The description of a binary; any other resource is its own
    /// description.
    pub fn description(&self) -> Result<Resource> {
        if self.kind != ResourceKind::Binary {
            return Ok(self.clone());
        }
        let parent = parent_path(self.path())
            .ok_or_else(|| Error::repository(format!("binary {} has no description", self.path())))?;
        Self::require(&self.session, &parent)
    }

    /// Immediate parent node
    pub fn parent(&self) -> Result<Option<Resource>> {
        match self.node.parent_path() {
            Some(path) => Self::at(&self.session, &path),
            None => Ok(None),
        }
    }

    /// Nearest ancestor of the logical resource that is an addressable
    /// resource: pairtree nodes, `#` holders and `jcr:`/`fcr:` nodes are
    /// skipped.
    pub fn container(&self) -> Result<Option<Resource>> {
        let start = self.description()?;
        let mut next = start.node.parent_path();
        while let Some(path) = next {
            if let Some(node) = self.session.node(&path)? {
                if !node.is_internal_child() {
                    let candidate = Self::from_node(self.session.clone(), node)?;
                    if !candidate.declares_type(internal::FEDORA_PAIRTREE)? {
                        return Ok(Some(candidate));
                    }
                }
            }
            next = parent_path(&path);
        }
        Ok(None)
    }

    /// Children in the LDP sense: repository plumbing nodes are excluded.
    pub fn children(&self) -> Result<BoxIter<Resource>> {
        if self.kind == ResourceKind::Binary {
            return Ok(Box::new(std::iter::empty()));
        }
        wrap_nodes(self.session.clone(), self.session.children(self.path())?, |n| {
            !n.is_internal_child() && n.primary_type != internal::MODE_SYSTEM
        })
    }

    /// Children of the `#` holder node: hash-fragment resources
    pub fn hash_children(&self) -> Result<BoxIter<Resource>> {
        let holder = child_path(self.path(), internal::HASH_HOLDER);
        if self.session.node(&holder)?.is_none() {
            return Ok(Box::new(std::iter::empty()));
        }
        wrap_nodes(self.session.clone(), self.session.children(&holder)?, |_| true)
    }

    /// This node's own store properties
    pub fn properties(&self) -> Result<BoxIter<Property>> {
        self.session.properties(self.path())
    }

    pub fn property(&self, name: &str) -> Result<Option<Property>> {
        self.session.property(self.path(), name)
    }

    pub fn version_history(&self) -> Result<Option<VersionHistory>> {
        self.session.version_history(self.path())
    }

    /// Expected digest (`premis:hasMessageDigest`) of a binary
    pub fn content_digest(&self) -> Result<Option<String>> {
        Ok(self
            .property(internal::CONTENT_DIGEST)?
            .as_ref()
            .and_then(Property::value)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    /// Expected size (`premis:hasSize`) of a binary
    pub fn content_size(&self) -> Result<Option<u64>> {
        Ok(self
            .property(internal::CONTENT_SIZE)?
            .as_ref()
            .and_then(Property::value)
            .and_then(Value::as_long)
            .and_then(|n| u64::try_from(n).ok()))
    }

    /// Check every stored copy of a binary against its recorded digest and
    /// size.
    ///
    /// The digest is computed with the algorithm the recorded digest URI
    /// names; `algorithm` is used when the URI names none we support.
    pub fn fixity(&self, algorithm: DigestAlgorithm) -> Result<Vec<FixityResult>> {
        let binary = self.described_resource()?;
        if binary.kind != ResourceKind::Binary {
            return Err(Error::repository(format!(
                "fixity requested on non-binary resource {}",
                self.path()
            )));
        }
        let expected_digest = binary
            .content_digest()?
            .ok_or_else(|| Error::not_found(format!("content digest of {}", binary.path())))?;
        let expected_size = binary
            .content_size()?
            .ok_or_else(|| Error::not_found(format!("content size of {}", binary.path())))?;
        let algorithm = DigestAlgorithm::from_digest_uri(&expected_digest).unwrap_or(algorithm);
        let results = self.session.fixity(binary.path(), algorithm)?;
        Ok(results
            .into_iter()
            .map(|r| r.verify(&expected_digest, expected_size))
            .collect())
    }
}

fn wrap_nodes(
    session: Arc<dyn Session>,
    nodes: BoxIter<Node>,
    keep: fn(&Node) -> bool,
) -> Result<BoxIter<Resource>> {
    Ok(Box::new(nodes.filter_map(move |node| match node {
        Ok(node) if keep(&node) => Some(Resource::from_node(session.clone(), node)),
        Ok(_) => None,
        Err(e) => Some(Err(e)),
    })))
}

pub(crate) fn is_frozen(node: &Node) -> bool {
    node.primary_type == internal::NT_FROZEN_NODE
        || node.path.split('/').any(|s| s == internal::FROZEN_NODE)
}

fn declared_types(session: &dyn Session, node: &Node) -> Result<Vec<String>> {
    if is_frozen(node) {
        let mut types = Vec::new();
        if let Some(primary) = session.property(&node.path, internal::FROZEN_PRIMARY_TYPE)? {
            types.extend(primary.values.iter().filter_map(Value::as_str).map(str::to_string));
        }
        if let Some(mixins) = session.property(&node.path, internal::FROZEN_MIXIN_TYPES)? {
            types.extend(mixins.values.iter().filter_map(Value::as_str).map(str::to_string));
        }
        if !types.is_empty() {
            return Ok(types);
        }
    }
    let mut types = Vec::with_capacity(1 + node.mixin_types.len());
    types.push(node.primary_type.clone());
    types.extend(node.mixin_types.iter().cloned());
    Ok(types)
}

fn classify(types: &[String]) -> ResourceKind {
    let has = |name: &str| types.iter().any(|t| t == name);
    if has(internal::FEDORA_NON_RDF_SOURCE_DESCRIPTION) || has(internal::NT_FILE) {
        ResourceKind::Description
    } else if has(internal::FEDORA_BINARY) || has(internal::NT_RESOURCE) {
        ResourceKind::Binary
    } else if has(internal::FEDORA_PAIRTREE)
        || has(internal::FEDORA_BLANKNODE)
        || has(internal::FEDORA_TOMBSTONE)
    {
        ResourceKind::Placeholder
    } else if has(internal::FEDORA_CONTAINER)
        || has(internal::MODE_ROOT)
        || has(internal::NT_FOLDER)
        || has(internal::NT_UNSTRUCTURED)
        || ContainerVariant::from_types(types).is_some()
    {
        ResourceKind::Container
    } else {
        ResourceKind::Placeholder
    }
}
