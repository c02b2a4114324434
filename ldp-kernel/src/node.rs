//! Store records: nodes, node types and version histories

use chrono::{DateTime, Utc};
use ldp_vocab::internal;
use serde::{Deserialize, Serialize};

/// A node in the hierarchical store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Absolute internal path; the root is `/`
    pub path: String,
    /// Stable identifier, the target of reference values
    pub identifier: String,
    /// `prefix:local`
    pub primary_type: String,
    pub mixin_types: Vec<String>,
}

impl Node {
    pub fn new(
        path: impl Into<String>,
        identifier: impl Into<String>,
        primary_type: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            identifier: identifier.into(),
            primary_type: primary_type.into(),
            mixin_types: Vec::new(),
        }
    }

    pub fn with_mixin(mut self, mixin: impl Into<String>) -> Self {
        self.mixin_types.push(mixin.into());
        self
    }

    pub fn is_root(&self) -> bool {
        self.path == "/"
    }

    /// Last path segment; empty for the root
    pub fn name(&self) -> &str {
        node_name(&self.path)
    }

    pub fn parent_path(&self) -> Option<String> {
        parent_path(&self.path)
    }

    /// Number of segments below the root
    pub fn depth(&self) -> usize {
        self.path.split('/').filter(|s| !s.is_empty()).count()
    }

    /// Primary or mixin type, without supertypes
    pub fn declares_type(&self, name: &str) -> bool {
        self.primary_type == name || self.mixin_types.iter().any(|m| m == name)
    }

    /// Nodes under `jcr:`/`fcr:` segments or named `#` are repository
    /// plumbing, not children in the LDP sense.
    pub fn is_internal_child(&self) -> bool {
        let name = self.name();
        name == internal::HASH_HOLDER || name.starts_with("jcr:") || name.starts_with("fcr:")
    }
}

/// Last segment of an internal path
pub fn node_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

/// Parent of an internal path; `None` for the root
pub fn parent_path(path: &str) -> Option<String> {
    if path == "/" || path.is_empty() {
        return None;
    }
    match path.trim_end_matches('/').rfind('/') {
        Some(0) => Some("/".to_string()),
        Some(i) => Some(path[..i].to_string()),
        None => None,
    }
}

/// Append a segment to an internal path
pub fn child_path(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// A registered node type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeType {
    pub name: String,
    /// Declared (direct) supertypes
    pub supertypes: Vec<String>,
    pub is_mixin: bool,
}

impl NodeType {
    pub fn primary(name: &str, supertypes: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            supertypes: supertypes.iter().map(|s| s.to_string()).collect(),
            is_mixin: false,
        }
    }

    pub fn mixin(name: &str, supertypes: &[&str]) -> Self {
        Self {
            is_mixin: true,
            ..Self::primary(name, supertypes)
        }
    }
}

/// Which inbound references to look up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Strong,
    Weak,
    All,
}

impl ReferenceKind {
    pub fn includes(&self, value: &crate::Value) -> bool {
        match (self, value) {
            (ReferenceKind::Strong | ReferenceKind::All, crate::Value::Reference(_)) => true,
            (ReferenceKind::Weak | ReferenceKind::All, crate::Value::WeakReference(_)) => true,
            _ => false,
        }
    }
}

/// One immutable snapshot in a version history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub name: String,
    /// Path of the frozen copy of the versioned node
    pub frozen_path: String,
    pub created: DateTime<Utc>,
    pub labels: Vec<String>,
}

/// Version history of a versionable node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionHistory {
    /// Name of the bootstrap version every history starts with
    pub root_version: String,
    /// All versions, root included, oldest first
    pub versions: Vec<Version>,
}

impl VersionHistory {
    /// Versions a client can see: everything but the bootstrap version
    pub fn public_versions(&self) -> impl Iterator<Item = &Version> {
        self.versions
            .iter()
            .filter(move |v| v.name != self.root_version)
    }
}
