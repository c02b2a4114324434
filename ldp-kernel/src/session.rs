//! Resource store interface
//!
//! The kernel never talks to a storage engine directly. Everything it needs
//! from the store goes through [`Session`], a single-threaded, synchronous
//! view of one workspace (optionally scoped to a transaction).
//!
//! Iterators handed out by a session are owned: they may outlive the call
//! that produced them and are released when dropped.

use crate::error::Result;
use crate::fixity::{DigestAlgorithm, FixityResult};
use crate::node::{Node, NodeType, ReferenceKind, VersionHistory};
use crate::value::Property;
use std::sync::Arc;

/// Owned, fallible iterator returned by store reads
pub type BoxIter<T> = Box<dyn Iterator<Item = Result<T>> + Send>;

/// A view of one workspace of the resource store
pub trait Session: Send + Sync {
    /// Node at an internal path
    fn node(&self, path: &str) -> Result<Option<Node>>;

    /// Node with the given stable identifier
    fn node_by_identifier(&self, identifier: &str) -> Result<Option<Node>>;

    /// All properties of the node at `path`
    fn properties(&self, path: &str) -> Result<BoxIter<Property>>;

    /// One named property of the node at `path`
    fn property(&self, path: &str, name: &str) -> Result<Option<Property>>;

    /// Direct children of the node at `path`, in store order
    fn children(&self, path: &str) -> Result<BoxIter<Node>>;

    /// A registered node type
    fn node_type(&self, name: &str) -> Result<Option<NodeType>>;

    /// Every registered node type
    fn node_types(&self) -> Result<BoxIter<NodeType>>;

    /// Namespace URI registered for a prefix
    fn namespace_uri(&self, prefix: &str) -> Result<Option<String>>;

    /// Prefix registered for a namespace URI
    fn namespace_prefix(&self, uri: &str) -> Result<Option<String>>;

    /// Every registered `(prefix, uri)` pair
    fn namespace_prefixes(&self) -> Result<Vec<(String, String)>>;

    /// Properties elsewhere in the workspace whose values reference the node
    /// at `path`
    fn references(&self, path: &str, kind: ReferenceKind) -> Result<BoxIter<Property>>;

    /// Version history of the node at `path`, if it is versioned
    fn version_history(&self, path: &str) -> Result<Option<VersionHistory>>;

    /// Checksums of every stored copy of the binary content at `path`.
    ///
    /// Results come back unverified; see [`FixityResult::verify`].
    fn fixity(&self, path: &str, algorithm: DigestAlgorithm) -> Result<Vec<FixityResult>>;

    /// Persist pending changes
    fn save(&self) -> Result<()>;

    /// Discard (`keep_changes == false`) or rebase pending changes
    fn refresh(&self, keep_changes: bool) -> Result<()>;

    fn has_pending_changes(&self) -> Result<bool>;

    /// Release the session
    fn logout(&self);

    fn is_live(&self) -> bool;

    fn workspace_name(&self) -> String;

    /// Id of the transaction this session is scoped to
    fn transaction_id(&self) -> Option<String> {
        None
    }
}

/// Hands out sessions
pub trait Repository: Send + Sync {
    /// Open a session on a workspace
    fn login(&self, workspace: &str) -> Result<Arc<dyn Session>>;

    /// Names of all workspaces
    fn workspace_names(&self) -> Result<Vec<String>>;
}
