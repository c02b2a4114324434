//! Transaction-scoped session wrapper

use crate::error::Result;
use crate::fixity::{DigestAlgorithm, FixityResult};
use crate::node::{Node, NodeType, ReferenceKind, VersionHistory};
use crate::session::{BoxIter, Session};
use crate::value::Property;
use std::sync::Arc;

/// A session handed to code running inside a transaction.
///
/// Reads delegate to the wrapped session. `save` and `logout` do nothing:
/// only the owning [`Transaction`](crate::transaction::Transaction) may
/// commit or release the underlying session, so code that believes it holds
/// an ordinary session cannot end the transaction early.
pub struct TxAwareSession {
    inner: Arc<dyn Session>,
    transaction_id: String,
}

impl std::fmt::Debug for TxAwareSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxAwareSession")
            .field("transaction_id", &self.transaction_id)
            .field("workspace", &self.inner.workspace_name())
            .finish()
    }
}

impl TxAwareSession {
    pub fn new(inner: Arc<dyn Session>, transaction_id: impl Into<String>) -> Self {
        Self {
            inner,
            transaction_id: transaction_id.into(),
        }
    }

    /// The session this wrapper delegates to
    pub fn inner(&self) -> &Arc<dyn Session> {
        &self.inner
    }
}

impl Session for TxAwareSession {
    fn node(&self, path: &str) -> Result<Option<Node>> {
        self.inner.node(path)
    }

    fn node_by_identifier(&self, identifier: &str) -> Result<Option<Node>> {
        self.inner.node_by_identifier(identifier)
    }

    fn properties(&self, path: &str) -> Result<BoxIter<Property>> {
        self.inner.properties(path)
    }

    fn property(&self, path: &str, name: &str) -> Result<Option<Property>> {
        self.inner.property(path, name)
    }

    fn children(&self, path: &str) -> Result<BoxIter<Node>> {
        self.inner.children(path)
    }

    fn node_type(&self, name: &str) -> Result<Option<NodeType>> {
        self.inner.node_type(name)
    }

    fn node_types(&self) -> Result<BoxIter<NodeType>> {
        self.inner.node_types()
    }

    fn namespace_uri(&self, prefix: &str) -> Result<Option<String>> {
        self.inner.namespace_uri(prefix)
    }

    fn namespace_prefix(&self, uri: &str) -> Result<Option<String>> {
        self.inner.namespace_prefix(uri)
    }

    fn namespace_prefixes(&self) -> Result<Vec<(String, String)>> {
        self.inner.namespace_prefixes()
    }

    fn references(&self, path: &str, kind: ReferenceKind) -> Result<BoxIter<Property>> {
        self.inner.references(path, kind)
    }

    fn version_history(&self, path: &str) -> Result<Option<VersionHistory>> {
        self.inner.version_history(path)
    }

    fn fixity(&self, path: &str, algorithm: DigestAlgorithm) -> Result<Vec<FixityResult>> {
        self.inner.fixity(path, algorithm)
    }

    fn save(&self) -> Result<()> {
        tracing::trace!(tx = %self.transaction_id, "save deferred to transaction commit");
        Ok(())
    }

    fn refresh(&self, keep_changes: bool) -> Result<()> {
        self.inner.refresh(keep_changes)
    }

    fn has_pending_changes(&self) -> Result<bool> {
        self.inner.has_pending_changes()
    }

    fn logout(&self) {
        tracing::trace!(tx = %self.transaction_id, "logout deferred to transaction end");
    }

    fn is_live(&self) -> bool {
        self.inner.is_live()
    }

    fn workspace_name(&self) -> String {
        self.inner.workspace_name()
    }

    fn transaction_id(&self) -> Option<String> {
        Some(self.transaction_id.clone())
    }
}
