//! Resolving which session a request reads through
//!
//! A request path may start with a scoping segment:
//!
//! * `/tx:<id>/…` reads through the open transaction `<id>`;
//! * `/workspace:<name>/…` reads through a session on workspace `<name>`;
//! * anything else reads through the default workspace.

use crate::config::KernelConfig;
use crate::error::{Error, Result};
use crate::identifier::HttpIdentifierConverter;
use crate::session::{Repository, Session};
use crate::transaction::TransactionRegistry;
use std::sync::Arc;

const TX_PREFIX: &str = "tx:";
const WORKSPACE_PREFIX: &str = "workspace:";

/// The session scope a request path selects
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestScope {
    Default,
    Transaction(String),
    Workspace(String),
}

/// A request path split into its scope and the internal path below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedPath {
    pub scope: RequestScope,
    pub path: String,
}

impl RequestScope {
    /// Split a leading `tx:`/`workspace:` segment off a request path.
    pub fn parse(request_path: &str) -> Result<ScopedPath> {
        let trimmed = request_path.strip_prefix('/').unwrap_or(request_path);
        let (first, rest) = match trimmed.split_once('/') {
            Some((first, rest)) => (first, format!("/{rest}")),
            None => (trimmed, "/".to_string()),
        };

        let scope = if let Some(id) = first.strip_prefix(TX_PREFIX) {
            if id.is_empty() {
                return Err(Error::invalid_path(format!("empty transaction id in {request_path}")));
            }
            RequestScope::Transaction(id.to_string())
        } else if let Some(name) = first.strip_prefix(WORKSPACE_PREFIX) {
            if name.is_empty() {
                return Err(Error::invalid_path(format!("empty workspace name in {request_path}")));
            }
            RequestScope::Workspace(name.to_string())
        } else {
            let path = if request_path.is_empty() {
                "/".to_string()
            } else if request_path.starts_with('/') {
                request_path.to_string()
            } else {
                format!("/{request_path}")
            };
            return Ok(ScopedPath {
                scope: RequestScope::Default,
                path,
            });
        };

        Ok(ScopedPath { scope, path: rest })
    }

    /// The segment this scope contributes to external IRIs
    pub fn segment(&self) -> Option<String> {
        match self {
            RequestScope::Default => None,
            RequestScope::Transaction(id) => Some(format!("{TX_PREFIX}{id}")),
            RequestScope::Workspace(name) => Some(format!("{WORKSPACE_PREFIX}{name}")),
        }
    }
}

/// Produces the session (and matching identifier converter) for a request
pub struct SessionFactory {
    repository: Arc<dyn Repository>,
    transactions: Arc<TransactionRegistry>,
    config: KernelConfig,
}

impl std::fmt::Debug for SessionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionFactory")
            .field("config", &self.config)
            .field("open_transactions", &self.transactions.len())
            .finish()
    }
}

impl SessionFactory {
    pub fn new(repository: Arc<dyn Repository>, config: KernelConfig) -> Self {
        let transactions = Arc::new(TransactionRegistry::new(config.transaction_timeout_secs));
        Self {
            repository,
            transactions,
            config,
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn transactions(&self) -> &Arc<TransactionRegistry> {
        &self.transactions
    }

    /// Open a transaction on the default workspace
    pub fn begin_transaction(&self) -> Result<String> {
        let session = self.repository.login(&self.config.default_workspace)?;
        Ok(self.transactions.begin(session).id().to_string())
    }

    /// Session for a parsed scope
    pub fn session_for_scope(&self, scope: &RequestScope) -> Result<Arc<dyn Session>> {
        match scope {
            RequestScope::Transaction(id) => {
                tracing::debug!(tx = %id, "request scoped to transaction");
                Ok(self.transactions.get(id)?.session())
            }
            RequestScope::Workspace(name) => {
                tracing::debug!(workspace = %name, "request scoped to workspace");
                self.repository.login(name)
            }
            RequestScope::Default => self.repository.login(&self.config.default_workspace),
        }
    }

    /// Session for a request path, and the path with its scope removed
    pub fn session_for(&self, request_path: &str) -> Result<(Arc<dyn Session>, ScopedPath)> {
        let scoped = RequestScope::parse(request_path)?;
        let session = self.session_for_scope(&scoped.scope)?;
        Ok((session, scoped))
    }

    /// Identifier converter that keeps generated links inside `scope`
    pub fn converter_for(
        &self,
        scope: &RequestScope,
        session: Arc<dyn Session>,
    ) -> HttpIdentifierConverter {
        HttpIdentifierConverter::new(&self.config.base_url, scope, session)
    }
}
