//! Transactions: the only owners allowed to commit or release a session

use crate::error::{Error, Result};
use crate::session::Session;
use crate::tx_session::TxAwareSession;
use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Upper bound on a transaction timeout (ten years)
const MAX_TIMEOUT_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// An open transaction over one underlying session
pub struct Transaction {
    id: String,
    underlying: Arc<dyn Session>,
    scoped: Arc<dyn Session>,
    timeout: Duration,
    expires_at: Mutex<DateTime<Utc>>,
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("expires_at", &*self.expires_at.lock())
            .finish()
    }
}

impl Transaction {
    pub fn new(underlying: Arc<dyn Session>, timeout: Duration) -> Self {
        let id = Uuid::new_v4().to_string();
        let scoped: Arc<dyn Session> = Arc::new(TxAwareSession::new(underlying.clone(), &id));
        Self {
            id,
            underlying,
            scoped,
            timeout,
            expires_at: Mutex::new(Utc::now() + timeout),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The session request code should read and write through
    pub fn session(&self) -> Arc<dyn Session> {
        self.scoped.clone()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        *self.expires_at.lock()
    }

    /// Push the expiry out by one timeout from now
    pub fn update_expiry(&self) -> DateTime<Utc> {
        let next = Utc::now() + self.timeout;
        *self.expires_at.lock() = next;
        next
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    /// Save the underlying session, then release it
    pub fn commit(&self) -> Result<()> {
        tracing::debug!(tx = %self.id, "committing transaction");
        self.underlying.save()?;
        self.underlying.logout();
        Ok(())
    }

    /// Discard pending changes, then release the session
    pub fn rollback(&self) -> Result<()> {
        tracing::debug!(tx = %self.id, "rolling back transaction");
        self.underlying.refresh(false)?;
        self.underlying.logout();
        Ok(())
    }
}

/// Open transactions by id
#[derive(Debug)]
pub struct TransactionRegistry {
    transactions: RwLock<FxHashMap<String, Arc<Transaction>>>,
    timeout: Duration,
}

impl TransactionRegistry {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            transactions: RwLock::new(FxHashMap::default()),
            timeout: Duration::seconds(timeout_secs.min(MAX_TIMEOUT_SECS) as i64),
        }
    }

    /// Start a transaction over a freshly opened session
    pub fn begin(&self, session: Arc<dyn Session>) -> Arc<Transaction> {
        let tx = Arc::new(Transaction::new(session, self.timeout));
        self.transactions
            .write()
            .insert(tx.id().to_string(), tx.clone());
        tracing::debug!(tx = %tx.id(), "began transaction");
        tx
    }

    /// An open, unexpired transaction. Looking a transaction up refreshes
    /// its expiry.
    pub fn get(&self, id: &str) -> Result<Arc<Transaction>> {
        let tx = self
            .transactions
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::transaction_missing(id))?;
        if tx.is_expired_at(Utc::now()) {
            self.discard(&tx);
            return Err(Error::transaction_missing(id));
        }
        tx.update_expiry();
        Ok(tx)
    }

    pub fn commit(&self, id: &str) -> Result<()> {
        let tx = self.take(id)?;
        tx.commit()
    }

    pub fn rollback(&self, id: &str) -> Result<()> {
        let tx = self.take(id)?;
        tx.rollback()
    }

    /// Roll back and forget every transaction expired at `now`. Returns how
    /// many were removed.
    pub fn expire_stale(&self, now: DateTime<Utc>) -> usize {
        let stale: Vec<Arc<Transaction>> = self
            .transactions
            .read()
            .values()
            .filter(|tx| tx.is_expired_at(now))
            .cloned()
            .collect();
        for tx in &stale {
            self.discard(tx);
        }
        stale.len()
    }

    pub fn len(&self) -> usize {
        self.transactions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take(&self, id: &str) -> Result<Arc<Transaction>> {
        self.transactions
            .write()
            .remove(id)
            .ok_or_else(|| Error::transaction_missing(id))
    }

    fn discard(&self, tx: &Transaction) {
        self.transactions.write().remove(tx.id());
        if let Err(e) = tx.rollback() {
            tracing::warn!(tx = %tx.id(), error = %e, "rollback of expired transaction failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRepository;
    use crate::session::Repository;

    #[test]
    fn test_commit_publishes_changes() {
        let repo = MemoryRepository::new();
        let registry = TransactionRegistry::new(60);
        let underlying = repo.open("default").unwrap();
        let tx = registry.begin(underlying.clone());

        underlying.create_container("/a").unwrap();
        tx.session().save().unwrap();
        assert!(repo.open("default").unwrap().node("/a").unwrap().is_none());

        registry.commit(tx.id()).unwrap();
        assert!(repo.open("default").unwrap().node("/a").unwrap().is_some());
        assert!(!underlying.is_live());
        assert!(matches!(registry.get(tx.id()), Err(Error::TransactionMissing(_))));
    }

    #[test]
    fn test_rollback_discards_changes() {
        let repo = MemoryRepository::new();
        let registry = TransactionRegistry::new(60);
        let underlying = repo.open("default").unwrap();
        let tx = registry.begin(underlying.clone());

        underlying.create_container("/a").unwrap();
        registry.rollback(tx.id()).unwrap();
        assert!(repo.open("default").unwrap().node("/a").unwrap().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_expiry() {
        let repo = MemoryRepository::new();
        let registry = TransactionRegistry::new(60);
        let tx = registry.begin(repo.login("default").unwrap());

        assert!(!tx.is_expired_at(Utc::now()));
        assert!(registry.get(tx.id()).is_ok());
        assert_eq!(registry.expire_stale(Utc::now() + Duration::seconds(120)), 1);
        assert!(matches!(registry.get(tx.id()), Err(Error::TransactionMissing(_))));
    }
}
