//! # LDP Kernel
//!
//! Store-facing half of the LDP description pipeline.
//!
//! This crate provides:
//! - The resource store seam: [`Session`] and [`Repository`]
//! - Store records: [`Node`], [`Property`], [`Value`], version histories
//! - The [`Resource`] model over binaries, descriptions and containers
//! - [`IdentifierConverter`]: external IRI ↔ internal path
//! - [`RdfStream`]: lazy, single-pass triple streams
//! - Transactions and request scoping ([`TxAwareSession`], [`SessionFactory`])
//! - [`MemoryRepository`], an in-memory store for tests and embedding
//!
//! ## Design Principles
//!
//! 1. **Synchronous and pull-based**: nothing is read from the store until a
//!    stream is pulled
//! 2. **Absence is not failure**: missing configuration yields empty
//!    results; only store failures and corrupt type data are errors
//! 3. **One session per request**: sessions are never shared between
//!    concurrent descriptions
//!
//! ## Example
//!
//! ```
//! use ldp_kernel::{MemoryRepository, Resource, ResourceKind, Session};
//! use std::sync::Arc;
//!
//! let repo = MemoryRepository::new();
//! let session = repo.open("default")?;
//! session.create_container("/a")?;
//!
//! let session: Arc<dyn Session> = session;
//! let a = Resource::require(&session, "/a")?;
//! assert_eq!(a.kind(), ResourceKind::Container);
//! # Ok::<(), ldp_kernel::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod fixity;
pub mod identifier;
pub mod memory;
pub mod names;
pub mod node;
pub mod resource;
pub mod scope;
pub mod session;
pub mod stream;
pub mod transaction;
pub mod tx_session;
pub mod types;
pub mod value;

pub use config::{ConfigValue, KernelConfig};
pub use error::{Error, Result};
pub use fixity::{DigestAlgorithm, FixityResult, FixityState};
pub use identifier::{HttpIdentifierConverter, IdentifierConverter, METADATA_SEGMENT};
pub use memory::{MemoryRepository, MemorySession};
pub use node::{Node, NodeType, ReferenceKind, Version, VersionHistory};
pub use resource::{ContainerVariant, Resource, ResourceKind};
pub use scope::{RequestScope, ScopedPath, SessionFactory};
pub use session::{BoxIter, Repository, Session};
pub use stream::RdfStream;
pub use transaction::{Transaction, TransactionRegistry};
pub use tx_session::TxAwareSession;
pub use value::{Property, PropertyType, Value};
