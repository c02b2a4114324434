//! Error types for ldp-kernel

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Kernel error type
///
/// Absence that is semantically valid (an unconfigured container, an IRI
/// outside the repository) is never an error; these variants are reserved
/// for store failures and violated store invariants.
#[derive(Error, Debug)]
pub enum Error {
    /// A read or write against the resource store failed
    #[error("Repository error: {0}")]
    Repository(String),

    /// A node the caller asked for does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A type or property name uses a prefix the namespace registry does not know
    #[error("Unregistered namespace prefix '{prefix}' in name '{name}'")]
    InvalidNamespace { prefix: String, name: String },

    /// A type name without the `prefix:local` separator
    #[error("Malformed type name: {0}")]
    MalformedTypeName(String),

    /// The request addressed a transaction that is not (or no longer) open
    #[error("Transaction not found: {0}")]
    TransactionMissing(String),

    /// A request path that cannot be resolved to a scope
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a repository error
    pub fn repository(msg: impl Into<String>) -> Self {
        Error::Repository(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create an unregistered-prefix error
    pub fn invalid_namespace(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Error::InvalidNamespace {
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    /// Create a malformed type name error
    pub fn malformed_type_name(name: impl Into<String>) -> Self {
        Error::MalformedTypeName(name.into())
    }

    /// Create a missing transaction error
    pub fn transaction_missing(id: impl Into<String>) -> Self {
        Error::TransactionMissing(id.into())
    }

    /// Create an invalid path error
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Error::InvalidPath(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
