//! Error types
//!
//! Storage errors are absorbed by the components that own persisted data
//! (identity, leaderboard, settings). Configuration errors are fatal at engine
//! construction.

use thiserror::Error;

/// Failure of the durable key-value capability
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable")]
    Unavailable,

    #[error("Storage quota exceeded writing key `{0}`")]
    QuotaExceeded(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The engine cannot build a valid deal from its settings and catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("A deal needs at least one pair")]
    NoPairs,

    #[error("Catalog has {available} entries but {required} pairs were requested")]
    CatalogTooSmall { required: usize, available: usize },

    #[error("Duplicate content key in catalog: {0}")]
    DuplicateContentKey(String),

    #[error("Mismatch delay must be greater than zero")]
    ZeroMismatchDelay,

    #[error("Tick interval must be greater than zero")]
    ZeroTickInterval,
}
