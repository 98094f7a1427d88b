//! Core error types.

use thiserror::Error;

/// Core reorder/resolution errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Sort field is not physically defined anywhere in the resolved
    /// hierarchy. Fatal; raised before any write.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Storage layer error. When raised from an atomic batch, no updates
    /// from the call were applied.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Key decoding error.
    #[error("invalid key format")]
    InvalidKey,

    /// Row not found.
    #[error("row not found")]
    NotFound,
}
