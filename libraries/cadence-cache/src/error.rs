//! Error types for the playlist cache

use thiserror::Error;

/// Errors that can occur while reading or writing cache documents
#[derive(Error, Debug)]
pub enum CacheError {
    /// IO error while accessing the cache directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store was created disabled
    #[error("Cache is disabled")]
    Disabled,
}

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
