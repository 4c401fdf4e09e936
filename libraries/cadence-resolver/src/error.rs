use thiserror::Error;

/// Errors that can occur while talking to the media-resolution backend
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Resolver backend unreachable: {0}")]
    Unreachable(String),

    #[error("Resolver backend failed: {0}")]
    Backend(String),

    #[error("Failed to decode resolver output: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Resolution timed out after {0}s")]
    Timeout(u64),

    #[error("Resolver task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, ResolverError>;
