//! Error types for playlist loading

use cadence_resolver::ResolverError;
use thiserror::Error;

/// Errors that can occur when talking to the catalog service
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Catalog service is offline or unreachable
    #[error("Catalog unreachable: {0}")]
    Unreachable(String),

    /// Catalog returned an error response
    #[error("Catalog error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Client credentials were rejected
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Failed to parse a catalog response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl CatalogError {
    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            Self::Unreachable(e.to_string())
        } else {
            Self::Request(e)
        }
    }
}

/// Errors that make a playlist load fail as a whole
///
/// Individual entries that cannot be resolved are dropped, not reported here.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source points at a catalog but no catalog client is configured
    #[error("Catalog service is not configured")]
    CatalogNotConfigured,

    /// The catalog service could not be queried
    #[error("Catalog service failed: {0}")]
    Catalog(#[from] CatalogError),

    /// The resolver could not be reached for any entry
    #[error("Resolver failed: {0}")]
    Resolver(#[from] ResolverError),

    /// Nothing playable was found
    #[error("No playable tracks found in {url}")]
    Empty { url: String },
}

pub type Result<T> = std::result::Result<T, LoadError>;
