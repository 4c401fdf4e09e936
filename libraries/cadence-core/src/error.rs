//! Core error types for Cadence

use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while building or validating domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Entry lacks a usable address or uses an unsupported scheme
    #[error("Malformed entry '{title}': {reason}")]
    MalformedEntry { title: String, reason: String },

    /// No playable address could be obtained for a track
    #[error("Track unresolvable: {0}")]
    TrackUnresolvable(String),
}

impl CoreError {
    /// Create a malformed entry error
    pub fn malformed(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedEntry {
            title: title.into(),
            reason: reason.into(),
        }
    }
}

/// Errors reported by a streaming transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connecting to the output channel failed
    #[error("Connection failed: {0}")]
    Connect(String),

    /// An operation needed a connection that does not exist
    #[error("Transport is not connected")]
    NotConnected,

    /// The stream could not be started or broke while playing
    #[error("Stream error: {0}")]
    Stream(String),
}
