//! Resolved stream addresses

use serde::{Deserialize, Serialize};

/// Playable address obtained by resolving a track's source URL
///
/// Stream addresses are short-lived (signed CDN URLs), so they are resolved
/// right before playback and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamAddress {
    /// Address handed to the streaming transport
    pub address: String,

    /// Title reported by the resolver, if any
    pub title: Option<String>,

    /// Duration reported by the resolver, in seconds
    pub duration_seconds: Option<u64>,
}

impl StreamAddress {
    /// Create an address without metadata
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            title: None,
            duration_seconds: None,
        }
    }
}
