use cadence_core::TrackDescriptor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cached result of a full playlist load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Source URL the playlist was loaded from
    pub url: String,

    /// When the load completed
    pub last_updated: DateTime<Utc>,

    /// Loaded tracks, in playback order
    pub tracks: Vec<TrackDescriptor>,
}

impl CacheEntry {
    /// Create an entry stamped with the current time
    pub fn new(url: impl Into<String>, tracks: Vec<TrackDescriptor>) -> Self {
        Self {
            url: url.into(),
            last_updated: Utc::now(),
            tracks,
        }
    }
}
