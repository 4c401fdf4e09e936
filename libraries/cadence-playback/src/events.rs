//! Playback Events
//!
//! Broadcast to front ends as the session moves through its phases.

use serde::{Deserialize, Serialize};

/// Events emitted by the playback coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// A playlist load started
    LoadStarted { source: String },

    /// A playlist was loaded and installed
    Loaded {
        source: String,
        tracks: usize,
        from_cache: bool,
    },

    /// A playlist load failed; the previous playlist is kept
    LoadFailed { source: String, reason: String },

    /// A track was handed to the transport
    TrackStarted {
        /// Zero-based playlist position
        position: usize,
        title: String,
    },

    /// A track could not be resolved and was skipped
    TrackUnresolvable { position: usize, title: String },

    /// A full pass over the playlist found nothing playable
    Exhausted { attempts: usize },

    /// Playback was stopped and the session reset
    Stopped,

    /// The transport reported a disconnect and the session was reset
    Disconnected,
}
