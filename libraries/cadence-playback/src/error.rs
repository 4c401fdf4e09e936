//! Error types for playback coordination

use cadence_catalog::LoadError;
use cadence_core::TransportError;
use std::time::Duration;
use thiserror::Error;

/// Playback errors
///
/// Every rejection leaves the session untouched.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Streaming transport failed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Playlist could not be loaded; the previous playlist is kept
    #[error("Failed to load playlist: {0}")]
    LoadFailed(#[from] LoadError),

    /// A load is already in progress
    #[error("A playlist is already loading")]
    AlreadyLoading,

    /// Playback is already running
    #[error("Already playing")]
    AlreadyPlaying,

    /// A skip was requested before the cooldown elapsed
    #[error("Skip cooldown active, retry in {remaining:?}")]
    SkipCooldown { remaining: Duration },

    /// Nothing is playing
    #[error("Nothing is playing")]
    NotPlaying,

    /// Playlist is empty
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Track number outside `1..=len`
    #[error("Invalid track number {number}, expected 1-{len}")]
    InvalidTrackNumber { number: usize, len: usize },

    /// Requested track is already the current one
    #[error("Track {0} is already current")]
    AlreadyCurrent(usize),

    /// No source given and no default source configured
    #[error("No playlist source configured")]
    NoSourceConfigured,

    /// Transport is not connected
    #[error("Not connected")]
    NotConnected,

    /// A full pass over the playlist found nothing playable
    #[error("No playable track in {attempts} attempts")]
    Exhausted { attempts: usize },

    /// The operation was overtaken by a stop
    #[error("Operation superseded by stop")]
    Superseded,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
