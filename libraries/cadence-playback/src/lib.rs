//! Cadence Playback
//!
//! Coordinates playback of a playlist against a single streaming output.
//!
//! This crate provides:
//! - The session state machine (`Idle → Loading → Ready → Playing →
//!   Transitioning → Playing | Idle`) behind one transition lock
//! - Play, randomize, skip (with cooldown), goto, stop and leave
//! - Automatic advance on stream completion, skipping unresolvable tracks
//!   for at most one pass over the playlist
//! - Generation tokens so completions of stopped streams are ignored
//! - A broadcast channel of [`PlaybackEvent`]s
//! - A text [`Command`] surface with status-line rendering
//!
//! # Architecture
//!
//! `cadence-playback` does not know how tracks are streamed or resolved:
//! the output is a [`cadence_core::StreamingTransport`] and playlists come
//! from a [`cadence_catalog::CatalogLoader`].
//!
//! # Skips and completions
//!
//! Stopping the transport always produces a completion. A manual skip or
//! jump sets a one-shot flag before stopping so the completion handler starts
//! the already-selected track instead of advancing again.

mod command;
mod coordinator;
pub mod error;
pub mod events;
mod settings;
mod shuffle;
mod state;

pub use command::{describe_error, execute, Command, CommandParseError, HELP};
pub use coordinator::{PlayReport, PlaybackCoordinator};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use settings::PlaybackSettings;
pub use shuffle::shuffle_tracks;
pub use state::{NowPlaying, Phase, PlaybackSnapshot, PlaylistEntry};
