//! Session state guarded by the transition lock

use cadence_core::TrackDescriptor;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Lifecycle phase of a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No playlist is playing
    Idle,
    /// A playlist load is in progress
    Loading,
    /// A playlist is installed but not yet streaming
    Ready,
    /// A track is streaming
    Playing,
    /// Resolving and starting the current track
    Transitioning,
}

/// Mutable state of one session
///
/// `position` stays within `0..playlist.len()` whenever the playlist is
/// non-empty and is 0 otherwise.
#[derive(Debug)]
pub(crate) struct SessionState {
    pub playlist: Vec<TrackDescriptor>,
    pub position: usize,
    pub current: Option<TrackDescriptor>,
    /// Position `current` was started from
    pub current_position: usize,
    pub is_playing: bool,
    pub is_loading: bool,
    pub manual_skip_pending: bool,
    pub last_skip: Option<Instant>,
    pub generation: u64,
    pub phase: Phase,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            playlist: Vec::new(),
            position: 0,
            current: None,
            current_position: 0,
            is_playing: false,
            is_loading: false,
            manual_skip_pending: false,
            last_skip: None,
            generation: 0,
            phase: Phase::Idle,
        }
    }
}

impl SessionState {
    /// Move to the next track, wrapping to the start
    pub fn advance(&mut self) {
        self.position = if self.playlist.is_empty() {
            0
        } else {
            (self.position + 1) % self.playlist.len()
        };
    }

    /// Install a new playlist starting at its first track
    pub fn set_playlist(&mut self, tracks: Vec<TrackDescriptor>) {
        self.playlist = tracks;
        self.position = 0;
        self.manual_skip_pending = false;
    }

    /// Invalidate in-flight work and return the new generation
    pub fn bump_generation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Clear everything except the generation counter
    pub fn reset(&mut self) {
        let generation = self.generation;
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    /// Mark the stream as ended without touching the playlist
    ///
    /// Any pending manual skip is dropped with the stream it targeted.
    pub fn go_idle(&mut self) {
        self.is_playing = false;
        self.manual_skip_pending = false;
        self.current = None;
        self.phase = Phase::Idle;
    }

    /// Phase to fall back to when a load fails
    pub fn settled_phase(&self) -> Phase {
        if self.is_playing {
            Phase::Playing
        } else if self.playlist.is_empty() {
            Phase::Idle
        } else {
            Phase::Ready
        }
    }

    pub fn now_playing(&self) -> Option<NowPlaying> {
        self.current.as_ref().map(|track| NowPlaying {
            track: track.clone(),
            number: self.current_position + 1,
            total: self.playlist.len(),
        })
    }

    pub fn entries(&self) -> Vec<PlaylistEntry> {
        let current = self.current.as_ref().map(|_| self.current_position);
        self.playlist
            .iter()
            .enumerate()
            .map(|(index, track)| PlaylistEntry {
                number: index + 1,
                title: track.title.clone(),
                is_current: current == Some(index),
            })
            .collect()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            phase: self.phase,
            position: self.position,
            len: self.playlist.len(),
            current: self.current.clone(),
            is_playing: self.is_playing,
            is_loading: self.is_loading,
            manual_skip_pending: self.manual_skip_pending,
            generation: self.generation,
        }
    }
}

/// Point-in-time view of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackSnapshot {
    pub phase: Phase,
    /// Zero-based position
    pub position: usize,
    pub len: usize,
    pub current: Option<TrackDescriptor>,
    pub is_playing: bool,
    pub is_loading: bool,
    pub manual_skip_pending: bool,
    pub generation: u64,
}

/// Currently playing track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub track: TrackDescriptor,
    /// One-based position
    pub number: usize,
    pub total: usize,
}

/// One line of a playlist listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// One-based position
    pub number: usize,
    pub title: String,
    pub is_current: bool,
}
