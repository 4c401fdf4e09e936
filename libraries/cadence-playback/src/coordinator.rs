//! Playback coordinator - session state machine
//!
//! Owns the playlist, the position and the transition lock. Every public
//! operation is one transaction against the session state; the transport's
//! completion callbacks re-enter through the same lock. Track resolution runs
//! with the lock released and is discarded if the generation moved on.

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::settings::PlaybackSettings;
use crate::shuffle::shuffle_tracks;
use crate::state::{NowPlaying, Phase, PlaybackSnapshot, PlaylistEntry, SessionState};
use cadence_catalog::{CatalogLoader, LoadedPlaylist};
use cadence_core::{CompletionCallback, StreamingTransport, TrackDescriptor, TransportError};
use std::sync::{Arc, Weak};
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Buffered events per subscriber before the oldest are dropped
const EVENT_CAPACITY: usize = 64;

/// Outcome of a successful play or randomize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayReport {
    pub source: String,
    pub tracks: usize,
    pub from_cache: bool,
    /// Track that started, `None` when nothing in the playlist was playable
    pub now_playing: Option<TrackDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadMode {
    Play,
    Randomize,
}

/// Coordinates one playback session against one streaming transport
///
/// Cloning is cheap; clones share the session.
///
/// # Example
///
/// ```rust,ignore
/// let coordinator = PlaybackCoordinator::new(transport, loader, settings);
///
/// let report = coordinator.play(Some("https://www.youtube.com/playlist?list=PL123")).await?;
/// println!("Loaded {} tracks", report.tracks);
///
/// coordinator.skip().await?;
/// coordinator.goto(5).await?;
/// coordinator.stop().await;
/// ```
#[derive(Clone)]
pub struct PlaybackCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<SessionState>,
    transport: Arc<dyn StreamingTransport>,
    loader: CatalogLoader,
    settings: PlaybackSettings,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlaybackCoordinator {
    pub fn new(
        transport: Arc<dyn StreamingTransport>,
        loader: CatalogLoader,
        settings: PlaybackSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(SessionState::default()),
                transport,
                loader,
                settings,
                events,
            }),
        }
    }

    /// Subscribe to playback events
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.inner.events.subscribe()
    }

    pub fn settings(&self) -> &PlaybackSettings {
        &self.inner.settings
    }

    /// Load a playlist and start playing it from the first track
    ///
    /// Without a source the first configured default is used. Rejected while
    /// a load is in progress or something is already playing.
    pub async fn play(&self, source: Option<&str>) -> Result<PlayReport> {
        self.inner.load_and_start(source, LoadMode::Play).await
    }

    /// Load a playlist, shuffle it and start from the first track
    ///
    /// Replaces current playback; rejected only while a load is in progress.
    pub async fn randomize(&self, source: Option<&str>) -> Result<PlayReport> {
        self.inner.load_and_start(source, LoadMode::Randomize).await
    }

    /// Skip to the next track
    ///
    /// Returns the track that will play next.
    pub async fn skip(&self) -> Result<Option<TrackDescriptor>> {
        self.inner.skip().await
    }

    /// Jump to a one-based track number
    pub async fn goto(&self, number: usize) -> Result<TrackDescriptor> {
        self.inner.goto(number).await
    }

    /// Stop playback, disconnect and reset the session
    pub async fn stop(&self) {
        self.inner.stop().await;
    }

    /// Disconnect from the channel and reset the session
    pub async fn leave(&self) -> Result<()> {
        self.inner.leave().await
    }

    /// Reset the session after the transport lost its connection
    pub async fn handle_disconnect(&self) {
        self.inner.handle_disconnect().await;
    }

    pub async fn now_playing(&self) -> Option<NowPlaying> {
        self.inner.state.lock().await.now_playing()
    }

    pub async fn list_playlist(&self) -> Vec<PlaylistEntry> {
        self.inner.state.lock().await.entries()
    }

    pub async fn snapshot(&self) -> PlaybackSnapshot {
        self.inner.state.lock().await.snapshot()
    }
}

impl Inner {
    fn emit(&self, event: PlaybackEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    async fn load_and_start(
        self: &Arc<Self>,
        source: Option<&str>,
        mode: LoadMode,
    ) -> Result<PlayReport> {
        let source = match source.map(str::trim).filter(|s| !s.is_empty()) {
            Some(source) => source.to_string(),
            None => self
                .settings
                .default_source()
                .ok_or(PlaybackError::NoSourceConfigured)?
                .to_string(),
        };

        let generation = {
            let mut state = self.state.lock().await;
            if state.is_loading {
                return Err(PlaybackError::AlreadyLoading);
            }
            let busy = state.is_playing || state.phase == Phase::Transitioning;
            if mode == LoadMode::Play && busy {
                return Err(PlaybackError::AlreadyPlaying);
            }
            if state.is_playing {
                state.bump_generation();
                self.transport.stop();
                state.go_idle();
            }
            state.is_loading = true;
            state.phase = Phase::Loading;
            state.bump_generation()
        };

        info!(source = %source, mode = ?mode, "Loading playlist");
        self.emit(PlaybackEvent::LoadStarted {
            source: source.clone(),
        });

        let connected = self.connect().await;
        let made_connection = connected.is_ok();
        let loaded = match connected {
            Ok(()) => self.loader.load(&source).await.map_err(PlaybackError::from),
            Err(e) => Err(e),
        };

        let mut state = self.state.lock().await;
        if state.generation != generation {
            debug!(source = %source, "Discarding load overtaken by stop");
            // A stop that ran before our connect finished could not drop it
            let idle = state.phase == Phase::Idle && !state.is_loading && !state.is_playing;
            if made_connection && idle && self.transport.is_connected() {
                self.transport.disconnect(true).await;
            }
            return Err(PlaybackError::Superseded);
        }
        state.is_loading = false;

        let LoadedPlaylist {
            mut tracks,
            from_cache,
            ..
        } = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                state.phase = state.settled_phase();
                warn!(source = %source, error = %e, "Playlist load failed");
                self.emit(PlaybackEvent::LoadFailed {
                    source,
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        if mode == LoadMode::Randomize {
            shuffle_tracks(&mut tracks);
        }
        let count = tracks.len();
        state.set_playlist(tracks);
        state.phase = Phase::Ready;

        info!(source = %source, tracks = count, from_cache, "Playlist installed");
        self.emit(PlaybackEvent::Loaded {
            source: source.clone(),
            tracks: count,
            from_cache,
        });

        let now_playing = match self.start_current(state, false).await {
            Ok(track) => Some(track),
            Err(PlaybackError::Exhausted { .. }) => None,
            Err(e) => return Err(e),
        };

        Ok(PlayReport {
            source,
            tracks: count,
            from_cache,
            now_playing,
        })
    }

    /// Connect the transport, replacing any existing connection
    async fn connect(&self) -> Result<()> {
        if self.transport.is_connected() {
            debug!("Tearing down existing connection");
            self.transport.disconnect(true).await;
        }

        let channel = &self.settings.channel;
        let attempts = self.settings.max_retries.max(1);
        let mut last_error = TransportError::NotConnected;

        for attempt in 1..=attempts {
            match self.transport.connect(channel).await {
                Ok(()) => {
                    info!(channel = %channel, attempt, "Connected");
                    return Ok(());
                }
                Err(e) => {
                    warn!(channel = %channel, attempt, attempts, error = %e, "Connection attempt failed");
                    last_error = e;
                    if attempt < attempts {
                        tokio::time::sleep(self.settings.retry_delay()).await;
                    }
                }
            }
        }

        Err(PlaybackError::Transport(last_error))
    }

    /// Resolve the track at the current position and hand it to the transport
    ///
    /// Unresolvable tracks are skipped; after one full pass without a
    /// playable track the session goes idle with the playlist kept. The lock
    /// is released while waiting on the resolver and the settle delay. Any
    /// operation that bumps the generation meanwhile supersedes this
    /// transition and its result is discarded.
    async fn start_current<'a>(
        self: &'a Arc<Self>,
        mut state: MutexGuard<'a, SessionState>,
        mut settle: bool,
    ) -> Result<TrackDescriptor> {
        let token = state.bump_generation();
        state.manual_skip_pending = false;
        state.phase = Phase::Transitioning;

        if self.transport.is_playing() {
            self.transport.stop();
            settle = true;
        }

        let delay = self.settings.settle_delay();
        if settle && !delay.is_zero() {
            drop(state);
            tokio::time::sleep(delay).await;
            state = self.state.lock().await;
            if state.generation != token {
                debug!("Transition superseded during settle delay");
                return Err(PlaybackError::Superseded);
            }
        }

        let attempts = state.playlist.len();
        for _ in 0..attempts {
            let position = state.position;
            let Some(track) = state.playlist.get(position).cloned() else {
                break;
            };

            drop(state);
            let stream = self
                .loader
                .resolver()
                .resolve_stream(&track.source_url)
                .await;
            state = self.state.lock().await;

            if state.generation != token || state.playlist.is_empty() {
                debug!(
                    position,
                    title = %track.title,
                    "Discarding resolution of a superseded transition"
                );
                return Err(PlaybackError::Superseded);
            }

            let Some(stream) = stream else {
                warn!(position, title = %track.title, "Skipping unresolvable track");
                self.emit(PlaybackEvent::TrackUnresolvable {
                    position,
                    title: track.title,
                });
                state.advance();
                continue;
            };

            let on_complete = completion_callback(self, token);
            if let Err(e) = self.transport.play(&stream.address, on_complete) {
                warn!(position, title = %track.title, error = %e, "Transport refused stream");
                state.go_idle();
                return Err(e.into());
            }

            info!(position, title = %track.title, "Now playing");
            self.emit(PlaybackEvent::TrackStarted {
                position,
                title: track.title.clone(),
            });
            state.current = Some(track.clone());
            state.current_position = position;
            state.is_playing = true;
            state.phase = Phase::Playing;
            return Ok(track);
        }

        warn!(attempts, "No playable track in playlist");
        state.go_idle();
        self.emit(PlaybackEvent::Exhausted { attempts });
        Err(PlaybackError::Exhausted { attempts })
    }

    async fn on_track_finished(self: &Arc<Self>, generation: u64, error: Option<TransportError>) {
        let mut state = self.state.lock().await;
        if state.generation != generation {
            debug!(generation, current = state.generation, "Ignoring stale completion");
            return;
        }

        match &error {
            Some(e) => warn!(position = state.position, error = %e, "Stream ended with error"),
            None => debug!(position = state.position, "Stream finished"),
        }

        state.is_playing = false;
        if !state.manual_skip_pending {
            state.advance();
        }
        state.manual_skip_pending = false;

        if !self.transport.is_connected() {
            info!("Transport disconnected, going idle");
            state.go_idle();
            return;
        }
        if state.playlist.is_empty() {
            state.go_idle();
            return;
        }

        if let Err(e) = self.start_current(state, true).await {
            debug!(error = %e, "Auto-advance stopped");
        }
    }

    async fn skip(&self) -> Result<Option<TrackDescriptor>> {
        let mut state = self.state.lock().await;
        if !state.is_playing {
            return Err(PlaybackError::NotPlaying);
        }

        let cooldown = self.settings.skip_cooldown();
        if let Some(last) = state.last_skip {
            let elapsed = last.elapsed();
            if elapsed < cooldown {
                return Err(PlaybackError::SkipCooldown {
                    remaining: cooldown - elapsed,
                });
            }
        }

        state.last_skip = Some(Instant::now());
        state.manual_skip_pending = true;
        state.advance();
        let next = state.playlist.get(state.position).cloned();

        info!(position = state.position, "Skipping");
        self.transport.stop();
        Ok(next)
    }

    async fn goto(self: &Arc<Self>, number: usize) -> Result<TrackDescriptor> {
        let mut state = self.state.lock().await;
        if state.is_loading {
            return Err(PlaybackError::AlreadyLoading);
        }

        let len = state.playlist.len();
        if len == 0 {
            return Err(PlaybackError::EmptyPlaylist);
        }
        let Some(track) = number
            .checked_sub(1)
            .and_then(|index| state.playlist.get(index))
            .cloned()
        else {
            return Err(PlaybackError::InvalidTrackNumber { number, len });
        };
        if number - 1 == state.position {
            return Err(PlaybackError::AlreadyCurrent(number));
        }

        if state.is_playing {
            state.position = number - 1;
            state.manual_skip_pending = true;
            info!(position = state.position, "Jumping to track");
            self.transport.stop();
            return Ok(track);
        }

        if !self.transport.is_connected() {
            return Err(PlaybackError::NotConnected);
        }

        // No stream to stop, so no completion will consume a pending flag
        state.position = number - 1;
        state.manual_skip_pending = false;
        info!(position = state.position, "Starting at track");
        self.start_current(state, false).await
    }

    async fn stop(&self) {
        let mut state = self.state.lock().await;
        state.bump_generation();
        state.reset();

        self.transport.stop();
        self.transport.disconnect(false).await;

        info!("Playback stopped");
        self.emit(PlaybackEvent::Stopped);
    }

    async fn leave(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if !self.transport.is_connected() {
            return Err(PlaybackError::NotConnected);
        }

        state.bump_generation();
        state.reset();

        self.transport.stop();
        self.transport.disconnect(true).await;

        info!("Left channel");
        self.emit(PlaybackEvent::Stopped);
        Ok(())
    }

    async fn handle_disconnect(&self) {
        let mut state = self.state.lock().await;
        state.bump_generation();
        state.reset();

        warn!("Transport disconnected, session reset");
        self.emit(PlaybackEvent::Disconnected);
    }
}

/// Build the callback for the stream started under `generation`
///
/// The callback only schedules the completion handler, so transports may
/// invoke it from any thread and while the state lock is held.
fn completion_callback(inner: &Arc<Inner>, generation: u64) -> CompletionCallback {
    let inner: Weak<Inner> = Arc::downgrade(inner);
    let runtime = Handle::current();

    Box::new(move |error| {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        runtime.spawn(async move {
            inner.on_track_finished(generation, error).await;
        });
    })
}
