//! Test doubles and harness for coordinator tests

#![allow(dead_code)]

use async_trait::async_trait;
use cadence_cache::CacheStore;
use cadence_catalog::CatalogLoader;
use cadence_core::{CompletionCallback, StreamingTransport, TransportError};
use cadence_playback::{PlaybackCoordinator, PlaybackSettings, PlaybackSnapshot};
use cadence_resolver::{
    ExtractMode, ExtractedInfo, MediaExtractor, MediaFormat, ResolverError, TrackResolver,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tempfile::TempDir;

pub const PLAYLIST_URL: &str = "https://www.youtube.com/playlist?list=PLmain";
pub const OTHER_URL: &str = "https://www.youtube.com/playlist?list=PLother";
pub const BROKEN_URL: &str = "https://www.youtube.com/playlist?list=PLbroken";

static INIT: Once = Once::new();

/// Route coordinator logs to the test output
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("cadence_playback=debug")
            .with_test_writer()
            .try_init();
    });
}

pub fn track_url(list: &str, index: usize) -> String {
    let id = list.rsplit('=').next().unwrap_or("x");
    format!("https://www.youtube.com/watch?v={}-{}", id, index)
}

pub fn stream_for(page_url: &str) -> String {
    format!("https://cdn.example.com/stream?src={}", page_url)
}

// ===== Transport =====

#[derive(Default)]
struct TransportState {
    connected: bool,
    playing: Option<CompletionCallback>,
    plays: Vec<String>,
    stops: usize,
    disconnects: usize,
}

/// In-memory transport; streams run until stopped or finished by the test
#[derive(Default)]
pub struct FakeTransport {
    state: Mutex<TransportState>,
    failing_connects: AtomicUsize,
    connects: AtomicUsize,
    connect_delay: Mutex<Duration>,
}

impl FakeTransport {
    /// Make the next `n` connection attempts fail
    pub fn fail_connects(&self, n: usize) {
        self.failing_connects.store(n, Ordering::SeqCst);
    }

    /// Make every connection attempt take `delay`
    pub fn set_connect_delay(&self, delay: Duration) {
        *self.connect_delay.lock().unwrap() = delay;
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn plays(&self) -> Vec<String> {
        self.state.lock().unwrap().plays.clone()
    }

    pub fn stops(&self) -> usize {
        self.state.lock().unwrap().stops
    }

    pub fn disconnects(&self) -> usize {
        self.state.lock().unwrap().disconnects
    }

    /// End the current stream as if it reached its end (or broke)
    pub fn finish_current(&self, error: Option<TransportError>) -> bool {
        let callback = self.state.lock().unwrap().playing.take();
        match callback {
            Some(callback) => {
                callback(error);
                true
            }
            None => false,
        }
    }

    /// Drop the connection from the remote side
    pub fn drop_connection(&self) {
        let callback = {
            let mut state = self.state.lock().unwrap();
            state.connected = false;
            state.playing.take()
        };
        if let Some(callback) = callback {
            callback(Some(TransportError::NotConnected));
        }
    }
}

#[async_trait]
impl StreamingTransport for FakeTransport {
    async fn connect(&self, _channel: &str) -> Result<(), TransportError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let delay = *self.connect_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let failing = self.failing_connects.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_connects.store(failing - 1, Ordering::SeqCst);
            return Err(TransportError::Connect("channel unavailable".to_string()));
        }
        self.state.lock().unwrap().connected = true;
        Ok(())
    }

    async fn disconnect(&self, _force: bool) {
        let callback = {
            let mut state = self.state.lock().unwrap();
            state.connected = false;
            state.disconnects += 1;
            state.playing.take()
        };
        if let Some(callback) = callback {
            callback(None);
        }
    }

    fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing.is_some()
    }

    fn play(&self, source: &str, on_complete: CompletionCallback) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        if !state.connected {
            return Err(TransportError::NotConnected);
        }
        if state.playing.is_some() {
            return Err(TransportError::Stream("already playing".to_string()));
        }
        state.plays.push(source.to_string());
        state.playing = Some(on_complete);
        Ok(())
    }

    fn stop(&self) {
        let callback = {
            let mut state = self.state.lock().unwrap();
            let callback = state.playing.take();
            if callback.is_some() {
                state.stops += 1;
            }
            callback
        };
        if let Some(callback) = callback {
            callback(None);
        }
    }
}

// ===== Media backend =====

/// Resolver backend serving fixed playlists
#[derive(Default)]
pub struct FakeMedia {
    playlists: HashMap<String, Vec<ExtractedInfo>>,
    unresolvable: Mutex<HashSet<String>>,
    flat_delay: Duration,
    full_delay: Duration,
    flat_calls: AtomicUsize,
    full_calls: AtomicUsize,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a playlist of `count` tracks at `list`
    #[must_use]
    pub fn with_playlist(mut self, list: &str, count: usize) -> Self {
        let entries = (0..count)
            .map(|i| ExtractedInfo {
                url: Some(track_url(list, i)),
                title: Some(format!("Track {}", i)),
                duration: Some(200.0),
                ..Default::default()
            })
            .collect();
        self.playlists.insert(list.to_string(), entries);
        self
    }

    /// Delay bulk loads
    #[must_use]
    pub fn with_flat_delay(mut self, delay: Duration) -> Self {
        self.flat_delay = delay;
        self
    }

    /// Delay stream resolution
    #[must_use]
    pub fn with_full_delay(mut self, delay: Duration) -> Self {
        self.full_delay = delay;
        self
    }

    pub fn set_unresolvable(&self, page_url: &str, unresolvable: bool) {
        let mut set = self.unresolvable.lock().unwrap();
        if unresolvable {
            set.insert(page_url.to_string());
        } else {
            set.remove(page_url);
        }
    }

    pub fn flat_calls(&self) -> usize {
        self.flat_calls.load(Ordering::SeqCst)
    }

    pub fn full_calls(&self) -> usize {
        self.full_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaExtractor for FakeMedia {
    async fn extract(
        &self,
        query: &str,
        mode: ExtractMode,
    ) -> Result<Option<ExtractedInfo>, ResolverError> {
        match mode {
            ExtractMode::Flat => {
                self.flat_calls.fetch_add(1, Ordering::SeqCst);
                if !self.flat_delay.is_zero() {
                    tokio::time::sleep(self.flat_delay).await;
                }
                Ok(self.playlists.get(query).map(|entries| ExtractedInfo {
                    entries: Some(entries.iter().cloned().map(Some).collect()),
                    ..Default::default()
                }))
            }
            ExtractMode::Full => {
                self.full_calls.fetch_add(1, Ordering::SeqCst);
                if !self.full_delay.is_zero() {
                    tokio::time::sleep(self.full_delay).await;
                }
                if self.unresolvable.lock().unwrap().contains(query) {
                    return Ok(None);
                }
                Ok(Some(ExtractedInfo {
                    webpage_url: Some(query.to_string()),
                    formats: Some(vec![MediaFormat {
                        format_id: Some("251".to_string()),
                        url: Some(stream_for(query)),
                        acodec: Some("opus".to_string()),
                    }]),
                    ..Default::default()
                }))
            }
        }
    }
}

// ===== Harness =====

pub fn fast_settings() -> PlaybackSettings {
    PlaybackSettings {
        channel: "test-channel".to_string(),
        default_sources: vec![PLAYLIST_URL.to_string()],
        max_retries: 3,
        retry_delay_secs: 0,
        skip_cooldown_secs: 0,
        settle_delay_ms: 0,
    }
}

pub struct Harness {
    pub coordinator: PlaybackCoordinator,
    pub transport: Arc<FakeTransport>,
    pub media: Arc<FakeMedia>,
    _cache_dir: TempDir,
}

impl Harness {
    pub fn new(tracks: usize) -> Self {
        Self::with(FakeMedia::new().with_playlist(PLAYLIST_URL, tracks), fast_settings())
    }

    pub fn with(media: FakeMedia, settings: PlaybackSettings) -> Self {
        init_test_logging();

        let cache_dir = TempDir::new().unwrap();
        let media = Arc::new(media);
        let transport = Arc::new(FakeTransport::default());
        let loader = CatalogLoader::new(
            CacheStore::new(cache_dir.path()),
            TrackResolver::new(Arc::clone(&media) as Arc<dyn MediaExtractor>),
        );
        let coordinator = PlaybackCoordinator::new(
            Arc::clone(&transport) as Arc<dyn StreamingTransport>,
            loader,
            settings,
        );

        Self {
            coordinator,
            transport,
            media,
            _cache_dir: cache_dir,
        }
    }

    /// Wait until the transport has started `count` streams, then snapshot
    pub async fn wait_for_plays(&self, count: usize) -> PlaybackSnapshot {
        let reached = tokio::time::timeout(Duration::from_secs(5), async {
            while self.transport.plays().len() < count {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await;
        assert!(
            reached.is_ok(),
            "expected {} plays, got {:?}",
            count,
            self.transport.plays()
        );
        self.coordinator.snapshot().await
    }

    /// Wait until `condition` holds for a snapshot
    pub async fn wait_until(
        &self,
        condition: impl Fn(&PlaybackSnapshot) -> bool,
    ) -> PlaybackSnapshot {
        let snapshot = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let snapshot = self.coordinator.snapshot().await;
                if condition(&snapshot) {
                    return snapshot;
                }
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await;
        match snapshot {
            Ok(snapshot) => snapshot,
            Err(_) => panic!(
                "condition not reached, last snapshot: {:?}",
                self.coordinator.snapshot().await
            ),
        }
    }

    /// Give spawned completion handlers a chance to run
    pub async fn quiesce(&self) {
        tokio::time::sleep(Duration::from_millis(30)).await;
    }
}
