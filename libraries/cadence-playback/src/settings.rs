use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Output channel the transport connects to
    pub channel: String,

    /// Playlists used when play or randomize is given no source, first wins
    pub default_sources: Vec<String>,

    /// Connection attempts before giving up (default: 3)
    pub max_retries: u32,

    /// Delay between connection attempts in seconds (default: 5)
    pub retry_delay_secs: u64,

    /// Minimum time between manual skips in seconds (default: 2)
    pub skip_cooldown_secs: u64,

    /// Pause after stopping the transport before the next track, in milliseconds
    pub settle_delay_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            channel: String::new(),
            default_sources: Vec::new(),
            max_retries: 3,
            retry_delay_secs: 5,
            skip_cooldown_secs: 2,
            settle_delay_ms: 500,
        }
    }
}

impl PlaybackSettings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn skip_cooldown(&self) -> Duration {
        Duration::from_secs(self.skip_cooldown_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// First non-empty default source
    pub fn default_source(&self) -> Option<&str> {
        self.default_sources
            .iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}
