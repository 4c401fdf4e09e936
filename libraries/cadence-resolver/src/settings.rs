use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Resolver backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Backend executable (default: `yt-dlp`)
    pub executable: PathBuf,

    /// Format selector (default: `bestaudio/best`)
    pub format: String,

    /// Preferred audio codec
    pub audio_format: String,

    /// Preferred audio quality
    pub quality: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Netscape cookie file, used when it exists
    pub cookie_file: Option<PathBuf>,

    /// Browser to read cookies from when no cookie file is available
    pub cookies_from_browser: Option<String>,

    /// Minimum download rate below which throttling is assumed (e.g. `100K`)
    pub throttled_rate: Option<String>,

    /// Mark resolved videos as watched
    pub mark_watched: bool,

    /// Per-call timeout in seconds (default: 30)
    pub socket_timeout_secs: u64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("yt-dlp"),
            format: "bestaudio/best".to_string(),
            audio_format: "mp3".to_string(),
            quality: "192".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string(),
            cookie_file: None,
            cookies_from_browser: None,
            throttled_rate: None,
            mark_watched: false,
            socket_timeout_secs: 30,
        }
    }
}

impl ResolverSettings {
    pub fn socket_timeout(&self) -> Duration {
        Duration::from_secs(self.socket_timeout_secs)
    }
}
