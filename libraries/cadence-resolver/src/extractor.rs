//! Resolver backend abstraction and its output document

use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// Availability markers for media that cannot be played without an account
const UNAVAILABLE: &[&str] = &["private", "needs_auth", "subscriber_only", "premium_only"];

/// How deeply the backend should extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// List entries without resolving each one (bulk playlist loads, searches)
    Flat,
    /// Fully resolve a single item, including its stream formats
    Full,
}

/// One stream format offered for a media item
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaFormat {
    pub format_id: Option<String>,
    pub url: Option<String>,
    /// Audio codec, `"none"` for video-only formats
    pub acodec: Option<String>,
}

impl MediaFormat {
    fn has_audio(&self) -> bool {
        matches!(self.acodec.as_deref(), Some(codec) if !codec.is_empty() && codec != "none")
    }
}

/// Extraction result as reported by the backend
///
/// Playlists and search results carry `entries`; single items carry `formats`
/// when fully extracted. Every field is optional because backends omit what
/// they do not know.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtractedInfo {
    #[serde(default)]
    pub entries: Option<Vec<Option<ExtractedInfo>>>,
    pub url: Option<String>,
    pub webpage_url: Option<String>,
    pub original_url: Option<String>,
    pub title: Option<String>,
    pub duration: Option<f64>,
    #[serde(default)]
    pub formats: Option<Vec<MediaFormat>>,
    pub availability: Option<String>,
}

impl ExtractedInfo {
    /// Whether the backend confirmed the item cannot be played
    pub fn is_unavailable(&self) -> bool {
        self.availability
            .as_deref()
            .is_some_and(|a| UNAVAILABLE.contains(&a))
    }

    /// Canonical page URL of the item
    pub fn page_url(&self) -> Option<&str> {
        self.webpage_url
            .as_deref()
            .or(self.url.as_deref())
            .or(self.original_url.as_deref())
            .filter(|u| !u.is_empty())
    }

    /// Duration rounded to whole seconds
    pub fn duration_seconds(&self) -> Option<u64> {
        self.duration
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| d.round() as u64)
    }

    /// Playable entries of a playlist, or the item itself when it has none
    ///
    /// Null and unavailable entries are skipped.
    pub fn into_entries(self) -> Vec<ExtractedInfo> {
        match self.entries {
            Some(entries) => entries
                .into_iter()
                .flatten()
                .filter(|e| !e.is_unavailable())
                .collect(),
            None if self.is_unavailable() => Vec::new(),
            None => vec![self],
        }
    }

    /// Address to stream from
    ///
    /// The first format with an audio codec and an HTTP(S) URL wins; the
    /// top-level URL is the fallback.
    pub fn stream_address(&self) -> Option<&str> {
        self.formats
            .iter()
            .flatten()
            .filter(|f| f.has_audio())
            .filter_map(|f| f.url.as_deref())
            .find(|u| u.starts_with("http://") || u.starts_with("https://"))
            .or_else(|| self.url.as_deref().filter(|u| !u.is_empty()))
    }
}

/// Media-resolution backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Extract information for a URL or search query
    ///
    /// Returns `Ok(None)` when the backend ran but produced nothing.
    async fn extract(&self, query: &str, mode: ExtractMode) -> Result<Option<ExtractedInfo>>;
}
