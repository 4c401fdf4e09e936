//! Playlist entry types

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Title used when the source does not provide one
pub const UNKNOWN_TITLE: &str = "Untitled";

/// Schemes a track address may use
const RECOGNIZED_SCHEMES: &[&str] = &["http", "https"];

/// Check whether `address` parses as a URL with a recognized scheme
pub fn has_recognized_scheme(address: &str) -> bool {
    Url::parse(address)
        .map(|url| RECOGNIZED_SCHEMES.contains(&url.scheme()))
        .unwrap_or(false)
}

/// One playlist entry
///
/// The source URL is the page the resolver is pointed at when the track comes
/// up for playback; the playable stream address is resolved only then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    /// Canonical page URL used for resolution
    #[serde(rename = "url")]
    pub source_url: String,

    /// Display title
    pub title: String,

    /// Duration in seconds (0 when unknown)
    #[serde(rename = "duration", default)]
    pub duration_seconds: u64,

    /// Catalog identifiers carried through from a catalog-service load
    #[serde(rename = "catalog", default, skip_serializing_if = "Option::is_none")]
    pub external_metadata: Option<CatalogMetadata>,
}

impl TrackDescriptor {
    /// Create a validated descriptor
    ///
    /// An empty title falls back to [`UNKNOWN_TITLE`].
    ///
    /// # Errors
    /// Returns `CoreError::MalformedEntry` if `source_url` is empty or does not
    /// use a recognized scheme.
    pub fn new(source_url: impl Into<String>, title: impl Into<String>) -> Result<Self> {
        let source_url = source_url.into();
        let title = title.into();
        let title = if title.trim().is_empty() {
            UNKNOWN_TITLE.to_string()
        } else {
            title
        };

        if source_url.is_empty() {
            return Err(CoreError::malformed(title, "missing source URL"));
        }
        if !has_recognized_scheme(&source_url) {
            return Err(CoreError::malformed(
                title,
                format!("unrecognized scheme in '{}'", source_url),
            ));
        }

        Ok(Self {
            source_url,
            title,
            duration_seconds: 0,
            external_metadata: None,
        })
    }

    /// Set the duration in seconds
    #[must_use]
    pub fn with_duration(mut self, seconds: u64) -> Self {
        self.duration_seconds = seconds;
        self
    }

    /// Attach catalog metadata
    #[must_use]
    pub fn with_metadata(mut self, metadata: CatalogMetadata) -> Self {
        self.external_metadata = Some(metadata);
        self
    }
}

/// Metadata from the external catalog a track was found through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    /// Catalog track identifier (absent for local catalog files)
    pub id: Option<String>,

    /// Track name as listed in the catalog
    pub name: String,

    /// All credited artists, primary artist first
    pub artists: Vec<String>,

    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl CatalogMetadata {
    /// Primary (first credited) artist
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(String::as_str)
    }

    /// Search query used to find a playable source for this entry
    pub fn search_query(&self) -> String {
        match self.primary_artist() {
            Some(artist) => format!("{} {}", self.name, artist),
            None => self.name.clone(),
        }
    }
}
