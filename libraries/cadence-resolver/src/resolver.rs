use crate::error::{ResolverError, Result};
use crate::extractor::{ExtractMode, ExtractedInfo, MediaExtractor};
use crate::settings::ResolverSettings;
use crate::ytdlp::YtDlpExtractor;
use cadence_core::{CatalogMetadata, StreamAddress, TrackDescriptor};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An entry found by a bulk load or a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub page_url: Option<String>,
    pub title: Option<String>,
    pub duration_seconds: Option<u64>,
}

impl From<ExtractedInfo> for ResolvedEntry {
    fn from(info: ExtractedInfo) -> Self {
        Self {
            page_url: info.page_url().map(str::to_string),
            duration_seconds: info.duration_seconds(),
            title: info.title,
        }
    }
}

impl ResolvedEntry {
    /// Validate into a playlist entry, carrying catalog metadata along
    ///
    /// When the backend did not report a duration the catalog's is used.
    pub fn into_descriptor(
        self,
        metadata: Option<CatalogMetadata>,
    ) -> cadence_core::Result<TrackDescriptor> {
        let duration = self
            .duration_seconds
            .or_else(|| metadata.as_ref().map(|m| m.duration_ms / 1000))
            .unwrap_or(0);

        let track = TrackDescriptor::new(
            self.page_url.unwrap_or_default(),
            self.title.unwrap_or_default(),
        )?
        .with_duration(duration);

        Ok(match metadata {
            Some(metadata) => track.with_metadata(metadata),
            None => track,
        })
    }
}

/// Turns source URLs and search queries into playable tracks
///
/// Every backend call runs on its own task and is bounded by the configured
/// timeout; a timed-out call is a resolution failure.
#[derive(Clone)]
pub struct TrackResolver {
    backend: Arc<dyn MediaExtractor>,
    timeout: Duration,
}

impl TrackResolver {
    pub fn new(backend: Arc<dyn MediaExtractor>) -> Self {
        Self {
            backend,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Resolver backed by `yt-dlp`
    pub fn from_settings(settings: &ResolverSettings) -> Self {
        Self::new(Arc::new(YtDlpExtractor::new(settings.clone())))
            .with_timeout(settings.socket_timeout())
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, query: String, mode: ExtractMode) -> Result<Option<ExtractedInfo>> {
        let backend = Arc::clone(&self.backend);
        let mut task = tokio::spawn(async move { backend.extract(&query, mode).await });

        match tokio::time::timeout(self.timeout, &mut task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(ResolverError::Task(e.to_string())),
            Err(_) => {
                task.abort();
                Err(ResolverError::Timeout(self.timeout.as_secs()))
            }
        }
    }

    /// Load every entry behind a direct-media URL in one flat query
    pub async fn resolve_entries(&self, url: &str) -> Result<Vec<ResolvedEntry>> {
        let entries = match self.run(url.to_string(), ExtractMode::Flat).await? {
            Some(info) => info.into_entries(),
            None => Vec::new(),
        };
        debug!(url = %url, entries = entries.len(), "Bulk load finished");
        Ok(entries.into_iter().map(ResolvedEntry::from).collect())
    }

    /// Find the best match for a free-text query
    pub async fn search(&self, query: &str) -> Result<Option<ResolvedEntry>> {
        let info = self
            .run(format!("ytsearch1:{}", query), ExtractMode::Flat)
            .await?;
        Ok(info
            .and_then(|info| info.into_entries().into_iter().next())
            .map(ResolvedEntry::from))
    }

    /// Resolve a track page to a playable stream address
    ///
    /// Any failure, including a timeout or unavailable media, yields `None`.
    pub async fn resolve_stream(&self, page_url: &str) -> Option<StreamAddress> {
        let info = match self.run(page_url.to_string(), ExtractMode::Full).await {
            Ok(Some(info)) => info,
            Ok(None) => {
                debug!(url = %page_url, "Resolver returned nothing");
                return None;
            }
            Err(e) => {
                warn!(url = %page_url, error = %e, "Stream resolution failed");
                return None;
            }
        };

        if info.is_unavailable() {
            debug!(url = %page_url, availability = ?info.availability, "Media unavailable");
            return None;
        }

        let address = info.stream_address()?.to_string();
        Some(StreamAddress {
            address,
            duration_seconds: info.duration_seconds(),
            title: info.title,
        })
    }
}
