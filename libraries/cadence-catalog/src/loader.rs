use crate::api::CatalogApi;
use crate::error::{LoadError, Result};
use crate::source::SourceKind;
use cadence_cache::{CacheEntry, CacheKey, CacheStore};
use cadence_core::{CatalogMetadata, TrackDescriptor};
use cadence_resolver::{ResolvedEntry, TrackResolver};
use futures_util::future::join_all;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Catalog entries resolved concurrently per batch
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Progress of a playlist load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadProgress {
    /// Served from the cache
    CacheHit { tracks: usize },
    /// Catalog pages fetched so far
    FetchingCatalog { entries: usize },
    /// Catalog entries resolved so far, reported after each batch
    Resolving { done: usize, total: usize },
    /// Load finished
    Complete { tracks: usize },
}

/// Result of a successful load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPlaylist {
    pub tracks: Vec<TrackDescriptor>,
    pub from_cache: bool,
    /// Entries dropped because they could not be resolved or validated
    pub dropped: usize,
}

/// Produces playlists from source URLs
///
/// Direct-media sources are listed by the resolver in one flat query.
/// Catalog sources are listed page by page, then each entry is searched for
/// in sequential batches whose members run concurrently. Successful loads are
/// cached under the original source URL.
#[derive(Clone)]
pub struct CatalogLoader {
    cache: CacheStore,
    resolver: TrackResolver,
    catalog: Option<Arc<dyn CatalogApi>>,
    batch_size: usize,
}

impl CatalogLoader {
    pub fn new(cache: CacheStore, resolver: TrackResolver) -> Self {
        Self {
            cache,
            resolver,
            catalog: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn CatalogApi>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn resolver(&self) -> &TrackResolver {
        &self.resolver
    }

    /// Load a playlist
    pub async fn load(&self, source_url: &str) -> Result<LoadedPlaylist> {
        self.load_with_progress(source_url, None).await
    }

    /// Load a playlist, reporting progress on `progress`
    pub async fn load_with_progress(
        &self,
        source_url: &str,
        progress: Option<&mpsc::Sender<LoadProgress>>,
    ) -> Result<LoadedPlaylist> {
        let key = CacheKey::for_source(source_url);

        if let Some(entry) = self.cache.get(&key).await {
            if !entry.tracks.is_empty() {
                info!(url = %source_url, tracks = entry.tracks.len(), "Loaded playlist from cache");
                report(progress, LoadProgress::CacheHit {
                    tracks: entry.tracks.len(),
                })
                .await;
                return Ok(LoadedPlaylist {
                    tracks: entry.tracks,
                    from_cache: true,
                    dropped: 0,
                });
            }
        }

        let (tracks, dropped) = match SourceKind::classify(source_url) {
            SourceKind::Direct => self.load_direct(source_url).await?,
            SourceKind::Catalog { playlist_id } => {
                self.load_catalog(&playlist_id, progress).await?
            }
        };

        if tracks.is_empty() {
            return Err(LoadError::Empty {
                url: source_url.to_string(),
            });
        }

        info!(url = %source_url, tracks = tracks.len(), dropped, "Loaded playlist");
        self.cache
            .put(&key, &CacheEntry::new(source_url, tracks.clone()))
            .await;
        report(progress, LoadProgress::Complete {
            tracks: tracks.len(),
        })
        .await;

        Ok(LoadedPlaylist {
            tracks,
            from_cache: false,
            dropped,
        })
    }

    async fn load_direct(&self, source_url: &str) -> Result<(Vec<TrackDescriptor>, usize)> {
        debug!(url = %source_url, "Bulk-loading direct source");
        let entries = self.resolver.resolve_entries(source_url).await?;

        let total = entries.len();
        let tracks: Vec<_> = entries
            .into_iter()
            .filter_map(|entry| validate(entry, None))
            .collect();
        let dropped = total - tracks.len();
        Ok((tracks, dropped))
    }

    async fn load_catalog(
        &self,
        playlist_id: &str,
        progress: Option<&mpsc::Sender<LoadProgress>>,
    ) -> Result<(Vec<TrackDescriptor>, usize)> {
        let catalog = self.catalog.as_ref().ok_or(LoadError::CatalogNotConfigured)?;

        let mut items: Vec<CatalogMetadata> = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = catalog.list_tracks(playlist_id, cursor.as_deref()).await?;
            items.extend(page.items);
            report(progress, LoadProgress::FetchingCatalog {
                entries: items.len(),
            })
            .await;
            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        let listed = items.len();
        items.retain(|item| {
            let keep = !item.name.trim().is_empty();
            if !keep {
                debug!(id = ?item.id, "Dropping catalog entry without a name");
            }
            keep
        });
        let total = items.len();
        debug!(playlist = %playlist_id, entries = total, "Resolving catalog entries");

        let mut tracks = Vec::with_capacity(total);
        let mut failures = 0;
        let mut last_error = None;
        let mut done = 0;

        for batch in items.chunks(self.batch_size) {
            let searches = batch
                .iter()
                .map(|item| async move {
                    self.resolver.search(&item.search_query()).await
                });
            let results = join_all(searches).await;

            for (item, result) in batch.iter().zip(results) {
                match result {
                    Ok(Some(entry)) => tracks.extend(validate(entry, Some(item.clone()))),
                    Ok(None) => debug!(query = %item.search_query(), "No match for catalog entry"),
                    Err(e) => {
                        warn!(query = %item.search_query(), error = %e, "Search failed");
                        failures += 1;
                        last_error = Some(e);
                    }
                }
            }

            done += batch.len();
            report(progress, LoadProgress::Resolving { done, total }).await;
        }

        if tracks.is_empty() && failures > 0 && failures == total {
            if let Some(e) = last_error {
                return Err(LoadError::Resolver(e));
            }
        }

        let dropped = listed - tracks.len();
        Ok((tracks, dropped))
    }
}

fn validate(entry: ResolvedEntry, metadata: Option<CatalogMetadata>) -> Option<TrackDescriptor> {
    match entry.into_descriptor(metadata) {
        Ok(track) => Some(track),
        Err(e) => {
            debug!(error = %e, "Dropping malformed entry");
            None
        }
    }
}

async fn report(progress: Option<&mpsc::Sender<LoadProgress>>, update: LoadProgress) {
    if let Some(tx) = progress {
        let _ = tx.send(update).await;
    }
}
