//! Builds the playback stack from configuration

use crate::config::AppConfig;
use crate::error::Result;
use cadence_cache::CacheStore;
use cadence_catalog::{CatalogLoader, SpotifyCatalog};
use cadence_output::ProcessTransport;
use cadence_playback::PlaybackCoordinator;
use cadence_resolver::TrackResolver;
use std::sync::Arc;
use tracing::{debug, info};

/// Playlist loader with cache, resolver and (when credentials are set) the
/// catalog client
pub fn build_loader(config: &AppConfig) -> Result<CatalogLoader> {
    let cache = CacheStore::from_settings(&config.cache);
    let resolver = TrackResolver::from_settings(&config.resolver);
    let mut loader =
        CatalogLoader::new(cache, resolver).with_batch_size(config.catalog.batch_size);

    match SpotifyCatalog::from_settings(&config.catalog) {
        Some(catalog) => {
            loader = loader.with_catalog(Arc::new(catalog?));
            info!("Catalog client configured");
        }
        None => debug!("No catalog credentials, catalog playlists are unavailable"),
    }

    Ok(loader)
}

/// Coordinator streaming through the configured output process
pub fn build_coordinator(config: &AppConfig) -> Result<PlaybackCoordinator> {
    let loader = build_loader(config)?;
    let transport = Arc::new(ProcessTransport::new(config.output.clone()));
    Ok(PlaybackCoordinator::new(
        transport,
        loader,
        config.playback.clone(),
    ))
}
