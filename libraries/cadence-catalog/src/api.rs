use crate::error::CatalogError;
use async_trait::async_trait;
use cadence_core::CatalogMetadata;

/// One page of catalog playlist entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    pub items: Vec<CatalogMetadata>,
    /// Cursor for the next page, `None` on the last page
    pub next: Option<String>,
}

/// Paged access to playlists of an external catalog service
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// List one page of a playlist
    ///
    /// `cursor` is `None` for the first page and the previous page's `next`
    /// afterwards.
    async fn list_tracks(
        &self,
        playlist_id: &str,
        cursor: Option<&str>,
    ) -> Result<CatalogPage, CatalogError>;
}
