//! Shared fakes for loader tests

#![allow(dead_code)]

use async_trait::async_trait;
use cadence_catalog::{CatalogApi, CatalogError, CatalogPage};
use cadence_core::CatalogMetadata;
use cadence_resolver::{ExtractMode, ExtractedInfo, MediaExtractor, ResolverError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type Responder =
    Box<dyn Fn(&str, ExtractMode) -> Result<Option<ExtractedInfo>, ResolverError> + Send + Sync>;

/// Resolver backend answering from a closure and recording concurrency
pub struct FakeExtractor {
    responder: Responder,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl FakeExtractor {
    pub fn new(
        responder: impl Fn(&str, ExtractMode) -> Result<Option<ExtractedInfo>, ResolverError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            delay: Duration::from_millis(10),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Answers every search with a hit whose URL is derived from the query
    pub fn searching() -> Self {
        Self::new(|query, _| {
            let term = query.trim_start_matches("ytsearch1:");
            Ok(Some(search_result(&format!(
                "https://www.youtube.com/watch?v={}",
                term.replace(' ', "_")
            ), term)))
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaExtractor for FakeExtractor {
    async fn extract(
        &self,
        query: &str,
        mode: ExtractMode,
    ) -> Result<Option<ExtractedInfo>, ResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        (self.responder)(query, mode)
    }
}

/// Flat search result wrapping one entry
pub fn search_result(url: &str, title: &str) -> ExtractedInfo {
    ExtractedInfo {
        entries: Some(vec![Some(ExtractedInfo {
            url: Some(url.to_string()),
            title: Some(title.to_string()),
            duration: Some(180.0),
            ..Default::default()
        })]),
        ..Default::default()
    }
}

pub fn metadata(name: &str, artist: &str) -> CatalogMetadata {
    CatalogMetadata {
        id: Some(format!("id-{}", name.replace(' ', "-"))),
        name: name.to_string(),
        artists: vec![artist.to_string()],
        duration_ms: 180_000,
    }
}

/// Catalog serving fixed pages, cursors are `page-<n>`
pub struct FakeCatalog {
    pages: Vec<Vec<CatalogMetadata>>,
    calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new(pages: Vec<Vec<CatalogMetadata>>) -> Self {
        Self {
            pages,
            calls: AtomicUsize::new(0),
        }
    }

    /// `total` entries split into pages of `page_size`
    pub fn with_tracks(total: usize, page_size: usize) -> Self {
        let all: Vec<_> = (0..total)
            .map(|i| metadata(&format!("Track {}", i), "Artist"))
            .collect();
        Self::new(all.chunks(page_size).map(<[_]>::to_vec).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn list_tracks(
        &self,
        _playlist_id: &str,
        cursor: Option<&str>,
    ) -> Result<CatalogPage, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let index = match cursor {
            None => 0,
            Some(c) => c
                .trim_start_matches("page-")
                .parse::<usize>()
                .map_err(|e| CatalogError::ParseError(e.to_string()))?,
        };

        let items = self.pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));
        Ok(CatalogPage { items, next })
    }
}

/// Catalog that is always down
pub struct DownCatalog;

#[async_trait]
impl CatalogApi for DownCatalog {
    async fn list_tracks(
        &self,
        _playlist_id: &str,
        _cursor: Option<&str>,
    ) -> Result<CatalogPage, CatalogError> {
        Err(CatalogError::Unreachable("connection refused".to_string()))
    }
}
