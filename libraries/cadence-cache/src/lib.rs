//! Cadence Cache
//!
//! Content-addressed, on-disk store for loaded playlists.
//!
//! Each cached source is one JSON document named after the hex SHA-256 of the
//! source URL:
//!
//! ```text
//! <cache_dir>/
//! ├── 3f1c…e2.json   {"url": ..., "last_updated": ..., "tracks": [...]}
//! └── 9a07…41.json
//! ```
//!
//! Documents are replaced atomically (temporary file, then rename). Cached
//! playlists never expire; a source is reloaded only if its document is
//! removed.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_cache::{CacheEntry, CacheKey, CacheStore};
//!
//! # async fn example() {
//! let store = CacheStore::new("./playlist_cache");
//! let key = CacheKey::for_source("https://example.com/playlist?list=abc");
//!
//! if store.get(&key).await.is_none() {
//!     let entry = CacheEntry::new("https://example.com/playlist?list=abc", Vec::new());
//!     store.put(&key, &entry).await;
//! }
//! # }
//! ```

mod entry;
mod error;
mod key;
mod store;

pub use entry::CacheEntry;
pub use error::{CacheError, Result};
pub use key::CacheKey;
pub use store::{CacheSettings, CacheStore};
