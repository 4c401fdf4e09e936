//! Cadence Catalog
//!
//! Turns playlist source URLs into ordered track lists.
//!
//! # Sources
//!
//! - **Direct media** (video-site playlists, single videos): listed by the
//!   resolver in one flat query.
//! - **Catalog service** (`*.spotify.com` playlists): paged through the
//!   [`CatalogApi`], then every entry is searched for by
//!   `"<name> <primary artist>"` in sequential batches of concurrent
//!   searches.
//!
//! Entries that cannot be found or that lack a usable URL are dropped; only
//! an empty result fails the load. Successful loads are written to the
//! [`cadence_cache::CacheStore`] under the source URL and served from it on
//! every later load.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_cache::CacheStore;
//! use cadence_catalog::CatalogLoader;
//! use cadence_resolver::{ResolverSettings, TrackResolver};
//!
//! # async fn example() -> cadence_catalog::Result<()> {
//! let loader = CatalogLoader::new(
//!     CacheStore::new("./playlist_cache"),
//!     TrackResolver::from_settings(&ResolverSettings::default()),
//! );
//!
//! let playlist = loader.load("https://www.youtube.com/playlist?list=PL123").await?;
//! println!("{} tracks", playlist.tracks.len());
//! # Ok(())
//! # }
//! ```

mod api;
pub mod error;
mod loader;
mod settings;
mod source;
mod spotify;

pub use api::{CatalogApi, CatalogPage};
pub use error::{CatalogError, LoadError, Result};
pub use loader::{CatalogLoader, LoadProgress, LoadedPlaylist, DEFAULT_BATCH_SIZE};
pub use settings::CatalogSettings;
pub use source::SourceKind;
pub use spotify::SpotifyCatalog;
