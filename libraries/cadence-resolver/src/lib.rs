//! Cadence Resolver
//!
//! Turns playlist URLs, search queries and track pages into playable
//! addresses through an external media-resolution backend.
//!
//! - [`MediaExtractor`] is the backend seam; [`YtDlpExtractor`] runs `yt-dlp`.
//! - [`TrackResolver`] runs each backend call on a worker task under a
//!   timeout and maps the raw extraction document onto Cadence types.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_resolver::{ResolverSettings, TrackResolver};
//!
//! # async fn example() {
//! let resolver = TrackResolver::from_settings(&ResolverSettings::default());
//!
//! if let Some(stream) = resolver.resolve_stream("https://www.youtube.com/watch?v=abc").await {
//!     println!("streaming from {}", stream.address);
//! }
//! # }
//! ```

pub mod error;
pub mod extractor;
mod resolver;
mod settings;
mod ytdlp;

pub use error::{ResolverError, Result};
pub use extractor::{ExtractMode, ExtractedInfo, MediaExtractor, MediaFormat};
pub use resolver::{ResolvedEntry, TrackResolver, DEFAULT_TIMEOUT};
pub use settings::ResolverSettings;
pub use ytdlp::YtDlpExtractor;
