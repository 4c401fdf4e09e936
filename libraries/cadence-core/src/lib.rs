//! Cadence Core
//!
//! Shared types, collaborator traits, and error handling for Cadence.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackDescriptor`, `CatalogMetadata`, `StreamAddress`
//! - **Collaborator Traits**: `StreamingTransport`
//! - **Error Handling**: `CoreError`, `TransportError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use cadence_core::TrackDescriptor;
//!
//! let track = TrackDescriptor::new("https://www.youtube.com/watch?v=abc", "Song").unwrap();
//! assert_eq!(track.title, "Song");
//!
//! // Descriptors without a recognized scheme are rejected
//! assert!(TrackDescriptor::new("file:///tmp/song.mp3", "Song").is_err());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CoreError, Result, TransportError};
pub use traits::{CompletionCallback, StreamingTransport};
pub use types::{
    has_recognized_scheme, CatalogMetadata, StreamAddress, TrackDescriptor, UNKNOWN_TITLE,
};
