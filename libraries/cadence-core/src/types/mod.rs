//! Domain types

mod stream;
mod track;

pub use stream::StreamAddress;
pub use track::{has_recognized_scheme, CatalogMetadata, TrackDescriptor, UNKNOWN_TITLE};
