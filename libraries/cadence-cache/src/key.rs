use sha2::{Digest, Sha256};
use std::fmt;

/// Cache key derived from a playlist source URL
///
/// The key is the hex SHA-256 of the URL bytes, so the same source always maps
/// to the same document whichever load path produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a source URL
    pub fn for_source(source_url: &str) -> Self {
        let hash = Sha256::digest(source_url.as_bytes());
        Self(hex::encode(hash))
    }

    /// Hex digest
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the cache document
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
