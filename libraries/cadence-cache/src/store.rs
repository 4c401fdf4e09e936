use crate::entry::CacheEntry;
use crate::error::{CacheError, Result};
use crate::key::CacheKey;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Whether loaded playlists are cached at all (default: true)
    pub enabled: bool,

    /// Directory holding the cache documents (default: `./playlist_cache`)
    pub directory: PathBuf,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from("./playlist_cache"),
        }
    }
}

/// On-disk playlist cache
///
/// Reads never fail: missing, unreadable or undecodable documents are cache
/// misses. Writes go through a temporary file and a rename so a reader never
/// sees a partially written document; write failures are logged and
/// swallowed by [`CacheStore::put`].
#[derive(Debug, Clone)]
pub struct CacheStore {
    directory: PathBuf,
    enabled: bool,
}

impl CacheStore {
    /// Create an enabled store rooted at `directory`
    ///
    /// The directory is created on first write.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            enabled: true,
        }
    }

    /// Create a store that never hits and never writes
    pub fn disabled() -> Self {
        Self {
            directory: PathBuf::new(),
            enabled: false,
        }
    }

    /// Create a store from settings
    pub fn from_settings(settings: &CacheSettings) -> Self {
        if settings.enabled {
            Self::new(settings.directory.clone())
        } else {
            Self::disabled()
        }
    }

    /// Whether the store reads and writes documents
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cache directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the document for `key`
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.directory.join(key.file_name())
    }

    /// Look up a cached playlist
    pub async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        if !self.enabled {
            return None;
        }

        let path = self.path_for(key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key = %key, "Cache miss");
                return None;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read cache document");
                return None;
            }
        };

        match serde_json::from_slice::<CacheEntry>(&bytes) {
            Ok(entry) => {
                debug!(key = %key, tracks = entry.tracks.len(), "Cache hit");
                Some(entry)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring undecodable cache document");
                None
            }
        }
    }

    /// Check whether a document exists for `key`
    pub async fn exists(&self, key: &CacheKey) -> bool {
        self.enabled && fs::try_exists(self.path_for(key)).await.unwrap_or(false)
    }

    /// Store a playlist, replacing any previous document
    ///
    /// Failures are logged and swallowed.
    pub async fn put(&self, key: &CacheKey, entry: &CacheEntry) {
        if !self.enabled {
            return;
        }

        match self.try_put(key, entry).await {
            Ok(()) => debug!(key = %key, tracks = entry.tracks.len(), "Cached playlist"),
            Err(e) => warn!(key = %key, error = %e, "Failed to write cache document"),
        }
    }

    /// Store a playlist, reporting failures
    pub async fn try_put(&self, key: &CacheKey, entry: &CacheEntry) -> Result<()> {
        if !self.enabled {
            return Err(CacheError::Disabled);
        }

        let data = serde_json::to_vec_pretty(entry)?;
        fs::create_dir_all(&self.directory).await?;

        let path = self.path_for(key);
        let temp_path = self
            .directory
            .join(format!("{}.{}.tmp", key.as_str(), Uuid::new_v4().simple()));

        if let Err(e) = fs::write(&temp_path, &data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = CacheSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.directory, PathBuf::from("./playlist_cache"));
    }

    #[test]
    fn disabled_settings_build_disabled_store() {
        let settings = CacheSettings {
            enabled: false,
            directory: PathBuf::from("/tmp/unused"),
        };
        assert!(!CacheStore::from_settings(&settings).is_enabled());
    }

    #[test]
    fn document_path_uses_key() {
        let store = CacheStore::new("/var/cache/cadence");
        let key = CacheKey::for_source("https://example.com");
        assert_eq!(
            store.path_for(&key),
            PathBuf::from("/var/cache/cadence").join(key.file_name())
        );
    }
}
