use serde::{Deserialize, Serialize};

/// Catalog service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,

    /// Web API base URL
    pub api_base: String,

    /// Client-credentials token endpoint
    pub token_url: String,

    /// Entries resolved concurrently per batch (default: 5)
    pub batch_size: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base: "https://api.spotify.com/v1".to_string(),
            token_url: "https://accounts.spotify.com/api/token".to_string(),
            batch_size: crate::loader::DEFAULT_BATCH_SIZE,
        }
    }
}

impl CatalogSettings {
    /// Client credentials, when both are set and non-empty
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Some((id, secret)),
            _ => None,
        }
    }
}
