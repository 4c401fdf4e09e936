//! Spotify Web API catalog client

use crate::api::{CatalogApi, CatalogPage};
use crate::error::CatalogError;
use crate::settings::CatalogSettings;
use async_trait::async_trait;
use cadence_core::CatalogMetadata;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

type Result<T> = std::result::Result<T, CatalogError>;

/// Entries requested per page (API maximum)
const PAGE_LIMIT: u32 = 100;

/// Tokens are refreshed this long before they expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TracksPage {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    track: Option<CatalogTrack>,
}

#[derive(Debug, Deserialize)]
struct CatalogTrack {
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    artists: Vec<Artist>,
    #[serde(default)]
    duration_ms: u64,
}

#[derive(Debug, Deserialize)]
struct Artist {
    name: String,
}

impl From<CatalogTrack> for CatalogMetadata {
    fn from(track: CatalogTrack) -> Self {
        Self {
            id: track.id,
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            duration_ms: track.duration_ms,
        }
    }
}

/// Catalog client using the client-credentials flow
///
/// The access token is cached until shortly before it expires and is
/// refreshed once if the API rejects it.
pub struct SpotifyCatalog {
    http: Client,
    client_id: String,
    client_secret: String,
    api_base: String,
    token_url: String,
    token: RwLock<Option<AccessToken>>,
}

impl SpotifyCatalog {
    /// Create a client for the public Spotify endpoints
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        let defaults = CatalogSettings::default();
        Self::with_endpoints(client_id, client_secret, defaults.api_base, defaults.token_url)
    }

    /// Create a client against custom endpoints
    pub fn with_endpoints(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        api_base: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Cadence/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token_url: token_url.into(),
            token: RwLock::new(None),
        })
    }

    /// Build a client from settings, `None` when no credentials are configured
    pub fn from_settings(settings: &CatalogSettings) -> Option<Result<Self>> {
        let (id, secret) = settings.credentials()?;
        Some(Self::with_endpoints(
            id,
            secret,
            settings.api_base.clone(),
            settings.token_url.clone(),
        ))
    }

    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.expires_at > Instant::now() + EXPIRY_MARGIN {
                return Ok(token.value.clone());
            }
        }

        debug!(url = %self.token_url, "Requesting catalog access token");

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(CatalogError::from_send)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::AuthFailed(format!("{}: {}", status, message)));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(format!("Failed to parse token: {}", e)))?;

        let token = AccessToken {
            value: body.access_token,
            expires_at: Instant::now() + Duration::from_secs(body.expires_in),
        };
        let value = token.value.clone();
        *self.token.write().await = Some(token);

        info!(expires_in = body.expires_in, "Obtained catalog access token");
        Ok(value)
    }

    async fn invalidate_token(&self) {
        *self.token.write().await = None;
    }

    async fn fetch_page(&self, url: &str) -> Result<TracksPage> {
        let mut retried = false;
        loop {
            let token = self.access_token().await?;
            let response = self
                .http
                .get(url)
                .bearer_auth(&token)
                .send()
                .await
                .map_err(CatalogError::from_send)?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED && !retried {
                debug!("Access token rejected, refreshing");
                self.invalidate_token().await;
                retried = true;
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(CatalogError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            return response
                .json()
                .await
                .map_err(|e| CatalogError::ParseError(format!("Failed to parse tracks: {}", e)));
        }
    }
}

#[async_trait]
impl CatalogApi for SpotifyCatalog {
    async fn list_tracks(&self, playlist_id: &str, cursor: Option<&str>) -> Result<CatalogPage> {
        let url = match cursor {
            Some(next) => next.to_string(),
            None => format!(
                "{}/playlists/{}/tracks?limit={}",
                self.api_base, playlist_id, PAGE_LIMIT
            ),
        };

        debug!(url = %url, "Fetching catalog page");
        let page = self.fetch_page(&url).await?;

        Ok(CatalogPage {
            items: page
                .items
                .into_iter()
                .filter_map(|item| item.track)
                .map(CatalogMetadata::from)
                .collect(),
            next: page.next,
        })
    }
}
