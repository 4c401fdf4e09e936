use url::Url;

/// How a playlist source is loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Media-site URL handed to the resolver as one bulk query
    Direct,
    /// Catalog-service playlist, listed page by page and searched per entry
    Catalog { playlist_id: String },
}

impl SourceKind {
    /// Classify a source URL by its shape
    pub fn classify(source_url: &str) -> Self {
        let Ok(url) = Url::parse(source_url) else {
            return Self::Direct;
        };

        let is_catalog = url
            .host_str()
            .is_some_and(|host| host == "spotify.com" || host.ends_with(".spotify.com"));
        if !is_catalog {
            return Self::Direct;
        }

        url.path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .map_or(Self::Direct, |id| Self::Catalog {
                playlist_id: id.to_string(),
            })
    }
}
