//! `yt-dlp` process backend

use crate::error::{ResolverError, Result};
use crate::extractor::{ExtractMode, ExtractedInfo, MediaExtractor};
use crate::settings::ResolverSettings;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Resolves media by running `yt-dlp --dump-single-json`
pub struct YtDlpExtractor {
    settings: ResolverSettings,
}

impl YtDlpExtractor {
    pub fn new(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    /// Command-line arguments for one extraction
    pub fn build_args(&self, query: &str, mode: ExtractMode) -> Vec<String> {
        let s = &self.settings;
        let mut args: Vec<String> = vec![
            "--dump-single-json".into(),
            "--no-warnings".into(),
            "--ignore-errors".into(),
            "--no-cache-dir".into(),
            "--default-search".into(),
            "auto".into(),
            "-f".into(),
            s.format.clone(),
            "--audio-format".into(),
            s.audio_format.clone(),
            "--audio-quality".into(),
            s.quality.clone(),
            "--user-agent".into(),
            s.user_agent.clone(),
            "--socket-timeout".into(),
            s.socket_timeout_secs.to_string(),
        ];

        match mode {
            ExtractMode::Flat => args.push("--flat-playlist".into()),
            ExtractMode::Full => args.push("--no-playlist".into()),
        }

        match (&s.cookie_file, &s.cookies_from_browser) {
            (Some(file), _) if file.exists() => {
                args.push("--cookies".into());
                args.push(file.display().to_string());
            }
            (_, Some(browser)) => {
                args.push("--cookies-from-browser".into());
                args.push(browser.clone());
            }
            _ => {}
        }

        if let Some(rate) = &s.throttled_rate {
            args.push("--throttled-rate".into());
            args.push(rate.clone());
        }
        if s.mark_watched {
            args.push("--mark-watched".into());
        }

        args.push("--".into());
        args.push(query.to_string());
        args
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn extract(&self, query: &str, mode: ExtractMode) -> Result<Option<ExtractedInfo>> {
        let output = Command::new(&self.settings.executable)
            .args(self.build_args(query, mode))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ResolverError::Unreachable(format!(
                    "{}: {}",
                    self.settings.executable.display(),
                    e
                ))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            debug!(
                query = %query,
                status = ?output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "yt-dlp returned nothing"
            );
            return Ok(None);
        }

        let info: ExtractedInfo = serde_json::from_str(stdout.trim())?;
        Ok(Some(info))
    }
}
