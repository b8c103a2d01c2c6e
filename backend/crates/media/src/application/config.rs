//! Application Configuration
//!
//! Configuration for the media application layer.

use platform::http::HttpClientConfig;
use std::time::Duration;

/// Media application configuration
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Conversion service base URL, also the prefix of artifact URLs
    pub converter_base_url: String,
    /// Path of the challenge endpoint (POST)
    pub challenge_path: String,
    /// Path of the session-verify endpoint (POST)
    pub verify_path: String,
    /// Path of the status endpoint (GET)
    pub status_path: String,
    /// Status queries per job before giving up
    pub max_attempts: u32,
    /// Fixed delay between status queries
    pub poll_interval: Duration,
    /// oEmbed-compatible metadata provider base URL
    pub metadata_base_url: String,
    /// Invidious-compatible search provider base URL
    pub search_base_url: String,
    /// Outbound HTTP client settings
    pub http: HttpClientConfig,
    /// Include debug details in error responses
    pub expose_error_details: bool,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            converter_base_url: "https://youtubedl.siputzx.my.id".to_string(),
            challenge_path: "/challenge".to_string(),
            verify_path: "/verify".to_string(),
            status_path: "/download".to_string(),
            max_attempts: 30,
            poll_interval: Duration::from_secs(2),
            metadata_base_url: "https://www.youtube.com".to_string(),
            search_base_url: "https://inv.nadeko.net".to_string(),
            http: HttpClientConfig::default(),
            expose_error_details: false,
        }
    }
}

impl MediaConfig {
    /// Create config for development (debug details in error responses)
    pub fn development() -> Self {
        Self {
            expose_error_details: true,
            ..Self::default()
        }
    }

    /// Wall-clock budget of one poll loop
    pub fn poll_budget(&self) -> Duration {
        self.poll_interval * self.max_attempts
    }

    /// Join a `fileUrl` from the status endpoint onto the service base URL
    pub fn artifact_url(&self, file_url: &str) -> String {
        if file_url.starts_with("http://") || file_url.starts_with("https://") {
            return file_url.to_string();
        }
        format!("{}{}", self.converter_base_url.trim_end_matches('/'), file_url)
    }

    pub fn challenge_url(&self) -> String {
        self.endpoint(&self.challenge_path)
    }

    pub fn verify_url(&self) -> String {
        self.endpoint(&self.verify_path)
    }

    pub fn status_url(&self) -> String {
        self.endpoint(&self.status_path)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.converter_base_url.trim_end_matches('/'), path)
    }
}
