//! HTTP Client Construction
//!
//! Three flavours of `reqwest::Client`:
//! - [`build_client`]: stateless, safe to share across requests.
//! - [`build_session_client`]: owns a fresh cookie store. Build one per
//!   logical session and drop it when the session ends; never share it
//!   between requests.
//! - [`build_streaming_client`]: no whole-request deadline, for bodies that
//!   may take arbitrarily long to transfer.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User-Agent sent with every request
    pub user_agent: String,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout (headers and body)
    pub request_timeout: Duration,
    /// Longest pause between two reads on a streaming client
    pub read_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("media-gateway/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(30),
        }
    }
}

impl HttpClientConfig {
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Error when constructing an HTTP client
#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Build a stateless client
pub fn build_client(config: &HttpClientConfig) -> Result<Client, HttpClientError> {
    Ok(base_builder(config).build()?)
}

/// Build a client for long transfers
///
/// Only connecting and each individual read are bounded, so a large file
/// keeps streaming as long as bytes keep arriving.
pub fn build_streaming_client(config: &HttpClientConfig) -> Result<Client, HttpClientError> {
    Ok(Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.read_timeout)
        .build()?)
}

/// Build a client with its own cookie store
///
/// Cookies set by one response are replayed on later requests made through
/// the same client, which is what lets an upstream correlate a multi-step
/// handshake.
pub fn build_session_client(config: &HttpClientConfig) -> Result<Client, HttpClientError> {
    Ok(base_builder(config).cookie_store(true).build()?)
}

fn base_builder(config: &HttpClientConfig) -> reqwest::ClientBuilder {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
}
