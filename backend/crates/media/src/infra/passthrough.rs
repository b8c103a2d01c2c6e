//! File Passthrough
//!
//! Fetches an already-resolved artifact and hands its body to the caller as
//! a byte stream, without buffering the whole file.

use axum::body::Bytes;
use futures_util::{Stream, TryStreamExt};
use reqwest::{Client, Response, header};

use crate::error::{MediaError, MediaResult};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Remote file source for the download passthrough
#[derive(Clone)]
pub struct HttpFileSource {
    client: Client,
}

/// An opened remote file, headers read and body not yet consumed
#[derive(Debug)]
pub struct RemoteFile {
    pub content_type: String,
    pub content_length: Option<u64>,
    response: Response,
}

impl HttpFileSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn open(&self, url: &str) -> MediaResult<RemoteFile> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_builder() {
                MediaError::Validation("Invalid download URL".to_string())
            } else {
                MediaError::UpstreamUnavailable(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::FileFetch {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let content_length = response.content_length();

        tracing::info!(url, content_type = %content_type, content_length = ?content_length, "Streaming remote file");

        Ok(RemoteFile {
            content_type,
            content_length,
            response,
        })
    }
}

impl RemoteFile {
    /// Body chunks as they arrive; a mid-stream failure ends the stream
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, reqwest::Error>> + Send {
        let url = self.response.url().to_string();
        self.response.bytes_stream().inspect_err(move |e| {
            tracing::warn!(url = %url, error = %e, "File stream interrupted");
        })
    }
}
