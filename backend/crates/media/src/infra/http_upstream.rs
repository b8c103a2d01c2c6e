//! HTTP Upstream Implementations
//!
//! One adapter for the three upstreams: the conversion service, the oEmbed
//! metadata endpoint and the Invidious search API.

use platform::http::{HttpClientConfig, build_session_client};
use pow::{Challenge, Nonce};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::application::config::MediaConfig;
use crate::domain::entities::{AuthContext, Job, JobStatus, Metadata};
use crate::domain::gateway::{ConversionService, MetadataProvider, SearchProvider};
use crate::domain::value_objects::MediaUrl;
use crate::error::{MediaError, MediaResult};

/// HTTP-backed upstream adapter
///
/// `client` is stateless and shared; conversion sessions get their own
/// cookie-carrying client from [`ConversionService::open_session`].
#[derive(Clone)]
pub struct HttpUpstream {
    client: Client,
    config: Arc<MediaConfig>,
}

impl HttpUpstream {
    pub fn new(client: Client, config: Arc<MediaConfig>) -> Self {
        Self { client, config }
    }

    fn session_config(&self) -> &HttpClientConfig {
        &self.config.http
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct JobRequest<'a> {
    url: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    nonce: Option<String>,
}

impl<'a> JobRequest<'a> {
    fn new(job: &'a Job) -> Self {
        Self {
            url: job.url.as_str(),
            kind: job.download_kind.as_str(),
            nonce: None,
        }
    }

    fn with_nonce(mut self, nonce: Nonce) -> Self {
        self.nonce = Some(nonce.to_string());
        self
    }
}

#[derive(Debug, Deserialize)]
struct ChallengeResponse {
    challenge: String,
    difficulty: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    status: Option<String>,
    #[serde(default)]
    progress: Option<Value>,
    #[serde(default)]
    file_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl StatusResponse {
    fn into_status(self) -> JobStatus {
        let progress = self.progress.and_then(|p| match p {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        });
        JobStatus::classify(self.status.as_deref(), progress, self.file_url, self.error)
    }
}

/// Body of a failed response: JSON when it parses, otherwise the raw text
async fn remote_payload(response: Response) -> Option<Value> {
    let text = response.text().await.ok()?;
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

// ============================================================================
// Conversion service
// ============================================================================

impl ConversionService for HttpUpstream {
    type Session = Client;

    fn open_session(&self) -> MediaResult<Client> {
        build_session_client(self.session_config()).map_err(|e| MediaError::Internal(e.to_string()))
    }

    async fn request_challenge(&self, session: &Client, job: &Job) -> MediaResult<Challenge> {
        let response = session
            .post(self.config.challenge_url())
            .json(&JobRequest::new(job))
            .send()
            .await
            .map_err(|e| MediaError::authentication(format!("challenge request failed: {e}"), None))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::authentication(
                format!("challenge request rejected with status {status}"),
                remote_payload(response).await,
            ));
        }

        let body: ChallengeResponse = response
            .json()
            .await
            .map_err(|e| MediaError::authentication(format!("malformed challenge: {e}"), None))?;

        Ok(Challenge::new(body.challenge, body.difficulty))
    }

    async fn verify_session(&self, session: &Client, job: &Job, nonce: Nonce) -> MediaResult<()> {
        let response = session
            .post(self.config.verify_url())
            .json(&JobRequest::new(job).with_nonce(nonce))
            .send()
            .await
            .map_err(|e| MediaError::authentication(format!("verify request failed: {e}"), None))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::authentication(
                format!("verify rejected with status {status}"),
                remote_payload(response).await,
            ));
        }

        Ok(())
    }

    async fn query_status(&self, auth: &AuthContext<Client>, job: &Job) -> MediaResult<JobStatus> {
        let mut query = vec![
            ("url", job.url.as_str()),
            ("type", job.download_kind.as_str()),
        ];
        if let Some(api_key) = auth.api_key() {
            query.push(("apikey", api_key));
        }

        let response = auth
            .session
            .get(self.config.status_url())
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
            .query(&query)
            .send()
            .await
            .map_err(|e| MediaError::UpstreamUnavailable(e.to_string()))?;

        let http_status = response.status();
        if !http_status.is_success() {
            let remote = remote_payload(response).await;
            if matches!(http_status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
                return Err(MediaError::authentication(
                    format!("status query rejected with status {http_status}"),
                    remote,
                ));
            }
            // Any other refusal is a terminal job failure
            let error = remote
                .as_ref()
                .and_then(|body| body.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("status endpoint answered {http_status}"));
            return Ok(JobStatus::Failed { error: Some(error) });
        }

        let body: StatusResponse = response
            .json()
            .await
            .map_err(|e| MediaError::UpstreamUnavailable(format!("unreadable status response: {e}")))?;

        Ok(body.into_status())
    }
}

// ============================================================================
// Metadata (oEmbed)
// ============================================================================

impl MetadataProvider for HttpUpstream {
    async fn fetch_metadata(&self, url: &MediaUrl) -> MediaResult<Metadata> {
        let endpoint = format!(
            "{}/oembed",
            self.config.metadata_base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .get(endpoint)
            .query(&[("url", url.with_scheme().as_str()), ("format", "json")])
            .send()
            .await
            .map_err(|e| MediaError::MetadataUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::MetadataUnavailable(format!(
                "metadata provider answered {status}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| MediaError::MetadataUnavailable(e.to_string()))?;

        let mut metadata = Metadata::from_value(body);
        metadata.insert("url", json!(url.as_str()));
        if let Some(video_id) = url.video_id() {
            metadata.insert("videoId", json!(video_id));
        }

        tracing::debug!(url = %url, "Fetched metadata");

        Ok(metadata)
    }
}

// ============================================================================
// Search (Invidious)
// ============================================================================

impl SearchProvider for HttpUpstream {
    async fn search_videos(&self, query: &str) -> MediaResult<Vec<Value>> {
        let endpoint = format!(
            "{}/api/v1/search",
            self.config.search_base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .get(endpoint)
            .query(&[("q", query), ("type", "video")])
            .send()
            .await
            .map_err(|e| MediaError::SearchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::SearchFailed(format!(
                "search provider answered {status}"
            )));
        }

        match response.json::<Value>().await {
            Ok(Value::Array(items)) => Ok(items),
            Ok(_) => Err(MediaError::SearchFailed(
                "search provider did not return a list".to_string(),
            )),
            Err(e) => Err(MediaError::SearchFailed(e.to_string())),
        }
    }
}
