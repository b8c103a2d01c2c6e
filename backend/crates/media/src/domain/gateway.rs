//! Gateway Traits
//!
//! Interfaces to the upstream services. Implementations are in the
//! infrastructure layer.

use pow::{Challenge, Nonce};
use serde_json::Value;

use crate::domain::entities::{AuthContext, Job, JobStatus, Metadata};
use crate::domain::value_objects::MediaUrl;
use crate::error::MediaResult;

/// Remote conversion service
///
/// Challenge, verify and status calls for one job must go through the same
/// session so the service can correlate them.
#[trait_variant::make(ConversionService: Send)]
pub trait LocalConversionService {
    /// Per-request session state
    type Session: Send + Sync;

    /// Open a fresh session (no network traffic)
    fn open_session(&self) -> MediaResult<Self::Session>;

    /// Ask for a PoW challenge admitting `job`
    async fn request_challenge(&self, session: &Self::Session, job: &Job) -> MediaResult<Challenge>;

    /// Submit the solved nonce to validate the session
    async fn verify_session(&self, session: &Self::Session, job: &Job, nonce: Nonce)
    -> MediaResult<()>;

    /// Query the job status once
    async fn query_status(
        &self,
        auth: &AuthContext<Self::Session>,
        job: &Job,
    ) -> MediaResult<JobStatus>;
}

/// Metadata scraper
#[trait_variant::make(MetadataProvider: Send)]
pub trait LocalMetadataProvider {
    async fn fetch_metadata(&self, url: &MediaUrl) -> MediaResult<Metadata>;
}

/// Video search backend
#[trait_variant::make(SearchProvider: Send)]
pub trait LocalSearchProvider {
    /// Raw result items, in provider order
    async fn search_videos(&self, query: &str) -> MediaResult<Vec<Value>>;
}
