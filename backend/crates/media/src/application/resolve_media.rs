//! Resolve Media Use Case
//!
//! Metadata first, then (for audio/video) authenticate and poll the
//! conversion job.

use pow::SolveChallengeUseCase;
use std::sync::Arc;

use crate::application::authenticate::AuthenticateUseCase;
use crate::application::config::MediaConfig;
use crate::application::poll_job::PollJobUseCase;
use crate::domain::entities::{DownloadInfo, Job, ResolvedResult};
use crate::domain::gateway::{ConversionService, MetadataProvider};
use crate::domain::value_objects::{MediaUrl, RequestType};
use crate::error::{MediaError, ResolveFailure};

/// Input for resolve
#[derive(Debug, Clone)]
pub struct ResolveMediaInput {
    pub url: MediaUrl,
    pub request_type: RequestType,
    /// Accepted and logged; the conversion service picks the quality
    pub quality: Option<String>,
    pub api_key: Option<String>,
}

/// Resolve Media Use Case
pub struct ResolveMediaUseCase<C, M>
where
    C: ConversionService,
    M: MetadataProvider,
{
    metadata: Arc<M>,
    authenticate: AuthenticateUseCase<C>,
    poll: PollJobUseCase<C>,
}

impl<C, M> ResolveMediaUseCase<C, M>
where
    C: ConversionService,
    M: MetadataProvider,
{
    pub fn new(
        service: Arc<C>,
        metadata: Arc<M>,
        solver: SolveChallengeUseCase,
        config: Arc<MediaConfig>,
    ) -> Self {
        Self {
            metadata,
            authenticate: AuthenticateUseCase::new(service.clone(), solver),
            poll: PollJobUseCase::new(service, config),
        }
    }

    pub async fn execute(&self, input: ResolveMediaInput) -> Result<ResolvedResult, ResolveFailure> {
        tracing::info!(
            url = %input.url,
            request_type = ?input.request_type,
            quality = input.quality.as_deref().unwrap_or("default"),
            premium = input.api_key.as_deref().is_some_and(|k| !k.is_empty()),
            "Resolving media"
        );

        let metadata = self
            .metadata
            .fetch_metadata(&input.url)
            .await
            .map_err(|e| match e {
                MediaError::MetadataUnavailable(_) => e,
                other => MediaError::MetadataUnavailable(other.to_string()),
            })?;

        let Some(download_kind) = input.request_type.download_kind() else {
            return Ok(ResolvedResult::metadata_only(metadata));
        };

        let mut job = Job::new(input.url, download_kind);

        let outcome = async {
            let auth = self.authenticate.execute(&job, input.api_key).await?;
            self.poll.execute(&mut job, &auth).await
        }
        .await;

        match outcome {
            Ok(url) => Ok(ResolvedResult::with_download(
                metadata,
                DownloadInfo::ready(url, download_kind.media_kind()),
            )),
            Err(error) => {
                tracing::warn!(
                    url = %job.url,
                    kind = %job.download_kind,
                    attempts = job.attempts_used,
                    error = %error,
                    "Media resolve failed after metadata"
                );
                Err(ResolveFailure::with_metadata(error, metadata))
            }
        }
    }
}
