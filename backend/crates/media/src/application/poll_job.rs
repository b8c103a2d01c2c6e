//! Poll Job Use Case
//!
//! Queries the job status at a fixed interval until a terminal status, the
//! attempt bound, or the wall-clock budget.

use std::sync::Arc;
use tokio::time::{Instant, sleep};

use crate::application::config::MediaConfig;
use crate::domain::entities::{AuthContext, Job, JobStatus};
use crate::domain::gateway::ConversionService;
use crate::error::{MediaError, MediaResult};

/// Poll Job Use Case
pub struct PollJobUseCase<C>
where
    C: ConversionService,
{
    service: Arc<C>,
    config: Arc<MediaConfig>,
}

impl<C> PollJobUseCase<C>
where
    C: ConversionService,
{
    pub fn new(service: Arc<C>, config: Arc<MediaConfig>) -> Self {
        Self { service, config }
    }

    /// Returns the absolute artifact URL.
    ///
    /// A transport error on any query ends the loop immediately.
    pub async fn execute(&self, job: &mut Job, auth: &AuthContext<C::Session>) -> MediaResult<String> {
        let max_attempts = self.config.max_attempts;
        let budget = self.config.poll_budget();
        let started = Instant::now();

        while job.attempts_used < max_attempts {
            if job.attempts_used > 0 && started.elapsed() >= budget {
                tracing::warn!(
                    url = %job.url,
                    attempts = job.attempts_used,
                    budget_ms = budget.as_millis() as u64,
                    "Poll budget spent before attempt bound"
                );
                break;
            }

            job.record_attempt();
            let status = self.service.query_status(auth, job).await?;

            match status {
                JobStatus::Completed {
                    file_url: Some(file_url),
                } => {
                    let url = self.config.artifact_url(&file_url);
                    tracing::info!(
                        url = %job.url,
                        attempts = job.attempts_used,
                        elapsed_ms = job.elapsed_ms(),
                        artifact = %url,
                        "Conversion completed"
                    );
                    return Ok(url);
                }
                JobStatus::Completed { file_url: None } => {
                    return Err(MediaError::DownloadFailed(
                        "Conversion completed without a file URL".to_string(),
                    ));
                }
                JobStatus::Failed { error } => {
                    return Err(MediaError::DownloadFailed(
                        error.unwrap_or_else(|| "Conversion failed".to_string()),
                    ));
                }
                JobStatus::Processing { progress } => {
                    tracing::debug!(
                        url = %job.url,
                        attempt = job.attempts_used,
                        progress = progress.as_deref().unwrap_or("-"),
                        "Conversion in progress"
                    );
                }
                JobStatus::Unknown { status, progress } => {
                    tracing::warn!(
                        url = %job.url,
                        attempt = job.attempts_used,
                        status = status.as_deref().unwrap_or("<missing>"),
                        progress = progress.as_deref().unwrap_or("-"),
                        "Unrecognised job status, still polling"
                    );
                }
            }

            if job.attempts_used < max_attempts {
                sleep(self.config.poll_interval).await;
            }
        }

        Err(MediaError::Timeout {
            attempts: job.attempts_used,
        })
    }
}
