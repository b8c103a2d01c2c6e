//! Authenticate Use Case
//!
//! Admits a job with the conversion service, either by premium key or by
//! the challenge → solve → verify handshake.

use pow::SolveChallengeUseCase;
use std::sync::Arc;

use crate::domain::entities::{AuthContext, Job};
use crate::domain::gateway::ConversionService;
use crate::error::MediaResult;

/// Authenticate Use Case
pub struct AuthenticateUseCase<C>
where
    C: ConversionService,
{
    service: Arc<C>,
    solver: SolveChallengeUseCase,
}

impl<C> AuthenticateUseCase<C>
where
    C: ConversionService,
{
    pub fn new(service: Arc<C>, solver: SolveChallengeUseCase) -> Self {
        Self { service, solver }
    }

    /// An empty `api_key` counts as absent. A present key is not validated
    /// locally; a bad one surfaces as a remote rejection while polling.
    pub async fn execute(
        &self,
        job: &Job,
        api_key: Option<String>,
    ) -> MediaResult<AuthContext<C::Session>> {
        let session = self.service.open_session()?;

        if let Some(api_key) = api_key.filter(|key| !key.is_empty()) {
            tracing::info!(url = %job.url, kind = %job.download_kind, "Using premium key");
            return Ok(AuthContext::premium(session, api_key));
        }

        let challenge = self.service.request_challenge(&session, job).await?;
        tracing::debug!(
            url = %job.url,
            difficulty = challenge.difficulty.zeros(),
            "Received PoW challenge"
        );

        let solution = self.solver.execute(challenge).await?;

        self.service
            .verify_session(&session, job, solution.nonce)
            .await?;

        tracing::info!(
            url = %job.url,
            kind = %job.download_kind,
            nonce = solution.nonce.value(),
            "Conversion session verified"
        );

        Ok(AuthContext::proof_of_work(session, solution.nonce))
    }
}
