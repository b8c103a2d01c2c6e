//! Solve Challenge Use Case

use crate::application::config::SolverConfig;
use crate::domain::entities::{Challenge, Solution};
use crate::domain::services::search_nonce;
use crate::error::{PowError, PowResult};
use std::sync::Arc;
use std::time::Instant;

/// Solve Challenge Use Case
///
/// Runs the nonce search on tokio's blocking pool so a long search never
/// stalls the async workers serving other requests.
#[derive(Debug, Clone)]
pub struct SolveChallengeUseCase {
    config: Arc<SolverConfig>,
}

impl SolveChallengeUseCase {
    pub fn new(config: Arc<SolverConfig>) -> Self {
        Self { config }
    }

    pub async fn execute(&self, challenge: Challenge) -> PowResult<Solution> {
        let max_nonce = self.config.max_nonce;
        let difficulty = challenge.difficulty;
        let started = Instant::now();

        let found = tokio::task::spawn_blocking(move || {
            search_nonce(&challenge.challenge, challenge.difficulty, max_nonce)
        })
        .await
        .map_err(|e| PowError::Internal(format!("solver task failed: {e}")))?;

        let solution = found.ok_or(PowError::ExhaustedSearch {
            difficulty: difficulty.zeros(),
            max_nonce,
        })?;

        tracing::info!(
            difficulty = difficulty.zeros(),
            nonce = solution.nonce.value(),
            hashes = solution.hashes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Solved PoW challenge"
        );

        Ok(solution)
    }
}
