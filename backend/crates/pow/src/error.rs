//! PoW Error Types
//!
//! Solver failures, convertible into the unified
//! `kernel::error::AppError`.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// PoW-specific result type alias
pub type PowResult<T> = Result<T, PowError>;

/// PoW-specific error variants
#[derive(Debug, Error)]
pub enum PowError {
    /// No nonce up to the configured ceiling satisfies the difficulty
    #[error("No nonce within 0..={max_nonce} satisfies difficulty {difficulty}")]
    ExhaustedSearch { difficulty: u32, max_nonce: u64 },

    /// The blocking search task died
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PowError {
    /// Get the ErrorKind for this error
    ///
    /// The challenge comes from the upstream service, so an unsolvable one
    /// is an upstream failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PowError::ExhaustedSearch { .. } => ErrorKind::BadGateway,
            PowError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            PowError::ExhaustedSearch {
                difficulty,
                max_nonce,
            } => {
                tracing::warn!(difficulty, max_nonce, "PoW search exhausted");
            }
            PowError::Internal(msg) => {
                tracing::error!(message = %msg, "PoW internal error");
            }
        }
    }
}

impl From<PowError> for AppError {
    fn from(err: PowError) -> Self {
        let kind = err.kind();
        let detail = err.to_string();
        AppError::new(kind, "Proof-of-work challenge could not be solved")
            .with_detail(detail)
            .with_source(err)
    }
}
