//! Media Error Types
//!
//! This module provides media-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use pow::PowError;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::entities::Metadata;

/// Media-specific result type alias
pub type MediaResult<T> = Result<T, MediaError>;

/// Headline used for every failure after metadata was fetched
pub const DOWNLOAD_FAILED_HEADLINE: &str = "Failed to download video/audio";

/// Media-specific error variants
#[derive(Debug, Error)]
pub enum MediaError {
    /// Bad or missing input, rejected before any network call
    #[error("{0}")]
    Validation(String),

    /// The metadata provider failed; no download is attempted
    #[error("{0}")]
    MetadataUnavailable(String),

    /// Challenge or verify step of the handshake failed
    #[error("Authentication with conversion service failed: {message}")]
    AuthenticationFailed {
        message: String,
        /// Error payload returned by the remote, if any
        remote: Option<Value>,
    },

    /// The PoW challenge could not be solved (authentication failure subtype)
    #[error("Authentication with conversion service failed: {0}")]
    Pow(#[from] PowError),

    /// The conversion service reported the job as failed
    #[error("{0}")]
    DownloadFailed(String),

    /// No terminal status within the attempt bound
    #[error("Download timeout - exceeded maximum attempts ({attempts})")]
    Timeout { attempts: u32 },

    /// Transport failure talking to the conversion service
    #[error("Conversion service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The search provider failed
    #[error("{0}")]
    SearchFailed(String),

    /// The passthrough origin answered with a non-success status
    #[error("Failed to fetch file: {reason}")]
    FileFetch { status: u16, reason: String },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediaError {
    pub fn authentication(message: impl Into<String>, remote: Option<Value>) -> Self {
        MediaError::AuthenticationFailed {
            message: message.into(),
            remote,
        }
    }

    /// `AuthenticationFailed` or one of its subtypes
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            MediaError::AuthenticationFailed { .. } | MediaError::Pow(_)
        )
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MediaError::Validation(_) => ErrorKind::BadRequest,
            MediaError::MetadataUnavailable(_)
            | MediaError::AuthenticationFailed { .. }
            | MediaError::DownloadFailed(_)
            | MediaError::SearchFailed(_) => ErrorKind::BadGateway,
            MediaError::Pow(e) => match e {
                PowError::ExhaustedSearch { .. } => ErrorKind::BadGateway,
                PowError::Internal(_) => ErrorKind::InternalServerError,
            },
            MediaError::Timeout { .. } => ErrorKind::GatewayTimeout,
            MediaError::UpstreamUnavailable(_) => ErrorKind::ServiceUnavailable,
            MediaError::FileFetch { status, .. } => {
                ErrorKind::from_status_code(*status).unwrap_or(ErrorKind::BadGateway)
            }
            MediaError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Short headline rendered as the envelope's `error` field
    pub fn headline(&self) -> String {
        match self {
            MediaError::Validation(msg) => msg.clone(),
            MediaError::MetadataUnavailable(_) => "Failed to fetch video metadata".to_string(),
            MediaError::AuthenticationFailed { .. }
            | MediaError::Pow(_)
            | MediaError::DownloadFailed(_)
            | MediaError::Timeout { .. }
            | MediaError::UpstreamUnavailable(_) => DOWNLOAD_FAILED_HEADLINE.to_string(),
            MediaError::SearchFailed(_) => "Failed to search YouTube".to_string(),
            MediaError::FileFetch { .. } => self.to_string(),
            MediaError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            MediaError::Validation(msg) => {
                tracing::debug!(message = %msg, "Rejected media request");
            }
            MediaError::Pow(e) => e.log(),
            MediaError::AuthenticationFailed { message, remote } => {
                tracing::warn!(message = %message, remote = ?remote, "Conversion service handshake failed");
            }
            MediaError::Timeout { attempts } => {
                tracing::warn!(attempts, "Conversion job timed out");
            }
            MediaError::Internal(msg) => {
                tracing::error!(message = %msg, "Media internal error");
            }
            _ => {
                tracing::warn!(error = %self, "Media request failed");
            }
        }
    }

    /// Convert to AppError
    ///
    /// `verbose` adds the debug rendering under `details.debug`; only enable
    /// it in development.
    pub fn into_app_error(self, verbose: bool) -> AppError {
        self.log();
        let kind = self.kind();
        let headline = self.headline();
        let detail = self.to_string();

        let mut err = AppError::new(kind, headline);
        if !matches!(self, MediaError::Validation(_) | MediaError::FileFetch { .. }) {
            err = err.with_detail(detail);
        }
        if let MediaError::AuthenticationFailed {
            remote: Some(remote),
            ..
        } = &self
        {
            err = err.with_details_entry("remote", remote.clone());
        }
        if verbose {
            err = err.with_details_entry("debug", json!(format!("{self:?}")));
        }
        err.with_source(self)
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        err.into_app_error(false)
    }
}

/// A failed resolve, keeping the metadata fetched before the failure
#[derive(Debug)]
pub struct ResolveFailure {
    pub error: MediaError,
    pub metadata: Option<Metadata>,
}

impl ResolveFailure {
    pub fn without_metadata(error: MediaError) -> Self {
        Self {
            error,
            metadata: None,
        }
    }

    pub fn with_metadata(error: MediaError, metadata: Metadata) -> Self {
        Self {
            error,
            metadata: Some(metadata),
        }
    }

    pub fn into_app_error(self, verbose: bool) -> AppError {
        let err = self.error.into_app_error(verbose);
        match self.metadata {
            Some(metadata) => err.with_details_entry("metadata", metadata.into_value()),
            None => err,
        }
    }
}

impl From<MediaError> for ResolveFailure {
    fn from(error: MediaError) -> Self {
        Self::without_metadata(error)
    }
}
