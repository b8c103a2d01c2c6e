//! Media Gateway Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Jobs, statuses, value objects, upstream gateway traits
//! - `application/` - Use cases (authenticate, poll, resolve, search)
//! - `infra/` - HTTP adapters for the upstream services
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Metadata, audio and video resolution for YouTube URLs
//! - Admission by premium key or proof-of-work handshake
//! - Bounded polling of the remote conversion job
//! - Video search and a streaming download passthrough
//!
//! ## Request Model
//! Every job, challenge and upstream session is owned by one request and
//! dropped with it. Nothing is shared between requests except the
//! stateless HTTP client and configuration.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::MediaConfig;
pub use error::{MediaError, MediaResult, ResolveFailure};
pub use infra::http_upstream::HttpUpstream;
pub use infra::passthrough::HttpFileSource;
pub use presentation::router::{media_router, media_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

#[cfg(test)]
mod tests;
