//! Media Router

use axum::{
    Router,
    routing::{get, post},
};
use pow::SolverConfig;
use std::sync::Arc;

use crate::application::config::MediaConfig;
use crate::domain::gateway::{ConversionService, MetadataProvider, SearchProvider};
use crate::infra::http_upstream::HttpUpstream;
use crate::infra::passthrough::HttpFileSource;
use crate::presentation::handlers::{self, MediaAppState};

/// Create the media router backed by the HTTP upstreams
pub fn media_router(
    upstream: HttpUpstream,
    files: HttpFileSource,
    config: MediaConfig,
    solver: SolverConfig,
) -> Router {
    media_router_generic(upstream, files, config, solver)
}

/// Create a generic media router for any upstream implementation
pub fn media_router_generic<R>(
    upstream: R,
    files: HttpFileSource,
    config: MediaConfig,
    solver: SolverConfig,
) -> Router
where
    R: ConversionService + MetadataProvider + SearchProvider + Clone + Send + Sync + 'static,
{
    let state = MediaAppState {
        upstream: Arc::new(upstream),
        files: Arc::new(files),
        config: Arc::new(config),
        solver: Arc::new(solver),
    };

    Router::new()
        .route("/yt", post(handlers::resolve::<R>).fallback(handlers::post_only))
        .route("/search", post(handlers::search::<R>).fallback(handlers::post_only))
        .route("/download", get(handlers::download::<R>).fallback(handlers::get_only))
        .route("/health", get(handlers::health).fallback(handlers::get_only))
        .with_state(state)
}
