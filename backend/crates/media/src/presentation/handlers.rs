//! HTTP Handlers

use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::WithRejection;
use kernel::envelope::Envelope;
use kernel::error::app_error::{AppError, AppResult};
use pow::{SolveChallengeUseCase, SolverConfig};
use serde_json::Value;
use std::sync::Arc;

use crate::application::config::MediaConfig;
use crate::application::{ResolveMediaInput, ResolveMediaUseCase, SearchVideosUseCase};
use crate::domain::gateway::{ConversionService, MetadataProvider, SearchProvider};
use crate::domain::value_objects::{MediaUrl, RequestType};
use crate::error::MediaError;
use crate::infra::passthrough::HttpFileSource;
use crate::presentation::dto::{DownloadQuery, HealthResponse, ResolveRequest, SearchRequest};

const DEFAULT_FILENAME: &str = "download";

/// Shared state for media handlers
#[derive(Clone)]
pub struct MediaAppState<R>
where
    R: ConversionService + MetadataProvider + SearchProvider + Clone + Send + Sync + 'static,
{
    pub upstream: Arc<R>,
    pub files: Arc<HttpFileSource>,
    pub config: Arc<MediaConfig>,
    pub solver: Arc<SolverConfig>,
}

// ============================================================================
// Resolve
// ============================================================================

/// POST /api/yt
///
/// The pipeline runs in its own task: once started it runs to completion
/// (or its attempt bound) even if the client goes away.
pub async fn resolve<R>(
    State(state): State<MediaAppState<R>>,
    WithRejection(Json(req), _): WithRejection<Json<ResolveRequest>, AppError>,
) -> AppResult<Envelope<Value>>
where
    R: ConversionService + MetadataProvider + SearchProvider + Clone + Send + Sync + 'static,
{
    let verbose = state.config.expose_error_details;

    let url = MediaUrl::parse(req.url.as_deref()).map_err(|e| e.into_app_error(verbose))?;

    let input = ResolveMediaInput {
        url,
        request_type: RequestType::parse(req.request_type.as_deref()),
        quality: req.quality,
        api_key: req.apikey,
    };

    let use_case = ResolveMediaUseCase::new(
        state.upstream.clone(),
        state.upstream.clone(),
        SolveChallengeUseCase::new(state.solver.clone()),
        state.config.clone(),
    );

    let resolved = tokio::spawn(async move { use_case.execute(input).await })
        .await
        .map_err(|e| {
            MediaError::Internal(format!("resolve task aborted: {e}")).into_app_error(verbose)
        })?
        .map_err(|failure| failure.into_app_error(verbose))?;

    Ok(Envelope::ok(resolved.into_data()))
}

// ============================================================================
// Search
// ============================================================================

/// POST /api/search
pub async fn search<R>(
    State(state): State<MediaAppState<R>>,
    WithRejection(Json(req), _): WithRejection<Json<SearchRequest>, AppError>,
) -> AppResult<Envelope<Value>>
where
    R: ConversionService + MetadataProvider + SearchProvider + Clone + Send + Sync + 'static,
{
    let use_case = SearchVideosUseCase::new(state.upstream.clone());

    let videos = use_case
        .execute(req.query.as_deref())
        .await
        .map_err(|e| e.into_app_error(state.config.expose_error_details))?;

    let total = videos.len();
    Ok(Envelope::ok_with_total(Value::Array(videos), total))
}

// ============================================================================
// Download passthrough
// ============================================================================

/// GET /api/download
pub async fn download<R>(
    State(state): State<MediaAppState<R>>,
    WithRejection(Query(query), _): WithRejection<Query<DownloadQuery>, AppError>,
) -> AppResult<Response>
where
    R: ConversionService + MetadataProvider + SearchProvider + Clone + Send + Sync + 'static,
{
    let verbose = state.config.expose_error_details;

    let url = query
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            MediaError::Validation("Download URL is required".to_string()).into_app_error(verbose)
        })?;

    let filename = attachment_filename(query.filename.as_deref());

    let file = state
        .files
        .open(&url)
        .await
        .map_err(|e| e.into_app_error(verbose))?;

    let content_type = HeaderValue::from_str(&file.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"download\""));
    let content_length = file.content_length;

    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
        ],
        Body::from_stream(file.into_stream()),
    )
        .into_response();

    if let Some(length) = content_length {
        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }

    Ok(response)
}

/// Filename safe to embed in a quoted `Content-Disposition` parameter
fn attachment_filename(raw: Option<&str>) -> String {
    let cleaned: String = raw
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        cleaned.to_string()
    }
}

// ============================================================================
// Health / method guards
// ============================================================================

/// GET /api/health
pub async fn health() -> Envelope<HealthResponse> {
    Envelope::ok(HealthResponse { status: "ok" })
}

/// Fallback for routes that only accept POST
pub async fn post_only() -> AppError {
    AppError::method_not_allowed("Method not allowed. Use POST method.")
}

/// Fallback for routes that only accept GET
pub async fn get_only() -> AppError {
    AppError::method_not_allowed("Method not allowed. Use GET method.")
}
