//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod settings;

use axum::{
    Router, http,
    http::{Method, header},
};
use media::{HttpFileSource, HttpUpstream, media_router};
use platform::http::{build_client, build_streaming_client};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use settings::Settings;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "media_api=info,media=info,pow=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    tracing::info!(
        converter = %settings.media.converter_base_url,
        max_attempts = settings.media.max_attempts,
        poll_interval_ms = settings.media.poll_interval.as_millis() as u64,
        pow_max_nonce = settings.solver.max_nonce,
        "Loaded configuration"
    );

    // Shared stateless client; conversion sessions build their own
    let client = build_client(&settings.media.http)?;
    let upstream = HttpUpstream::new(client, Arc::new(settings.media.clone()));
    let files = HttpFileSource::new(build_streaming_client(&settings.media.http)?);

    let cors = cors_layer(&settings.frontend_origins);

    // Build router
    let app = Router::new()
        .nest(
            "/api",
            media_router(upstream, files, settings.media, settings.solver),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", settings.bind_addr);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Credentials are only allowed together with an explicit origin list
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]));

    if origins.is_empty() {
        tracing::warn!("FRONTEND_ORIGINS not set, allowing any origin without credentials");
        return cors.allow_origin(Any);
    }

    let allowed_origins: Vec<http::HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    cors.allow_origin(allowed_origins).allow_credentials(true)
}
