//! API DTOs (Data Transfer Objects)
//!
//! Every field is optional so that a missing value reaches validation and
//! gets its own error message instead of a generic body rejection.

use serde::{Deserialize, Serialize};

// ============================================================================
// Resolve
// ============================================================================

/// Resolve request (`POST /yt`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveRequest {
    pub url: Option<String>,
    pub quality: Option<String>,
    /// `metadata`, `audio`/`mp3`, anything else means video
    #[serde(rename = "type")]
    pub request_type: Option<String>,
    /// Premium key; skips the proof-of-work handshake
    pub apikey: Option<String>,
}

// ============================================================================
// Search
// ============================================================================

/// Search request (`POST /search`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub query: Option<String>,
}

// ============================================================================
// Download passthrough
// ============================================================================

/// Download query (`GET /download?url=&filename=`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadQuery {
    pub url: Option<String>,
    pub filename: Option<String>,
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
