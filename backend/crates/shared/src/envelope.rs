//! Response Envelope
//!
//! Every JSON endpoint answers with the same envelope:
//! `{ "success": bool, "data"?, "total"?, "error"?, "message"?, "details"? }`.
//! Absent fields are omitted rather than serialized as `null`.

use serde::Serialize;
use serde_json::Value;

/// JSON response envelope
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T = Value> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl<T> Envelope<T> {
    /// Successful envelope carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            total: None,
            error: None,
            message: None,
            details: None,
        }
    }

    /// Successful envelope for list results
    pub fn ok_with_total(data: T, total: usize) -> Self {
        Self {
            total: Some(total),
            ..Self::ok(data)
        }
    }
}

impl Envelope<Value> {
    /// Failed envelope
    pub fn failure(error: impl Into<String>, message: Option<String>, details: Option<Value>) -> Self {
        Self {
            success: false,
            data: None,
            total: None,
            error: Some(error.into()),
            message,
            details,
        }
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for Envelope<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self).into_response()
    }
}
