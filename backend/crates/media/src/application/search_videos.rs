//! Search Videos Use Case

use serde_json::Value;
use std::sync::Arc;

use crate::domain::gateway::SearchProvider;
use crate::error::{MediaError, MediaResult};

/// Search Videos Use Case
pub struct SearchVideosUseCase<S>
where
    S: SearchProvider,
{
    provider: Arc<S>,
}

impl<S> SearchVideosUseCase<S>
where
    S: SearchProvider,
{
    pub fn new(provider: Arc<S>) -> Self {
        Self { provider }
    }

    /// Only items whose `type` is `video` are kept (no playlists or channels)
    pub async fn execute(&self, query: Option<&str>) -> MediaResult<Vec<Value>> {
        let query = query.map(str::trim).unwrap_or_default();
        if query.is_empty() {
            return Err(MediaError::Validation("Search query is required".to_string()));
        }

        tracing::info!(query, "Searching videos");

        let items = self
            .provider
            .search_videos(query)
            .await
            .map_err(|e| match e {
                MediaError::SearchFailed(_) => e,
                other => MediaError::SearchFailed(other.to_string()),
            })?;

        let videos: Vec<Value> = items
            .into_iter()
            .filter(|item| item.get("type").and_then(Value::as_str) == Some("video"))
            .collect();

        tracing::debug!(query, total = videos.len(), "Search finished");

        Ok(videos)
    }
}
