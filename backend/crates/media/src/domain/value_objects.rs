//! Domain Value Objects

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use crate::error::{MediaError, MediaResult};

static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+$").expect("valid regex")
});

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[?&]v=|youtu\.be/|/shorts/|/embed/|/live/)([A-Za-z0-9_-]+)").expect("valid regex")
});

/// Media URL accepted by the pipeline (host allow-list: youtube.com, youtu.be)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrl(String);

impl MediaUrl {
    /// Validate a raw URL from a request body
    pub fn parse(raw: Option<&str>) -> MediaResult<Self> {
        let url = raw.map(str::trim).unwrap_or_default();

        if url.is_empty() {
            return Err(MediaError::Validation("URL is required".to_string()));
        }

        if !YOUTUBE_URL.is_match(url) {
            return Err(MediaError::Validation("Invalid YouTube URL".to_string()));
        }

        Ok(Self(url.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL with an explicit scheme, for upstreams that require one
    pub fn with_scheme(&self) -> String {
        if self.0.starts_with("http://") || self.0.starts_with("https://") {
            self.0.clone()
        } else {
            format!("https://{}", self.0)
        }
    }

    /// Video identifier, when the URL shape carries one
    pub fn video_id(&self) -> Option<&str> {
        VIDEO_ID
            .captures(&self.0)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

impl fmt::Display for MediaUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the caller asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    Metadata,
    Audio,
    Video,
}

impl RequestType {
    /// `metadata` and `audio`/`mp3` are recognised; everything else,
    /// including a missing type, means video.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("metadata") => RequestType::Metadata,
            Some("audio") | Some("mp3") => RequestType::Audio,
            _ => RequestType::Video,
        }
    }

    /// Conversion job kind, `None` for metadata-only requests
    pub fn download_kind(&self) -> Option<DownloadKind> {
        match self {
            RequestType::Metadata => None,
            RequestType::Audio => Some(DownloadKind::Audio),
            RequestType::Video => Some(DownloadKind::Merge),
        }
    }
}

/// Job type understood by the conversion service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadKind {
    Audio,
    /// Video and audio streams merged into one file
    Merge,
}

impl DownloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadKind::Audio => "audio",
            DownloadKind::Merge => "merge",
        }
    }

    /// Kind reported back to the caller
    pub fn media_kind(&self) -> MediaKind {
        match self {
            DownloadKind::Audio => MediaKind::Audio,
            DownloadKind::Merge => MediaKind::Video,
        }
    }
}

impl fmt::Display for DownloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of the resolved artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}
