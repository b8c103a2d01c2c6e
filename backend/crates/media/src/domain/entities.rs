//! Domain Entities
//!
//! Everything here is request-scoped: created while serving one request and
//! dropped with it.

use chrono::{DateTime, Utc};
use pow::Nonce;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::value_objects::{DownloadKind, MediaKind, MediaUrl};

/// Conversion job as tracked locally
///
/// The conversion service owns job identity; it recognises the job by
/// `(url, download_kind)` on every call.
#[derive(Debug, Clone)]
pub struct Job {
    pub url: MediaUrl,
    pub download_kind: DownloadKind,
    pub attempts_used: u32,
    pub started_at: DateTime<Utc>,
}

impl Job {
    pub fn new(url: MediaUrl, download_kind: DownloadKind) -> Self {
        Self {
            url,
            download_kind,
            attempts_used: 0,
            started_at: Utc::now(),
        }
    }

    pub fn record_attempt(&mut self) {
        self.attempts_used += 1;
    }

    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}

/// Status reported by the conversion service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Processing {
        progress: Option<String>,
    },
    /// Terminal. `file_url` is relative to the service base URL.
    Completed {
        file_url: Option<String>,
    },
    /// Terminal
    Failed {
        error: Option<String>,
    },
    /// Missing or unrecognised status string; polled like `Processing`
    Unknown {
        status: Option<String>,
        progress: Option<String>,
    },
}

impl JobStatus {
    /// Classify the raw fields of a status response
    pub fn classify(
        status: Option<&str>,
        progress: Option<String>,
        file_url: Option<String>,
        error: Option<String>,
    ) -> Self {
        match status {
            Some("processing") => JobStatus::Processing { progress },
            Some("completed") => JobStatus::Completed { file_url },
            Some("failed") => JobStatus::Failed { error },
            other => JobStatus::Unknown {
                status: other.map(str::to_string),
                progress,
            },
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed { .. } | JobStatus::Failed { .. })
    }
}

/// How a job was admitted by the conversion service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Caller-supplied key, attached to every status query
    PremiumKey(String),
    /// Session established by a verified proof-of-work nonce
    ProofOfWork(Nonce),
}

/// Authenticated handle used by the poller
///
/// `S` is the upstream session (for HTTP, a client with its own cookie
/// store). Never shared between requests.
#[derive(Debug)]
pub struct AuthContext<S> {
    pub session: S,
    pub admission: Admission,
}

impl<S> AuthContext<S> {
    pub fn premium(session: S, api_key: String) -> Self {
        Self {
            session,
            admission: Admission::PremiumKey(api_key),
        }
    }

    pub fn proof_of_work(session: S, nonce: Nonce) -> Self {
        Self {
            session,
            admission: Admission::ProofOfWork(nonce),
        }
    }

    /// Key to attach to status queries, if admitted by key
    pub fn api_key(&self) -> Option<&str> {
        match &self.admission {
            Admission::PremiumKey(key) => Some(key),
            Admission::ProofOfWork(_) => None,
        }
    }
}

/// Opaque metadata object from the metadata provider
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    /// Objects are kept as-is; any other JSON value is stored under `value`
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                Self(map)
            }
        }
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Download section of a resolved result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadInfo {
    pub status: bool,
    pub url: String,
    pub message: String,
    pub kind: MediaKind,
}

impl DownloadInfo {
    pub fn ready(url: String, kind: MediaKind) -> Self {
        Self {
            status: true,
            url,
            message: "Download ready".to_string(),
            kind,
        }
    }
}

/// Metadata, plus the artifact when a download was requested
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedResult {
    pub metadata: Metadata,
    pub download: Option<DownloadInfo>,
}

impl ResolvedResult {
    pub fn metadata_only(metadata: Metadata) -> Self {
        Self {
            metadata,
            download: None,
        }
    }

    pub fn with_download(metadata: Metadata, download: DownloadInfo) -> Self {
        Self {
            metadata,
            download: Some(download),
        }
    }

    /// Flat payload: metadata fields with `download` set on top
    pub fn into_data(self) -> Value {
        let mut map = self.metadata.0;
        if let Some(download) = self.download {
            let download = serde_json::to_value(download).unwrap_or(Value::Null);
            map.insert("download".to_string(), download);
        }
        Value::Object(map)
    }
}
