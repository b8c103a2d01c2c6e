//! Environment Settings
//!
//! Builds the media and solver configs from environment variables. Unset
//! variables fall back to the library defaults; malformed or zero-valued
//! ones are startup errors.

use anyhow::Context;
use media::MediaConfig;
use pow::SolverConfig;
use std::env;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::num::{NonZeroU32, NonZeroU64};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 3000));

/// Everything `main` needs to start serving
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub media: MediaConfig,
    pub solver: SolverConfig,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// `lookup` returns the raw value of a variable, `None` when unset
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let development = lookup("APP_ENV").is_some_and(|v| v.eq_ignore_ascii_case("development"));

        let mut media = if development {
            MediaConfig::development()
        } else {
            MediaConfig::default()
        };

        if let Some(v) = lookup("CONVERTER_BASE_URL") {
            media.converter_base_url = v;
        }
        if let Some(v) = lookup("CONVERTER_CHALLENGE_PATH") {
            media.challenge_path = v;
        }
        if let Some(v) = lookup("CONVERTER_VERIFY_PATH") {
            media.verify_path = v;
        }
        if let Some(v) = lookup("CONVERTER_STATUS_PATH") {
            media.status_path = v;
        }
        if let Some(v) = lookup("METADATA_BASE_URL") {
            media.metadata_base_url = v;
        }
        if let Some(v) = lookup("SEARCH_BASE_URL") {
            media.search_base_url = v;
        }
        // Poll bounds and timeouts must be non-zero
        if let Some(v) = parse::<NonZeroU32, _>(&lookup, "POLL_MAX_ATTEMPTS")? {
            media.max_attempts = v.get();
        }
        if let Some(ms) = parse::<NonZeroU64, _>(&lookup, "POLL_INTERVAL_MS")? {
            media.poll_interval = Duration::from_millis(ms.get());
        }
        if let Some(secs) = parse::<NonZeroU64, _>(&lookup, "HTTP_TIMEOUT_SECS")? {
            media.http = media.http.with_request_timeout(Duration::from_secs(secs.get()));
        }

        let solver = match parse::<u64, _>(&lookup, "POW_MAX_NONCE")? {
            Some(max_nonce) => SolverConfig::with_max_nonce(max_nonce),
            None => SolverConfig::default(),
        };

        let bind_addr =
            parse::<SocketAddr, _>(&lookup, "BIND_ADDR")?.unwrap_or(DEFAULT_BIND_ADDR);

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            frontend_origins,
            media,
            solver,
        })
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} has an invalid value: {raw:?}"))
        })
        .transpose()
}
