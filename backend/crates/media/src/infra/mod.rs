//! Infrastructure Layer - Upstream HTTP adapters

pub mod http_upstream;
pub mod passthrough;
