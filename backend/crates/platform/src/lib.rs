//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Hashing utilities (SHA-256, hex digests, leading-zero checks)
//! - HTTP client construction (shared clients and per-request cookie sessions)

pub mod crypto;
pub mod http;
