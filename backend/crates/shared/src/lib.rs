//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the vocabulary every other crate agrees on:
//! - The unified error type and its classification
//! - The JSON envelope returned by every non-streaming endpoint
//!
//! Only things with the same meaning across all modules belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod envelope;
