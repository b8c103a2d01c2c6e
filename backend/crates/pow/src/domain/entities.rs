//! Domain Entities

use crate::domain::value_objects::{Difficulty, Nonce};

/// Challenge issued by the conversion service
///
/// Consumed by exactly one solve; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub challenge: String,
    pub difficulty: Difficulty,
}

impl Challenge {
    pub fn new(challenge: impl Into<String>, difficulty: u32) -> Self {
        Self {
            challenge: challenge.into(),
            difficulty: Difficulty::new(difficulty),
        }
    }
}

/// Result of a successful search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    pub nonce: Nonce,
    /// Number of hashes computed, including the winning one
    pub hashes: u64,
}
