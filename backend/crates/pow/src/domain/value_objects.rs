//! Domain Value Objects
//!
//! Immutable value types for the PoW domain.

use std::fmt;

/// Required number of leading `'0'` characters in the hex digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Difficulty(u32);

impl Difficulty {
    /// A SHA-256 hex digest has 64 characters; anything above is unreachable.
    pub const MAX_REACHABLE: u32 = 64;

    pub const fn new(zeros: u32) -> Self {
        Self(zeros)
    }

    pub const fn zeros(&self) -> u32 {
        self.0
    }

    pub const fn is_reachable(&self) -> bool {
        self.0 <= Self::MAX_REACHABLE
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Nonce found by the search
///
/// Sent to the verifier as its decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonce(u64);

impl Nonce {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
