//! Application Configuration
//!
//! Configuration for the PoW solver.

/// Solver configuration
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Largest nonce tried before giving up (inclusive)
    pub max_nonce: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            // ~16x the expected work for difficulty 5
            max_nonce: 16_000_000,
        }
    }
}

impl SolverConfig {
    pub fn with_max_nonce(max_nonce: u64) -> Self {
        Self { max_nonce }
    }
}
