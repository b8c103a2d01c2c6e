//! PoW (Proof of Work) Solver Module
//!
//! Client side of the conversion service's admission challenge.
//!
//! Layered structure:
//! - `domain/` - Challenge entities, value objects, hashing rules
//! - `application/` - Solver configuration and the solve use case
//!
//! ## Verifier Contract
//! The remote verifier accepts a nonce `n` when the lowercase hex SHA-256 of
//! the UTF-8 bytes of `challenge` immediately followed by the decimal digits
//! of `n` starts with `difficulty` `'0'` characters. Nothing here can detect
//! a drift in that rule: a mismatch shows up only as a rejected handshake.

pub mod application;
pub mod domain;
pub mod error;

// Re-exports for convenience
pub use application::config::SolverConfig;
pub use application::solve_challenge::SolveChallengeUseCase;
pub use domain::entities::{Challenge, Solution};
pub use domain::value_objects::{Difficulty, Nonce};
pub use error::{PowError, PowResult};
