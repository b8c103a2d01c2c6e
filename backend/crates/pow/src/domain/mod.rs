//! Domain Layer - Challenge model and hashing rules
//!
//! This layer contains:
//! - Domain entities (Challenge, Solution)
//! - Domain value objects (Difficulty, Nonce)
//! - Domain services (hashing, verification, nonce search)

pub mod entities;
pub mod services;
pub mod value_objects;
