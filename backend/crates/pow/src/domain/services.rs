//! Domain Services
//!
//! Pure hashing rules shared by the solver and its tests.

use std::fmt::Write;

use platform::crypto::has_leading_zero_nibbles;
use sha2::{Digest, Sha256};

use crate::domain::entities::Solution;
use crate::domain::value_objects::{Difficulty, Nonce};

/// SHA-256 of the challenge followed by the decimal nonce
pub fn compute_pow_hash(challenge: &str, nonce: Nonce) -> [u8; 32] {
    Sha256Prefix::new(challenge).hash_with(&nonce.to_string())
}

/// Whether `hash` satisfies `difficulty`
pub fn meets_difficulty(hash: &[u8; 32], difficulty: Difficulty) -> bool {
    has_leading_zero_nibbles(hash, difficulty.zeros() as usize)
}

/// Verify a PoW solution the way the remote verifier does
pub fn verify_pow(challenge: &str, nonce: Nonce, difficulty: Difficulty) -> bool {
    meets_difficulty(&compute_pow_hash(challenge, nonce), difficulty)
}

/// Linear scan for the smallest nonce in `0..=max_nonce`.
///
/// Returns `None` when the range is exhausted or the difficulty is
/// unreachable. CPU-bound: call from a blocking context.
pub fn search_nonce(challenge: &str, difficulty: Difficulty, max_nonce: u64) -> Option<Solution> {
    if !difficulty.is_reachable() {
        return None;
    }

    let prefix = Sha256Prefix::new(challenge);
    let mut digits = String::with_capacity(20);

    for n in 0..=max_nonce {
        digits.clear();
        write!(digits, "{n}").expect("writing to a String never fails");
        let hash = prefix.hash_with(&digits);
        if meets_difficulty(&hash, difficulty) {
            return Some(Solution {
                nonce: Nonce::new(n),
                hashes: n + 1,
            });
        }
    }

    None
}

/// Hasher pre-seeded with the challenge bytes so each attempt only hashes
/// the nonce digits.
#[derive(Clone)]
struct Sha256Prefix(Sha256);

impl Sha256Prefix {
    fn new(challenge: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(challenge.as_bytes());
        Self(hasher)
    }

    fn hash_with(&self, suffix: &str) -> [u8; 32] {
        let mut hasher = self.0.clone();
        hasher.update(suffix.as_bytes());
        hasher.finalize().into()
    }
}
