//! Cryptographic Utilities

use sha2::{Digest, Sha256};

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute SHA-256 and encode it as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Count leading `'0'` characters of the lowercase hex encoding of `hash`
/// without allocating the string.
pub fn count_leading_zero_nibbles(hash: &[u8]) -> usize {
    let mut count = 0;
    for &byte in hash {
        if byte == 0 {
            count += 2;
        } else {
            if byte >> 4 == 0 {
                count += 1;
            }
            break;
        }
    }
    count
}

/// Whether the hex encoding of `hash` starts with at least `zeros` `'0'` characters
pub fn has_leading_zero_nibbles(hash: &[u8], zeros: usize) -> bool {
    let full_bytes = zeros / 2;
    if full_bytes > hash.len() || (zeros % 2 == 1 && full_bytes >= hash.len()) {
        return false;
    }
    if hash[..full_bytes].iter().any(|&b| b != 0) {
        return false;
    }
    zeros % 2 == 0 || hash[full_bytes] >> 4 == 0
}
