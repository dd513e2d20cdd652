//! Content hashing used to build cache keys and coalescer keys.
//!
//! `sha256` is the hash used for the embedding cache key and the coalescer
//! key for `checkAnswer`; [`hash_sha256_hex`] is the single place that
//! decision lives.

use sha2::{Digest, Sha256};

/// Returns the lowercase hex-encoded SHA-256 digest of `text`.
#[inline]
pub fn hash_sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// The "answer fingerprint" from the glossary: the trimmed, lowercased
/// user-answer string used as a hash-map field within a per-quiz cache entry.
#[inline]
pub fn answer_fingerprint(raw_answer: &str) -> String {
    raw_answer.trim().to_lowercase()
}
