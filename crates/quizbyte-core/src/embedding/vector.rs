//! Embedding vector wire format and similarity math.
//!
//! Design Note: "Binary blobs encoded with a language-specific
//! serializer -> replace with a documented length-prefixed wire format so
//! cache entries survive reimplementation." Vectors are encoded as a
//! little-endian `u32` length (element count) followed by that many
//! little-endian `f32` values, modeled on `reflex::vectordb::rescoring`'s own
//! length-prefixed f16 embedding encoding.

use super::error::EmbeddingError;

/// Encodes `vector` as a length-prefixed little-endian `f32` buffer.
pub fn encode_vector(vector: &[f32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + vector.len() * 4);
    buf.extend_from_slice(&(vector.len() as u32).to_le_bytes());
    for value in vector {
        buf.extend_from_slice(&value.to_le_bytes());
    }
    buf
}

/// Decodes a buffer produced by [`encode_vector`].
pub fn decode_vector(bytes: &[u8]) -> Result<Vec<f32>, EmbeddingError> {
    if bytes.len() < 4 {
        return Err(EmbeddingError::DecodeFailed(
            "buffer shorter than length prefix".to_string(),
        ));
    }
    let len = u32::from_le_bytes(bytes[0..4].try_into().unwrap()) as usize;
    let expected_len = 4 + len * 4;
    if bytes.len() != expected_len {
        return Err(EmbeddingError::DecodeFailed(format!(
            "expected {expected_len} bytes for {len} elements, got {}",
            bytes.len()
        )));
    }
    let mut out = Vec::with_capacity(len);
    for chunk in bytes[4..].chunks_exact(4) {
        out.push(f32::from_le_bytes(chunk.try_into().unwrap()));
    }
    Ok(out)
}

/// Cosine similarity between two vectors, with double-precision
/// accumulation. A zero-norm vector (on either side) compares as `0.0`
/// rather than producing `NaN`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}
