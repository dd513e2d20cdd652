//! Wire format for a Cached Answer Entry.
//!
//! Design Note: cache entries use a documented length-prefixed
//! binary layout rather than a language-specific serializer, so they
//! survive reimplementation. All numerics are little-endian; strings and
//! string lists are length-prefixed; the trailing embedding vector reuses
//! [`crate::embedding::encode_vector`]'s own length-prefixed `f32` layout.

use crate::answer_cache::error::AnswerCacheError;
use crate::embedding::{decode_vector, encode_vector};

/// A cached evaluation plus the query embedding and user-submitted text it
/// was produced from.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedAnswerEntry {
    pub score: f64,
    pub completeness: f64,
    pub relevance: f64,
    pub accuracy: f64,
    pub explanation: String,
    pub keyword_matches: Vec<String>,
    pub model_answer: String,
    pub user_answer_text: String,
    pub embedding: Vec<f32>,
}

fn write_string(buf: &mut Vec<u8>, value: &str) {
    let bytes = value.as_bytes();
    buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    buf.extend_from_slice(bytes);
}

fn write_string_list(buf: &mut Vec<u8>, values: &[String]) {
    buf.extend_from_slice(&(values.len() as u32).to_le_bytes());
    for value in values {
        write_string(buf, value);
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn read_f64(&mut self) -> Result<f64, AnswerCacheError> {
        let slice = self.take(8)?;
        Ok(f64::from_le_bytes(slice.try_into().unwrap()))
    }

    fn read_u32(&mut self) -> Result<u32, AnswerCacheError> {
        let slice = self.take(4)?;
        Ok(u32::from_le_bytes(slice.try_into().unwrap()))
    }

    fn read_string(&mut self) -> Result<String, AnswerCacheError> {
        let len = self.read_u32()? as usize;
        let slice = self.take(len)?;
        String::from_utf8(slice.to_vec()).map_err(|e| AnswerCacheError::Decode(e.to_string()))
    }

    fn read_string_list(&mut self) -> Result<Vec<String>, AnswerCacheError> {
        let count = self.read_u32()? as usize;
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.read_string()?);
        }
        Ok(out)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], AnswerCacheError> {
        if self.pos + len > self.bytes.len() {
            return Err(AnswerCacheError::Decode(
                "buffer truncated before expected field".to_string(),
            ));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

/// Encodes a [`CachedAnswerEntry`] into the stable wire format.
pub fn encode_entry(entry: &CachedAnswerEntry) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&entry.score.to_le_bytes());
    buf.extend_from_slice(&entry.completeness.to_le_bytes());
    buf.extend_from_slice(&entry.relevance.to_le_bytes());
    buf.extend_from_slice(&entry.accuracy.to_le_bytes());
    write_string(&mut buf, &entry.explanation);
    write_string_list(&mut buf, &entry.keyword_matches);
    write_string(&mut buf, &entry.model_answer);
    write_string(&mut buf, &entry.user_answer_text);
    buf.extend_from_slice(&encode_vector(&entry.embedding));
    buf
}

/// Decodes a buffer produced by [`encode_entry`].
pub fn decode_entry(bytes: &[u8]) -> Result<CachedAnswerEntry, AnswerCacheError> {
    let mut reader = Reader::new(bytes);
    let score = reader.read_f64()?;
    let completeness = reader.read_f64()?;
    let relevance = reader.read_f64()?;
    let accuracy = reader.read_f64()?;
    let explanation = reader.read_string()?;
    let keyword_matches = reader.read_string_list()?;
    let model_answer = reader.read_string()?;
    let user_answer_text = reader.read_string()?;
    let embedding = decode_vector(reader.remaining())
        .map_err(|e| AnswerCacheError::Decode(e.to_string()))?;

    Ok(CachedAnswerEntry {
        score,
        completeness,
        relevance,
        accuracy,
        explanation,
        keyword_matches,
        model_answer,
        user_answer_text,
        embedding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> CachedAnswerEntry {
        CachedAnswerEntry {
            score: 0.72,
            completeness: 0.7,
            relevance: 0.8,
            accuracy: 0.7,
            explanation: "Solid".to_string(),
            keyword_matches: vec!["paris".to_string(), "capital".to_string()],
            model_answer: "Paris".to_string(),
            user_answer_text: "paris".to_string(),
            embedding: vec![0.1, 0.2, 0.3, 0.4],
        }
    }

    #[test]
    fn roundtrips_through_encode_decode() {
        let entry = sample_entry();
        let encoded = encode_entry(&entry);
        let decoded = decode_entry(&encoded).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn roundtrips_empty_keyword_list_and_embedding() {
        let mut entry = sample_entry();
        entry.keyword_matches.clear();
        entry.embedding.clear();
        let encoded = encode_entry(&entry);
        let decoded = decode_entry(&encoded).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn rejects_truncated_buffer() {
        let entry = sample_entry();
        let mut encoded = encode_entry(&entry);
        encoded.truncate(encoded.len() - 3);
        assert!(decode_entry(&encoded).is_err());
    }
}
