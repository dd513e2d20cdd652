//! Environment-backed configuration for the Evaluation Core.
//!
//! Every field here has a documented default and is overridable by an
//! environment variable, following the same `from_env`/`validate` shape
//! used throughout this crate's collaborators.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_LLM_TIMEOUT_SECS, DEFAULT_NUM_QUESTIONS_PER_SUBCATEGORY,
    DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TTL_ANSWER_EVALUATION_HOURS,
    DEFAULT_TTL_CATEGORY_LIST_HOURS, DEFAULT_TTL_EMBEDDING_HOURS, DEFAULT_TTL_LLM_RESPONSE_HOURS,
    DEFAULT_TTL_QUIZ_DETAIL_HOURS, DEFAULT_TTL_QUIZ_LIST_HOURS, clamp_similarity_threshold,
};

/// Which embedding backend to use. `Custom` lets callers register any other
/// [`crate::embedding::EmbeddingProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingSource {
    OpenAi,
    Custom(String),
}

impl Default for EmbeddingSource {
    fn default() -> Self {
        Self::OpenAi
    }
}

impl EmbeddingSource {
    fn parse(value: &str) -> Self {
        match value {
            "openai" => Self::OpenAi,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// Cache TTLs for the distinct cacheable object kinds the core writes.
#[derive(Debug, Clone, Copy)]
pub struct CacheTtlConfig {
    pub llm_response: Duration,
    pub embedding: Duration,
    pub answer_evaluation: Duration,
    pub category_list: Duration,
    pub quiz_list: Duration,
    pub quiz_detail: Duration,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            llm_response: Duration::from_secs(DEFAULT_TTL_LLM_RESPONSE_HOURS as u64 * 3600),
            embedding: Duration::from_secs(DEFAULT_TTL_EMBEDDING_HOURS as u64 * 3600),
            answer_evaluation: Duration::from_secs(
                DEFAULT_TTL_ANSWER_EVALUATION_HOURS as u64 * 3600,
            ),
            category_list: Duration::from_secs(DEFAULT_TTL_CATEGORY_LIST_HOURS as u64 * 3600),
            quiz_list: Duration::from_secs(DEFAULT_TTL_QUIZ_LIST_HOURS as u64 * 3600),
            quiz_detail: Duration::from_secs(DEFAULT_TTL_QUIZ_DETAIL_HOURS as u64 * 3600),
        }
    }
}

/// Top-level configuration for the Evaluation Core.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub embedding_source: EmbeddingSource,
    pub similarity_threshold: f64,
    pub num_questions_per_subcategory: usize,
    pub llm_timeout: Duration,
    pub cache_ttl: CacheTtlConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            embedding_source: EmbeddingSource::default(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            num_questions_per_subcategory: DEFAULT_NUM_QUESTIONS_PER_SUBCATEGORY,
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            cache_ttl: CacheTtlConfig::default(),
        }
    }
}

impl CoreConfig {
    const ENV_EMBEDDING_SOURCE: &'static str = "QUIZBYTE_EMBEDDING_SOURCE";
    const ENV_SIMILARITY_THRESHOLD: &'static str = "QUIZBYTE_SIMILARITY_THRESHOLD";
    const ENV_NUM_QUESTIONS_PER_SUBCATEGORY: &'static str =
        "QUIZBYTE_NUM_QUESTIONS_PER_SUBCATEGORY";
    const ENV_LLM_TIMEOUT_SECS: &'static str = "QUIZBYTE_LLM_TIMEOUT_SECS";

    /// Loads configuration from the environment, falling back to documented
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let embedding_source = env::var(Self::ENV_EMBEDDING_SOURCE)
            .map(|v| EmbeddingSource::parse(&v))
            .unwrap_or(defaults.embedding_source);

        let similarity_threshold = match env::var(Self::ENV_SIMILARITY_THRESHOLD) {
            Ok(value) => {
                let parsed: f64 =
                    value
                        .parse()
                        .map_err(|e| ConfigError::ParseError {
                            name: Self::ENV_SIMILARITY_THRESHOLD,
                            value: value.clone(),
                            source: e,
                        })?;
                clamp_similarity_threshold(parsed)
            }
            Err(_) => defaults.similarity_threshold,
        };

        let num_questions_per_subcategory = env::var(Self::ENV_NUM_QUESTIONS_PER_SUBCATEGORY)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.num_questions_per_subcategory);

        let llm_timeout = env::var(Self::ENV_LLM_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.llm_timeout);

        Ok(Self {
            embedding_source,
            similarity_threshold,
            num_questions_per_subcategory,
            llm_timeout,
            cache_ttl: CacheTtlConfig::default(),
        })
    }

    /// Validates invariants that cannot be expressed by the type alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::OutOfRange {
                name: "similarity_threshold",
                value: self.similarity_threshold,
            });
        }
        Ok(())
    }
}
