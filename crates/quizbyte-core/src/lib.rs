//! # quizbyte-core
//!
//! The Evaluation Core for the quizbyte quiz backend: a two-tier semantic
//! cache for LLM-graded answers, request coalescing for the hot path,
//! an LLM-evaluation adapter that parses structured scores out of
//! unreliable model text, a score-band lookup, and a batch quiz-generation
//! pipeline.
//!
//! ```text
//! checkAnswer(quiz, text)
//!   -> embed(text)                      [embedding::EmbeddingProvider]
//!   -> answer_cache.get(...)            [answer_cache::AnswerCacheService]  (hit short-circuits)
//!   -> coalesce(check_answer:quiz:hash) [coalesce::RequestCoalescer]
//!        -> llm.call(prompt)            [llm::LlmEvaluator]
//!        -> scoreband.resolve(score)    [scoreband::ScoreBandSet]
//!        -> answer_cache.put(...)
//! ```
//!
//! HTTP routing, OAuth/JWT authentication, database migrations, and the
//! outbound wire protocol of any specific LLM provider live outside this
//! crate, in `quizbyte-server`; this crate depends only on the trait
//! objects in [`eval::store`], [`embedding`], and [`llm`].
//!
//! ## Modules
//!
//! - [`cache`] - Cache Port: an abstract key-value store with TTL
//! - [`embedding`] - Embedding Provider, with its own content-addressed cache
//! - [`llm`] - LLM Evaluator: prompt assembly and response post-processing
//! - [`answer_cache`] - the quiz-scoped semantic answer cache
//! - [`coalesce`] - the request-coalescing single-flight registry
//! - [`scoreband`] - the Score-Band Resolver
//! - [`eval`] - the Evaluation Pipeline and the data model it operates over
//! - [`batch`] - the offline Batch Generator
//! - [`config`] - environment-backed configuration
//! - [`hashing`] - content hashing used throughout cache/coalescer keys
//! - [`constants`] - cross-cutting shared defaults

#![warn(missing_docs)]

pub mod answer_cache;
pub mod batch;
pub mod cache;
pub mod coalesce;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod eval;
pub mod hashing;
pub mod llm;
pub mod scoreband;

pub use answer_cache::{AnswerCacheError, AnswerCacheService, CachedAnswerEntry};
pub use batch::{BatchError, BatchGenerationReport, BatchGenerator, SubCategoryBatchResult};
pub use cache::{CacheError, CachePort, CachePortExt, InMemoryCachePort, RedisCachePort};
pub use coalesce::RequestCoalescer;
pub use config::{CacheTtlConfig, ConfigError, CoreConfig, EmbeddingSource};
pub use embedding::{
    CachedEmbeddingProvider, EmbeddingError, EmbeddingProvider, OpenAiEmbeddingProvider,
};
pub use eval::{
    Difficulty, EvalError, EvaluationPipeline, EvaluationResult, PipelineConfig, Quiz,
    QuizAttempt, QuizCandidate, QuizEvaluationBands, QuizSummary, Store, StoreError, SubCategory,
};
pub use llm::{GenAiEvaluator, LlmEvaluator, LlmEvaluatorError};
pub use scoreband::{ScoreBand, ScoreBandSet};
