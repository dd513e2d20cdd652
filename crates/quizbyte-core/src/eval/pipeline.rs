//! The Evaluation Pipeline: orchestrates quiz resolution,
//! embedding, caching, LLM evaluation, and score-band resolution behind
//! `checkAnswer` and the read-through listing operations.
//!
//! Grounded on `reflex_server`'s `chat_completions_handler` (L1/L2/L3
//! lookup, provider call, cache write-back) for the overall shape: consult
//! cache, fall through to the remote call on miss, write the result back
//! before returning.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::answer_cache::AnswerCacheService;
use crate::cache::{CachePort, CachePortExt, keys};
use crate::coalesce::RequestCoalescer;
use crate::config::CacheTtlConfig;
use crate::constants;
use crate::embedding::EmbeddingProvider;
use crate::hashing::hash_sha256_hex;
use crate::llm::{LlmEvaluator, build_evaluation_prompt, extract_evaluation};
use crate::scoreband::ScoreBandSet;

use super::error::EvalError;
use super::model::{EvaluationResult, Quiz, QuizSummary};
use super::store::Store;

/// Tunables the pipeline needs beyond what each collaborator already owns.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub category_list_ttl: Duration,
    pub quiz_list_ttl: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&CacheTtlConfig::default())
    }
}

impl From<&CacheTtlConfig> for PipelineConfig {
    fn from(ttl: &CacheTtlConfig) -> Self {
        Self {
            category_list_ttl: ttl.category_list,
            quiz_list_ttl: ttl.quiz_list,
        }
    }
}

pub struct EvaluationPipeline {
    store: Arc<dyn Store>,
    cache: Arc<dyn CachePort>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmEvaluator>,
    answer_cache: AnswerCacheService,
    coalescer: Arc<RequestCoalescer>,
    config: PipelineConfig,
}

impl EvaluationPipeline {
    pub fn new(
        store: Arc<dyn Store>,
        cache: Arc<dyn CachePort>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmEvaluator>,
        answer_cache: AnswerCacheService,
        coalescer: Arc<RequestCoalescer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            cache,
            embedder,
            llm,
            answer_cache,
            coalescer,
            config,
        }
    }

    /// Evaluates `user_text` against quiz `quiz_id`.
    #[instrument(skip(self, user_text), fields(quiz_id = %quiz_id))]
    pub async fn check_answer(
        &self,
        quiz_id: Uuid,
        user_text: &str,
    ) -> Result<EvaluationResult, EvalError> {
        let quiz = self.store.get_quiz_by_id(quiz_id).await.map_err(|e| {
            use super::store::StoreError;
            match e {
                StoreError::NotFound(_) => EvalError::QuizNotFound(quiz_id.to_string()),
                other => EvalError::InternalError(other.to_string()),
            }
        })?;

        if user_text.trim().is_empty() {
            return Err(EvalError::InvalidInput(
                "userText must not be empty".to_string(),
            ));
        }

        let (query_embedding, cache_eligible) = match self.embedder.embed(user_text).await {
            Ok(vector) => (vector, true),
            Err(err) => {
                tracing::warn!(error = %err, "embedding failed, continuing without answer cache");
                (Vec::new(), false)
            }
        };

        if cache_eligible {
            if let Some(entry) = self
                .answer_cache
                .get(&quiz.id.to_string(), &query_embedding, user_text)
                .await
            {
                debug!("checkAnswer served from answer cache");
                return Ok(EvaluationResult {
                    score: entry.score,
                    completeness: entry.completeness,
                    relevance: entry.relevance,
                    accuracy: entry.accuracy,
                    explanation: entry.explanation,
                    keyword_matches: entry.keyword_matches,
                    model_answer: entry.model_answer,
                });
            }
        }

        let coalesce_key = format!(
            "check_answer:{}:{}",
            quiz.id,
            hash_sha256_hex(user_text)
        );

        self.coalescer
            .coalesce(
                &coalesce_key,
                || self.produce_evaluation(&quiz, user_text, cache_eligible, &query_embedding),
                || self.read_coalesced_result(&quiz, user_text, cache_eligible, &query_embedding),
            )
            .await
    }

    /// Run by every caller that finds `check_answer`'s coalesce key already
    /// in flight. The leader writes its result into the answer cache before
    /// releasing waiters (see [`Self::produce_evaluation`]), so the common
    /// case is a cache read-back with no second LLM call. Only when the
    /// leader's computation left no cache entry behind (embedding was
    /// unavailable, or the write itself failed) do we fall back to running
    /// the evaluation again directly, same as [`CachedEmbeddingProvider`](crate::embedding::CachedEmbeddingProvider)'s
    /// leader/follower fallback.
    async fn read_coalesced_result(
        &self,
        quiz: &Quiz,
        user_text: &str,
        cache_eligible: bool,
        query_embedding: &[f32],
    ) -> Result<EvaluationResult, EvalError> {
        if cache_eligible {
            if let Some(entry) = self
                .answer_cache
                .get(&quiz.id.to_string(), query_embedding, user_text)
                .await
            {
                return Ok(EvaluationResult {
                    score: entry.score,
                    completeness: entry.completeness,
                    relevance: entry.relevance,
                    accuracy: entry.accuracy,
                    explanation: entry.explanation,
                    keyword_matches: entry.keyword_matches,
                    model_answer: entry.model_answer,
                });
            }
        }
        self.produce_evaluation(quiz, user_text, cache_eligible, query_embedding)
            .await
    }

    async fn produce_evaluation(
        &self,
        quiz: &Quiz,
        user_text: &str,
        cache_eligible: bool,
        query_embedding: &[f32],
    ) -> Result<EvaluationResult, EvalError> {
        let prompt = build_evaluation_prompt(
            &quiz.question,
            quiz.canonical_model_answer(),
            user_text,
            &quiz.keywords,
        );

        let raw_output = self.llm.call(&prompt).await?;
        let extracted = extract_evaluation(&raw_output)?;

        let mut explanation = extracted.explanation;
        if let Ok(Some(bands)) = self.store.get_quiz_evaluation_bands(quiz.id).await {
            if let Some(band_set) = ScoreBandSet::validate(bands.bands) {
                if let Some(curated) = band_set.resolve(extracted.score) {
                    explanation = curated.to_string();
                }
            }
        }

        let result = EvaluationResult {
            score: extracted.score,
            completeness: extracted.completeness,
            relevance: extracted.relevance,
            accuracy: extracted.accuracy,
            explanation,
            keyword_matches: extracted.keyword_matches,
            model_answer: quiz.joined_model_answer(),
        };

        if cache_eligible {
            let entry = crate::answer_cache::CachedAnswerEntry {
                score: result.score,
                completeness: result.completeness,
                relevance: result.relevance,
                accuracy: result.accuracy,
                explanation: result.explanation.clone(),
                keyword_matches: result.keyword_matches.clone(),
                model_answer: result.model_answer.clone(),
                user_answer_text: user_text.to_string(),
                embedding: query_embedding.to_vec(),
            };
            self.answer_cache
                .put(&quiz.id.to_string(), user_text, &entry)
                .await;
        }

        Ok(result)
    }

    /// Read-through list of every sub-category name, coalesced and cached
    /// under `quiz_service:category_list:all`.
    #[instrument(skip(self))]
    pub async fn get_category_list(&self) -> Result<Vec<String>, EvalError> {
        let key = keys::make("quiz_service", "category_list", "all", &[]);

        if let Some(bytes) = self.cache.get_or_miss(&key).await {
            if let Ok(names) = serde_json::from_slice::<Vec<String>>(&bytes) {
                return Ok(names);
            }
        }

        self.coalescer
            .coalesce(
                &key,
                || self.load_and_cache_category_list(&key),
                || self.load_and_cache_category_list(&key),
            )
            .await
    }

    async fn load_and_cache_category_list(&self, key: &str) -> Result<Vec<String>, EvalError> {
        if let Some(bytes) = self.cache.get_or_miss(key).await {
            if let Ok(names) = serde_json::from_slice::<Vec<String>>(&bytes) {
                return Ok(names);
            }
        }

        let sub_categories = self.store.get_all_sub_categories().await?;
        let names: Vec<String> = sub_categories.into_iter().map(|s| s.name).collect();

        if let Ok(bytes) = serde_json::to_vec(&names) {
            self.cache
                .set_best_effort(key, &bytes, self.config.category_list_ttl)
                .await;
        }

        Ok(names)
    }

    /// Read-through list of up to `count` quizzes in `sub_category_name`
    ///. `count` is clamped to `[1, 50]`, default 10.
    #[instrument(skip(self))]
    pub async fn get_bulk_quizzes(
        &self,
        sub_category_name: &str,
        count: i64,
    ) -> Result<Vec<QuizSummary>, EvalError> {
        let sub_category_id = self
            .store
            .get_sub_category_id_by_name(sub_category_name)
            .await
            .map_err(|_| EvalError::InvalidCategory(sub_category_name.to_string()))?;

        let clamped = constants::clamp_bulk_count(count);
        let key = keys::make(
            "quiz_service",
            "quiz_list",
            &sub_category_id.to_string(),
            &[&clamped.to_string()],
        );

        if let Some(bytes) = self.cache.get_or_miss(&key).await {
            if let Ok(summaries) = serde_json::from_slice::<Vec<QuizSummary>>(&bytes) {
                return Ok(summaries);
            }
        }

        self.coalescer
            .coalesce(
                &key,
                || self.load_and_cache_bulk_quizzes(&key, sub_category_id, clamped),
                || self.load_and_cache_bulk_quizzes(&key, sub_category_id, clamped),
            )
            .await
    }

    async fn load_and_cache_bulk_quizzes(
        &self,
        key: &str,
        sub_category_id: Uuid,
        count: u32,
    ) -> Result<Vec<QuizSummary>, EvalError> {
        if let Some(bytes) = self.cache.get_or_miss(key).await {
            if let Ok(summaries) = serde_json::from_slice::<Vec<QuizSummary>>(&bytes) {
                return Ok(summaries);
            }
        }

        let quizzes = self
            .store
            .get_quizzes_by_criteria(sub_category_id, count)
            .await?;
        let summaries: Vec<QuizSummary> = quizzes.iter().map(QuizSummary::from).collect();

        if let Ok(bytes) = serde_json::to_vec(&summaries) {
            self.cache
                .set_best_effort(key, &bytes, self.config.quiz_list_ttl)
                .await;
        }

        Ok(summaries)
    }

    /// A uniformly random quiz, optionally restricted to a sub-category.
    #[instrument(skip(self))]
    pub async fn get_random_quiz(
        &self,
        sub_category_name: Option<&str>,
    ) -> Result<QuizSummary, EvalError> {
        let sub_category_id = match sub_category_name {
            Some(name) => Some(
                self.store
                    .get_sub_category_id_by_name(name)
                    .await
                    .map_err(|_| EvalError::InvalidCategory(name.to_string()))?,
            ),
            None => None,
        };

        let quiz = self.store.get_random_quiz(sub_category_id).await?;
        Ok(QuizSummary::from(&quiz))
    }

    /// Deletes a quiz's answer-cache map.
    #[instrument(skip(self))]
    pub async fn invalidate_quiz_cache(&self, quiz_id: Uuid) {
        self.answer_cache.invalidate(&quiz_id.to_string()).await;
    }
}
