//! The Batch Generator: proposes new quizzes per sub-category
//! via the LLM evaluator, deduplicates against existing content, and
//! commits accepted candidates as one per-sub-category transaction.
//!
//! Sub-categories are processed serially by default; a [`tokio::sync::Semaphore`] bounds
//! concurrent LLM calls if a caller configures concurrent sub-category
//! workers, the same resource-bounding idiom `reflex::lifecycle::LifecycleManager`
//! uses for its background reaper task.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::embedding::{EmbeddingProvider, cosine_similarity};
use crate::eval::{Difficulty, Quiz, QuizCandidate, Store, SubCategory};
use crate::llm::LlmEvaluator;

use super::error::BatchError;

const MIN_KEYWORDS: usize = 2;
const MAX_KEYWORDS: usize = 5;

/// Outcome of one sub-category's generation pass.
#[derive(Debug, Clone)]
pub struct SubCategoryBatchResult {
    pub sub_category_id: Uuid,
    pub sub_category_name: String,
    pub accepted: usize,
    pub error: Option<String>,
}

/// Outcome of a full `generate()` pass across every sub-category.
#[derive(Debug, Clone, Default)]
pub struct BatchGenerationReport {
    pub results: Vec<SubCategoryBatchResult>,
}

#[derive(Debug, Deserialize)]
struct RawCandidate {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    model_answer: Option<String>,
    #[serde(default)]
    keywords: Option<Vec<String>>,
    #[serde(default)]
    difficulty: Option<String>,
}

impl RawCandidate {
    fn into_candidate(self) -> Option<QuizCandidate> {
        let question = self.question.filter(|s| !s.trim().is_empty())?;
        let model_answer = self.model_answer.filter(|s| !s.trim().is_empty())?;
        let keywords = self.keywords.unwrap_or_default();
        if !(MIN_KEYWORDS..=MAX_KEYWORDS).contains(&keywords.len()) {
            return None;
        }
        let difficulty = match self.difficulty.as_deref() {
            Some("easy") => Difficulty::Easy,
            Some("medium") => Difficulty::Medium,
            Some("hard") => Difficulty::Hard,
            _ => return None,
        };
        Some(QuizCandidate {
            question,
            model_answer,
            keywords,
            difficulty,
        })
    }
}

/// Parses the LLM's candidate-proposal response as a JSON array, dropping
/// any entry that fails validation rather than failing the whole batch.
fn parse_candidates(raw_output: &str) -> Result<Vec<QuizCandidate>, BatchError> {
    let start = raw_output
        .find('[')
        .ok_or_else(|| BatchError::MalformedCandidateList(raw_output.to_string()))?;
    let end = raw_output
        .rfind(']')
        .ok_or_else(|| BatchError::MalformedCandidateList(raw_output.to_string()))?;
    if end < start {
        return Err(BatchError::MalformedCandidateList(raw_output.to_string()));
    }

    let raw_candidates: Vec<RawCandidate> = serde_json::from_str(&raw_output[start..=end])
        .map_err(|e| BatchError::MalformedCandidateList(e.to_string()))?;

    Ok(raw_candidates
        .into_iter()
        .filter_map(RawCandidate::into_candidate)
        .collect())
}

fn build_candidate_prompt(sub_category: &SubCategory, keywords: &[String], count: usize) -> String {
    let keyword_list = if keywords.is_empty() {
        "(no existing keywords on record)".to_string()
    } else {
        keywords.join(", ")
    };
    format!(
        "Propose {count} new short-answer quiz questions for the sub-category \
\"{}\" (category: \"{}\"). Known keywords already used in this sub-category: \
{keyword_list}.\n\n\
Respond with exactly one JSON array of {count} objects, and nothing else. \
Each object must have:\n\
- question: string\n\
- model_answer: string, the canonical correct answer\n\
- keywords: array of 2 to 5 strings\n\
- difficulty: one of \"easy\", \"medium\", \"hard\"\n",
        sub_category.name, sub_category.category_name
    )
}

/// Generates and commits new quizzes across every sub-category.
pub struct BatchGenerator {
    store: Arc<dyn Store>,
    llm: Arc<dyn LlmEvaluator>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm_semaphore: Arc<Semaphore>,
    num_questions_per_subcategory: usize,
    dedup_similarity_threshold: f64,
}

impl BatchGenerator {
    pub fn new(
        store: Arc<dyn Store>,
        llm: Arc<dyn LlmEvaluator>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm_semaphore: Arc<Semaphore>,
        num_questions_per_subcategory: usize,
        dedup_similarity_threshold: f64,
    ) -> Self {
        Self {
            store,
            llm,
            embedder,
            llm_semaphore,
            num_questions_per_subcategory,
            dedup_similarity_threshold: dedup_similarity_threshold.clamp(0.0, 1.0),
        }
    }

    /// Runs one generation pass across every known sub-category. A failure
    /// in one sub-category's transaction does not stop the others.
    #[instrument(skip(self))]
    pub async fn generate(&self) -> BatchGenerationReport {
        let sub_categories = match self.store.get_all_sub_categories().await {
            Ok(sub_categories) => sub_categories,
            Err(err) => {
                warn!(error = %err, "failed to list sub-categories, aborting batch generation");
                return BatchGenerationReport::default();
            }
        };

        let mut results = Vec::with_capacity(sub_categories.len());
        for sub_category in &sub_categories {
            let outcome = self.generate_for_subcategory(sub_category).await;
            results.push(match outcome {
                Ok(accepted) => {
                    info!(sub_category = %sub_category.name, accepted, "batch generation committed");
                    SubCategoryBatchResult {
                        sub_category_id: sub_category.id,
                        sub_category_name: sub_category.name.clone(),
                        accepted,
                        error: None,
                    }
                }
                Err(err) => {
                    warn!(sub_category = %sub_category.name, error = %err, "batch generation rolled back for sub-category");
                    SubCategoryBatchResult {
                        sub_category_id: sub_category.id,
                        sub_category_name: sub_category.name.clone(),
                        accepted: 0,
                        error: Some(err.to_string()),
                    }
                }
            });
        }

        BatchGenerationReport { results }
    }

    async fn generate_for_subcategory(
        &self,
        sub_category: &SubCategory,
    ) -> Result<usize, BatchError> {
        let existing = self
            .store
            .get_quizzes_by_criteria(sub_category.id, u32::MAX)
            .await
            .unwrap_or_default();
        let existing_keywords: Vec<String> = existing
            .iter()
            .flat_map(|q| q.keywords.clone())
            .collect();

        let prompt = build_candidate_prompt(
            sub_category,
            &existing_keywords,
            self.num_questions_per_subcategory,
        );

        let raw_output = {
            let _permit = self
                .llm_semaphore
                .acquire()
                .await
                .expect("semaphore is never closed");
            self.llm.call(&prompt).await?
        };

        let candidates = parse_candidates(&raw_output)?;

        let mut accepted_quizzes = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if self.is_duplicate(&candidate, &existing).await {
                continue;
            }
            accepted_quizzes.push(Quiz {
                id: Uuid::new_v4(),
                question: candidate.question,
                model_answers: vec![candidate.model_answer],
                keywords: candidate.keywords,
                difficulty: candidate.difficulty.as_level(),
                sub_category_id: sub_category.id,
            });
        }

        if accepted_quizzes.is_empty() {
            return Ok(0);
        }

        self.store.save_quizzes(&accepted_quizzes).await?;
        Ok(accepted_quizzes.len())
    }

    /// Best-effort dedup against existing questions by embedding a cheap
    /// keyword-seeded query and comparing against each existing quiz's own
    /// keyword-seeded query.
    /// Any embedding failure is treated as "not a duplicate".
    async fn is_duplicate(&self, candidate: &QuizCandidate, existing: &[Quiz]) -> bool {
        if existing.is_empty() {
            return false;
        }

        let candidate_seed = candidate.keywords.join(" ");
        let candidate_embedding = match self.embedder.embed(&candidate_seed).await {
            Ok(vector) => vector,
            Err(_) => return false,
        };

        for quiz in existing {
            let existing_seed = quiz.keywords.join(" ");
            if existing_seed.trim().is_empty() {
                continue;
            }
            let existing_embedding = match self.embedder.embed(&existing_seed).await {
                Ok(vector) => vector,
                Err(_) => continue,
            };
            if cosine_similarity(&candidate_embedding, &existing_embedding)
                >= self.dedup_similarity_threshold
            {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_candidates_drops_incomplete_entries() {
        let raw = r#"[
            {"question":"Q1","model_answer":"A1","keywords":["a","b"],"difficulty":"easy"},
            {"question":"","model_answer":"A2","keywords":["a","b"],"difficulty":"easy"},
            {"question":"Q3","model_answer":"A3","keywords":["a"],"difficulty":"hard"},
            {"question":"Q4","model_answer":"A4","keywords":["a","b","c"],"difficulty":"unknown"}
        ]"#;
        let candidates = parse_candidates(raw).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].question, "Q1");
    }

    #[test]
    fn parse_candidates_tolerates_surrounding_prose() {
        let raw = "Here are the candidates: [{\"question\":\"Q\",\"model_answer\":\"A\",\"keywords\":[\"a\",\"b\"],\"difficulty\":\"medium\"}] done.";
        let candidates = parse_candidates(raw).unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn parse_candidates_errors_without_array_brackets() {
        assert!(parse_candidates("not an array").is_err());
    }
}
