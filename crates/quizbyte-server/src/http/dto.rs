//! Wire-level request/response shapes for the HTTP surface.
//!
//! Kept separate from [`quizbyte_core`]'s domain types so the JSON contract
//! can evolve (field renames, optional additions) without touching the
//! Evaluation Core, the same boundary the `reflex` gateway draws between
//! `gateway::payload` and the cache/scoring crate's own types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quizbyte_core::{EvaluationResult, QuizSummary};

#[derive(Debug, Deserialize)]
pub struct CheckAnswerRequest {
    pub quiz_id: Uuid,
    pub user_answer: String,
}

#[derive(Debug, Serialize)]
pub struct CheckAnswerResponse {
    pub score: f64,
    pub completeness: f64,
    pub relevance: f64,
    pub accuracy: f64,
    pub explanation: String,
    pub keyword_matches: Vec<String>,
    pub model_answer: String,
}

impl From<EvaluationResult> for CheckAnswerResponse {
    fn from(result: EvaluationResult) -> Self {
        Self {
            score: result.score,
            completeness: result.completeness,
            relevance: result.relevance,
            accuracy: result.accuracy,
            explanation: result.explanation,
            keyword_matches: result.keyword_matches,
            model_answer: result.model_answer,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RandomQuizQuery {
    pub sub_category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkQuizzesQuery {
    pub sub_category: String,
    pub count: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct QuizSummaryResponse {
    pub id: Uuid,
    pub question: String,
    pub keywords: Vec<String>,
    pub difficulty_label: String,
}

impl From<QuizSummary> for QuizSummaryResponse {
    fn from(summary: QuizSummary) -> Self {
        Self {
            id: summary.id,
            question: summary.question,
            keywords: summary.keywords,
            difficulty_label: summary.difficulty_label,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubCategoryListResponse {
    pub sub_categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchGenerationResponse {
    pub results: Vec<SubCategoryResultDto>,
}

#[derive(Debug, Serialize)]
pub struct SubCategoryResultDto {
    pub sub_category_id: Uuid,
    pub sub_category_name: String,
    pub accepted: usize,
    pub error: Option<String>,
}
