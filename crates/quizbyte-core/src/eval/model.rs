//! The Data Model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoreband::ScoreBand;

/// A quiz question. `model_answers[0]` is canonical; the rest are
/// alternate acceptable phrasings joined into the response's `modelAnswer`
/// field at evaluation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quiz {
    pub id: Uuid,
    pub question: String,
    pub model_answers: Vec<String>,
    pub keywords: Vec<String>,
    pub difficulty: u8,
    pub sub_category_id: Uuid,
}

impl Quiz {
    /// The canonical model answer, or an empty string if somehow
    /// constructed without one (never true for a quiz that passed
    /// [`crate::batch`] validation, but the field is not `NonEmpty`-typed).
    pub fn canonical_model_answer(&self) -> &str {
        self.model_answers.first().map(String::as_str).unwrap_or("")
    }

    /// All model answers joined for display as the pipeline's `modelAnswer`
    /// response field.
    pub fn joined_model_answer(&self) -> String {
        self.model_answers.join("; ")
    }
}

/// Created once at seed time; referenced by quizzes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubCategory {
    pub id: Uuid,
    pub name: String,
    pub category_name: String,
}

/// A validated, ordered tiling of `[0, 1]` for one quiz. Optional per quiz.
#[derive(Debug, Clone)]
pub struct QuizEvaluationBands {
    pub quiz_id: Uuid,
    pub bands: Vec<ScoreBand>,
}

/// Produced by the LLM evaluator plus post-processing; what gets cached and
/// returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationResult {
    pub score: f64,
    pub completeness: f64,
    pub relevance: f64,
    pub accuracy: f64,
    pub explanation: String,
    pub keyword_matches: Vec<String>,
    pub model_answer: String,
}

/// Append-only audit trail entry; not on the hot path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizAttempt {
    pub user_id: Uuid,
    pub quiz_id: Uuid,
    pub submitted_answer: String,
    pub result: EvaluationResult,
    pub created_at: DateTime<Utc>,
}

/// A candidate produced by the batch generator, pre-persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizCandidate {
    pub question: String,
    pub model_answer: String,
    pub keywords: Vec<String>,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Maps to the `1..5` integer scale [`Quiz::difficulty`] stores.
    pub fn as_level(self) -> u8 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }
}

/// Summary shape returned by the read-through quiz listing operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizSummary {
    pub id: Uuid,
    pub question: String,
    pub keywords: Vec<String>,
    pub difficulty_label: String,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id,
            question: quiz.question.clone(),
            keywords: quiz.keywords.clone(),
            difficulty_label: difficulty_label(quiz.difficulty),
        }
    }
}

fn difficulty_label(difficulty: u8) -> String {
    match difficulty {
        1 => "easy".to_string(),
        2 => "easy".to_string(),
        3 => "medium".to_string(),
        4 => "hard".to_string(),
        _ => "hard".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_model_answer_is_first() {
        let quiz = Quiz {
            id: Uuid::new_v4(),
            question: "Q".to_string(),
            model_answers: vec!["Paris".to_string(), "paris, france".to_string()],
            keywords: vec![],
            difficulty: 2,
            sub_category_id: Uuid::new_v4(),
        };
        assert_eq!(quiz.canonical_model_answer(), "Paris");
        assert_eq!(quiz.joined_model_answer(), "Paris; paris, france");
    }
}
