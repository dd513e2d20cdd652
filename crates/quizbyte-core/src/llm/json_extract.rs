//! Post-processing of raw LLM evaluator output into a structured evaluation
//!.

use serde::Deserialize;
use serde_json::Value;

use super::error::LlmEvaluatorError;

/// The fields the evaluation prompt instructs the model to emit. Field
/// names match the prompt's JSON contract exactly (`keyword_matches`, not
/// `keywordMatches` — that rename happens at the pipeline/API boundary).
#[derive(Debug, Clone, Deserialize)]
struct RawEvaluation {
    #[serde(default)]
    score: Value,
    #[serde(default)]
    explanation: Value,
    #[serde(default)]
    keyword_matches: Value,
    #[serde(default)]
    completeness: Value,
    #[serde(default)]
    relevance: Value,
    #[serde(default)]
    accuracy: Value,
}

/// A fully post-processed LLM evaluation: all numeric fields clamped into
/// `[0, 1]`, missing strings defaulted to empty, missing arrays to empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedEvaluation {
    pub score: f64,
    pub explanation: String,
    pub keyword_matches: Vec<String>,
    pub completeness: f64,
    pub relevance: f64,
    pub accuracy: f64,
}

/// Runs the full post-processing pipeline over raw LLM output.
pub fn extract_evaluation(raw_output: &str) -> Result<ExtractedEvaluation, LlmEvaluatorError> {
    let trimmed = raw_output.trim();
    let cleaned = strip_think_block(trimmed);
    let candidate = locate_candidate_json(&cleaned).ok_or_else(|| LlmEvaluatorError::NoJsonObject {
        cleaned_text: cleaned.clone(),
    })?;

    let raw: RawEvaluation = serde_json::from_str(candidate)
        .map_err(|e| LlmEvaluatorError::MalformedJson(e.to_string()))?;

    Ok(ExtractedEvaluation {
        score: clamp_unit(value_as_f64(&raw.score)),
        explanation: value_as_string(&raw.explanation),
        keyword_matches: value_as_string_list(&raw.keyword_matches),
        completeness: clamp_unit(value_as_f64(&raw.completeness)),
        relevance: clamp_unit(value_as_f64(&raw.relevance)),
        accuracy: clamp_unit(value_as_f64(&raw.accuracy)),
    })
}

/// Removes the first balanced `<think>...</think>` block, if present.
fn strip_think_block(text: &str) -> String {
    const OPEN: &str = "<think>";
    const CLOSE: &str = "</think>";
    if let Some(start) = text.find(OPEN) {
        if let Some(end_rel) = text[start..].find(CLOSE) {
            let end = start + end_rel + CLOSE.len();
            let mut out = String::with_capacity(text.len());
            out.push_str(&text[..start]);
            out.push_str(&text[end..]);
            return out.trim().to_string();
        }
    }
    text.to_string()
}

/// Locates the first `{` and last `}` and returns the inclusive substring,
/// or `None` if no such balanced pair of delimiters exists.
fn locate_candidate_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn value_as_f64(value: &Value) -> f64 {
    value.as_f64().unwrap_or(0.0)
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn value_as_string(value: &Value) -> String {
    value.as_str().map(str::to_string).unwrap_or_default()
}

fn value_as_string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_well_formed_json() {
        let raw = r#"{"score":0.72,"explanation":"x","keyword_matches":["k"],"completeness":0.7,"relevance":0.8,"accuracy":0.7}"#;
        let evaluation = extract_evaluation(raw).unwrap();
        assert_eq!(evaluation.score, 0.72);
        assert_eq!(evaluation.explanation, "x");
        assert_eq!(evaluation.keyword_matches, vec!["k".to_string()]);
    }

    #[test]
    fn strips_think_block_before_locating_json() {
        let raw = "<think>reasoning about the answer</think>\n{\"score\":0.5,\"explanation\":\"ok\",\"keyword_matches\":[],\"completeness\":0.5,\"relevance\":0.5,\"accuracy\":0.5}";
        let evaluation = extract_evaluation(raw).unwrap();
        assert_eq!(evaluation.score, 0.5);
    }

    #[test]
    fn clamps_out_of_range_numeric_fields() {
        let raw = r#"{"score":1.5,"explanation":"x","keyword_matches":[],"completeness":-0.2,"relevance":0.5,"accuracy":0.5}"#;
        let evaluation = extract_evaluation(raw).unwrap();
        assert_eq!(evaluation.score, 1.0);
        assert_eq!(evaluation.completeness, 0.0);
    }

    #[test]
    fn defaults_missing_string_and_array_fields() {
        let raw = r#"{"score":0.5}"#;
        let evaluation = extract_evaluation(raw).unwrap();
        assert_eq!(evaluation.explanation, "");
        assert!(evaluation.keyword_matches.is_empty());
    }

    #[test]
    fn surfaces_error_when_no_balanced_braces() {
        let raw = "no json here at all";
        let err = extract_evaluation(raw).unwrap_err();
        assert!(matches!(err, LlmEvaluatorError::NoJsonObject { .. }));
    }

    #[test]
    fn surrounding_prose_is_ignored() {
        let raw = "Here is the evaluation: {\"score\":0.9,\"explanation\":\"great\",\"keyword_matches\":[\"a\",\"b\"],\"completeness\":1.0,\"relevance\":1.0,\"accuracy\":0.8} -- end of response";
        let evaluation = extract_evaluation(raw).unwrap();
        assert_eq!(evaluation.score, 0.9);
        assert_eq!(evaluation.keyword_matches, vec!["a".to_string(), "b".to_string()]);
    }
}
