//! Fixed prompt template for the LLM Evaluator.

/// Assembles the evaluation prompt from the question, canonical model
/// answer, the user's submitted answer, and the keyword list, instructing
/// the model to respond with the JSON contract [`crate::llm::json_extract`]
/// expects.
pub fn build_evaluation_prompt(
    question: &str,
    model_answer: &str,
    user_answer: &str,
    keywords: &[String],
) -> String {
    let keyword_list = if keywords.is_empty() {
        "(none provided)".to_string()
    } else {
        keywords.join(", ")
    };

    format!(
        "You are grading a short-answer quiz response. Compare the user's \
answer against the canonical model answer and the question, then emit a \
single JSON object describing the grade.\n\n\
Question: {question}\n\
Canonical model answer: {model_answer}\n\
Keywords to check for: {keyword_list}\n\
User answer: {user_answer}\n\n\
Respond with exactly one JSON object with these fields, and nothing else:\n\
- score: overall correctness, a number in [0, 1]\n\
- explanation: a short natural-language justification\n\
- keyword_matches: array of keywords from the list above that the user's answer covers\n\
- completeness: how much of the expected answer is present, a number in [0, 1]\n\
- relevance: how relevant the answer is to the question, a number in [0, 1]\n\
- accuracy: factual accuracy of the answer, a number in [0, 1]\n"
    )
}
