//! Centralized cache-key composition.
//!
//! Design Note: key composition was scattered across call sites in
//! the source system; this module is the single place the `quizbyte:<service>:
//! <object>:<id>[:<param1_param2_…>]` shape is produced, so the shape stays
//! contractual across code versions without every caller re-deriving it.

/// Builds a cache key of the shape
/// `quizbyte:<service>:<object>:<id>[:<param1_param2_…>]`.
///
/// `params` are joined with `_` and appended as one final `:`-delimited
/// segment; pass an empty slice to omit the trailing segment entirely.
pub fn make(service: &str, object: &str, id: &str, params: &[&str]) -> String {
    let mut key = format!("quizbyte:{service}:{object}:{id}");
    if !params.is_empty() {
        key.push(':');
        key.push_str(&params.join("_"));
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_without_params() {
        assert_eq!(
            make("answer", "evaluation_map", "q1", &[]),
            "quizbyte:answer:evaluation_map:q1"
        );
    }

    #[test]
    fn make_with_params_joins_with_underscore() {
        assert_eq!(
            make("quiz_service", "quiz_list", "sub1", &["10"]),
            "quizbyte:quiz_service:quiz_list:sub1:10"
        );
    }

    #[test]
    fn make_with_multiple_params() {
        assert_eq!(
            make("embedding", "cache", "openai", &["deadbeef", "v2"]),
            "quizbyte:embedding:cache:openai:deadbeef_v2"
        );
    }
}
