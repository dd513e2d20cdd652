use super::*;

#[test]
fn defaults_match_spec_table() {
    let config = CoreConfig::default();
    assert_eq!(config.embedding_source, EmbeddingSource::OpenAi);
    assert_eq!(config.similarity_threshold, 0.95);
    assert_eq!(config.num_questions_per_subcategory, 3);
    assert_eq!(config.llm_timeout, Duration::from_secs(20));
    assert_eq!(config.cache_ttl.llm_response, Duration::from_secs(24 * 3600));
    assert_eq!(config.cache_ttl.embedding, Duration::from_secs(168 * 3600));
}

#[test]
fn validate_rejects_out_of_range_threshold() {
    let mut config = CoreConfig::default();
    config.similarity_threshold = 1.2;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange { .. })
    ));
}

#[test]
fn embedding_source_parses_custom_values() {
    assert_eq!(EmbeddingSource::parse("openai"), EmbeddingSource::OpenAi);
    assert_eq!(
        EmbeddingSource::parse("cohere"),
        EmbeddingSource::Custom("cohere".to_string())
    );
}
