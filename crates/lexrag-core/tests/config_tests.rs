// Integration tests for the configuration layer: defaults, TOML overrides,
// typed extraction and per-environment validation.

use lexrag_core::config::{expand_path, Config, Settings};

#[test]
fn defaults_match_documented_values() {
    let settings = Settings::default();
    assert_eq!(settings.retrieval.search_k, 50);
    assert_eq!(settings.retrieval.rerank_top_n, 5);
    assert_eq!(settings.retrieval.embedding_dim, 4096);
    assert_eq!(settings.related.answer_prefix_chars, 400);
    assert!(settings.corpus.reference_fragment_id.is_none());
    assert!((settings.inference.generation.temperature - 0.002).abs() < f32::EPSILON);
    assert_eq!(settings.inference.timeout_secs, 300);
}

#[test]
fn toml_overrides_layer_over_defaults() {
    let config = Config::from_toml_str(
        r#"
        [corpus]
        reference_fragment_id = "1"

        [retrieval]
        search_k = 80

        [inference.embedding]
        endpoint = "http://localhost:9000/v1/embeddings"
        "#,
        "dev",
    )
    .expect("config");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.retrieval.search_k, 80);
    assert_eq!(settings.retrieval.rerank_top_n, 5, "untouched keys keep defaults");
    assert_eq!(settings.corpus.reference_fragment_id.as_deref(), Some("1"));
    assert_eq!(settings.inference.embedding.endpoint, "http://localhost:9000/v1/embeddings");
    assert_eq!(settings.inference.embedding.model, "Qwen/Qwen3-Embedding-8B");
}

#[test]
fn get_extracts_a_subtree() {
    let config = Config::from_toml_str("[retry]\nmax_retries = 0\n", "test").expect("config");
    let retries: usize = config.get("retry.max_retries").expect("retry.max_retries");
    assert_eq!(retries, 0);
    assert!(config.get::<usize>("retry.missing").is_err());
}

#[test]
fn rerank_top_n_cannot_exceed_search_k() {
    let err = Config::from_toml_str("[retrieval]\nsearch_k = 3\nrerank_top_n = 5\n", "dev")
        .err()
        .expect("invalid retrieval sizes are rejected");
    assert!(err.to_string().contains("rerank_top_n"), "{err}");
}

#[test]
fn zero_search_k_is_rejected() {
    assert!(Config::from_toml_str("[retrieval]\nsearch_k = 0\n", "dev").is_err());
}

#[test]
fn production_requires_api_key() {
    assert!(Config::from_toml_str("", "prod").is_err());
    assert!(Config::from_toml_str("", "dev").is_ok());
    let config = Config::from_toml_str("[inference]\napi_key = \"secret\"\n", "production").expect("config");
    assert_eq!(config.env_name(), "production");
}

#[test]
fn empty_endpoint_is_rejected() {
    let err = Config::from_toml_str("[inference.rerank]\nendpoint = \" \"\n", "dev")
        .err()
        .expect("blank endpoint");
    assert!(err.to_string().contains("inference.rerank.endpoint"), "{err}");
}

#[test]
fn expand_path_resolves_env_vars() {
    std::env::set_var("LEXRAG_TEST_DATA_ROOT", "/srv/lexrag");
    let p = expand_path("${LEXRAG_TEST_DATA_ROOT}/chunks.json");
    assert_eq!(p, std::path::PathBuf::from("/srv/lexrag/chunks.json"));
    assert_eq!(expand_path("plain/relative.json"), std::path::PathBuf::from("plain/relative.json"));
}
