//! Configuration loader, typed settings and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `APP_*` env vars (nested keys split on `__`), and
//! finally `INFERENCE_API_KEY` for the credential. Provides helpers to expand
//! `~` and `${VAR}` in artifact paths.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::{Error, Result};

pub struct Config {
    figment: Figment,
    env_name: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment
            .merge(Env::prefixed("APP_").split("__"))
            .merge(Env::raw().only(&["INFERENCE_API_KEY"]).map(|_| "inference.api_key".into()));

        let config = Self { figment, env_name };
        config.settings()?;
        Ok(config)
    }

    /// Builds a config from inline TOML layered over the defaults.
    pub fn from_toml_str(toml: &str, env_name: &str) -> anyhow::Result<Self> {
        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::string(toml));
        let config = Self { figment, env_name: env_name.to_string() };
        config.settings()?;
        Ok(config)
    }

    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extracts and validates the full settings tree for the current env.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        settings.validate_for_env(&self.env_name)?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub corpus: CorpusSettings,
    pub inference: InferenceSettings,
    pub retrieval: RetrievalSettings,
    pub related: RelatedSettings,
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    pub fragments_path: String,
    pub index_path: String,
    /// Fragment holding the corpus-wide term definitions. Unset means the
    /// first fragment of the store.
    pub reference_fragment_id: Option<String>,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            fragments_path: "data/files/chunks.json".to_string(),
            index_path: "data/files/index.lxfi".to_string(),
            reference_fragment_id: None,
        }
    }
}

impl CorpusSettings {
    pub fn fragments_path(&self) -> PathBuf {
        expand_path(&self.fragments_path)
    }

    pub fn index_path(&self) -> PathBuf {
        expand_path(&self.index_path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    pub api_key: String,
    pub timeout_secs: u64,
    pub embedding: EndpointSettings,
    pub rerank: EndpointSettings,
    pub generation: GenerationSettings,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_secs: 300,
            embedding: EndpointSettings {
                endpoint: "https://inference.meganova.ai/v1/embeddings".to_string(),
                model: "Qwen/Qwen3-Embedding-8B".to_string(),
            },
            rerank: EndpointSettings {
                endpoint: "https://inference.meganova.ai/v1/rerank".to_string(),
                model: "BAAI/bge-reranker-v2-m3".to_string(),
            },
            generation: GenerationSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    pub endpoint: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://inference.meganova.ai/v1/chat/completions".to_string(),
            model: "deepseek-ai/DeepSeek-V3-0324-Free".to_string(),
            temperature: 0.002,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Neighbours fetched from the vector index (reranker candidate pool).
    pub search_k: usize,
    /// Hits kept after reranking.
    pub rerank_top_n: usize,
    pub embedding_dim: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { search_k: 50, rerank_top_n: 5, embedding_dim: 4096 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedSettings {
    pub answer_prefix_chars: usize,
    pub min_question_chars: usize,
}

impl Default for RelatedSettings {
    fn default() -> Self {
        Self { answer_prefix_chars: 400, min_question_chars: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Extra attempts after the first one, transient failures only.
    pub max_retries: usize,
    pub backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self { max_retries: 2, backoff_ms: 500 }
    }
}

impl Settings {
    pub fn validate_for_env(&self, env: &str) -> Result<()> {
        let retrieval = &self.retrieval;
        if retrieval.search_k == 0 {
            return Err(Error::InvalidConfig("retrieval.search_k must be at least 1".into()));
        }
        if retrieval.rerank_top_n == 0 {
            return Err(Error::InvalidConfig("retrieval.rerank_top_n must be at least 1".into()));
        }
        if retrieval.rerank_top_n > retrieval.search_k {
            return Err(Error::InvalidConfig(format!(
                "retrieval.rerank_top_n ({}) exceeds retrieval.search_k ({})",
                retrieval.rerank_top_n, retrieval.search_k
            )));
        }
        if retrieval.embedding_dim == 0 {
            return Err(Error::InvalidConfig("retrieval.embedding_dim must be at least 1".into()));
        }
        if self.inference.timeout_secs == 0 {
            return Err(Error::InvalidConfig("inference.timeout_secs must be at least 1".into()));
        }
        for (key, endpoint) in [
            ("inference.embedding.endpoint", &self.inference.embedding.endpoint),
            ("inference.rerank.endpoint", &self.inference.rerank.endpoint),
            ("inference.generation.endpoint", &self.inference.generation.endpoint),
        ] {
            if endpoint.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("{key} is empty")));
            }
        }
        if matches!(env, "prod" | "production") && self.inference.api_key.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "inference.api_key is required in production (set INFERENCE_API_KEY)".into(),
            ));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
