use std::time::Duration;

use serde::{Deserialize, Serialize};

use lexrag_core::config::EndpointSettings;
use lexrag_core::traits::Embedder;
use lexrag_core::{Result, Service};

use crate::http::JsonEndpoint;

/// Embedding client for OpenAI-compatible `/embeddings` endpoints.
#[derive(Clone)]
pub struct HttpEmbedder {
    endpoint: JsonEndpoint,
    model: String,
}

impl HttpEmbedder {
    pub fn new(settings: &EndpointSettings, api_key: &str, timeout: Duration) -> Result<Self> {
        let endpoint = JsonEndpoint::new(Service::Embedding, &settings.endpoint, api_key, timeout)?;
        Ok(Self { endpoint, model: settings.model.clone() })
    }
}

impl Embedder for HttpEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest { model: &self.model, input: [text] };
        let parsed: EmbeddingResponse = self.endpoint.post(&request)?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| self.endpoint.malformed("response carried no embedding"))
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
