use std::time::Duration;

use serde::{Deserialize, Serialize};

use lexrag_core::config::EndpointSettings;
use lexrag_core::traits::Reranker;
use lexrag_core::types::RerankScore;
use lexrag_core::{Result, Service};

use crate::http::JsonEndpoint;

/// Cross-encoder rerank client (`{model, query, documents, top_n}`).
///
/// Returned positions are passed through as the service reports them;
/// checking them against the submitted batch is the caller's job.
#[derive(Clone)]
pub struct HttpReranker {
    endpoint: JsonEndpoint,
    model: String,
}

impl HttpReranker {
    pub fn new(settings: &EndpointSettings, api_key: &str, timeout: Duration) -> Result<Self> {
        let endpoint = JsonEndpoint::new(Service::Rerank, &settings.endpoint, api_key, timeout)?;
        Ok(Self { endpoint, model: settings.model.clone() })
    }
}

impl Reranker for HttpReranker {
    fn rerank(&self, query: &str, documents: &[&str], top_n: usize) -> Result<Vec<RerankScore>> {
        let request = RerankRequest { model: &self.model, query, documents, top_n };
        let parsed: RerankResponse = self.endpoint.post(&request)?;
        Ok(parsed
            .results
            .into_iter()
            .map(|r| RerankScore { index: r.index, relevance_score: r.relevance_score.unwrap_or(0.0) })
            .collect())
    }
}

#[derive(Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    documents: &'a [&'a str],
    top_n: usize,
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
    results: Vec<RerankResult>,
}

// `document` is echoed back in several shapes by different providers; the
// text is taken from the submitted candidate instead.
#[derive(Debug, Deserialize)]
struct RerankResult {
    index: i64,
    #[serde(default)]
    relevance_score: Option<f32>,
}
