//! lexrag-inference
//!
//! Blocking clients for the remote embedding, rerank and generation
//! endpoints, plus a hash-based embedder for running without a network.

use std::time::Duration;

use tracing::info;

use lexrag_core::config::Settings;
use lexrag_core::traits::{Embedder, Generator, Reranker};
use lexrag_core::Result;

pub mod embedding;
pub mod fake;
pub mod generation;
mod http;
pub mod rerank;

pub use embedding::HttpEmbedder;
pub use fake::HashEmbedder;
pub use generation::HttpGenerator;
pub use rerank::HttpReranker;

/// Whether `APP_USE_FAKE_EMBEDDINGS` asks for the offline embedder.
pub fn use_fake_embeddings() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn timeout(settings: &Settings) -> Duration {
    Duration::from_secs(settings.inference.timeout_secs)
}

pub fn embedder_from_settings(settings: &Settings) -> Result<Box<dyn Embedder>> {
    if use_fake_embeddings() {
        info!(dim = settings.retrieval.embedding_dim, "Using HashEmbedder");
        return Ok(Box::new(HashEmbedder::new(settings.retrieval.embedding_dim)));
    }
    let inference = &settings.inference;
    Ok(Box::new(HttpEmbedder::new(&inference.embedding, &inference.api_key, timeout(settings))?))
}

pub fn reranker_from_settings(settings: &Settings) -> Result<Box<dyn Reranker>> {
    let inference = &settings.inference;
    Ok(Box::new(HttpReranker::new(&inference.rerank, &inference.api_key, timeout(settings))?))
}

pub fn generator_from_settings(settings: &Settings) -> Result<Box<dyn Generator>> {
    let inference = &settings.inference;
    Ok(Box::new(HttpGenerator::new(&inference.generation, &inference.api_key, timeout(settings))?))
}
