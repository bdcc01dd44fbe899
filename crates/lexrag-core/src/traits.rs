use crate::types::{Neighbors, RerankScore};
use crate::Result;

/// Turns a single text into an embedding vector.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Scores `documents` against `query` and returns positions into `documents`
/// in relevance order, at most `top_n` of them.
pub trait Reranker: Send + Sync {
    fn rerank(&self, query: &str, documents: &[&str], top_n: usize) -> Result<Vec<RerankScore>>;
}

/// Single-turn text completion.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Read-only nearest-neighbour index over fixed-dimension vectors.
pub trait VectorIndex: Send + Sync {
    /// Number of stored vectors.
    fn count(&self) -> usize;
    fn dim(&self) -> usize;
    /// Up to `k` nearest rows by inner product, best first.
    fn search(&self, query: &[f32], k: usize) -> Result<Neighbors>;
}
