//! Query orchestration: embed, search, rerank, prompt, generate.
//!
//! Stages run strictly in sequence for one query. A pipeline holds only
//! read-only state, so one instance can serve concurrent callers behind an
//! `Arc`. When retrieval yields nothing usable the answer is the empty
//! string; that is a degraded result, not an error.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use lexrag_core::config::{RelatedSettings, RetrievalSettings, RetrySettings, Settings};
use lexrag_core::traits::{Embedder, Generator, Reranker};
use lexrag_core::types::{Answer, RankedHit};
use lexrag_core::{Error, Result};
use lexrag_index::Corpus;

use crate::prompt::build_prompt;
use crate::related::{build_related_prompt, parse_related};
use crate::rerank::rerank;

pub struct QueryPipeline {
    corpus: Arc<Corpus>,
    embedder: Box<dyn Embedder>,
    reranker: Box<dyn Reranker>,
    generator: Box<dyn Generator>,
    reference: String,
    retrieval: RetrievalSettings,
    related: RelatedSettings,
    retry: RetrySettings,
}

impl QueryPipeline {
    /// Wires a pipeline from already-built parts.
    ///
    /// Fails with `InvalidConfig` when a configured reference fragment id is
    /// not in the corpus.
    pub fn new(
        corpus: Arc<Corpus>,
        embedder: Box<dyn Embedder>,
        reranker: Box<dyn Reranker>,
        generator: Box<dyn Generator>,
        settings: &Settings,
    ) -> Result<Self> {
        let store = corpus.store();
        let reference = match &settings.corpus.reference_fragment_id {
            Some(id) => store
                .find(id)
                .map(|f| f.content.clone())
                .ok_or_else(|| Error::InvalidConfig(format!("reference fragment '{id}' is not in the corpus")))?,
            None => store.first().map(|f| f.content.clone()).unwrap_or_default(),
        };
        if corpus.dim() != settings.retrieval.embedding_dim {
            warn!(
                index_dim = corpus.dim(),
                configured_dim = settings.retrieval.embedding_dim,
                "retrieval.embedding_dim differs from the loaded index; the index wins"
            );
        }
        Ok(Self {
            corpus,
            embedder,
            reranker,
            generator,
            reference,
            retrieval: settings.retrieval.clone(),
            related: settings.related.clone(),
            retry: settings.retry.clone(),
        })
    }

    /// Loads the corpus and builds the inference clients named in `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let corpus = Arc::new(Corpus::load(&settings.corpus)?);
        Self::new(
            corpus,
            lexrag_inference::embedder_from_settings(settings)?,
            lexrag_inference::reranker_from_settings(settings)?,
            lexrag_inference::generator_from_settings(settings)?,
            settings,
        )
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Embedding, vector search and rerank, without generation.
    pub fn retrieve(&self, query: &str) -> Result<Vec<RankedHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("query is empty".into()));
        }

        let vector = self.with_retry("embedding", || self.embedder.embed(query))?;
        if vector.len() != self.corpus.dim() {
            return Err(Error::DimensionMismatch { expected: self.corpus.dim(), actual: vector.len() });
        }

        let hits = self.corpus.search(&vector, self.retrieval.search_k)?;
        if hits.is_empty() {
            return Ok(Vec::new());
        }

        let top_n = self.retrieval.rerank_top_n;
        let ranked = self.with_retry("rerank", || rerank(self.reranker.as_ref(), query, &hits, top_n))?;
        debug!(hits = hits.len(), ranked = ranked.len(), "retrieval complete");
        Ok(ranked)
    }

    /// Answers `query` from the corpus. Returns an empty string when no
    /// usable context was found.
    pub fn run_query(&self, query: &str) -> Result<String> {
        let ranked = self.retrieve(query)?;
        if ranked.is_empty() {
            warn!("no usable context for query; returning empty answer");
            return Ok(String::new());
        }
        let prompt = build_prompt(query.trim(), &ranked, &self.reference);
        let answer = self.with_retry("generation", || self.generator.generate(&prompt))?;
        info!(citations = ranked.len(), chars = answer.len(), "LLM answer generated");
        Ok(answer)
    }

    /// Up to three follow-up questions for a non-empty answer.
    ///
    /// Never fails: any error degrades to an empty list.
    pub fn related_questions(&self, query: &str, answer: &str) -> Vec<String> {
        if answer.trim().is_empty() {
            return Vec::new();
        }
        let prompt = build_related_prompt(query.trim(), answer, self.related.answer_prefix_chars);
        match self.generator.generate(&prompt) {
            Ok(text) => parse_related(&text, self.related.min_question_chars),
            Err(e) => {
                warn!(error = %e, "related questions unavailable");
                Vec::new()
            }
        }
    }

    pub fn answer(&self, query: &str) -> Result<Answer> {
        let answer = self.run_query(query)?;
        let related_questions = self.related_questions(query, &answer);
        Ok(Answer { answer, related_questions })
    }

    fn with_retry<T>(&self, stage: &str, mut call: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempt = 0usize;
        loop {
            match call() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = retry_backoff(self.retry.backoff_ms, attempt);
                    debug!(stage, attempt, delay_ms = delay.as_millis() as u64, error = %e, "transient failure, retrying");
                    thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn retry_backoff(base_ms: u64, attempt: usize) -> Duration {
    let exp = attempt.saturating_sub(1).min(5) as u32;
    Duration::from_millis(base_ms.saturating_mul(1 << exp))
}
