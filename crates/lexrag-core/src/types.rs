//! Domain types shared by the index, inference and pipeline crates.

use serde::{Deserialize, Serialize};

pub type FragmentId = String;

/// A query or corpus embedding. Dimensionality is fixed per corpus build.
pub type Embedding = Vec<f32>;

/// One addressable unit of statute text (typically a single article).
///
/// `id` is assigned at corpus-build time and is stable for the lifetime of
/// an index build. Position in the fragment store equals the row of the
/// fragment's embedding in the vector index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub id: FragmentId,
    pub content: String,
}

/// A fragment resolved from a vector index row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: FragmentId,
    pub content: String,
}

impl From<&Fragment> for SearchHit {
    fn from(fragment: &Fragment) -> Self {
        Self { id: fragment.id.clone(), content: fragment.content.clone() }
    }
}

/// A search hit after cross-encoder reranking, in the ranker's order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedHit {
    pub fragment_id: FragmentId,
    pub content: String,
    pub relevance_score: f32,
}

/// One entry of a rerank response: a position into the submitted batch and
/// its relevance. The position is untrusted until checked against the batch;
/// it is signed so that negative positions survive parsing and are rejected
/// there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RerankScore {
    pub index: i64,
    pub relevance_score: f32,
}

/// Raw nearest-neighbour output of a vector index, best first.
///
/// Rows are signed so that padding or corrupted entries (negative, or past
/// the end of the fragment store) can be represented and rejected later.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighbors {
    pub scores: Vec<f32>,
    pub rows: Vec<i64>,
}

/// Final response of the question-answering surface.
///
/// An empty `answer` means no grounded answer was available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub related_questions: Vec<String>,
}

impl Answer {
    pub fn is_empty(&self) -> bool {
        self.answer.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_reads_corpus_record() {
        let raw = r#"{"id": "12", "content": "Annual leave is 21 days."}"#;
        let fragment: Fragment = serde_json::from_str(raw).expect("parse");
        assert_eq!(fragment.id, "12");
        assert_eq!(SearchHit::from(&fragment).content, "Annual leave is 21 days.");
    }

    #[test]
    fn whitespace_answer_counts_as_empty() {
        let answer = Answer { answer: "  \n".into(), related_questions: vec![] };
        assert!(answer.is_empty());
    }
}
