use tracing::{debug, warn};

use lexrag_core::traits::Reranker;
use lexrag_core::types::{RankedHit, SearchHit};
use lexrag_core::Result;

/// Reranks `candidates` against `query` in one remote call and joins the
/// returned positions back to the candidates.
///
/// Positions outside the submitted batch are dropped with a warning. The
/// ranker's order is kept and the output never exceeds `top_n`.
pub fn rerank(
    reranker: &dyn Reranker,
    query: &str,
    candidates: &[SearchHit],
    top_n: usize,
) -> Result<Vec<RankedHit>> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }
    let documents: Vec<&str> = candidates.iter().map(|c| c.content.as_str()).collect();
    let scores = reranker.rerank(query, &documents, top_n)?;
    debug!(candidates = candidates.len(), returned = scores.len(), "rerank complete");

    let mut ranked = Vec::with_capacity(scores.len().min(top_n));
    for score in scores {
        if ranked.len() >= top_n {
            break;
        }
        let Some(hit) = usize::try_from(score.index).ok().and_then(|i| candidates.get(i)) else {
            warn!(index = score.index, batch = candidates.len(), "reranker returned a position outside the batch; skipping");
            continue;
        };
        ranked.push(RankedHit {
            fragment_id: hit.id.clone(),
            content: hit.content.clone(),
            relevance_score: score.relevance_score,
        });
    }
    Ok(ranked)
}
