//! The immutable corpus snapshot: fragment store plus vector index.
//!
//! Both artifacts are loaded once and only read afterwards, so a `Corpus`
//! can be shared across threads without locking. Row/fragment alignment is
//! an offline build guarantee; search still treats any row it cannot resolve
//! as a desync and drops it.

use tracing::{info, warn};

use lexrag_core::config::CorpusSettings;
use lexrag_core::traits::VectorIndex;
use lexrag_core::types::SearchHit;
use lexrag_core::Result;

use crate::flat::{normalize_l2, FlatIndex};
use crate::store::FragmentStore;

pub struct Corpus {
    store: FragmentStore,
    index: Box<dyn VectorIndex>,
}

impl Corpus {
    pub fn new(store: FragmentStore, index: Box<dyn VectorIndex>) -> Self {
        if store.len() != index.count() {
            warn!(
                fragments = store.len(),
                vectors = index.count(),
                "fragment store and vector index sizes differ; corpus build may be out of sync"
            );
        }
        Self { store, index }
    }

    /// Loads the fragment store and flat index named in `settings`.
    ///
    /// A missing or unreadable artifact is a startup failure.
    pub fn load(settings: &CorpusSettings) -> Result<Self> {
        let index_path = settings.index_path();
        let fragments_path = settings.fragments_path();
        let index = FlatIndex::load(&index_path)?;
        let store = FragmentStore::load(&fragments_path)?;
        info!(
            vectors = index.count(),
            fragments = store.len(),
            dim = index.dim(),
            "Loaded {} vectors and {} text fragments",
            index.count(),
            store.len()
        );
        Ok(Self::new(store, Box::new(index)))
    }

    pub fn vector_count(&self) -> usize {
        self.index.count()
    }

    pub fn fragment_count(&self) -> usize {
        self.store.len()
    }

    pub fn dim(&self) -> usize {
        self.index.dim()
    }

    pub fn store(&self) -> &FragmentStore {
        &self.store
    }

    /// Nearest fragments for `vector`, best first.
    ///
    /// The query is L2-normalised the same way corpus rows are. Rows outside
    /// the fragment store are logged and skipped; an empty result means no
    /// usable context, not an error.
    pub fn search(&self, vector: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        let mut query = vector.to_vec();
        normalize_l2(&mut query);
        let neighbors = self.index.search(&query, k)?;
        let mut hits = Vec::with_capacity(neighbors.rows.len());
        for &row in &neighbors.rows {
            let fragment = usize::try_from(row).ok().and_then(|r| self.store.get(r));
            match fragment {
                Some(f) => hits.push(SearchHit::from(f)),
                None => warn!(
                    row,
                    fragments = self.store.len(),
                    "vector index returned a row outside the fragment store; skipping"
                ),
            }
        }
        info!("Retrieved {} results from index.", hits.len());
        Ok(hits)
    }
}
