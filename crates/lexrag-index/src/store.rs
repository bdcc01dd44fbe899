//! Ordered fragment store loaded from the corpus JSON artifact.

use std::fs;
use std::path::Path;

use lexrag_core::types::Fragment;
use lexrag_core::{Error, Result};

/// Fragments in index-row order. Position `i` holds the text whose embedding
/// is row `i` of the vector index.
#[derive(Debug, Clone, Default)]
pub struct FragmentStore {
    fragments: Vec<Fragment>,
}

impl FragmentStore {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Reads a JSON array of `{ "id", "content" }` records, keeping file order.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingArtifact { path: path.to_path_buf() });
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::CorruptArtifact { path: path.to_path_buf(), reason: e.to_string() })?;
        let fragments: Vec<Fragment> = serde_json::from_str(&raw)
            .map_err(|e| Error::CorruptArtifact { path: path.to_path_buf(), reason: e.to_string() })?;
        Ok(Self { fragments })
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Positional lookup; `None` when `row` is past the end.
    pub fn get(&self, row: usize) -> Option<&Fragment> {
        self.fragments.get(row)
    }

    pub fn find(&self, id: &str) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.id == id)
    }

    pub fn first(&self) -> Option<&Fragment> {
        self.fragments.first()
    }
}
