//! lexrag-index
//!
//! Corpus artifacts: the ordered fragment store, the flat inner-product
//! vector index, and `Corpus`, which joins them for bounds-checked search.

pub mod corpus;
pub mod flat;
pub mod store;

pub use corpus::Corpus;
pub use flat::{normalize_l2, FlatIndex};
pub use store::FragmentStore;
