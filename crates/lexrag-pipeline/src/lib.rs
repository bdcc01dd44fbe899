//! lexrag-pipeline
//!
//! Rerank join, prompt assembly, related-question suggestions and the
//! `QueryPipeline` that runs a question end to end.

pub mod pipeline;
pub mod prompt;
pub mod related;
pub mod rerank;

pub use pipeline::QueryPipeline;
pub use prompt::build_prompt;
pub use related::{build_related_prompt, parse_related};
pub use rerank::rerank;
