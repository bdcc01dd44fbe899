#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Shared building blocks for the lexrag workspace: domain types, the traits
//! placed at the inference and index seams, the error taxonomy, configuration
//! and the script-direction heuristic.

pub mod config;
pub mod error;
pub mod lang;
pub mod traits;
pub mod types;

pub use error::{Error, Result, Service};
