//! # Codemap Vector Store
//!
//! Persistence and nearest-neighbor lookup for summary-plus-vector records.
//! The core only produces summary text; embedding happens at this boundary
//! via the oracle, and retrieval ranks records by inner product against a
//! query vector.

mod error;
mod store;
mod types;

pub use error::{Result, VectorStoreError};
pub use store::VectorStore;
pub use types::{SearchResult, SummaryRecord};
