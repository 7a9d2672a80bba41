//! # Codemap Indexer
//!
//! Selects the Python sources of a workspace (gitignore-aware walk with a
//! fixed exclusion list) and fetches declaration bodies by callable
//! identifier for the summarizer.

mod error;
mod fetcher;
mod scanner;

pub use error::{IndexerError, Result};
pub use fetcher::SourceFetcher;
pub use scanner::FileScanner;
