//! # Codemap Parser
//!
//! Structural parsing of Python source into the declaration/call tree the
//! call-graph builder walks.
//!
//! ## Architecture
//!
//! ```text
//! Source Code
//!     │
//!     ├──> Tree-sitter Parsing → CST
//!     │
//!     ├──> Condensation
//!     │    ├─> Function / class declarations (with nesting preserved)
//!     │    ├─> Call expressions (bare-name and qualified)
//!     │    └─> Everything else collapsed away
//!     │
//!     └──> ParseTree (input to codemap-graph)
//! ```
//!
//! Calls whose callee or receiver is not a simple name are dropped; their
//! arguments are still walked so nested calls are not lost. Abstract-base
//! and `Test`-prefixed classes are marked excluded: their bodies are walked
//! but they never contribute a class qualification.

mod error;
mod parser;
mod types;

pub use error::{ParserError, Result};
pub use parser::SourceParser;
pub use types::{CallExpr, ParseTree, SyntaxNode};
