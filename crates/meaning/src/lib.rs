//! # Codemap Meaning
//!
//! Bottom-up summarization of a call graph: every callee is described
//! before its callers, so each summary can build on the summaries of the
//! things it uses.
//!
//! ## Architecture
//!
//! ```text
//! CallGraph
//!     │
//!     ├──> Callable pass (memoized post-order)
//!     │      ├─ Explicit in-progress set guards cycles
//!     │      ├─ Callee summaries collected in sorted order
//!     │      └─ describe-leaf oracle per node, write-once
//!     │
//!     └──> Class pass (deferred)
//!            ├─ Aggregate method summaries per class
//!            └─ Fall back to the class body when none exist
//! ```
//!
//! Mutual recursion in the graph terminates: a callee that is part of a
//! cycle back to the current node is simply omitted from the context passed
//! to the oracle.

mod error;
mod store;
mod summarizer;

pub use error::{MeaningError, Result};
pub use store::SummaryStore;
pub use summarizer::{SourceFetch, Summarizer};
