//! # Codemap Graph
//!
//! Static call-graph construction over the condensed parse tree.
//!
//! ## Architecture
//!
//! ```text
//! ParseTree
//!     │
//!     ├──> Graph Builder (context-threading walk)
//!     │      ├─ Qualify methods by enclosing class
//!     │      ├─ Record bare and qualified call edges
//!     │      └─ Mark opaque receivers / unresolved targets
//!     │
//!     └──> Finalization (single pass over the finished map)
//!            ├─ Promote references that resolved late
//!            ├─ Drop self-loops, built-ins, excluded callables
//!            └─ Deduplicate and sort deterministically
//! ```
//!
//! The builder never fails: anything it cannot resolve degrades into a
//! [`CalleeRef::Unresolved`] or [`CalleeRef::OpaqueReceiver`] entry instead
//! of a false edge.

mod builder;
mod builtins;
mod types;

pub use builder::GraphBuilder;
pub use types::{CallGraph, CallableId, CalleeRef};
