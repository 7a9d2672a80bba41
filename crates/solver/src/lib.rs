//! # Codemap Solver
//!
//! Bounded ternary task decomposition: a free-text task is split into at
//! most three sub-tasks per node, breadth-first down to a depth limit, then
//! resolved bottom-up so every node's answer can build on its sub-answers.
//!
//! ## Architecture
//!
//! ```text
//! Task text
//!     │
//!     ├──> Expansion (breadth-first, depth-bounded)
//!     │      ├─ breakdown-needed oracle (or force override)
//!     │      ├─ breakdown oracle → up to 3 children per node
//!     │      └─ depth counter guarantees termination
//!     │
//!     └──> Resolution (bottom-up, write-once)
//!            ├─ children resolved first, in order
//!            ├─ child results concatenated into the parent's context
//!            └─ solve oracle per node
//! ```

mod error;
mod solver;
mod tree;

pub use error::{Result, SolverError};
pub use solver::{SolverConfig, TaskSolver, DEFAULT_MAX_DEPTH};
pub use tree::TaskNode;
