//! # Codemap Oracle
//!
//! The language-model capabilities the core algorithms consume: describing
//! callables and classes, deciding whether a task needs breaking down,
//! splitting it, solving it, and embedding text.
//!
//! One [`Oracle`] trait, two implementations selected at construction time:
//!
//! - [`OpenAiOracle`] — chat-completions and embeddings over HTTP
//! - [`CannedOracle`] — deterministic stand-in for offline runs and tests
//!
//! Every operation is synchronous at the call site; a failure or timeout
//! surfaces as an [`OracleError`] for that single call and never corrupts
//! results the caller already committed.

mod canned;
mod error;
mod openai;
mod prompts;

pub use canned::CannedOracle;
pub use error::{OracleError, Result};
pub use openai::OpenAiOracle;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// External language-model capabilities consumed by the core.
pub trait Oracle {
    /// Describe a function or method, given its body text, the summaries of
    /// the callables it calls, and its enclosing class name if any.
    fn describe_leaf(
        &self,
        body: &str,
        callee_summaries: &BTreeMap<String, String>,
        enclosing_class: Option<&str>,
    ) -> Result<String>;

    /// Describe a class from its method summaries, or from its body text
    /// when no method summaries exist.
    fn describe_class(
        &self,
        name: &str,
        body: &str,
        method_summaries: &BTreeMap<String, String>,
    ) -> Result<String>;

    /// Whether a task should be broken into sub-tasks.
    fn breakdown_needed(&self, task: &str) -> Result<bool>;

    /// Split a task into at most 3 sub-tasks, in order. May return fewer,
    /// including none for an indivisible task.
    fn breakdown(&self, task: &str) -> Result<Vec<String>>;

    /// Solve a task, optionally with context aggregated from sub-tasks.
    fn solve(&self, task: &str, context: Option<&str>) -> Result<String>;

    /// Embed text for similarity lookup.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Which oracle implementation to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleKind {
    OpenAi,
    Canned,
}

impl fmt::Display for OracleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleKind::OpenAi => f.write_str("openai"),
            OracleKind::Canned => f.write_str("canned"),
        }
    }
}

impl FromStr for OracleKind {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "openai" => Ok(OracleKind::OpenAi),
            "canned" => Ok(OracleKind::Canned),
            other => Err(format!("unknown oracle '{other}' (expected 'openai' or 'canned')")),
        }
    }
}

/// Construction-time settings for the live oracle.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub embedding_model: String,
    pub timeout: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: openai::DEFAULT_MODEL.to_string(),
            embedding_model: openai::DEFAULT_EMBEDDING_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Select an implementation at construction time.
pub fn create_oracle(kind: OracleKind, config: OracleConfig) -> Result<Box<dyn Oracle>> {
    match kind {
        OracleKind::OpenAi => Ok(Box::new(OpenAiOracle::new(config)?)),
        OracleKind::Canned => Ok(Box::new(CannedOracle::new())),
    }
}
