use serde::{Deserialize, Serialize};

/// One callable's summary and its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub id: usize,
    pub callable: String,
    pub summary: String,
    pub vector: Vec<f32>,
}

/// A record matched by similarity search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub record: SummaryRecord,
    pub score: f32,
}
