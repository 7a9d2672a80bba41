use crate::error::{Result, VectorStoreError};
use crate::types::{SearchResult, SummaryRecord};
use ndarray::ArrayView1;
use std::fs;
use std::path::Path;

/// In-memory store of summary records with JSON persistence.
///
/// Records keep insertion order; every vector must share the dimension of
/// the first one added.
#[derive(Debug, Default)]
pub struct VectorStore {
    records: Vec<SummaryRecord>,
    dimension: Option<usize>,
    next_id: usize,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, assigning the next id.
    pub fn add(&mut self, callable: &str, summary: &str, vector: Vec<f32>) -> Result<usize> {
        match self.dimension {
            Some(expected) if expected != vector.len() => {
                return Err(VectorStoreError::InvalidDimension {
                    expected,
                    actual: vector.len(),
                });
            }
            None => self.dimension = Some(vector.len()),
            _ => {}
        }

        let id = self.next_id;
        self.next_id += 1;
        self.records.push(SummaryRecord {
            id,
            callable: callable.to_string(),
            summary: summary.to_string(),
            vector,
        });
        log::debug!("stored record {id} for '{callable}'");
        Ok(id)
    }

    pub fn records(&self) -> &[SummaryRecord] {
        &self.records
    }

    pub fn get(&self, callable: &str) -> Option<&SummaryRecord> {
        self.records.iter().find(|record| record.callable == callable)
    }

    /// Remove the first record for a callable. Returns whether one existed.
    pub fn delete(&mut self, callable: &str) -> bool {
        match self.records.iter().position(|record| record.callable == callable) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false,
        }
    }

    /// Rank all records by inner product against the query, best first.
    pub fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        if let Some(expected) = self.dimension {
            if expected != query.len() {
                return Err(VectorStoreError::InvalidDimension {
                    expected,
                    actual: query.len(),
                });
            }
        }

        let query = ArrayView1::from(query);
        let mut results: Vec<SearchResult> = self
            .records
            .iter()
            .map(|record| SearchResult {
                record: record.clone(),
                score: ArrayView1::from(record.vector.as_slice()).dot(&query),
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit);
        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Save all records as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.records)?;
        fs::write(&path, data)?;
        log::info!("saved {} records to {:?}", self.records.len(), path.as_ref());
        Ok(())
    }

    /// Load records saved by [`VectorStore::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(&path)?;
        let records: Vec<SummaryRecord> = serde_json::from_str(&data)?;

        let dimension = records.first().map(|record| record.vector.len());
        let next_id = records.iter().map(|record| record.id + 1).max().unwrap_or(0);
        log::info!("loaded {} records from {:?}", records.len(), path.as_ref());

        Ok(Self {
            records,
            dimension,
            next_id,
        })
    }
}
