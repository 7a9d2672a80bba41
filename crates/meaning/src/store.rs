use codemap_graph::CallableId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Write-once mapping from callable identifier to its summary.
///
/// A `None` entry is a reserved slot: a class registered while one of its
/// methods was summarized, awaiting the deferred class pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryStore {
    entries: BTreeMap<CallableId, Option<String>>,
}

impl SummaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_summarized(&self, id: &CallableId) -> bool {
        matches!(self.entries.get(id), Some(Some(_)))
    }

    pub fn get(&self, id: &CallableId) -> Option<&str> {
        self.entries.get(id).and_then(|entry| entry.as_deref())
    }

    /// Record a computed summary. The first write wins; a repeat insert is
    /// reported back as `false` and changes nothing.
    pub fn insert(&mut self, id: CallableId, summary: String) -> bool {
        let slot = self.entries.entry(id).or_insert(None);
        if slot.is_some() {
            return false;
        }
        *slot = Some(summary);
        true
    }

    /// Reserve a pending slot without writing a summary.
    pub fn reserve(&mut self, id: CallableId) {
        self.entries.entry(id).or_insert(None);
    }

    /// Identifiers whose slot is still pending.
    pub fn pending(&self) -> Vec<CallableId> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_none())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// All computed summaries, in identifier order.
    pub fn summaries(&self) -> impl Iterator<Item = (&CallableId, &str)> {
        self.entries
            .iter()
            .filter_map(|(id, entry)| entry.as_deref().map(|summary| (id, summary)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
