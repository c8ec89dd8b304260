use super::{DedupKey, NormalizedRecord, Observation};
use crate::utils::deduplication::RecordDeduplicator;
use std::collections::HashMap;

/// Unique observations in load order, addressable by dedup key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<NormalizedRecord>,
    index: HashMap<DedupKey, usize>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deduplicate `records` (last write wins, first-seen slot) and index them
    pub fn from_records(records: Vec<NormalizedRecord>) -> Self {
        let records = RecordDeduplicator::deduplicate(records);
        let index = records
            .iter()
            .enumerate()
            .map(|(slot, record)| (record.dedup_key(), slot))
            .collect();
        Self { records, index }
    }

    pub fn get(&self, key: &DedupKey) -> Option<&NormalizedRecord> {
        self.index.get(key).map(|&slot| &self.records[slot])
    }

    pub fn contains_key(&self, key: &DedupKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedRecord> {
        self.records.iter()
    }
}
