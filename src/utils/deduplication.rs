//! Observation Deduplication
//!
//! One observation per (timestamp, instrument). When a key repeats, the later
//! row replaces the earlier one but keeps the slot where the key first
//! appeared, the way an insertion-ordered map behaves on overwrite.

use crate::models::{DedupKey, Observation};
use std::collections::HashMap;

/// Last-write-wins deduplication keyed on `timestamp + name`
pub struct RecordDeduplicator;

impl RecordDeduplicator {
    /// Deduplication key for a row
    pub fn get_key<T: Observation>(record: &T) -> DedupKey {
        record.dedup_key()
    }

    /// Collapse rows sharing a key, keeping the last value of each key.
    ///
    /// Output order is the order in which each key was first seen.
    pub fn deduplicate<T: Observation>(records: Vec<T>) -> Vec<T> {
        let mut positions: HashMap<DedupKey, usize> = HashMap::with_capacity(records.len());
        let mut unique: Vec<T> = Vec::with_capacity(records.len());

        for record in records {
            let key = Self::get_key(&record);
            match positions.get(&key) {
                Some(&slot) => unique[slot] = record,
                None => {
                    positions.insert(key, unique.len());
                    unique.push(record);
                }
            }
        }

        unique
    }

    /// Count rows that would be replaced by a later row with the same key
    pub fn count_duplicates<T: Observation>(records: &[T]) -> usize {
        let mut seen = std::collections::HashSet::with_capacity(records.len());
        records
            .iter()
            .filter(|record| !seen.insert(Self::get_key(*record)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRecord;

    fn row(name: &str, timestamp: &str, last: f64) -> RawRecord {
        RawRecord {
            name: name.to_string(),
            timestamp: timestamp.to_string(),
            last: Some(last),
            high: None,
            low: None,
            vol: String::new(),
            chg_percent: String::new(),
        }
    }

    #[test]
    fn test_last_occurrence_wins() {
        let records = vec![
            row("AAPL", "2024-01-01", 10.0),
            row("MSFT", "2024-01-01", 20.0),
            row("AAPL", "2024-01-01", 11.0),
        ];

        let unique = RecordDeduplicator::deduplicate(records);

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].name, "AAPL");
        assert_eq!(unique[0].last, Some(11.0));
        assert_eq!(unique[1].name, "MSFT");
    }

    #[test]
    fn test_same_name_different_time_is_kept() {
        let records = vec![
            row("AAPL", "2024-01-01", 10.0),
            row("AAPL", "2024-01-02", 12.0),
        ];
        assert_eq!(RecordDeduplicator::deduplicate(records).len(), 2);
    }

    #[test]
    fn test_count_duplicates() {
        let records = vec![
            row("AAPL", "2024-01-01", 10.0),
            row("AAPL", "2024-01-01", 11.0),
            row("AAPL", "2024-01-01", 12.0),
            row("MSFT", "2024-01-01", 20.0),
        ];
        assert_eq!(RecordDeduplicator::count_duplicates(&records), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(RecordDeduplicator::deduplicate(Vec::<RawRecord>::new()).is_empty());
        assert_eq!(RecordDeduplicator::count_duplicates::<RawRecord>(&[]), 0);
    }
}
