//! Stock CSV Ingestion Pipeline
//!
//! parse -> retain -> normalize -> deduplicate + aggregate
//!
//! Normalization is per row, so it runs before deduplication; the dataset
//! build is the single deduplication pass.
//!
//! Everything here is synchronous and works on owned values; the caller swaps
//! the resulting [`IngestedData`] into state only if every step succeeded.

use crate::error::Result;
use crate::models::{Dataset, IngestedData, NormalizedRecord, RawRecord};
use crate::services::csv_parser::parse_stock_csv;
use crate::services::market_stats::{group_by_name, sorted_names};
use crate::utils::deduplication::RecordDeduplicator;
use crate::utils::format_update_time;
use chrono::{DateTime, Local};
use tracing::debug;

/// Run the full pipeline over CSV text, stamping the current wall-clock time
pub fn ingest_csv_text(text: &str) -> Result<IngestedData> {
    ingest_csv_text_at(text, Local::now())
}

/// Same as [`ingest_csv_text`] with an explicit completion time
pub fn ingest_csv_text_at(text: &str, now: DateTime<Local>) -> Result<IngestedData> {
    let parsed = parse_stock_csv(text)?;
    let parsed_count = parsed.len();

    let retained = retain_valid(parsed);
    let retained_count = retained.len();
    let duplicate_count = RecordDeduplicator::count_duplicates(&retained);

    let normalized = normalize_records(retained);

    debug!(
        parsed = parsed_count,
        dropped = parsed_count - retained_count,
        duplicates = duplicate_count,
        "CSV ingestion pipeline finished"
    );

    Ok(aggregate(normalized, now))
}

/// Keep rows with a name, a timestamp and a numeric `last`
pub fn retain_valid(records: Vec<RawRecord>) -> Vec<RawRecord> {
    records.into_iter().filter(RawRecord::is_retained).collect()
}

/// Derive `volNum` / `chgPercentNum` for every retained row
pub fn normalize_records(records: Vec<RawRecord>) -> Vec<NormalizedRecord> {
    records
        .into_iter()
        .filter_map(NormalizedRecord::from_raw)
        .collect()
}

/// Deduplicate into the dataset, then derive groups, name index and count from it
pub fn aggregate(records: Vec<NormalizedRecord>, now: DateTime<Local>) -> IngestedData {
    let dataset = Dataset::from_records(records);
    let grouped = group_by_name(dataset.records());
    let names = sorted_names(dataset.records());

    IngestedData {
        total_count: dataset.len(),
        dataset,
        grouped,
        names,
        last_update: format_update_time(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::DedupKey;
    use chrono::TimeZone;

    const HEADER: &str = "name,timestamp,last,high,low,vol_,chg_%";

    fn key(timestamp: &str, name: &str) -> DedupKey {
        DedupKey {
            timestamp: timestamp.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_end_to_end_duplicate_and_malformed_volume() {
        let text = format!(
            "{}\n\
             MSFT,2024-01-01,400,405,395,20M,0.5%\n\
             AAPL,2024-01-01,190,191,189,oops,-1.2%\n\
             MSFT,2024-01-01,401,406,396,21M,0.7%\n",
            HEADER
        );

        let data = ingest_csv_text(&text).unwrap();

        assert_eq!(data.dataset.len(), 2);
        assert_eq!(data.total_count, 2);
        assert_eq!(data.names, vec!["AAPL", "MSFT"]);

        let missing_volume: Vec<_> = data.dataset.iter().filter(|r| r.vol_num.is_none()).collect();
        assert_eq!(missing_volume.len(), 1);
        assert_eq!(missing_volume[0].name, "AAPL");

        let msft = data.dataset.get(&key("2024-01-01", "MSFT")).unwrap();
        assert_eq!(msft.last, 401.0);
        assert_eq!(msft.vol_num, Some(21_000_000.0));
        assert_eq!(msft.chg_percent_num, Some(0.7));
    }

    #[test]
    fn test_invalid_rows_are_excluded() {
        let text = format!(
            "{}\n\
             ,2024-01-01,10,10,10,1M,1%\n\
             AAPL,,10,10,10,1M,1%\n\
             AAPL,2024-01-02,abc,10,10,1M,1%\n\
             AAPL,2024-01-03,12,12,12,1M,1%\n",
            HEADER
        );

        let data = ingest_csv_text(&text).unwrap();

        assert_eq!(data.dataset.len(), 1);
        assert!(!data.dataset.contains_key(&key("2024-01-01", "")));
        assert!(!data.dataset.contains_key(&key("2024-01-02", "AAPL")));
        assert!(data.dataset.contains_key(&key("2024-01-03", "AAPL")));
    }

    #[test]
    fn test_volume_and_percent_normalization() {
        let text = format!(
            "{}\n\
             A,t1,1,1,1,1.5M,2.5%\n\
             B,t1,1,1,1,830000,-0.38%\n",
            HEADER
        );

        let data = ingest_csv_text(&text).unwrap();
        let a = data.dataset.get(&key("t1", "A")).unwrap();
        let b = data.dataset.get(&key("t1", "B")).unwrap();

        assert_eq!(a.vol_num, Some(1.5 * 1_000_000.0));
        assert_eq!(a.chg_percent_num, Some(2.5));
        assert_eq!(b.vol_num, Some(830_000.0));
        assert_eq!(b.chg_percent_num, Some(-0.38));
    }

    #[test]
    fn test_groups_match_name_index() {
        let text = format!(
            "{}\n\
             ZZ,2024-01-01,1,1,1,1M,1%\n\
             AA,2024-01-01,2,2,2,1M,1%\n\
             ZZ,2024-01-02,3,3,3,1M,1%\n\
             MM,2024-01-01,4,4,4,1M,1%\n",
            HEADER
        );

        let data = ingest_csv_text(&text).unwrap();

        assert_eq!(data.names, vec!["AA", "MM", "ZZ"]);
        let mut group_keys: Vec<_> = data.grouped.keys().cloned().collect();
        group_keys.sort();
        assert_eq!(group_keys, data.names);

        let grouped_total: usize = data.grouped.values().map(Vec::len).sum();
        assert_eq!(grouped_total, data.total_count);
    }

    #[test]
    fn test_last_update_uses_completion_time() {
        let now = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let text = format!("{}\nA,t,1,1,1,1M,1%\n", HEADER);

        let data = ingest_csv_text_at(&text, now).unwrap();
        assert_eq!(data.last_update, "2024-03-05 14:07:09");
    }

    #[test]
    fn test_groups_hold_deduplicated_records_only() {
        let text = format!(
            "{}\n\
             AAPL,2024-01-01,1,1,1,1M,1%\n\
             AAPL,2024-01-02,2,2,2,1M,1%\n\
             AAPL,2024-01-01,3,3,3,1M,1%\n",
            HEADER
        );

        let data = ingest_csv_text(&text).unwrap();
        let aapl = &data.grouped["AAPL"];

        assert_eq!(data.total_count, 2);
        assert_eq!(aapl.len(), 2);
        assert_eq!(aapl[0].timestamp, "2024-01-01");
        assert_eq!(aapl[0].last, 3.0);
        assert_eq!(aapl[1].last, 2.0);
        assert_eq!(data.dataset.records(), aapl.as_slice());
    }

    #[test]
    fn test_parse_failure_propagates() {
        let text = format!("{}\nA,t,1\n", HEADER);
        assert!(matches!(ingest_csv_text(&text), Err(AppError::Parse { row: 1, .. })));
    }
}
