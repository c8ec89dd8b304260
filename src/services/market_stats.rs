use crate::models::{Dataset, GroupedByName, NormalizedRecord, PriceStats};
use crate::utils::round2;
use std::collections::BTreeSet;

/// Price statistics over every record's `last`; all zeros for an empty dataset
pub fn price_stats(dataset: &Dataset) -> PriceStats {
    if dataset.is_empty() {
        return PriceStats::default();
    }

    let mut max_price = f64::NEG_INFINITY;
    let mut min_price = f64::INFINITY;
    let mut sum = 0.0;

    for record in dataset.iter() {
        max_price = max_price.max(record.last);
        min_price = min_price.min(record.last);
        sum += record.last;
    }

    PriceStats {
        max_price,
        min_price,
        avg_price: round2(sum / dataset.len() as f64),
    }
}

/// Group records by instrument, preserving arrival order inside each group
pub fn group_by_name(records: &[NormalizedRecord]) -> GroupedByName {
    let mut grouped = GroupedByName::new();
    for record in records {
        grouped
            .entry(record.name.clone())
            .or_default()
            .push(record.clone());
    }
    grouped
}

/// Distinct instrument names, ascending
pub fn sorted_names(records: &[NormalizedRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Most recent record for an instrument.
///
/// Unparseable timestamps rank below every parseable one. On equal
/// timestamps the earliest record in arrival order wins.
pub fn latest_record<'a>(grouped: &'a GroupedByName, name: &str) -> Option<&'a NormalizedRecord> {
    let records = grouped.get(name)?;
    let mut iter = records.iter();
    let mut latest = iter.next()?;
    let mut latest_time = latest.parsed_time();

    for record in iter {
        let time = record.parsed_time();
        if time > latest_time {
            latest = record;
            latest_time = time;
        }
    }

    Some(latest)
}
