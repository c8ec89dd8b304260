use crate::constants::{PERCENT_SUFFIX, VOLUME_MILLION_MULTIPLIER, VOLUME_MILLION_SUFFIX};
use crate::utils::{parse_float_prefix, parse_timestamp};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One CSV row as parsed, before filtering and deduplication
///
/// `last`, `high` and `low` are typed at parse time: a cell that is not a
/// plain decimal becomes `None`. `vol_` and `chg_%` stay raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Instrument identifier
    pub name: String,

    /// Observation time as written in the file
    pub timestamp: String,

    /// Last traded price
    pub last: Option<f64>,

    pub high: Option<f64>,

    pub low: Option<f64>,

    /// Raw volume, e.g. `"12.5M"` or `"830000"`
    pub vol: String,

    /// Raw change percentage, e.g. `"-0.38%"`
    pub chg_percent: String,
}

impl RawRecord {
    /// A row is kept only with a non-empty name and timestamp and a numeric `last`
    pub fn is_retained(&self) -> bool {
        !self.name.is_empty() && !self.timestamp.is_empty() && self.last.is_some()
    }
}

/// Anything identified by a (timestamp, instrument) pair
pub trait Observation {
    fn dedup_key(&self) -> DedupKey;
}

impl Observation for RawRecord {
    fn dedup_key(&self) -> DedupKey {
        DedupKey {
            timestamp: self.timestamp.clone(),
            name: self.name.clone(),
        }
    }
}

impl Observation for NormalizedRecord {
    fn dedup_key(&self) -> DedupKey {
        DedupKey {
            timestamp: self.timestamp.clone(),
            name: self.name.clone(),
        }
    }
}

/// Identity of one observation: (timestamp, instrument)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub timestamp: String,
    pub name: String,
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.timestamp, self.name)
    }
}

/// A retained record with derived numeric fields
///
/// # Missing data
/// `vol_num` and `chg_percent_num` are best-effort: malformed or empty source
/// text gives `None` rather than dropping the record. Aggregates over these
/// fields must decide how to treat `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub name: String,

    pub timestamp: String,

    /// Always numeric: the retention filter guarantees it
    pub last: f64,

    pub high: Option<f64>,

    pub low: Option<f64>,

    #[serde(rename = "vol_")]
    pub vol: String,

    #[serde(rename = "chg_%")]
    pub chg_percent: String,

    /// Volume in absolute units (`"1.5M"` -> 1_500_000)
    #[serde(rename = "volNum")]
    pub vol_num: Option<f64>,

    /// Change percentage as a plain number (`"-0.38%"` -> -0.38)
    #[serde(rename = "chgPercentNum")]
    pub chg_percent_num: Option<f64>,
}

impl NormalizedRecord {
    /// Build the normalized view of a retained raw record.
    ///
    /// Returns `None` if the record has no numeric `last`.
    pub fn from_raw(raw: RawRecord) -> Option<Self> {
        let last = raw.last?;
        let vol_num = parse_volume(&raw.vol);
        let chg_percent_num = parse_change_percent(&raw.chg_percent);

        Some(Self {
            name: raw.name,
            timestamp: raw.timestamp,
            last,
            high: raw.high,
            low: raw.low,
            vol: raw.vol,
            chg_percent: raw.chg_percent,
            vol_num,
            chg_percent_num,
        })
    }

    /// Parsed observation time, if the timestamp is in a known format
    pub fn parsed_time(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }
}

/// `"12.5M"` -> 12_500_000, `"830000"` -> 830_000, garbage -> `None`
pub fn parse_volume(raw: &str) -> Option<f64> {
    match raw.strip_suffix(VOLUME_MILLION_SUFFIX) {
        Some(millions) => parse_float_prefix(millions).map(|v| v * VOLUME_MILLION_MULTIPLIER),
        None => parse_float_prefix(raw),
    }
}

/// `"-0.38%"` -> -0.38, garbage -> `None`
pub fn parse_change_percent(raw: &str) -> Option<f64> {
    let number = raw.strip_suffix(PERCENT_SUFFIX).unwrap_or(raw);
    parse_float_prefix(number)
}
