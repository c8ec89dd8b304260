pub mod deduplication;

use crate::constants::{
    DEFAULT_CSV_FILE_NAME, DEFAULT_PUBLIC_DIR, DEFAULT_PUBLIC_URL, DEFAULT_STOCK_API_URL,
    LAST_UPDATE_FORMAT,
};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::path::PathBuf;

/// Get public data root URL from environment variable or use default
pub fn get_public_url() -> String {
    std::env::var("STOCK_PUBLIC_URL").unwrap_or_else(|_| DEFAULT_PUBLIC_URL.to_string())
}

/// Get CSV file name from environment variable or use default
pub fn get_csv_file_name() -> String {
    std::env::var("STOCK_CSV_FILE").unwrap_or_else(|_| DEFAULT_CSV_FILE_NAME.to_string())
}

/// Get the directory served as the public root
pub fn get_public_dir() -> PathBuf {
    std::env::var("PUBLIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_PUBLIC_DIR))
}

/// Get REST backend base URL from environment variable or use default
pub fn get_stock_api_url() -> String {
    std::env::var("STOCK_API_URL").unwrap_or_else(|_| DEFAULT_STOCK_API_URL.to_string())
}

/// Root a file name at the public data location: `"/" + name`,
/// with a single leading `/` removed from `name` first.
pub fn public_file_path(file_name: &str) -> String {
    let trimmed = file_name.strip_prefix('/').unwrap_or(file_name);
    format!("/{}", trimmed)
}

/// Join a public root URL and a rooted path without doubling the slash
pub fn join_url(base: &str, rooted_path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), rooted_path)
}

/// Wall-clock "last updated" stamp
pub fn format_update_time(now: DateTime<Local>) -> String {
    now.format(LAST_UPDATE_FORMAT).to_string()
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse a CSV timestamp in any of the formats seen in exports.
///
/// Date-only values resolve to midnight. Returns `None` for anything else.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    const DATETIME_FORMATS: [&str; 5] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Parse a whole cell as a finite decimal number (surrounding whitespace allowed)
pub fn parse_number_cell(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the longest numeric prefix of `value`, skipping leading whitespace.
///
/// `"12.5abc"` gives 12.5, `"abc"` gives `None`, `"1e3x"` gives 1000.
pub fn parse_float_prefix(value: &str) -> Option<f64> {
    let s = value.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let rest = &s[end..];
    if rest.starts_with("Infinity") {
        return if s.starts_with('-') {
            Some(f64::NEG_INFINITY)
        } else {
            Some(f64::INFINITY)
        };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
