use crate::constants::csv_column;
use crate::error::{AppError, Result};
use crate::models::RawRecord;
use crate::utils::parse_number_cell;
use csv::{ReaderBuilder, StringRecord};

/// Positions of the required columns in the header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    name: usize,
    timestamp: usize,
    last: usize,
    high: usize,
    low: usize,
    vol: usize,
    chg_percent: usize,
}

impl ColumnIndex {
    /// Locate every required column; missing ones fail on the header (row 0)
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |column: &str| headers.iter().position(|header| header.trim() == column);

        let missing: Vec<&str> = csv_column::REQUIRED
            .iter()
            .copied()
            .filter(|column| position(*column).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::parse(
                format!("Missing required column(s): {}", missing.join(", ")),
                0,
            ));
        }

        let find = |column: &str| -> Result<usize> {
            position(column)
                .ok_or_else(|| AppError::parse(format!("Missing required column '{}'", column), 0))
        };

        Ok(Self {
            name: find(csv_column::NAME)?,
            timestamp: find(csv_column::TIMESTAMP)?,
            last: find(csv_column::LAST)?,
            high: find(csv_column::HIGH)?,
            low: find(csv_column::LOW)?,
            vol: find(csv_column::VOLUME)?,
            chg_percent: find(csv_column::CHANGE_PERCENT)?,
        })
    }

    fn extract(&self, record: &StringRecord) -> RawRecord {
        let text = |idx: usize| record.get(idx).unwrap_or("").to_string();
        let number = |idx: usize| record.get(idx).and_then(parse_number_cell);

        RawRecord {
            name: text(self.name),
            timestamp: text(self.timestamp),
            last: number(self.last),
            high: number(self.high),
            low: number(self.low),
            vol: text(self.vol),
            chg_percent: text(self.chg_percent),
        }
    }
}

/// Parse stock CSV text into raw records.
///
/// The first row is the header. Blank lines are skipped. `last`, `high` and
/// `low` are typed as numbers; every other field stays text. The first
/// malformed row aborts the parse with its 1-based data row number.
pub fn parse_stock_csv(text: &str) -> Result<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::parse(describe_csv_error(&e), 0))?
        .clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| AppError::parse(describe_csv_error(&e), idx + 1))?;
        records.push(columns.extract(&record));
    }

    Ok(records)
}

fn describe_csv_error(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
            let which = if len < expected_len { "few" } else { "many" };
            format!(
                "Too {} fields: expected {} fields but parsed {}",
                which, expected_len, len
            )
        }
        csv::ErrorKind::Utf8 { .. } => "Invalid UTF-8 in field".to_string(),
        _ => err.to_string(),
    }
}
