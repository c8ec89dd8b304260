//! Query the stock REST backend
//!
//! - no filters: one page of all records, newest first
//! - `--name`: all records for that name
//! - `--start/--end`: records inside the range
//! - both: records for the name inside the range

use crate::error::{AppError, Result};
use crate::models::RemoteStockRecord;
use crate::services::StockApiClient;
use crate::utils::{get_stock_api_url, parse_timestamp};
use chrono::NaiveDateTime;

pub async fn run(name: Option<String>, start: Option<String>, end: Option<String>, page: usize, size: usize) {
    match search(name, start, end, page, size).await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn search(
    name: Option<String>,
    start: Option<String>,
    end: Option<String>,
    page: usize,
    size: usize,
) -> Result<()> {
    let client = StockApiClient::new(get_stock_api_url())?;
    let range = parse_range(start.as_deref(), end.as_deref())?;

    let records = match (name, range) {
        (Some(name), Some((start, end))) => client.advanced_search(&name, start, end).await?,
        (Some(name), None) => client.search_by_name(&name).await?,
        (None, Some((start, end))) => client.search_by_time(start, end).await?,
        (None, None) => {
            let page = client.fetch_all(page, size).await?;
            println!(
                "📄 Page {} of {} ({} records total)\n",
                page.number + 1,
                page.total_pages.max(1),
                page.total_elements
            );
            page.content
        }
    };

    print_records(&records);
    Ok(())
}

/// Both bounds or neither
fn parse_range(start: Option<&str>, end: Option<&str>) -> Result<Option<(NaiveDateTime, NaiveDateTime)>> {
    match (start, end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => {
            let start_time = parse_timestamp(start)
                .ok_or_else(|| AppError::InvalidInput(format!("Invalid start time: {}", start)))?;
            let end_time = parse_timestamp(end)
                .ok_or_else(|| AppError::InvalidInput(format!("Invalid end time: {}", end)))?;
            Ok(Some((start_time, end_time)))
        }
        _ => Err(AppError::InvalidInput(
            "--start and --end must be given together".to_string(),
        )),
    }
}

fn print_records(records: &[RemoteStockRecord]) {
    if records.is_empty() {
        println!("⚠️  No records found");
        return;
    }

    println!("{:<12} {:<20} {:>10} {:>10} {:>10} {:>10}", "Name", "Time", "Last", "High", "Low", "Chg%");
    for record in records {
        println!(
            "{:<12} {:<20} {:>10} {:>10} {:>10} {:>10}",
            record.name.as_deref().unwrap_or("-"),
            record.timestamp.as_deref().unwrap_or("-"),
            format_price(record.last),
            format_price(record.high),
            format_price(record.low),
            record.chg_percent.as_deref().unwrap_or("-"),
        );
    }
}

fn format_price(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}
