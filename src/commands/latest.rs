use crate::commands::load::load_state;
use crate::models::{IngestConfig, NormalizedRecord};
use std::path::PathBuf;

pub async fn run(config: IngestConfig, name: String, file: Option<PathBuf>) {
    let state = match load_state(config, file).await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    match state.latest_record(&name) {
        Some(record) => print_record(record),
        None => {
            eprintln!("⚠️  No records for '{}'", name);
            std::process::exit(1);
        }
    }
}

fn print_record(record: &NormalizedRecord) {
    println!("🔹 {} @ {}", record.name, record.timestamp);
    println!("   Last:   {:.2}", record.last);
    println!("   High:   {}", format_optional(record.high));
    println!("   Low:    {}", format_optional(record.low));
    println!("   Volume: {} ({})", record.vol, format_optional(record.vol_num));
    println!("   Change: {} ({})", record.chg_percent, format_optional(record.chg_percent_num));
}

fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}
