use crate::models::{IngestConfig, StockState};
use crate::services::StockStore;
use std::path::PathBuf;

pub async fn run(config: IngestConfig, file: Option<PathBuf>) {
    match load_state(config, file).await {
        Ok(state) => print_summary(&state),
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Build a store, run one load and hand back the resulting state.
/// A load failure is returned as an error instead of staying in the state.
pub async fn load_state(config: IngestConfig, file: Option<PathBuf>) -> Result<StockState, Box<dyn std::error::Error>> {
    let store = StockStore::new(config)?;

    match &file {
        Some(path) => println!("📂 Loading {}", path.display()),
        None => println!("🌐 Fetching {}", store.csv_url().await),
    }

    store.load(file.as_deref()).await;
    let state = store.snapshot().await;

    if !state.error.is_empty() {
        return Err(state.error.into());
    }
    Ok(state)
}

fn print_summary(state: &StockState) {
    let stats = state.price_stats();

    println!("✅ Stock data loaded ({})", state.last_update);
    println!("   📈 Records:     {}", state.total_count);
    println!("   🏷️  Instruments: {}", state.names.len());
    println!("   💰 Max price:   {:.2}", stats.max_price);
    println!("   💰 Min price:   {:.2}", stats.min_price);
    println!("   💰 Avg price:   {:.2}", stats.avg_price);

    if !state.names.is_empty() {
        println!("\n   {}", state.names.join(", "));
    }
}
