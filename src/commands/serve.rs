use crate::models::IngestConfig;
use crate::server::{self, AppState};
use crate::services::{PredictionService, StockStore};
use crate::utils::get_public_dir;
use std::sync::Arc;

pub async fn run(config: IngestConfig, port: u16) {
    println!("🚀 Starting stockboard server on port {}", port);

    let public_dir = get_public_dir();
    println!("📁 Public directory: {}", public_dir.display());

    // Predictions come from the same directory the server publishes, whatever port it binds
    let predictions = match PredictionService::from_dir(&public_dir) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let store = match StockStore::new(config) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    // Initial load straight from disk; the server is not up yet to fetch from
    println!("📊 Loading {} from public directory...", store.csv_file_path().await);
    store.load_from_dir(&public_dir, None).await;
    {
        let state = store.read().await;
        if state.error.is_empty() {
            println!("✅ Stock data loaded successfully:");
            println!("   📈 Records:     {}", state.total_count);
            println!("   🏷️  Instruments: {}", state.names.len());
        } else {
            eprintln!("⚠️  Warning: Failed to load stock data: {}", state.error);
            eprintln!("   Server will start with empty data. POST /api/stock/reload to retry.");
        }
    }

    let app_state = AppState {
        store,
        predictions,
        public_dir,
    };

    if let Err(e) = server::serve(app_state, port).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
