pub mod api;

use crate::services::{PredictionService, SharedStockStore};
use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

pub type SharedPredictionService = Arc<PredictionService>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStockStore,
    pub predictions: SharedPredictionService,
    /// Directory served as the public root; reloads read the CSV from here
    pub public_dir: PathBuf,
}

// FromRef implementations to extract specific state components
impl FromRef<AppState> for SharedStockStore {
    fn from_ref(app_state: &AppState) -> SharedStockStore {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for SharedPredictionService {
    fn from_ref(app_state: &AppState) -> SharedPredictionService {
        app_state.predictions.clone()
    }
}

/// Read API under `/api`, static public files for everything else
pub fn router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    let public_dir = app_state.public_dir.clone();

    Router::new()
        .route("/api/stock/summary", get(api::summary_handler))
        .route("/api/stock/names", get(api::names_handler))
        .route("/api/stock/grouped", get(api::grouped_handler))
        .route("/api/stock/stats", get(api::stats_handler))
        .route("/api/stock/latest/{name}", get(api::latest_handler))
        .route("/api/stock/reload", post(api::reload_handler))
        .route("/api/stock/reset", post(api::reset_handler))
        .route("/api/predictions/trend", get(api::trend_handler))
        .route("/api/predictions/stats", get(api::prediction_stats_handler))
        .route("/api/predictions/companies", get(api::companies_handler))
        .route("/api/predictions/{company}", get(api::prediction_handler))
        .fallback_service(ServeDir::new(public_dir))
        .layer(cors)
        .with_state(app_state)
}

/// Start the axum server
pub async fn serve(app_state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Using public directory: {}", app_state.public_dir.display());

    tracing::info!("Registering routes:");
    tracing::info!("  GET  /api/stock/summary | names | grouped | stats");
    tracing::info!("  GET  /api/stock/latest/{{name}}");
    tracing::info!("  POST /api/stock/reload?file_name=stock.csv");
    tracing::info!("  POST /api/stock/reset");
    tracing::info!("  GET  /api/predictions/{{company}}?days=7 | trend | stats | companies");
    tracing::info!("  GET  /* (static files)");

    let app = router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
