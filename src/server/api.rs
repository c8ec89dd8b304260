use crate::constants::DEFAULT_PREDICTION_DAYS;
use crate::error::AppError;
use crate::models::{GroupedByName, PriceStats, StockSummary};
use crate::server::{AppState, SharedPredictionService};
use crate::services::SharedStockStore;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
pub struct ReloadQuery {
    /// Switch the configured CSV before reloading
    pub file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PredictionQuery {
    pub days: Option<usize>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

fn app_error_response(err: AppError) -> Response {
    let status = match &err {
        AppError::NotFound(_) | AppError::CsvNotFound { .. } => StatusCode::NOT_FOUND,
        AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    };
    error_response(status, err.to_string())
}

pub async fn summary_handler(State(store): State<SharedStockStore>) -> Json<StockSummary> {
    Json(store.read().await.summary())
}

pub async fn names_handler(State(store): State<SharedStockStore>) -> Json<Vec<String>> {
    Json(store.read().await.names.clone())
}

pub async fn grouped_handler(State(store): State<SharedStockStore>) -> Json<GroupedByName> {
    Json(store.read().await.grouped.clone())
}

pub async fn stats_handler(State(store): State<SharedStockStore>) -> Json<PriceStats> {
    Json(store.read().await.price_stats())
}

pub async fn latest_handler(
    State(store): State<SharedStockStore>,
    Path(name): Path<String>,
) -> Response {
    debug!(name = %name, "Latest record request");
    let state = store.read().await;
    match state.latest_record(&name) {
        Some(record) => Json(record.clone()).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("No data for '{}'", name)),
    }
}

pub async fn reload_handler(
    State(app_state): State<AppState>,
    Query(query): Query<ReloadQuery>,
) -> Response {
    if let Some(name) = query.file_name.as_deref() {
        if name.split(['/', '\\']).any(|segment| segment == "..") {
            warn!(file_name = %name, "Rejected reload outside public directory");
            return error_response(StatusCode::BAD_REQUEST, "file_name must stay inside the public directory");
        }
    }

    app_state
        .store
        .load_from_dir(&app_state.public_dir, query.file_name.as_deref())
        .await;

    let summary = app_state.store.read().await.summary();
    info!(records = summary.total_count, error = %summary.error, "Reload finished");
    Json(summary).into_response()
}

pub async fn reset_handler(State(store): State<SharedStockStore>) -> Json<StockSummary> {
    store.reset().await;
    Json(store.read().await.summary())
}

pub async fn prediction_handler(
    State(predictions): State<SharedPredictionService>,
    Path(company): Path<String>,
    Query(query): Query<PredictionQuery>,
) -> Response {
    let days = query.days.unwrap_or(DEFAULT_PREDICTION_DAYS);
    match predictions.get_stock_prediction(&company, days).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => app_error_response(e),
    }
}

pub async fn trend_handler(State(predictions): State<SharedPredictionService>) -> Response {
    match predictions.market_trend().await {
        Ok(trend) => Json(trend).into_response(),
        Err(e) => app_error_response(e),
    }
}

pub async fn prediction_stats_handler(State(predictions): State<SharedPredictionService>) -> Response {
    match predictions.prediction_stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => app_error_response(e),
    }
}

pub async fn companies_handler(State(predictions): State<SharedPredictionService>) -> Response {
    match predictions.available_companies().await {
        Ok(companies) => Json(companies).into_response(),
        Err(e) => app_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngestConfig;
    use crate::server::router;
    use crate::services::{PredictionService, StockStore};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tempfile::TempDir;

    const CSV: &str = "name,timestamp,last,high,low,vol_,chg_%\n\
                       AAPL,2024-01-01,10,11,9,1M,1%\n\
                       AAPL,2024-01-02,20,21,19,2M,2%\n\
                       MSFT,2024-01-01,30,31,29,3M,3%\n";

    const PREDICTIONS: &str = r#"{
        "Apple": {"currentPrice": 10.0, "predictedPrice": 12.0, "predictedPrices": [11.0, 12.0],
                  "predictionDates": ["2024-01-03", "2024-01-04"], "confidenceLevel": 80,
                  "lastUpdated": "2024-01-02", "priceChange": 2.0}
    }"#;

    /// Spin up the full router over a temp public dir; returns (base url, dir guard)
    async fn spawn_app() -> (String, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stock.csv"), CSV).unwrap();
        std::fs::write(dir.path().join("stock_predictions.json"), PREDICTIONS).unwrap();

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let base = format!("http://{}", addr);

        // Nothing listens on the configured public URL; every read goes through the public dir
        let store = Arc::new(
            StockStore::new(IngestConfig::new("http://127.0.0.1:9".to_string(), "stock.csv".to_string())).unwrap(),
        );
        let predictions = Arc::new(PredictionService::from_dir(dir.path()).unwrap());
        let app = router(AppState {
            store,
            predictions,
            public_dir: dir.path().to_path_buf(),
        });

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (base, dir)
    }

    #[tokio::test]
    async fn test_reload_then_read_surface() {
        let (base, _dir) = spawn_app().await;
        let http = reqwest::Client::new();

        let summary: serde_json::Value = http
            .post(format!("{}/api/stock/reload", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(summary["totalCount"], 3);
        assert_eq!(summary["error"], "");

        let names: Vec<String> = http.get(format!("{}/api/stock/names", base)).send().await.unwrap().json().await.unwrap();
        assert_eq!(names, vec!["AAPL", "MSFT"]);

        let stats: serde_json::Value = http.get(format!("{}/api/stock/stats", base)).send().await.unwrap().json().await.unwrap();
        assert_eq!(stats["maxPrice"], 30.0);
        assert_eq!(stats["avgPrice"], 20.0);

        let latest: serde_json::Value = http
            .get(format!("{}/api/stock/latest/AAPL", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(latest["timestamp"], "2024-01-02");
        assert_eq!(latest["volNum"], 2_000_000.0);

        let missing = http.get(format!("{}/api/stock/latest/TSLA", base)).send().await.unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_csv_is_served() {
        let (base, _dir) = spawn_app().await;
        let body = reqwest::get(format!("{}/stock.csv", base)).await.unwrap().text().await.unwrap();
        assert!(body.starts_with("name,timestamp"));
    }

    #[tokio::test]
    async fn test_reload_missing_file_reports_error() {
        let (base, _dir) = spawn_app().await;
        let http = reqwest::Client::new();

        let summary: serde_json::Value = http
            .post(format!("{}/api/stock/reload?file_name=nope.csv", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(summary["totalCount"], 0);
        assert_eq!(
            summary["error"],
            "CSV file not found, make sure /nope.csv is placed in the public directory"
        );

        let rejected = http
            .post(format!("{}/api/stock/reload?file_name=../secret.csv", base))
            .send()
            .await
            .unwrap();
        assert_eq!(rejected.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reset_endpoint() {
        let (base, _dir) = spawn_app().await;
        let http = reqwest::Client::new();
        http.post(format!("{}/api/stock/reload", base)).send().await.unwrap();

        let summary: serde_json::Value = http
            .post(format!("{}/api/stock/reset", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(summary["totalCount"], 0);
        assert_eq!(summary["lastUpdate"], "");
    }

    #[tokio::test]
    async fn test_prediction_endpoints() {
        let (base, _dir) = spawn_app().await;

        let report: serde_json::Value = reqwest::get(format!("{}/api/predictions/apple?days=1", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(report["companyName"], "Apple");
        assert_eq!(report["predictedPrice"], 11.0);

        let trend: serde_json::Value = reqwest::get(format!("{}/api/predictions/trend", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(trend["trend"], "bullish");

        let unknown = reqwest::get(format!("{}/api/predictions/Nvidia", base)).await.unwrap();
        assert_eq!(unknown.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
