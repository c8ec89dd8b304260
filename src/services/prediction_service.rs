//! Price Prediction Service
//!
//! Reads the pre-generated `stock_predictions.json` from the public root,
//! over HTTP or from a local copy of it, and keeps it in memory for a fixed
//! duration. Lookups and summaries are pure
//! functions over the loaded map.

use crate::constants::{
    BEARISH_UP_PERCENT, BULLISH_UP_PERCENT, PREDICTION_CACHE_TTL_SECONDS, PREDICTION_FILE_NAME,
    PREDICTION_MODEL_TYPE,
};
use crate::error::{AppError, Result};
use crate::models::{
    CompanyPrediction, MarketTrend, PredictionMap, PredictionReport, PredictionStats, Trend,
};
use crate::utils::{join_url, public_file_path};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
struct CachedPredictions {
    predictions: Arc<PredictionMap>,
    fetched_at: Instant,
}

/// Where the prediction file is read from
#[derive(Debug, Clone)]
enum PredictionSource {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionSource::Url(url) => write!(f, "{}", url),
            PredictionSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct PredictionService {
    source: PredictionSource,
    cache_duration: Duration,
    cache: RwLock<Option<CachedPredictions>>,
    client: reqwest::Client,
}

impl PredictionService {
    /// `public_url` is the same public root the CSV is fetched from
    pub fn new(public_url: &str) -> Result<Self> {
        Self::with_cache_duration(public_url, Duration::from_secs(PREDICTION_CACHE_TTL_SECONDS))
    }

    pub fn with_cache_duration(public_url: &str, cache_duration: Duration) -> Result<Self> {
        let url = join_url(public_url, &public_file_path(PREDICTION_FILE_NAME));
        Self::build(PredictionSource::Url(url), cache_duration)
    }

    /// Read the prediction file from a local copy of the public root
    pub fn from_dir(public_dir: &Path) -> Result<Self> {
        Self::build(
            PredictionSource::File(public_dir.join(PREDICTION_FILE_NAME)),
            Duration::from_secs(PREDICTION_CACHE_TTL_SECONDS),
        )
    }

    fn build(source: PredictionSource, cache_duration: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            source,
            cache_duration,
            cache: RwLock::new(None),
            client,
        })
    }

    /// Cached predictions, refetched once older than the cache duration
    pub async fn load_predictions(&self) -> Result<Arc<PredictionMap>> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            if is_fresh(cached.fetched_at, Instant::now(), self.cache_duration) {
                return Ok(cached.predictions.clone());
            }
        }

        info!(source = %self.source, "Loading stock predictions");
        let predictions = match self.fetch_predictions().await {
            Ok(map) => Arc::new(map),
            Err(e) => {
                error!(error = %e, "Failed to load stock predictions");
                return Err(AppError::Other(format!("Unable to load prediction data: {}", e)));
            }
        };

        info!(companies = predictions.len(), "Loaded stock predictions");
        *self.cache.write().await = Some(CachedPredictions {
            predictions: predictions.clone(),
            fetched_at: Instant::now(),
        });

        Ok(predictions)
    }

    async fn fetch_predictions(&self) -> Result<PredictionMap> {
        let body = match &self.source {
            PredictionSource::Url(url) => self.fetch_url(url).await?,
            PredictionSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                AppError::Other(format!(
                    "Failed to load prediction file: {}: {}",
                    path.display(),
                    e
                ))
            })?,
        };

        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_url(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Other(format!(
                "Failed to load prediction file: {}",
                status.as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response body: {}", e)))
    }

    /// Prediction for one company over `days` days
    pub async fn get_stock_prediction(&self, company_name: &str, days: usize) -> Result<PredictionReport> {
        let predictions = self.load_predictions().await?;
        build_report(&predictions, company_name, days)
    }

    /// All company names, sorted
    pub async fn available_companies(&self) -> Result<Vec<String>> {
        let predictions = self.load_predictions().await?;
        Ok(predictions.keys().cloned().collect())
    }

    pub async fn prediction_stats(&self) -> Result<PredictionStats> {
        let predictions = self.load_predictions().await?;
        Ok(prediction_stats(&predictions))
    }

    pub async fn market_trend(&self) -> Result<MarketTrend> {
        let predictions = self.load_predictions().await?;
        Ok(market_trend(&predictions))
    }

    pub async fn clear_cache(&self) {
        *self.cache.write().await = None;
        debug!("Prediction cache cleared");
    }
}

fn is_fresh(fetched_at: Instant, now: Instant, cache_duration: Duration) -> bool {
    now.saturating_duration_since(fetched_at) < cache_duration
}

/// Resolve a company name: exact, then case-insensitive, then containment either way
pub fn find_company_key<'a>(predictions: &'a PredictionMap, company_name: &str) -> Option<&'a str> {
    if let Some((key, _)) = predictions.get_key_value(company_name) {
        return Some(key.as_str());
    }

    let wanted = company_name.to_lowercase();
    if let Some(key) = predictions.keys().find(|key| key.to_lowercase() == wanted) {
        return Some(key.as_str());
    }

    predictions
        .keys()
        .find(|key| {
            let key = key.to_lowercase();
            key.contains(&wanted) || wanted.contains(&key)
        })
        .map(String::as_str)
}

/// Trim a prediction to `days`; horizons at or past the series length are unchanged
pub fn adjust_for_days(prediction: &CompanyPrediction, days: usize) -> Result<CompanyPrediction> {
    if days == 0 {
        return Err(AppError::InvalidInput("Prediction days must be at least 1".to_string()));
    }
    if days >= prediction.predicted_prices.len() {
        return Ok(prediction.clone());
    }

    let mut adjusted = prediction.clone();
    adjusted.predicted_price = prediction.predicted_prices[days - 1];
    adjusted.predicted_prices.truncate(days);
    adjusted.prediction_dates.truncate(days);
    Ok(adjusted)
}

pub fn build_report(predictions: &PredictionMap, company_name: &str, days: usize) -> Result<PredictionReport> {
    let key = find_company_key(predictions, company_name).ok_or_else(|| {
        AppError::NotFound(format!("No prediction data for company \"{}\"", company_name))
    })?;

    let mut prediction = adjust_for_days(&predictions[key], days)?;
    let change = prediction.predicted_price - prediction.current_price;
    prediction.price_change = Some(change);

    Ok(PredictionReport {
        price_change_percent: change / prediction.current_price * 100.0,
        prediction,
        company_name: key.to_string(),
        model_type: PREDICTION_MODEL_TYPE.to_string(),
    })
}

pub fn prediction_stats(predictions: &PredictionMap) -> PredictionStats {
    let companies: Vec<String> = predictions.keys().cloned().collect();
    let Some(first) = predictions.values().next() else {
        return PredictionStats {
            total_companies: 0,
            last_updated: "unknown".to_string(),
            average_confidence: 0,
            companies,
        };
    };

    let total_confidence: f64 = predictions.values().map(|p| p.confidence_level).sum();

    PredictionStats {
        total_companies: companies.len(),
        last_updated: first.last_updated.clone(),
        average_confidence: (total_confidence / companies.len() as f64).round() as i64,
        companies,
    }
}

pub fn market_trend(predictions: &PredictionMap) -> MarketTrend {
    let total = predictions.len();
    if total == 0 {
        return MarketTrend {
            trend: Trend::Neutral,
            up: 0,
            down: 0,
            total: 0,
            up_percent: 0,
        };
    }

    let up = predictions
        .values()
        .filter(|p| p.price_change.is_some_and(|change| change >= 0.0))
        .count();
    let up_percent = up as f64 / total as f64 * 100.0;

    let trend = if up_percent > BULLISH_UP_PERCENT {
        Trend::Bullish
    } else if up_percent < BEARISH_UP_PERCENT {
        Trend::Bearish
    } else {
        Trend::Neutral
    };

    MarketTrend {
        trend,
        up,
        down: total - up,
        total,
        up_percent: up_percent.round() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn prediction(current: f64, prices: &[f64], confidence: f64, change: Option<f64>) -> CompanyPrediction {
        CompanyPrediction {
            current_price: current,
            predicted_price: prices.last().copied().unwrap_or(current),
            predicted_prices: prices.to_vec(),
            prediction_dates: (1..=prices.len()).map(|d| format!("2024-01-{:02}", d)).collect(),
            confidence_level: confidence,
            last_updated: "2024-01-01".to_string(),
            price_change: change,
        }
    }

    fn sample_map() -> PredictionMap {
        let mut map = PredictionMap::new();
        map.insert("Apple Inc".to_string(), prediction(100.0, &[101.0, 102.0, 103.0, 110.0], 80.0, Some(10.0)));
        map.insert("Tesla".to_string(), prediction(200.0, &[190.0, 180.0], 70.0, Some(-20.0)));
        map.insert("Microsoft".to_string(), prediction(300.0, &[310.0], 91.0, Some(0.0)));
        map
    }

    #[test]
    fn test_find_company_key() {
        let map = sample_map();
        assert_eq!(find_company_key(&map, "Tesla"), Some("Tesla"));
        assert_eq!(find_company_key(&map, "tesla"), Some("Tesla"));
        assert_eq!(find_company_key(&map, "apple"), Some("Apple Inc"));
        assert_eq!(find_company_key(&map, "Microsoft Corporation"), Some("Microsoft"));
        assert_eq!(find_company_key(&map, "Nvidia"), None);
    }

    #[test]
    fn test_adjust_for_days() {
        let original = prediction(100.0, &[101.0, 102.0, 103.0, 110.0], 80.0, None);

        let adjusted = adjust_for_days(&original, 2).unwrap();
        assert_eq!(adjusted.predicted_price, 102.0);
        assert_eq!(adjusted.predicted_prices, vec![101.0, 102.0]);
        assert_eq!(adjusted.prediction_dates.len(), 2);

        assert_eq!(adjust_for_days(&original, 7).unwrap(), original);
        assert_eq!(adjust_for_days(&original, 4).unwrap(), original);
        assert!(matches!(adjust_for_days(&original, 0), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_build_report() {
        let report = build_report(&sample_map(), "apple", 2).unwrap();
        assert_eq!(report.company_name, "Apple Inc");
        assert_eq!(report.model_type, PREDICTION_MODEL_TYPE);
        assert_eq!(report.prediction.price_change, Some(2.0));
        assert!((report.price_change_percent - 2.0).abs() < 1e-9);

        assert!(matches!(build_report(&sample_map(), "Nvidia", 7), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_prediction_stats() {
        let stats = prediction_stats(&sample_map());
        assert_eq!(stats.total_companies, 3);
        assert_eq!(stats.average_confidence, 80);
        assert_eq!(stats.companies, vec!["Apple Inc", "Microsoft", "Tesla"]);
        assert_eq!(stats.last_updated, "2024-01-01");

        let empty = prediction_stats(&PredictionMap::new());
        assert_eq!(empty.total_companies, 0);
        assert_eq!(empty.last_updated, "unknown");
    }

    #[test]
    fn test_market_trend() {
        let trend = market_trend(&sample_map());
        assert_eq!(trend.up, 2);
        assert_eq!(trend.down, 1);
        assert_eq!(trend.up_percent, 67);
        assert_eq!(trend.trend, Trend::Bullish);

        let mut bearish = sample_map();
        bearish.get_mut("Apple Inc").unwrap().price_change = None;
        bearish.get_mut("Microsoft").unwrap().price_change = Some(-1.0);
        assert_eq!(market_trend(&bearish).trend, Trend::Bearish);

        let empty = market_trend(&PredictionMap::new());
        assert_eq!(empty.trend, Trend::Neutral);
        assert_eq!(empty.total, 0);
    }

    #[test]
    fn test_is_fresh() {
        let start = Instant::now();
        let ttl = Duration::from_secs(600);
        assert!(is_fresh(start, start + Duration::from_secs(599), ttl));
        assert!(!is_fresh(start, start + Duration::from_secs(600), ttl));
    }

    async fn serve_predictions(hits: Arc<AtomicUsize>) -> String {
        let app = Router::new().route(
            "/stock_predictions.json",
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(serde_json::json!({
                        "Tesla": {
                            "currentPrice": 200.0,
                            "predictedPrice": 180.0,
                            "predictedPrices": [190.0, 180.0],
                            "predictionDates": ["2024-01-02", "2024-01-03"],
                            "confidenceLevel": 70,
                            "lastUpdated": "2024-01-01",
                            "priceChange": -20.0
                        }
                    }))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_predictions_cached_until_cleared() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = serve_predictions(hits.clone()).await;
        let service = PredictionService::new(&url).unwrap();

        let report = service.get_stock_prediction("tesla", 1).await.unwrap();
        assert_eq!(report.prediction.predicted_price, 190.0);
        assert_eq!(service.available_companies().await.unwrap(), vec!["Tesla"]);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        service.clear_cache().await;
        service.market_trend().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_cache_refetches() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = serve_predictions(hits.clone()).await;
        let service = PredictionService::with_cache_duration(&url, Duration::ZERO).unwrap();

        service.prediction_stats().await.unwrap();
        service.prediction_stats().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_file_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        let app = Router::new().fallback_service(tower_http::services::ServeDir::new(dir.path()));
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let service = PredictionService::new(&format!("http://{}", addr)).unwrap();
        let err = service.load_predictions().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to load prediction data: Failed to load prediction file: 404"
        );
    }

    #[tokio::test]
    async fn test_reads_prediction_file_from_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PREDICTION_FILE_NAME),
            r#"{"Tesla": {"currentPrice": 200.0, "predictedPrice": 180.0,
                          "predictedPrices": [190.0, 180.0], "priceChange": -20.0}}"#,
        )
        .unwrap();

        let service = PredictionService::from_dir(dir.path()).unwrap();

        let report = service.get_stock_prediction("Tesla", 7).await.unwrap();
        assert_eq!(report.prediction.predicted_price, 180.0);
        assert_eq!(service.market_trend().await.unwrap().trend, Trend::Bearish);
    }

    #[tokio::test]
    async fn test_missing_prediction_file_in_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        let service = PredictionService::from_dir(dir.path()).unwrap();

        let err = service.load_predictions().await.unwrap_err().to_string();
        assert!(err.starts_with("Unable to load prediction data: Failed to load prediction file:"));
        assert!(err.contains(PREDICTION_FILE_NAME));
    }
}
