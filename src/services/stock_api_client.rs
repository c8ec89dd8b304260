use crate::constants::{DEFAULT_PAGE_SIZE, STOCK_API_TIMEOUT_SECONDS};
use crate::error::{AppError, Result};
use crate::models::{RemoteStockPage, RemoteStockRecord};
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info};

const ISO_LOCAL_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S";

/// Client for the REST backend that stores imported stock records
pub struct StockApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl StockApiClient {
    /// `base_url` is the collection root, e.g. "http://localhost:8081/api/stock-data"
    pub fn new(base_url: String) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "Invalid base_url: must start with http:// or https://, got: '{}'",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(STOCK_API_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        info!(base_url = %base_url, "Created StockApiClient");

        Ok(Self { base_url, client })
    }

    /// One page of all records, newest first
    pub async fn fetch_all(&self, page: usize, size: usize) -> Result<RemoteStockPage> {
        let size = if size == 0 { DEFAULT_PAGE_SIZE } else { size };
        let query = [
            ("page", page.to_string()),
            ("size", size.to_string()),
            ("sort", "timestamp,desc".to_string()),
        ];
        self.get_json(&self.base_url, &query).await
    }

    pub async fn search_by_name(&self, name: &str) -> Result<Vec<RemoteStockRecord>> {
        let url = format!("{}/search-by-name", self.base_url);
        self.get_json(&url, &[("name", name.to_string())]).await
    }

    pub async fn search_by_time(
        &self,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Result<Vec<RemoteStockRecord>> {
        let url = format!("{}/search-by-time", self.base_url);
        let query = [
            ("startTime", format_iso(start_time)),
            ("endTime", format_iso(end_time)),
        ];
        self.get_json(&url, &query).await
    }

    /// Records for one name inside a time range
    pub async fn advanced_search(
        &self,
        name: &str,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Result<Vec<RemoteStockRecord>> {
        let url = format!("{}/advanced-search", self.base_url);
        let query = [
            ("name", name.to_string()),
            ("startTime", format_iso(start_time)),
            ("endTime", format_iso(end_time)),
        ];
        self.get_json(&url, &query).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        debug!(url = %url, ?query, "Requesting stock API");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("API request failed: {} (url: {})", e, url);
                error!("{}", msg);
                AppError::Network(msg)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response body: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| AppError::Other(format!("Failed to parse JSON response: {}", e)))
    }
}

fn format_iso(time: NaiveDateTime) -> String {
    time.format(ISO_LOCAL_DATE_TIME).to_string()
}
