use crate::error::{AppError, Result};
use crate::models::{IngestConfig, StockState};
use crate::services::csv_ingestor::ingest_csv_text;
use crate::utils::join_url;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::StatusCode;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tracing::{debug, error, info};

// Shared store for passing between tasks
pub type SharedStockStore = Arc<StockStore>;

/// Process-wide stock dataset with its load status.
///
/// Loads are serialised: a second `load` waits for the one in flight, then
/// runs its own. Readers only wait for the short final swap, never for I/O.
pub struct StockStore {
    state: RwLock<StockState>,
    load_gate: Mutex<()>,
    public_url: String,
    client: reqwest::Client,
}

impl StockStore {
    pub fn new(config: IngestConfig) -> Result<Self> {
        let config = config.validated()?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            public_url = %config.public_url,
            csv_file = %config.csv_file_name,
            "Created StockStore"
        );

        Ok(Self {
            state: RwLock::new(StockState::new(config.csv_file_name)),
            load_gate: Mutex::new(()),
            public_url: config.public_url,
            client,
        })
    }

    /// Read access to the current state for pure queries
    pub async fn read(&self) -> RwLockReadGuard<'_, StockState> {
        self.state.read().await
    }

    /// Owned copy of the current state
    pub async fn snapshot(&self) -> StockState {
        self.state.read().await.clone()
    }

    /// Rooted path of the configured CSV, e.g. `/stock.csv`
    pub async fn csv_file_path(&self) -> String {
        self.state.read().await.csv_file_path()
    }

    /// Full fetch URL of the configured CSV
    pub async fn csv_url(&self) -> String {
        join_url(&self.public_url, &self.csv_file_path().await)
    }

    /// Optionally switch the configured CSV name, then load it from the public root
    pub async fn load_from_public(&self, file_name: Option<&str>) {
        let _gate = self.load_gate.lock().await;
        self.switch_file_name(file_name).await;
        self.load_locked(CsvSource::PublicUrl).await;
    }

    /// Optionally switch the configured CSV name, then load it from a local
    /// copy of the public root
    pub async fn load_from_dir(&self, public_dir: &Path, file_name: Option<&str>) {
        let _gate = self.load_gate.lock().await;
        self.switch_file_name(file_name).await;
        self.load_locked(CsvSource::PublicDir(public_dir)).await;
    }

    /// Load and rebuild the dataset.
    ///
    /// `file` wins over the configured public path. Never fails: on error the
    /// message lands in `StockState::error` and the previous data stays.
    pub async fn load(&self, file: Option<&Path>) {
        let _gate = self.load_gate.lock().await;
        let source = match file {
            Some(path) => CsvSource::Upload(path),
            None => CsvSource::PublicUrl,
        };
        self.load_locked(source).await;
    }

    /// Clear all loaded data and status text
    pub async fn reset(&self) {
        self.state.write().await.reset();
        debug!("Stock data reset");
    }

    async fn switch_file_name(&self, file_name: Option<&str>) {
        if let Some(name) = file_name {
            self.state.write().await.csv_file_name = name.to_string();
        }
    }

    /// Load body; callers hold `load_gate`
    async fn load_locked(&self, source: CsvSource<'_>) {
        let csv_path = {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.error.clear();
            state.csv_file_path()
        };

        let outcome = match self.acquire_text(source, &csv_path).await {
            Ok(text) => ingest_csv_text(&text),
            Err(e) => Err(e),
        };

        let mut state = self.state.write().await;
        match outcome {
            Ok(data) => {
                state.apply(data);
                info!(
                    records = state.total_count,
                    instruments = state.names.len(),
                    "Loaded stock data"
                );
            }
            Err(e) => {
                error!(error = %e, "Failed to load stock data");
                state.error = e.to_string();
            }
        }
        state.is_loading = false;
    }

    async fn acquire_text(&self, source: CsvSource<'_>, csv_path: &str) -> Result<String> {
        match source {
            CsvSource::Upload(path) => read_local_csv(path).await,
            CsvSource::PublicDir(dir) => read_public_dir_csv(dir, csv_path).await,
            CsvSource::PublicUrl => self.fetch_public_csv(csv_path).await,
        }
    }

    async fn fetch_public_csv(&self, csv_path: &str) -> Result<String> {
        let url = join_url(&self.public_url, csv_path);
        debug!(url = %url, "Fetching CSV");

        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "text/csv")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::CsvNotFound {
                path: csv_path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(AppError::Fetch {
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response body: {}", e)))
    }
}

/// Where one load reads its CSV text from
enum CsvSource<'a> {
    /// Caller-supplied file
    Upload(&'a Path),
    /// Configured CSV under a local copy of the public root
    PublicDir(&'a Path),
    /// Configured CSV fetched from `public_url`
    PublicUrl,
}

async fn read_local_csv(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "Reading local CSV");
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Io(format!("{}: {}", path.display(), e)))
}

/// Same outcomes as the public fetch: a missing file is `CsvNotFound` for the rooted path
async fn read_public_dir_csv(public_dir: &Path, csv_path: &str) -> Result<String> {
    let path = public_dir.join(csv_path.trim_start_matches('/'));
    debug!(path = %path.display(), "Reading CSV from public directory");

    match tokio::fs::read_to_string(&path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::CsvNotFound {
            path: csv_path.to_string(),
        }),
        Err(e) => Err(AppError::Io(format!("{}: {}", path.display(), e))),
    }
}
