use super::{Dataset, GroupedByName, NormalizedRecord, PriceStats};
use crate::constants::DEFAULT_CSV_FILE_NAME;
use crate::services::market_stats;
use crate::utils::public_file_path;
use serde::Serialize;

/// Everything one successful load produces, swapped into state as a unit
#[derive(Debug, Clone, Default)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub grouped: GroupedByName,
    pub names: Vec<String>,
    pub total_count: usize,
    pub last_update: String,
}

/// Current dashboard data plus load status
#[derive(Debug, Clone)]
pub struct StockState {
    pub dataset: Dataset,
    pub grouped: GroupedByName,
    pub names: Vec<String>,
    pub total_count: usize,
    pub last_update: String,
    pub error: String,
    pub is_loading: bool,
    pub csv_file_name: String,
}

impl Default for StockState {
    fn default() -> Self {
        Self::new(DEFAULT_CSV_FILE_NAME.to_string())
    }
}

impl StockState {
    pub fn new(csv_file_name: String) -> Self {
        Self {
            dataset: Dataset::new(),
            grouped: GroupedByName::new(),
            names: Vec::new(),
            total_count: 0,
            last_update: String::new(),
            error: String::new(),
            is_loading: false,
            csv_file_name,
        }
    }

    /// Public-root path of the configured CSV, e.g. `/stock.csv`
    pub fn csv_file_path(&self) -> String {
        public_file_path(&self.csv_file_name)
    }

    /// Replace all derived data at once
    pub fn apply(&mut self, data: IngestedData) {
        self.dataset = data.dataset;
        self.grouped = data.grouped;
        self.names = data.names;
        self.total_count = data.total_count;
        self.last_update = data.last_update;
    }

    /// Clear data, count, timestamp and error. The loading flag is left alone.
    pub fn reset(&mut self) {
        self.dataset = Dataset::new();
        self.grouped = GroupedByName::new();
        self.names.clear();
        self.total_count = 0;
        self.last_update.clear();
        self.error.clear();
    }

    pub fn price_stats(&self) -> PriceStats {
        market_stats::price_stats(&self.dataset)
    }

    pub fn latest_record(&self, name: &str) -> Option<&NormalizedRecord> {
        market_stats::latest_record(&self.grouped, name)
    }

    pub fn summary(&self) -> StockSummary {
        StockSummary {
            total_count: self.total_count,
            names_count: self.names.len(),
            last_update: self.last_update.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
            csv_file_path: self.csv_file_path(),
        }
    }
}

/// Status view of the store for presentation code
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub total_count: usize,
    pub names_count: usize,
    pub last_update: String,
    pub is_loading: bool,
    pub error: String,
    pub csv_file_path: String,
}
