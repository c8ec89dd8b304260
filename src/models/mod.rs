mod app_config;
mod chat;
mod dataset;
mod prediction;
mod price_stats;
mod remote_stock;
mod stock_record;
mod stock_state;

pub use app_config::{ChatConfig, IngestConfig};
pub use chat::{ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatReply, ChatRole};
pub use dataset::Dataset;
pub use prediction::{CompanyPrediction, MarketTrend, PredictionMap, PredictionReport, PredictionStats, Trend};
pub use price_stats::PriceStats;
pub use remote_stock::{RemoteStockPage, RemoteStockRecord};
pub use stock_record::{parse_change_percent, parse_volume, DedupKey, NormalizedRecord, Observation, RawRecord};
pub use stock_state::{IngestedData, StockState, StockSummary};

use std::collections::HashMap;

/// Records per instrument, in arrival order
pub type GroupedByName = HashMap<String, Vec<NormalizedRecord>>;
