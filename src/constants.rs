//! CSV Format and Service Constants
//!
//! ## Stock CSV Format
//!
//! Header row with at least these columns (exact spelling):
//! `name, timestamp, last, high, low, vol_, chg_%`
//!
//! - `last`, `high`, `low`: plain decimals
//! - `vol_`: plain number, or number followed by `M` (millions)
//! - `chg_%`: number followed by `%`
//!
//! Extra columns are allowed and ignored.

/// Column names in the stock CSV header
pub mod csv_column {
    pub const NAME: &str = "name";
    pub const TIMESTAMP: &str = "timestamp";
    pub const LAST: &str = "last";
    pub const HIGH: &str = "high";
    pub const LOW: &str = "low";
    pub const VOLUME: &str = "vol_";
    pub const CHANGE_PERCENT: &str = "chg_%";

    /// Every column the ingestor requires
    pub const REQUIRED: [&str; 7] = [NAME, TIMESTAMP, LAST, HIGH, LOW, VOLUME, CHANGE_PERCENT];
}

/// CSV file loaded from the public root when no name is configured
pub const DEFAULT_CSV_FILE_NAME: &str = "stock.csv";

/// Suffix on `vol_` meaning the value is in millions
pub const VOLUME_MILLION_SUFFIX: char = 'M';
pub const VOLUME_MILLION_MULTIPLIER: f64 = 1_000_000.0;

/// Suffix on `chg_%`
pub const PERCENT_SUFFIX: char = '%';

/// Display format for the "last updated" stamp
pub const LAST_UPDATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default public data root (the `serve` command listens here by default)
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:9876";
pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_PORT: u16 = 9876;

/// Pre-generated prediction file, relative to the public root
pub const PREDICTION_FILE_NAME: &str = "stock_predictions.json";

/// Prediction data is reused for 10 minutes before refetching
pub const PREDICTION_CACHE_TTL_SECONDS: u64 = 10 * 60;

/// Default forecast horizon in days
pub const DEFAULT_PREDICTION_DAYS: usize = 7;

pub const PREDICTION_MODEL_TYPE: &str = "LSTM neural network";

/// Market trend thresholds on the share of companies predicted up
pub const BULLISH_UP_PERCENT: f64 = 60.0;
pub const BEARISH_UP_PERCENT: f64 = 40.0;

/// REST backend holding imported stock records
pub const DEFAULT_STOCK_API_URL: &str = "http://localhost:8081/api/stock-data";
pub const STOCK_API_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Chat assistant defaults
pub const DEFAULT_CHAT_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEFAULT_CHAT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_CHAT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_CHAT_TEMPERATURE: f32 = 0.7;
pub const CHAT_FALLBACK_ERROR: &str = "Network request failed, please try again later";

pub const CHAT_SYSTEM_PROMPT: &str = "You are a professional stock analysis assistant focused on helping users:
1. Analyze stock market data
2. Explain stock-related concepts
3. Provide investment suggestions
4. Answer questions about stock trading
5. Understand the various stock indicators

Keep answers professional and accurate, and remind users that investing carries risk.";
