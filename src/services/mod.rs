pub mod chat_client;
pub mod csv_ingestor;
pub mod csv_parser;
pub mod market_stats;
pub mod prediction_service;
pub mod stock_api_client;
pub mod stock_store;

pub use chat_client::ChatClient;
pub use csv_ingestor::ingest_csv_text;
pub use csv_parser::parse_stock_csv;
pub use market_stats::{latest_record, price_stats};
pub use prediction_service::PredictionService;
pub use stock_api_client::StockApiClient;
pub use stock_store::{SharedStockStore, StockStore};
