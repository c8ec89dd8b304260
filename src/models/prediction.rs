use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Pre-generated price forecast for one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPrediction {
    #[serde(default)]
    pub current_price: f64,

    /// Price at the end of the forecast horizon
    #[serde(default)]
    pub predicted_price: f64,

    /// One forecast price per day
    #[serde(default)]
    pub predicted_prices: Vec<f64>,

    /// Dates matching `predicted_prices`
    #[serde(default)]
    pub prediction_dates: Vec<String>,

    #[serde(default)]
    pub confidence_level: f64,

    #[serde(default)]
    pub last_updated: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change: Option<f64>,
}

/// Prediction file contents keyed by company name
pub type PredictionMap = BTreeMap<String, CompanyPrediction>;

/// Prediction for one company, trimmed to the requested horizon.
///
/// `prediction.price_change` is recomputed as `predicted_price - current_price`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    #[serde(flatten)]
    pub prediction: CompanyPrediction,

    /// Key the lookup resolved to
    pub company_name: String,

    pub model_type: String,

    pub price_change_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionStats {
    pub total_companies: usize,
    pub last_updated: String,
    /// Mean confidence, rounded to an integer
    pub average_confidence: i64,
    pub companies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Bullish => "bullish",
            Trend::Bearish => "bearish",
            Trend::Neutral => "neutral",
        };
        write!(f, "{}", label)
    }
}

/// Share of companies forecast to rise
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTrend {
    pub trend: Trend,
    pub up: usize,
    pub down: usize,
    pub total: usize,
    pub up_percent: i64,
}
