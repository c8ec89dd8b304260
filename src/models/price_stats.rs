use serde::{Deserialize, Serialize};

/// Max / min / mean of the `last` price across the whole dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceStats {
    pub max_price: f64,
    pub min_price: f64,
    /// Arithmetic mean rounded to 2 decimal places
    pub avg_price: f64,
}
