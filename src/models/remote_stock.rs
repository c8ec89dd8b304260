use serde::{Deserialize, Deserializer, Serialize};

/// Stock record as returned by the REST backend
///
/// Decimal fields arrive as JSON numbers on paged endpoints and as strings on
/// the advanced search; both decode to `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStockRecord {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// ISO date-time
    #[serde(default)]
    pub timestamp: Option<String>,

    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub last: Option<f64>,

    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub high: Option<f64>,

    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub low: Option<f64>,

    #[serde(default, deserialize_with = "deserialize_decimal")]
    pub chg: Option<f64>,

    #[serde(default)]
    pub chg_percent: Option<String>,

    #[serde(default)]
    pub vol: Option<String>,

    #[serde(default)]
    pub time: Option<String>,

    #[serde(default)]
    pub historical_prices: Option<Vec<f64>>,
}

/// One page of records (Spring Data page layout)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStockPage {
    #[serde(default)]
    pub content: Vec<RemoteStockRecord>,

    #[serde(default)]
    pub total_elements: u64,

    #[serde(default)]
    pub total_pages: u64,

    /// Zero-based page index
    #[serde(default)]
    pub number: u64,

    #[serde(default)]
    pub size: u64,
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Decimal>::deserialize(deserializer)? {
        Some(Decimal::Number(value)) => Some(value),
        Some(Decimal::Text(text)) => text.trim().parse::<f64>().ok(),
        None => None,
    })
}
