use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Metrics {
    #[serde(deserialize_with = "lenient_count")]
    pub orders: u64,
    #[serde(deserialize_with = "lenient_amount")]
    pub sales: f64,
    #[serde(deserialize_with = "lenient_count")]
    pub visits: u64,
    #[serde(deserialize_with = "lenient_amount")]
    pub avg_order_value: f64,
    #[serde(deserialize_with = "lenient_amount")]
    pub conversion_rate: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `recentOrders`. Text fields absent from the stored document
/// stay absent when it is written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub customer: String,
    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub package: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub total: f64,
    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub status_code: String,
    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub date: String,
    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DailyTrendEntry {
    #[serde(deserialize_with = "null_default")]
    pub date: String,
    #[serde(deserialize_with = "null_default")]
    pub label: String,
    #[serde(deserialize_with = "lenient_count")]
    pub visits: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub orders: u64,
    #[serde(deserialize_with = "lenient_amount")]
    pub sales: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The whole analytics document, shaped like the seed file.
///
/// Fields this crate does not know about, at any level, are kept in the
/// `extra` maps so they survive later writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsSnapshot {
    #[serde(deserialize_with = "null_default")]
    pub metrics: Metrics,
    #[serde(deserialize_with = "null_default")]
    pub recent_orders: Vec<Order>,
    #[serde(deserialize_with = "null_default")]
    pub daily_trends: Vec<DailyTrendEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Counts written by other tools may be `null` or floats such as `4.0`.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(0);
    };
    if let Some(count) = number.as_u64() {
        return Ok(count);
    }
    Ok(match number.as_f64() {
        Some(value) if value.is_finite() && value > 0.0 => value.round() as u64,
        _ => 0,
    })
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Number>::deserialize(deserializer)?
        .and_then(|number| number.as_f64())
        .unwrap_or(0.0))
}

/// A raw price as it arrives from a page attribute or API caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl From<&str> for PriceInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for PriceInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub platform: String,
    pub package_name: String,
    pub price: Option<PriceInput>,
    pub customer_name: Option<String>,
    pub source: Option<String>,
}

impl NewOrder {
    pub fn new(
        platform: impl Into<String>,
        package_name: impl Into<String>,
        price: Option<PriceInput>,
    ) -> Self {
        Self {
            platform: platform.into(),
            package_name: package_name.into(),
            price,
            customer_name: None,
            source: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct OrderRequest {
    pub platform: Option<String>,
    pub title: Option<String>,
    pub price: Option<PriceInput>,
    pub customer: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponse {
    pub recorded: bool,
    pub whatsapp_url: String,
    pub analytics: Option<AnalyticsSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    AlreadySeeded,
    Seeded,
}
