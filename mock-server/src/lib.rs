use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

/// Currencies served by the mock: code, name, units per one EUR.
const DEFAULT_RATES: &[(&str, &str, f64)] = &[
    ("AUD", "Australian Dollar", 1.6302),
    ("CAD", "Canadian Dollar", 1.4710),
    ("CHF", "Swiss Franc", 0.9744),
    ("CNY", "Chinese Renminbi Yuan", 7.7839),
    ("EUR", "Euro", 1.0),
    ("GBP", "British Pound", 0.8559),
    ("JPY", "Japanese Yen", 164.50),
    ("SEK", "Swedish Krona", 11.6420),
    ("USD", "United States Dollar", 1.0752),
];

const DEFAULT_DATE: &str = "2024-05-03";

/// Exchange rates against a single base, plus display names.
#[derive(Clone, Debug)]
pub struct RateTable {
    pub base: String,
    pub date: String,
    pub names: BTreeMap<String, String>,
    pub units_per_base: HashMap<String, f64>,
}

impl Default for RateTable {
    fn default() -> Self {
        let mut table = RateTable::new("EUR", DEFAULT_DATE);
        for &(code, name, units) in DEFAULT_RATES {
            table = table.with_currency(code, name, units);
        }
        table
    }
}

impl RateTable {
    pub fn new(base: &str, date: &str) -> Self {
        Self {
            base: base.to_string(),
            date: date.to_string(),
            names: BTreeMap::new(),
            units_per_base: HashMap::new(),
        }
    }

    pub fn with_currency(mut self, code: &str, name: &str, units_per_base: f64) -> Self {
        self.names.insert(code.to_string(), name.to_string());
        self.units_per_base.insert(code.to_string(), units_per_base);
        self
    }

    /// Convert `amount` of `from` into `to`, rounded to four decimals.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Option<f64> {
        let from_units = self.units_per_base.get(from)?;
        let to_units = self.units_per_base.get(to)?;
        let raw = amount / from_units * to_units;
        Some((raw * 10_000.0).round() / 10_000.0)
    }
}

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    pub amount: Option<f64>,
    pub from: Option<String>,
    /// Comma-separated target codes; all others when absent.
    pub to: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Latest {
    pub amount: f64,
    pub base: String,
    pub date: String,
    pub rates: BTreeMap<String, f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

pub type Rates = Arc<RateTable>;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Message>)>;

pub fn app() -> Router {
    app_with(RateTable::default())
}

pub fn app_with(table: RateTable) -> Router {
    Router::new()
        .route("/currencies", get(list_currencies))
        .route("/latest", get(latest))
        .with_state(Arc::new(table))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, table: RateTable) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(table)).await
}

async fn list_currencies(State(rates): State<Rates>) -> Json<BTreeMap<String, String>> {
    Json(rates.names.clone())
}

async fn latest(State(rates): State<Rates>, Query(query): Query<LatestQuery>) -> ApiResult<Latest> {
    let amount = query.amount.unwrap_or(1.0);
    if !amount.is_finite() || amount <= 0.0 {
        return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "amount must be positive"));
    }
    let from = query.from.unwrap_or_else(|| rates.base.clone());
    if !rates.names.contains_key(&from) {
        return Err(reject(StatusCode::NOT_FOUND, "not found"));
    }

    let targets: Vec<String> = match query.to {
        Some(list) => list.split(',').map(str::to_string).collect(),
        None => rates.names.keys().filter(|code| **code != from).cloned().collect(),
    };

    let mut converted = BTreeMap::new();
    for to in targets {
        let value = rates
            .convert(amount, &from, &to)
            .ok_or_else(|| reject(StatusCode::NOT_FOUND, "not found"))?;
        converted.insert(to, value);
    }
    debug!(%from, amount, targets = converted.len(), "served latest rates");

    Ok(Json(Latest {
        amount,
        base: from,
        date: rates.date.clone(),
        rates: converted,
    }))
}

fn reject(status: StatusCode, message: &str) -> (StatusCode, Json<Message>) {
    (
        status,
        Json(Message {
            message: message.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_euro_based() {
        let table = RateTable::default();
        assert_eq!(table.base, "EUR");
        assert_eq!(table.units_per_base["EUR"], 1.0);
        assert_eq!(table.names["USD"], "United States Dollar");
    }

    #[test]
    fn convert_uses_cross_rate() {
        let table = RateTable::new("USD", DEFAULT_DATE)
            .with_currency("USD", "US Dollar", 1.0)
            .with_currency("EUR", "Euro", 0.9215);
        assert_eq!(table.convert(100.0, "USD", "EUR"), Some(92.15));
        assert_eq!(table.convert(92.15, "EUR", "USD"), Some(100.0));
    }

    #[test]
    fn convert_unknown_code_is_none() {
        let table = RateTable::default();
        assert_eq!(table.convert(1.0, "USD", "XYZ"), None);
        assert_eq!(table.convert(1.0, "XYZ", "USD"), None);
    }

    #[test]
    fn latest_serializes_to_json() {
        let latest = Latest {
            amount: 10.0,
            base: "USD".to_string(),
            date: DEFAULT_DATE.to_string(),
            rates: BTreeMap::from([("EUR".to_string(), 9.3)]),
        };
        let json = serde_json::to_value(&latest).unwrap();
        assert_eq!(json["base"], "USD");
        assert_eq!(json["rates"]["EUR"], 9.3);
        assert_eq!(json["date"], DEFAULT_DATE);
    }

    #[test]
    fn latest_query_fields_are_optional() {
        let query: LatestQuery = serde_json::from_str(r#"{}"#).unwrap();
        assert!(query.amount.is_none());
        assert!(query.from.is_none());
        assert!(query.to.is_none());
    }
}
