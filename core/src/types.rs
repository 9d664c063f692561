//! Domain types for the currency converter and the rate service's wire DTOs.
//!
//! # Design
//! The catalog is a `BTreeMap` so iteration is alphabetical by code, which is
//! the order both selectors display. `ConversionResult` is derived locally:
//! the service returns an amount-scaled figure and the per-unit rate is
//! computed from it, never requested.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// Supported currencies, code to display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCatalog(BTreeMap<String, String>);

impl CurrencyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(code)
    }

    pub fn name(&self, code: &str) -> Option<&str> {
        self.0.get(code).map(String::as_str)
    }

    /// Codes in ascending lexicographic order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(code, name)| (code.as_str(), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<C: Into<String>, N: Into<String>> FromIterator<(C, N)> for CurrencyCatalog {
    fn from_iter<I: IntoIterator<Item = (C, N)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(code, name)| (code.into(), name.into()))
                .collect(),
        )
    }
}

/// A single conversion attempt. `amount` is always finite and positive.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    from: String,
    to: String,
    amount: f64,
}

impl ConversionRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: f64) -> Result<Self, FormError> {
        let from = from.into();
        let to = to.into();
        if from.is_empty() || to.is_empty() {
            return Err(FormError::EmptyCurrency);
        }
        if !amount.is_finite() {
            return Err(FormError::InvalidAmount(amount.to_string()));
        }
        if amount <= 0.0 {
            return Err(FormError::NonPositiveAmount(amount));
        }
        Ok(Self { from, to, amount })
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Source and target are the same currency.
    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    /// The same amount in the opposite direction.
    pub fn mirrored(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            amount: self.amount,
        }
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub converted_amount: f64,
    /// Target units per one source unit: `converted_amount / amount`.
    pub rate: f64,
    /// Day the service's rates were published, if it said.
    pub date: Option<String>,
}

impl ConversionResult {
    /// Build a result from the service's amount-scaled answer.
    pub fn derive(request: &ConversionRequest, converted_amount: f64, date: Option<String>) -> Self {
        Self {
            from: request.from.clone(),
            to: request.to.clone(),
            amount: request.amount,
            converted_amount,
            rate: converted_amount / request.amount,
            date,
        }
    }

    /// Same-currency conversion, resolved without the service.
    pub fn identity(request: &ConversionRequest) -> Self {
        Self {
            from: request.from.clone(),
            to: request.to.clone(),
            amount: request.amount,
            converted_amount: request.amount,
            rate: 1.0,
            date: None,
        }
    }
}

/// The most recent successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct LastConversion {
    pub request: ConversionRequest,
    pub rate: f64,
}

/// Body of `GET /latest`.
///
/// Only `rates` is required; `amount`, `base` and `date` are what
/// Frankfurter-compatible services send alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestRates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub rates: HashMap<String, f64>,
}
