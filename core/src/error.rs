//! Error types for the rate client, the form, and display formatting.
//!
//! # Design
//! `ApiError` covers everything between building a request and decoding the
//! answer. Non-2xx responses keep the raw status and body for diagnostics.
//! `FormError` describes why user input cannot become a `ConversionRequest`.
//! `FormatError` is only ever seen by the renderer, which falls back to a
//! plain `"<code> <amount>"` string.

use thiserror::Error;

/// Errors produced while talking to the rate service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a status other than 200.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// A `/latest` answer did not contain the requested target currency.
    #[error("response has no rate for {0}")]
    MissingRate(String),

    /// The configured base URL cannot carry a query string.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The host could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Reasons form input is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("no currency selected")]
    EmptyCurrency,

    #[error("currency not supported: {0}")]
    UnknownCurrency(String),

    #[error("amount is empty")]
    EmptyAmount,

    #[error("amount is not a number: {0}")]
    InvalidAmount(String),

    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(f64),
}

/// Currency formatting failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("invalid currency code: {0:?}")]
    InvalidCode(String),

    #[error("cannot format non-finite value {0}")]
    NonFinite(f64),
}
