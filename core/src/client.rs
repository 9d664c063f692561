//! Stateless HTTP request builder and response parser for the rate service.
//!
//! # Design
//! `RatesClient` holds only a `base_url` and carries no mutable state between
//! calls. Each service call is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! caller executes the round-trip, keeping the core free of I/O.

use tracing::debug;
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ConversionRequest, ConversionResult, CurrencyCatalog, LatestRates};

/// Public Frankfurter instance.
pub const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";

/// Synchronous, stateless client for a Frankfurter-compatible rate service.
#[derive(Debug, Clone)]
pub struct RatesClient {
    base_url: String,
}

impl Default for RatesClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl RatesClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /currencies`
    pub fn build_list_currencies(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/currencies", self.base_url),
            headers: accept_json(),
        }
    }

    /// `GET /latest?amount={A}&from={F}&to={T}`
    pub fn build_convert(&self, request: &ConversionRequest) -> Result<HttpRequest, ApiError> {
        let url = Url::parse_with_params(
            &format!("{}/latest", self.base_url),
            &[
                ("amount", request.amount().to_string()),
                ("from", request.from().to_string()),
                ("to", request.to().to_string()),
            ],
        )
        .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        debug!(url = %url, "built conversion request");
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: url.into(),
            headers: accept_json(),
        })
    }

    pub fn parse_list_currencies(&self, response: HttpResponse) -> Result<CurrencyCatalog, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Decode a `/latest` answer and derive the per-unit rate for `request`.
    pub fn parse_convert(
        &self,
        request: &ConversionRequest,
        response: HttpResponse,
    ) -> Result<ConversionResult, ApiError> {
        check_status(&response, 200)?;
        let body: LatestRates =
            serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        let converted = body
            .rates
            .get(request.to())
            .copied()
            .ok_or_else(|| ApiError::MissingRate(request.to().to_string()))?;
        Ok(ConversionResult::derive(request, converted, body.date))
    }
}

fn accept_json() -> Vec<(String, String)> {
    vec![("accept".to_string(), "application/json".to_string())]
}

/// Map non-success status codes to `ApiError::HttpError`.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RatesClient {
        RatesClient::new("http://localhost:3000")
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_currencies_produces_correct_request() {
        let req = client().build_list_currencies();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/currencies");
        assert_eq!(
            req.headers,
            vec![("accept".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn build_convert_encodes_query() {
        let conversion = ConversionRequest::new("USD", "EUR", 100.0).unwrap();
        let req = client().build_convert(&conversion).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/latest?amount=100&from=USD&to=EUR");
    }

    #[test]
    fn build_convert_keeps_fractional_amount() {
        let conversion = ConversionRequest::new("GBP", "JPY", 12.5).unwrap();
        let req = client().build_convert(&conversion).unwrap();
        assert_eq!(req.path, "http://localhost:3000/latest?amount=12.5&from=GBP&to=JPY");
    }

    #[test]
    fn build_convert_rejects_unparseable_base() {
        let conversion = ConversionRequest::new("USD", "EUR", 1.0).unwrap();
        let err = RatesClient::new("not a url").build_convert(&conversion).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = RatesClient::new("http://localhost:3000/");
        let req = client.build_list_currencies();
        assert_eq!(req.path, "http://localhost:3000/currencies");
    }

    #[test]
    fn default_points_at_frankfurter() {
        assert_eq!(RatesClient::default().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn parse_list_currencies_success() {
        let catalog = client()
            .parse_list_currencies(ok(r#"{"USD":"US Dollar","EUR":"Euro"}"#))
            .unwrap();
        assert_eq!(catalog.codes().collect::<Vec<_>>(), vec!["EUR", "USD"]);
    }

    #[test]
    fn parse_list_currencies_bad_status() {
        let response = HttpResponse {
            status: 503,
            headers: Vec::new(),
            body: "unavailable".to_string(),
        };
        let err = client().parse_list_currencies(response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 503, .. }));
    }

    #[test]
    fn parse_list_currencies_bad_json() {
        let err = client().parse_list_currencies(ok("not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_convert_derives_rate() {
        let conversion = ConversionRequest::new("USD", "EUR", 100.0).unwrap();
        let result = client()
            .parse_convert(
                &conversion,
                ok(r#"{"amount":100.0,"base":"USD","date":"2024-05-03","rates":{"EUR":92.15}}"#),
            )
            .unwrap();
        assert_eq!(result.converted_amount, 92.15);
        assert_eq!(result.rate, 92.15 / 100.0);
        assert_eq!(result.date.as_deref(), Some("2024-05-03"));
    }

    #[test]
    fn parse_convert_missing_target_rate() {
        let conversion = ConversionRequest::new("USD", "EUR", 1.0).unwrap();
        let err = client()
            .parse_convert(&conversion, ok(r#"{"rates":{"GBP":0.8}}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingRate(code) if code == "EUR"));
    }

    #[test]
    fn parse_convert_not_found() {
        let conversion = ConversionRequest::new("USD", "ZZZ", 1.0).unwrap();
        let response = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: r#"{"message":"not found"}"#.to_string(),
        };
        let err = client().parse_convert(&conversion, response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 404, .. }));
    }
}
