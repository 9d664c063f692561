//! Currency conversion core: rate-service client and form controller.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). `ConversionController` sits
//! on top and turns form edits, submit and swap into requests, then turns the
//! answers into display strings.
//!
//! # Design
//! - `RatesClient` is stateless and holds only `base_url`.
//! - Each service call is split into `build_*` and `parse_*`, and each
//!   controller command into `begin_*` and `finish_*`, so the I/O boundary
//!   stays explicit. Hosts plug in through the `Transport` trait.
//! - The per-unit rate is always computed locally as
//!   `converted_amount / amount`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod controller;
pub mod error;
pub mod format;
pub mod http;
pub mod types;
pub mod validate;

pub use client::{RatesClient, DEFAULT_BASE_URL};
pub use controller::{
    ControllerState, ConversionController, Display, PendingCatalog, PendingConversion, RenderedConversion,
    SelectOption,
};
pub use error::{ApiError, FormError, FormatError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use types::{ConversionRequest, ConversionResult, CurrencyCatalog, LastConversion, LatestRates};
pub use validate::{validate, FormState};
