//! The conversion form controller.
//!
//! # Design
//! `ConversionController` owns the catalog, the three form fields, the
//! display region and the last successful conversion. It never performs I/O:
//! every networked command is split into `begin_*`, which returns a pending
//! value carrying an `HttpRequest`, and `finish_*`, which takes the host's
//! outcome. `load_catalog`, `convert`, `submit` and `swap` run both halves
//! against a `Transport` for hosts that don't need overlap.
//!
//! Overlapping conversions are not sequenced. Whichever pending is finished
//! last owns the display, even if it was begun first.

use tracing::{debug, info, warn};

use crate::client::RatesClient;
use crate::error::{ApiError, FormError};
use crate::format::{format_currency, format_or_fallback, format_rate};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{ConversionRequest, ConversionResult, CurrencyCatalog, LastConversion};
use crate::validate::{self, FormState};

pub const DEFAULT_FROM: &str = "USD";
pub const DEFAULT_TO: &str = "EUR";

pub const PLACEHOLDER_LABEL: &str = "Select currency";
pub const LOADING_CURRENCIES: &str = "Loading currencies...";
pub const CONVERTING: &str = "Converting...";
pub const CATALOG_LOAD_FAILED: &str = "Failed to load currencies. Please reload and try again.";
pub const CONVERSION_FAILED: &str = "Conversion failed. Please try again.";

/// One entry of a currency selector. The placeholder has an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Display strings for a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedConversion {
    /// Converted amount in the target currency.
    pub converted_amount: String,
    /// The amount the user entered, in the source currency.
    pub original_amount: String,
    /// `1 <from> = <rate> (<target name>)`
    pub unit_rate: String,
    pub as_of: Option<String>,
}

/// The results region. Exactly one of these is shown at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Display {
    Empty,
    Loading(String),
    Error(String),
    Result(RenderedConversion),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Uninitialized,
    Idle,
    Converting,
}

/// A `/currencies` call waiting for the host.
#[derive(Debug, Clone)]
pub struct PendingCatalog {
    pub request: HttpRequest,
}

/// A `/latest` call waiting for the host.
#[derive(Debug, Clone)]
pub struct PendingConversion {
    pub conversion: ConversionRequest,
    pub request: HttpRequest,
    pub generation: u64,
}

#[derive(Debug)]
pub struct ConversionController {
    client: RatesClient,
    catalog: CurrencyCatalog,
    catalog_loaded: bool,
    form: FormState,
    display: Display,
    submit_enabled: bool,
    last_conversion: Option<LastConversion>,
    generation: u64,
    in_flight: usize,
}

impl ConversionController {
    pub fn new(client: RatesClient) -> Self {
        Self {
            client,
            catalog: CurrencyCatalog::new(),
            catalog_loaded: false,
            form: FormState::default(),
            display: Display::Empty,
            submit_enabled: false,
            last_conversion: None,
            generation: 0,
            in_flight: 0,
        }
    }

    pub fn catalog(&self) -> &CurrencyCatalog {
        &self.catalog
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn last_conversion(&self) -> Option<&LastConversion> {
        self.last_conversion.as_ref()
    }

    pub fn state(&self) -> ControllerState {
        if !self.catalog_loaded {
            ControllerState::Uninitialized
        } else if self.in_flight > 0 {
            ControllerState::Converting
        } else {
            ControllerState::Idle
        }
    }

    /// Source selector options: placeholder, then codes ascending.
    pub fn from_options(&self) -> Vec<SelectOption> {
        self.options()
    }

    /// Target selector options: placeholder, then codes ascending.
    pub fn to_options(&self) -> Vec<SelectOption> {
        self.options()
    }

    fn options(&self) -> Vec<SelectOption> {
        let placeholder = SelectOption {
            value: String::new(),
            label: PLACEHOLDER_LABEL.to_string(),
        };
        std::iter::once(placeholder)
            .chain(self.catalog.iter().map(|(code, name)| SelectOption {
                value: code.to_string(),
                label: format!("{code} - {name}"),
            }))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    pub fn begin_load_catalog(&mut self) -> PendingCatalog {
        self.show_loading(LOADING_CURRENCIES);
        PendingCatalog {
            request: self.client.build_list_currencies(),
        }
    }

    pub fn finish_load_catalog(&mut self, _pending: PendingCatalog, outcome: Result<HttpResponse, ApiError>) {
        match outcome.and_then(|response| self.client.parse_list_currencies(response)) {
            Ok(catalog) => {
                info!(currencies = catalog.len(), "currency catalog loaded");
                self.form.from = default_selection(&catalog, DEFAULT_FROM);
                self.form.to = default_selection(&catalog, DEFAULT_TO);
                self.catalog = catalog;
                self.catalog_loaded = true;
                self.display = Display::Empty;
            }
            Err(e) => {
                warn!(error = %e, "failed to load currency catalog");
                self.catalog = CurrencyCatalog::new();
                self.form.from.clear();
                self.form.to.clear();
                self.show_error(CATALOG_LOAD_FAILED);
            }
        }
        self.revalidate();
    }

    /// Fetch the catalog and repopulate both selectors. Failures are shown,
    /// never returned.
    pub fn load_catalog<T: Transport>(&mut self, transport: &T) {
        let pending = self.begin_load_catalog();
        let outcome = transport.execute(&pending.request);
        self.finish_load_catalog(pending, outcome);
    }

    // -----------------------------------------------------------------------
    // Form fields
    // -----------------------------------------------------------------------

    /// Choose the source currency. An empty code selects the placeholder.
    pub fn select_from(&mut self, code: &str) -> Result<(), FormError> {
        self.check_selectable(code)?;
        self.form.from = code.to_string();
        self.revalidate();
        Ok(())
    }

    /// Choose the target currency. An empty code selects the placeholder.
    pub fn select_to(&mut self, code: &str) -> Result<(), FormError> {
        self.check_selectable(code)?;
        self.form.to = code.to_string();
        self.revalidate();
        Ok(())
    }

    pub fn set_amount(&mut self, text: impl Into<String>) {
        self.form.amount = text.into();
        self.revalidate();
    }

    fn check_selectable(&self, code: &str) -> Result<(), FormError> {
        if code.is_empty() || self.catalog.contains(code) {
            Ok(())
        } else {
            Err(FormError::UnknownCurrency(code.to_string()))
        }
    }

    /// Whether the current fields could be submitted.
    pub fn validate(&self) -> bool {
        validate::validate(&self.form)
    }

    fn revalidate(&mut self) -> bool {
        self.submit_enabled = self.validate();
        self.submit_enabled
    }

    // -----------------------------------------------------------------------
    // Conversion
    // -----------------------------------------------------------------------

    /// Start a conversion. Returns `None` when nothing has to go over the
    /// network: identity conversions, and requests that were rejected.
    pub fn begin_convert(&mut self, conversion: ConversionRequest) -> Option<PendingConversion> {
        for code in [conversion.from(), conversion.to()] {
            if !self.catalog.contains(code) {
                warn!(code, "conversion requested for a currency outside the catalog");
                self.show_error(CONVERSION_FAILED);
                self.revalidate();
                return None;
            }
        }

        if conversion.is_identity() {
            debug!(code = conversion.from(), "identity conversion resolved locally");
            let result = ConversionResult::identity(&conversion);
            self.record_success(&conversion, &result);
            self.revalidate();
            return None;
        }

        let request = match self.client.build_convert(&conversion) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "could not build conversion request");
                self.show_error(CONVERSION_FAILED);
                self.revalidate();
                return None;
            }
        };

        self.generation += 1;
        self.in_flight += 1;
        self.submit_enabled = false;
        self.show_loading(CONVERTING);
        debug!(
            generation = self.generation,
            from = conversion.from(),
            to = conversion.to(),
            amount = conversion.amount(),
            "conversion started"
        );
        Some(PendingConversion {
            conversion,
            request,
            generation: self.generation,
        })
    }

    pub fn finish_convert(&mut self, pending: PendingConversion, outcome: Result<HttpResponse, ApiError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match outcome.and_then(|response| self.client.parse_convert(&pending.conversion, response)) {
            Ok(result) => {
                if pending.generation < self.generation {
                    debug!(
                        generation = pending.generation,
                        latest = self.generation,
                        "older conversion finished after a newer one was started"
                    );
                }
                self.record_success(&pending.conversion, &result);
            }
            Err(e) => {
                warn!(error = %e, generation = pending.generation, "conversion failed");
                self.show_error(CONVERSION_FAILED);
            }
        }
        self.revalidate();
    }

    /// Convert `conversion` and show the outcome.
    pub fn convert<T: Transport>(&mut self, conversion: ConversionRequest, transport: &T) {
        if let Some(pending) = self.begin_convert(conversion) {
            let outcome = transport.execute(&pending.request);
            self.finish_convert(pending, outcome);
        }
    }

    /// Convert the current form fields. Does nothing while the form is
    /// invalid, like a disabled submit button.
    pub fn begin_submit(&mut self) -> Option<PendingConversion> {
        match self.form.to_request() {
            Ok(conversion) => self.begin_convert(conversion),
            Err(e) => {
                debug!(error = %e, "submit ignored");
                None
            }
        }
    }

    pub fn submit<T: Transport>(&mut self, transport: &T) {
        if let Some(pending) = self.begin_submit() {
            let outcome = transport.execute(&pending.request);
            self.finish_convert(pending, outcome);
        }
    }

    /// Exchange the two selections. When both were set and an amount is
    /// present the mirrored conversion starts right away.
    pub fn begin_swap(&mut self) -> Option<PendingConversion> {
        let both_set = !self.form.from.is_empty() && !self.form.to.is_empty();
        std::mem::swap(&mut self.form.from, &mut self.form.to);
        self.revalidate();

        if !both_set || self.form.amount.trim().is_empty() {
            return None;
        }
        self.begin_submit()
    }

    pub fn swap<T: Transport>(&mut self, transport: &T) {
        if let Some(pending) = self.begin_swap() {
            let outcome = transport.execute(&pending.request);
            self.finish_convert(pending, outcome);
        }
    }

    fn record_success(&mut self, conversion: &ConversionRequest, result: &ConversionResult) {
        self.last_conversion = Some(LastConversion {
            request: conversion.clone(),
            rate: result.rate,
        });
        self.render(result);
    }

    // -----------------------------------------------------------------------
    // Display
    // -----------------------------------------------------------------------

    pub fn render(&mut self, result: &ConversionResult) {
        self.display = Display::Result(render_conversion(result, &self.catalog));
    }

    pub fn show_loading(&mut self, message: impl Into<String>) {
        self.display = Display::Loading(message.into());
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.display = Display::Error(message.into());
    }
}

/// Format a result for display. Codes the formatter rejects fall back to
/// `"<code> <amount>"`.
pub fn render_conversion(result: &ConversionResult, catalog: &CurrencyCatalog) -> RenderedConversion {
    let target_name = catalog.name(&result.to).unwrap_or(&result.to);
    RenderedConversion {
        converted_amount: format_or_fallback(result.converted_amount, &result.to, format_currency),
        original_amount: format_or_fallback(result.amount, &result.from, format_currency),
        unit_rate: format!(
            "1 {} = {} ({})",
            result.from,
            format_or_fallback(result.rate, &result.to, format_rate),
            target_name
        ),
        as_of: result.date.as_ref().map(|date| format!("Rates as of {date}")),
    }
}

fn default_selection(catalog: &CurrencyCatalog, code: &str) -> String {
    if catalog.contains(code) {
        code.to_string()
    } else {
        String::new()
    }
}
