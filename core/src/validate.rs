//! Form field state and the submit gate.

use crate::error::FormError;
use crate::types::ConversionRequest;

/// Raw values of the three form fields. An empty currency means the
/// placeholder option is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub from: String,
    pub to: String,
    pub amount: String,
}

impl FormState {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount: amount.into(),
        }
    }

    /// Turn the fields into a request, or say why they can't be one.
    pub fn to_request(&self) -> Result<ConversionRequest, FormError> {
        if self.from.is_empty() || self.to.is_empty() {
            return Err(FormError::EmptyCurrency);
        }
        let amount = parse_amount(&self.amount)?;
        ConversionRequest::new(self.from.as_str(), self.to.as_str(), amount)
    }
}

/// Parse the amount field. Surrounding whitespace is ignored.
pub fn parse_amount(text: &str) -> Result<f64, FormError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FormError::EmptyAmount);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| FormError::InvalidAmount(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(FormError::InvalidAmount(trimmed.to_string()));
    }
    if value <= 0.0 {
        return Err(FormError::NonPositiveAmount(value));
    }
    Ok(value)
}

/// True iff both currencies are chosen and the amount is a finite number
/// greater than zero.
pub fn validate(form: &FormState) -> bool {
    form.to_request().is_ok()
}
