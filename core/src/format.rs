//! Currency display formatting (en-US conventions).
//!
//! Known codes use their symbol and ISO-4217 minor units; any other
//! well-formed code is printed as `"<CODE> 1,234.50"`. Malformed codes are a
//! `FormatError`, which `format_or_fallback` turns into `"<code> <amount>"`
//! with two decimals.

use tracing::warn;

use crate::error::FormatError;

/// Rates get up to this many fraction digits.
const RATE_MAX_FRACTION_DIGITS: usize = 6;

/// Code, symbol, minor units.
const CURRENCIES: &[(&str, Option<&str>, usize)] = &[
    ("AUD", Some("A$"), 2),
    ("BGN", None, 2),
    ("BRL", Some("R$"), 2),
    ("CAD", Some("CA$"), 2),
    ("CHF", None, 2),
    ("CNY", Some("CN¥"), 2),
    ("CZK", None, 2),
    ("DKK", None, 2),
    ("EUR", Some("€"), 2),
    ("GBP", Some("£"), 2),
    ("HKD", Some("HK$"), 2),
    ("HUF", None, 2),
    ("IDR", None, 2),
    ("ILS", Some("₪"), 2),
    ("INR", Some("₹"), 2),
    ("ISK", None, 0),
    ("JPY", Some("¥"), 0),
    ("KRW", Some("₩"), 0),
    ("MXN", Some("MX$"), 2),
    ("MYR", None, 2),
    ("NOK", None, 2),
    ("NZD", Some("NZ$"), 2),
    ("PHP", Some("₱"), 2),
    ("PLN", None, 2),
    ("RON", None, 2),
    ("SEK", None, 2),
    ("SGD", None, 2),
    ("THB", None, 2),
    ("TRY", None, 2),
    ("USD", Some("$"), 2),
    ("ZAR", None, 2),
];

/// How many fraction digits to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FractionDigits {
    pub min: usize,
    pub max: usize,
}

impl FractionDigits {
    pub const fn exact(digits: usize) -> Self {
        Self {
            min: digits,
            max: digits,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CurrencyStyle<'a> {
    code: &'a str,
    symbol: Option<&'static str>,
    minor_units: usize,
}

fn style_for(code: &str) -> Result<CurrencyStyle<'_>, FormatError> {
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(FormatError::InvalidCode(code.to_string()));
    }
    let known = CURRENCIES.iter().find(|(c, _, _)| *c == code);
    Ok(match known {
        Some(&(_, symbol, minor_units)) => CurrencyStyle {
            code,
            symbol,
            minor_units,
        },
        None => CurrencyStyle {
            code,
            symbol: None,
            minor_units: 2,
        },
    })
}

/// Number of minor units for `code`, 2 when unknown.
pub fn minor_units(code: &str) -> usize {
    style_for(code).map(|s| s.minor_units).unwrap_or(2)
}

/// Format a money amount with the currency's own minor units.
pub fn format_currency(value: f64, code: &str) -> Result<String, FormatError> {
    let style = style_for(code)?;
    format_with(value, style, FractionDigits::exact(style.minor_units))
}

/// Format a per-unit rate: at least the currency's minor units, at most six
/// fraction digits, trailing zeros beyond the minimum dropped.
pub fn format_rate(value: f64, code: &str) -> Result<String, FormatError> {
    let style = style_for(code)?;
    format_with(
        value,
        style,
        FractionDigits {
            min: style.minor_units,
            max: RATE_MAX_FRACTION_DIGITS.max(style.minor_units),
        },
    )
}

/// The string shown when the currency cannot be formatted.
pub fn fallback(value: f64, code: &str) -> String {
    format!("{code} {value:.2}")
}

/// Apply `format`, logging and falling back on failure.
pub fn format_or_fallback(
    value: f64,
    code: &str,
    format: fn(f64, &str) -> Result<String, FormatError>,
) -> String {
    format(value, code).unwrap_or_else(|e| {
        warn!(error = %e, code, "currency formatting failed, using fallback");
        fallback(value, code)
    })
}

fn format_with(value: f64, style: CurrencyStyle<'_>, digits: FractionDigits) -> Result<String, FormatError> {
    if !value.is_finite() {
        return Err(FormatError::NonFinite(value));
    }
    let number = format_number(value.abs(), digits);
    let sign = if value < 0.0 { "-" } else { "" };
    Ok(match style.symbol {
        Some(symbol) => format!("{sign}{symbol}{number}"),
        None => format!("{sign}{} {number}", style.code),
    })
}

/// Fixed-point rendering with `,` grouping. `value` must be non-negative.
fn format_number(value: f64, digits: FractionDigits) -> String {
    let fixed = format!("{:.*}", digits.max, value);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (fixed.as_str(), ""),
    };

    let mut frac = frac_part.to_string();
    while frac.len() > digits.min && frac.ends_with('0') {
        frac.pop();
    }

    let grouped = group_thousands(int_part);
    if frac.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac}")
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_known_currency_with_symbol() {
        assert_eq!(format_currency(92.15, "EUR").unwrap(), "€92.15");
        assert_eq!(format_currency(100.0, "USD").unwrap(), "$100.00");
        assert_eq!(format_currency(1234567.891, "GBP").unwrap(), "£1,234,567.89");
    }

    #[test]
    fn respects_zero_minor_units() {
        assert_eq!(format_currency(15473.6, "JPY").unwrap(), "¥15,474");
        assert_eq!(format_currency(999.4, "ISK").unwrap(), "ISK 999");
    }

    #[test]
    fn code_only_currency_uses_code_prefix() {
        assert_eq!(format_currency(5.0, "CHF").unwrap(), "CHF 5.00");
    }

    #[test]
    fn unknown_but_well_formed_code_formats() {
        assert_eq!(format_currency(5.0, "XXX").unwrap(), "XXX 5.00");
    }

    #[test]
    fn malformed_code_is_an_error() {
        assert_eq!(
            format_currency(5.0, "usd"),
            Err(FormatError::InvalidCode("usd".to_string()))
        );
        assert!(format_currency(5.0, "EURO").is_err());
        assert!(format_currency(5.0, "").is_err());
    }

    #[test]
    fn non_finite_is_an_error() {
        assert!(matches!(format_currency(f64::INFINITY, "USD"), Err(FormatError::NonFinite(_))));
    }

    #[test]
    fn negative_values_keep_sign_before_symbol() {
        assert_eq!(format_currency(-12.5, "USD").unwrap(), "-$12.50");
    }

    #[test]
    fn rate_keeps_significant_fraction_digits() {
        assert_eq!(format_rate(0.9215, "EUR").unwrap(), "€0.9215");
        assert_eq!(format_rate(1.0, "USD").unwrap(), "$1.00");
        assert_eq!(format_rate(1.0851871947911, "USD").unwrap(), "$1.085187");
        assert_eq!(format_rate(149.69, "JPY").unwrap(), "¥149.69");
    }

    #[test]
    fn fallback_includes_code_and_two_decimals() {
        let shown = format_or_fallback(5.0, "XX", format_currency);
        assert_eq!(shown, "XX 5.00");

        let shown = format_or_fallback(5.0, "XXX", format_currency);
        assert!(shown.contains("XXX"));
        assert!(shown.contains("5.00"));
    }

    #[test]
    fn grouping_boundaries() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }

    #[test]
    fn minor_units_lookup() {
        assert_eq!(minor_units("JPY"), 0);
        assert_eq!(minor_units("EUR"), 2);
        assert_eq!(minor_units("nope"), 2);
    }
}
