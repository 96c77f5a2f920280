use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
#[error("cannot parse amount {token:?}")]
pub struct AmountParseError {
    pub token: String,
}

/// Parses a monetary amount as written by one of the supported banks.
///
/// A token in scientific notation (`1e3`) is read as such or not at all.
/// Otherwise the token is first read as a plain dot-decimal number
/// (`-1234.56`). Failing that, quotes and whitespace are stripped and it is read
/// with a comma as the decimal separator, allowing dots as thousands
/// separators (`"1 234,56"`, `1.234,56`). As with locale-aware number
/// parsing, anything after the leading number is ignored (`12,50kr`).
///
/// The returned value keeps the scale it was written with, so `-42.10`
/// renders back as `-42.10`.
pub fn parse_amount(token: &str) -> Result<Decimal, AmountParseError> {
    lazy_static! {
        static ref SCIENTIFIC: Regex =
            Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)[eE][+-]?\d+$").unwrap();
    }

    let s = token.trim();
    let parsed = if SCIENTIFIC.is_match(s) {
        // A value out of range for a Decimal is not retried as a comma decimal.
        Decimal::from_scientific(s).ok()
    } else {
        Decimal::from_str(s)
            .ok()
            .or_else(|| parse_comma_decimal(token))
    };
    parsed.ok_or_else(|| AmountParseError {
        token: token.to_string(),
    })
}

fn parse_comma_decimal(token: &str) -> Option<Decimal> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^([+-]?)(\d[\d.]*)?(?:,(\d*))?").unwrap();
    }

    let cleaned: String = token
        .chars()
        .filter(|c| *c != '"' && !c.is_whitespace())
        .collect();
    let captures = RE.captures(&cleaned)?;

    let sign = match captures.get(1) {
        Some(m) if m.as_str() == "-" => "-",
        _ => "",
    };
    let integer: String = captures
        .get(2)
        .map_or("", |m| m.as_str())
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    let fraction = captures.get(3).map_or("", |m| m.as_str());
    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    let integer = if integer.is_empty() { "0" } else { &integer };
    let normalized = if fraction.is_empty() {
        format!("{}{}", sign, integer)
    } else {
        format!("{}{}.{}", sign, integer, fraction)
    };
    Decimal::from_str(&normalized).ok()
}
