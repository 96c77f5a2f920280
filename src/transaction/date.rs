use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Year assumed for dates exported without one. The supported exports that
/// omit the year were all produced for a single 2023 import batch.
pub const DEFAULT_YEAR: i32 = 2023;

/// Format used for dates in converted output.
pub const OUTPUT_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, Eq, PartialEq)]
#[error("cannot parse date {token:?}")]
pub struct DateParseError {
    pub token: String,
}

struct InputPattern {
    format: &'static str,
    has_year: bool,
}

/// Accepted input formats, in the order they are tried.
const INPUT_PATTERNS: &[InputPattern] = &[
    // Amex.
    InputPattern {
        format: "%m/%d/%Y",
        has_year: true,
    },
    InputPattern {
        format: "%Y/%m/%d",
        has_year: true,
    },
    // Mastercard, e.g. "25-Jul".
    InputPattern {
        format: "%d-%b",
        has_year: false,
    },
    InputPattern {
        format: "%m-%d",
        has_year: false,
    },
    // Nordea.
    InputPattern {
        format: "%Y-%m-%d",
        has_year: true,
    },
];

/// Parses transaction dates in any of the supported export formats.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DateParser {
    default_year: i32,
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new(DEFAULT_YEAR)
    }
}

impl DateParser {
    /// Creates a parser that fills in `default_year` for dates written
    /// without a year.
    pub fn new(default_year: i32) -> Self {
        Self { default_year }
    }

    pub fn parse(&self, token: &str) -> Result<NaiveDate, DateParseError> {
        INPUT_PATTERNS
            .iter()
            .find_map(|pattern| self.parse_with(pattern, token))
            .ok_or_else(|| DateParseError {
                token: token.to_string(),
            })
    }

    fn parse_with(&self, pattern: &InputPattern, token: &str) -> Option<NaiveDate> {
        lazy_static! {
            // chrono reads a year of fewer than four digits, exports never
            // write one.
            static ref FULL_YEAR: Regex =
                Regex::new(r"^(\d{4}[/-]\d{1,2}[/-]\d{1,2}|\d{1,2}/\d{1,2}/\d{4})$").unwrap();
        }

        if pattern.has_year {
            if !FULL_YEAR.is_match(token) {
                return None;
            }
            NaiveDate::parse_from_str(token, pattern.format).ok()
        } else {
            // chrono cannot build a date without a year, so supply one.
            let with_year = format!("{} {}", token, self.default_year);
            let format = format!("{} %Y", pattern.format);
            NaiveDate::parse_from_str(&with_year, &format).ok()
        }
    }
}
