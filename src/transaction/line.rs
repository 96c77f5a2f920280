//! Converts one line of a bank export into a `Transaction`, using the
//! export's header line to find out which column holds what.
//!
//! The supported exports differ in delimiter, so every line is first split
//! on `,`. If that does not line up with the header, `;` is tried.

use csv::StringRecord;
use thiserror::Error;
use tracing::debug;

use crate::transaction::amount::{parse_amount, AmountParseError};
use crate::transaction::date::{DateParseError, DateParser};
use crate::transaction::field::Field;
use crate::transaction::Transaction;

/// Mastercard exports put the exchange rate of a foreign transaction on a
/// line of its own after the transaction.
const CONTINUATION_MARKER: &str = "Valutakurs:";

/// Fewer columns than this cannot hold a date, an amount and a payee.
const MIN_COLUMNS: usize = 3;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum LineParseError {
    #[error("continuation lines are not supported")]
    ContinuationLine,
    #[error("no delimiter splits {line:?} into columns matching the header")]
    NoDelimiter { line: String },
    #[error("missing required data (date={date} amount={amount} payee={payee})")]
    InsufficientData { date: bool, amount: bool, payee: bool },
    #[error(transparent)]
    Date(#[from] DateParseError),
    #[error(transparent)]
    Amount(#[from] AmountParseError),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Delimiter {
    Comma,
    Semicolon,
}

/// Delimiters in the order they are tried.
const DELIMITERS: [Delimiter; 2] = [Delimiter::Comma, Delimiter::Semicolon];

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
        }
    }
}

/// Splits one line into its fields. Quoted fields are unquoted and their
/// doubled quotes collapsed. Empty fields, trailing ones included, are kept.
pub fn split_record(line: &str, delimiter: Delimiter) -> StringRecord {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter.as_byte())
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    match rdr.read_record(&mut record) {
        Ok(true) => record,
        Ok(false) => StringRecord::new(),
        Err(err) => {
            debug!(?delimiter, "cannot split line: {}", err);
            StringRecord::new()
        }
    }
}

/// The classified columns of an export's header line, for each delimiter.
#[derive(Clone, Debug)]
pub struct HeaderSpec {
    comma: Vec<Field>,
    semicolon: Vec<Field>,
}

impl HeaderSpec {
    pub fn new(header_line: &str) -> Self {
        let classify = |delimiter: Delimiter| -> Vec<Field> {
            split_record(header_line, delimiter)
                .iter()
                .map(Field::classify)
                .collect()
        };
        Self {
            comma: classify(Delimiter::Comma),
            semicolon: classify(Delimiter::Semicolon),
        }
    }

    pub fn fields(&self, delimiter: Delimiter) -> &[Field] {
        match delimiter {
            Delimiter::Comma => &self.comma,
            Delimiter::Semicolon => &self.semicolon,
        }
    }
}

/// Parses the data lines that follow a given header line.
#[derive(Clone, Debug)]
pub struct LineParser {
    header: HeaderSpec,
    dates: DateParser,
}

impl LineParser {
    pub fn new(header: HeaderSpec, dates: DateParser) -> Self {
        Self { header, dates }
    }

    pub fn parse_line(&self, line: &str) -> Result<Transaction, LineParseError> {
        if line.starts_with(CONTINUATION_MARKER) {
            return Err(LineParseError::ContinuationLine);
        }

        let mut insufficient: Option<LineParseError> = None;
        for delimiter in DELIMITERS {
            let tokens = split_record(line, delimiter);
            let fields = self.header.fields(delimiter);
            if tokens.len() < MIN_COLUMNS {
                debug!(?delimiter, columns = tokens.len(), "too few columns");
                continue;
            }
            if tokens.len() != fields.len() {
                debug!(
                    ?delimiter,
                    columns = tokens.len(),
                    header_columns = fields.len(),
                    "column count differs from header"
                );
                continue;
            }

            match self.align(fields, &tokens) {
                Err(err @ LineParseError::InsufficientData { .. }) => {
                    debug!(?delimiter, "{}", err);
                    insufficient.get_or_insert(err);
                }
                result => return result,
            }
        }

        Err(insufficient.unwrap_or_else(|| LineParseError::NoDelimiter {
            line: line.to_string(),
        }))
    }

    /// Fills a transaction from tokens aligned 1:1 with the header fields.
    /// Where several columns map to the same field, the last one wins.
    fn align(
        &self,
        fields: &[Field],
        tokens: &StringRecord,
    ) -> Result<Transaction, LineParseError> {
        let mut date = None;
        let mut amount = None;
        let mut payee = None;
        let mut memo = None;

        for (field, value) in fields.iter().zip(tokens) {
            match field {
                Field::Date => date = Some(self.dates.parse(value)?),
                Field::Amount => amount = Some(parse_amount(value)?),
                Field::Payee => payee = Some(value.to_string()),
                Field::Memo => memo = Some(value.to_string()).filter(|m| !m.is_empty()),
                Field::Unknown => {}
            }
        }

        match (date, amount, payee) {
            (Some(date), Some(amount), Some(payee)) => Ok(Transaction {
                date,
                amount,
                payee,
                memo,
            }),
            (date, amount, payee) => Err(LineParseError::InsufficientData {
                date: date.is_some(),
                amount: amount.is_some(),
                payee: payee.is_some(),
            }),
        }
    }
}
