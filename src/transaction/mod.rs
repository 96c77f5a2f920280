//! A single bank transaction, and the parsing of export lines into them.

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub mod amount;
pub mod date;
pub mod field;
pub mod line;

/// A transaction read from one line of a bank export.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub payee: String,
    pub memo: Option<String>,
}

impl Transaction {
    /// Returns the values of the canonical output columns, in order.
    pub fn to_row(&self) -> [String; 4] {
        [
            self.date.format(date::OUTPUT_FORMAT).to_string(),
            self.amount.to_string(),
            self.payee.clone(),
            self.memo.clone().unwrap_or_default(),
        ]
    }
}
