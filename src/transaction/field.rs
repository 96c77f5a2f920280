/// The semantic field that a column of a bank export maps onto.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Field {
    Date,
    Amount,
    Payee,
    Memo,
    /// Column that is not carried into the output.
    Unknown,
}

const AMOUNT_NAMES: &[&str] = &["amount", "belopp"];
const PAYEE_NAMES: &[&str] = &["payee", "beskrivning", "rubrik", "specifikation"];

impl Field {
    /// Classifies a header token by the column names used by the supported
    /// banks (English, and Swedish for Nordea and Mastercard exports).
    pub fn classify(token: &str) -> Self {
        let lower = token.to_lowercase();
        let name = lower.as_str();

        // "Bokföringsdag" can arrive with a mangled "ö", so match around it.
        if name == "date"
            || name.contains("datum")
            || (name.contains("bokf") && name.contains("ringsdag"))
        {
            Field::Date
        } else if AMOUNT_NAMES.contains(&name) {
            Field::Amount
        } else if PAYEE_NAMES.contains(&name) {
            Field::Payee
        } else if name == "memo" {
            Field::Memo
        } else {
            Field::Unknown
        }
    }
}
