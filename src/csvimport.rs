//! The normalized form of one bank export, as consumed by YNAB's CSV file
//! import.

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::transaction::date::DateParser;
use crate::transaction::line::{HeaderSpec, LineParser};
use crate::transaction::Transaction;

/// Output columns, in order.
pub const COLUMNS: [&str; 4] = ["Date", "Amount", "Payee", "Memo"];

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ImportError {
    #[error("export is empty")]
    Empty,
    #[error("export has no header line")]
    MissingHeader,
}

/// Transactions converted from a single export, in the order they appeared.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CsvImport {
    account: String,
    transactions: Vec<Transaction>,
}

impl CsvImport {
    pub fn new<S: Into<String>>(account: S) -> Self {
        Self {
            account: account.into(),
            transactions: Vec::new(),
        }
    }

    /// Converts the full text of a bank export. The first line must be the
    /// header. Data lines that cannot be converted are logged and skipped.
    pub fn from_export(
        content: &str,
        account: &str,
        dates: DateParser,
    ) -> Result<Self, ImportError> {
        if content.is_empty() {
            return Err(ImportError::Empty);
        }
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut lines = content.lines().enumerate();
        let header = match lines.next() {
            Some((_, header)) if !header.trim().is_empty() => header,
            _ => return Err(ImportError::MissingHeader),
        };

        let mut builder = ImportBuilder::new(header, account, dates);
        for (index, line) in lines {
            builder.push_line(index + 1, line);
        }

        info!(
            account,
            imported = builder.import.transactions().len(),
            skipped = builder.skipped(),
            "converted export"
        );
        Ok(builder.build())
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn add_transaction(&mut self, trn: Transaction) {
        self.transactions.push(trn);
    }

    /// Renders the import as CSV, header first.
    pub fn render(&self) -> Result<String> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(Vec::new());

        wtr.write_record(COLUMNS)?;
        for trn in &self.transactions {
            wtr.write_record(trn.to_row())?;
        }

        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// Accumulates the data lines of one export into a `CsvImport`.
pub struct ImportBuilder {
    parser: LineParser,
    import: CsvImport,
    skipped: usize,
}

impl ImportBuilder {
    pub fn new(header: &str, account: &str, dates: DateParser) -> Self {
        Self {
            parser: LineParser::new(HeaderSpec::new(header), dates),
            import: CsvImport::new(account),
            skipped: 0,
        }
    }

    /// Converts and adds one data line. `line_number` is the 1-based
    /// position of the line in the export, for logging only.
    pub fn push_line(&mut self, line_number: usize, line: &str) {
        if line.trim().is_empty() {
            debug!(line_number, "skipping blank line");
            return;
        }
        match self.parser.parse_line(line) {
            Ok(trn) => self.import.add_transaction(trn),
            Err(err) => {
                warn!(line_number, line, "skipping line: {}", err);
                self.skipped += 1;
            }
        }
    }

    /// The number of lines that could not be converted so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn build(self) -> CsvImport {
        self.import
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::assert_text_eq;
    use crate::testutil::golden_test;

    fn convert(content: &str) -> String {
        let content = textwrap::dedent(content);
        CsvImport::from_export(content.trim_start(), "Test", DateParser::default())
            .expect("export should convert")
            .render()
            .expect("render")
    }

    #[test]
    fn test_canonical_line_round_trips() {
        let got = convert(
            "
            Date,Amount,Payee,Memo
            2023-01-05,-42.10,Store A,groceries
            ",
        );
        assert_text_eq!(
            "Date,Amount,Payee,Memo\n2023-01-05,-42.10,Store A,groceries\n",
            got
        );
    }

    #[test]
    fn test_swedish_header_leaves_memo_empty() {
        let got = convert(
            "
            Bokföringsdag,Belopp,Rubrik
            2023-02-01,-120.00,ICA Supermarket
            ",
        );
        assert_text_eq!(
            "Date,Amount,Payee,Memo\n2023-02-01,-120.00,ICA Supermarket,\n",
            got
        );
    }

    #[test]
    fn test_header_only_renders_header() {
        let got = convert("Date,Amount,Payee,Memo\n");
        assert_text_eq!("Date,Amount,Payee,Memo\n", got);
    }

    #[test]
    fn test_bad_lines_are_skipped() {
        let content = "Date,Amount,Payee,Memo\r\n\
            2023-01-05,1.00,First,\r\n\
            Valutakurs: 1.23\r\n\
            not,a,transaction,line\r\n\
            \r\n\
            2023-01-06,2.00,Second,\r\n";
        let import = CsvImport::from_export(content, "Test", DateParser::default()).unwrap();
        let payees: Vec<&str> = import
            .transactions()
            .iter()
            .map(|trn| trn.payee.as_str())
            .collect();
        assert_eq!(vec!["First", "Second"], payees);
    }

    #[test]
    fn test_builder_counts_skipped_lines() {
        let mut builder = ImportBuilder::new("Date,Amount,Payee", "Test", DateParser::default());
        builder.push_line(1, "2023-01-05,1.00,Shop");
        builder.push_line(2, "Valutakurs: 10.1");
        builder.push_line(3, "");
        builder.push_line(4, "2023-01-05,x,Shop");
        assert_eq!(2, builder.skipped());
        assert_eq!(1, builder.build().transactions().len());
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let got = convert("\u{feff}Date,Amount,Payee\n2023-01-05,1,Shop\n");
        assert_text_eq!("Date,Amount,Payee,Memo\n2023-01-05,1,Shop,\n", got);
    }

    #[test]
    fn test_payee_needing_quotes_is_quoted() {
        let got = convert("Date;Amount;Payee\n2023-01-05;1,50;\"Shop, \"\"The\"\"\"\n");
        assert_text_eq!(
            "Date,Amount,Payee,Memo\n2023-01-05,1.50,\"Shop, \"\"The\"\"\",\n",
            got
        );
    }

    #[test]
    fn test_empty_export_is_an_error() {
        assert_eq!(
            Err(ImportError::Empty),
            CsvImport::from_export("", "Test", DateParser::default())
        );
    }

    #[test]
    fn test_blank_header_is_an_error() {
        assert_eq!(
            Err(ImportError::MissingHeader),
            CsvImport::from_export("\n2023-01-05,1,Shop\n", "Test", DateParser::default())
        );
    }

    #[test]
    fn test_render_reparses_to_same_values() {
        let import = CsvImport::from_export(
            "Datum;Belopp;Rubrik;Memo\n12/31/2022;-1 234,56;Rent;December\n",
            "Test",
            DateParser::default(),
        )
        .unwrap();
        let rendered = import.render().unwrap();
        let reparsed = CsvImport::from_export(&rendered, "Test", DateParser::default()).unwrap();
        assert_eq!(import.transactions(), reparsed.transactions());
    }

    #[test]
    fn test_golden_amex() {
        golden_test("testdata/input/activity.csv", "Amex", "amex.csv");
    }

    #[test]
    fn test_golden_mastercard() {
        golden_test(
            "testdata/input/Transaktioner_2023-08-01.csv",
            "Mastercard",
            "mastercard.csv",
        );
    }

    #[test]
    fn test_golden_nordea() {
        golden_test("testdata/input/PERSONKONTO 1234.csv", "Nordea", "nordea.csv");
    }
}
