use anyhow::{Context, Result};
use clap::Args;

use crate::account::Account;
use crate::config::ConfigFile;
use crate::csvimport::CsvImport;
use crate::filespec::{self, FileSpec};

#[derive(Debug, Args)]
pub struct Command {
    /// The bank export to convert. "-" reads from stdin.
    input: FileSpec,
    /// The file to write to (overwrites any existing file). "-" writes to
    /// stdout.
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: FileSpec,
    /// Account label for the converted transactions. Derived from the input
    /// file name when not given.
    #[arg(long = "account")]
    account: Option<String>,
}

impl Command {
    pub fn run(&self, file: ConfigFile) -> Result<()> {
        let account = match (&self.account, &self.input) {
            (Some(account), _) => account.clone(),
            (None, FileSpec::Path(path)) => Account::from_path(path).label().to_string(),
            (None, FileSpec::Stdio) => String::new(),
        };

        let content = filespec::read_file(&self.input)?;
        let import = CsvImport::from_export(&content, &account, file.date_parser())
            .with_context(|| format!("converting {}", self.input))?;
        filespec::write_file(&self.output, &import.render()?)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    use crate::assert_text_eq;

    #[test]
    fn test_convert_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("Transaktioner_2023.csv");
        let output = dir.path().join("out.csv");
        fs::write(&input, "Datum,Specifikation,Belopp\n05-Aug,SPOTIFY,\"-119,00\"\n").unwrap();

        let cmd = Command {
            input: FileSpec::Path(input.clone()),
            output: FileSpec::Path(output.clone()),
            account: None,
        };
        let config = ConfigFile {
            default_year: Some(2024),
            ..ConfigFile::default()
        };
        cmd.run(config).unwrap();

        assert_text_eq!(
            "Date,Amount,Payee,Memo\n2024-08-05,-119.00,SPOTIFY,\n",
            fs::read_to_string(&output).unwrap()
        );
        assert!(input.exists());
    }

    #[test]
    fn test_convert_empty_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("activity.csv");
        fs::write(&input, "").unwrap();

        let cmd = Command {
            input: FileSpec::Path(input),
            output: FileSpec::Path(dir.path().join("out.csv")),
            account: Some("Amex".to_string()),
        };
        assert!(cmd.run(ConfigFile::default()).is_err());
    }
}
