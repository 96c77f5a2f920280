//! Settings for the directory conversion, read from an optional RON file and
//! overridden from the command line or environment.
//!
//! Example file:
//!
//! ```ron
//! (
//!     input: "/home/me/Downloads/bank",
//!     output: "/home/me/ynab",
//!     default_year: 2023,
//! )
//! ```

use std::path::{Path, PathBuf};

use ron::extensions::Extensions;
use serde_derive::Deserialize;
use thiserror::Error;

use crate::filespec::FileSpec;
use crate::transaction::date::{DateParser, DEFAULT_YEAR};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no {name} directory configured")]
    MissingPath { name: &'static str },
    #[error("import path not a folder: {path:?}")]
    NotADirectory { path: PathBuf },
    #[error("reading config file: {0:#}")]
    Read(anyhow::Error),
    #[error("parsing config file: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Settings as written in the config file. Every value is optional there.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub default_year: Option<i32>,
}

impl ConfigFile {
    pub fn from_filespec(file_spec: &FileSpec) -> Result<Self, ConfigError> {
        let reader = file_spec.reader().map_err(ConfigError::Read)?;
        Ok(ron_options().from_reader(reader)?)
    }

    #[cfg(test)]
    fn from_str(s: &str) -> Result<Self, ConfigError> {
        Ok(ron_options().from_str(s)?)
    }

    pub fn date_parser(&self) -> DateParser {
        DateParser::new(self.default_year.unwrap_or(DEFAULT_YEAR))
    }
}

/// Lets the file write `input: "/in"` rather than `input: Some("/in")`.
fn ron_options() -> ron::Options {
    ron::Options::default().with_default_extension(Extensions::IMPLICIT_SOME)
}

/// Validated settings for a directory conversion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub default_year: i32,
}

impl Config {
    /// Combines the config file with overrides, which take precedence.
    pub fn resolve(
        file: ConfigFile,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let input = input
            .or(file.input)
            .ok_or(ConfigError::MissingPath { name: "input" })?;
        let output = output
            .or(file.output)
            .ok_or(ConfigError::MissingPath { name: "output" })?;
        check_directory(&input)?;
        Ok(Self {
            input,
            output,
            default_year: file.default_year.unwrap_or(DEFAULT_YEAR),
        })
    }

    pub fn date_parser(&self) -> DateParser {
        DateParser::new(self.default_year)
    }
}

fn check_directory(path: &Path) -> Result<(), ConfigError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ConfigError::NotADirectory {
            path: path.to_path_buf(),
        })
    }
}
