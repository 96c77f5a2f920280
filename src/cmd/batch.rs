use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use crate::account::Account;
use crate::config::{Config, ConfigFile};
use crate::csvimport::CsvImport;
use crate::filespec::{self, FileSpec};
use crate::transaction::date::DateParser;

#[derive(Debug, Args)]
pub struct Command {
    /// Directory holding the bank exports to convert. Every file directly
    /// inside it is converted, and deleted once all conversions are written.
    #[arg(long = "input", env = "YNAB_INPUT")]
    input: Option<PathBuf>,
    /// Directory to write the converted files to.
    #[arg(long = "output", env = "YNAB_OUTPUT")]
    output: Option<PathBuf>,
}

impl Command {
    pub fn run(&self, file: ConfigFile) -> Result<()> {
        let config = Config::resolve(file, self.input.clone(), self.output.clone())?;
        run(&config)?;
        Ok(())
    }
}

/// Converts every export in the input directory, returning the paths of the
/// written files.
pub fn run(config: &Config) -> Result<Vec<PathBuf>> {
    info!(input = ?config.input, output = ?config.output, "starting conversion");

    let files = list_files(&config.input)?;
    if files.is_empty() {
        info!("no files to import");
        return Ok(Vec::new());
    }

    let dates = config.date_parser();
    let imports = files
        .iter()
        .map(|path| import_file(path, dates))
        .collect::<Result<Vec<CsvImport>>>()?;

    let exported = export_imports(&config.output, &imports)?;
    delete_files(&files)?;
    Ok(exported)
}

/// Lists the files directly inside `dir`, sorted by name. Symlinks to files
/// are included.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {:?}", dir))? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        } else {
            debug!(?path, "skipping non-file");
        }
    }
    files.sort();
    Ok(files)
}

fn import_file(path: &Path, dates: DateParser) -> Result<CsvImport> {
    info!(?path, "importing");
    let content = filespec::read_file(&FileSpec::Path(path.to_path_buf()))?;
    let account = Account::from_path(path);
    CsvImport::from_export(&content, account.label(), dates)
        .with_context(|| format!("converting {:?}", path))
}

/// The name of the `counter`th converted file (counting from 1).
pub fn export_file_name(counter: usize, account: &str) -> String {
    format!("export{}-{}.csv", counter, account)
}

fn export_imports(dir: &Path, imports: &[CsvImport]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;

    let mut exported = Vec::with_capacity(imports.len());
    for (i, import) in imports.iter().enumerate() {
        let path = dir.join(export_file_name(i + 1, import.account()));
        info!(?path, "exporting");
        filespec::write_file(&FileSpec::Path(path.clone()), &import.render()?)?;
        exported.push(path);
    }
    Ok(exported)
}

fn delete_files(files: &[PathBuf]) -> Result<()> {
    for path in files {
        fs::remove_file(path).with_context(|| format!("deleting {:?}", path))?;
    }
    Ok(())
}
