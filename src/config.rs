use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueHint};

use crate::data::loader::ColumnMapping;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(author, version, about = "Farm sensor measurement dashboard", long_about = None)]
pub struct Cli {
    /// Sensor export CSV to load at startup
    #[arg(default_value = "2018-09-30-Data.csv", value_hint = ValueHint::FilePath)]
    pub data: PathBuf,

    /// JSON file overriding source column names
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub columns: Option<PathBuf>,

    /// Load the data, log a summary and exit without opening a window
    #[arg(long, action = ArgAction::SetTrue)]
    pub print_summary: bool,
}

impl Cli {
    /// Resolve the column mapping: the JSON file if given, defaults otherwise.
    pub fn column_mapping(&self) -> Result<ColumnMapping> {
        match &self.columns {
            Some(path) => load_column_mapping(path),
            None => Ok(ColumnMapping::default()),
        }
    }
}

/// Read a column mapping from JSON. Fields left out keep their defaults.
pub fn load_column_mapping(path: &Path) -> Result<ColumnMapping> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading column mapping {}", path.display()))?;
    let mapping: ColumnMapping = serde_json::from_str(&text)
        .with_context(|| format!("parsing column mapping {}", path.display()))?;
    log::debug!("Using column mapping {mapping:?}");
    Ok(mapping)
}
