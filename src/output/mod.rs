//! Writers for the output table.
//!
//! Every writer emits the header row from [`COLUMNS`](crate::fields::COLUMNS)
//! even when there are no records, and overwrites any existing file.

mod delimited;
mod json;
mod xlsx;

pub use delimited::write_csv;
pub use json::{to_json, write_json};
pub use xlsx::{write_xlsx, SHEET_NAME};

use std::path::Path;

use crate::error::{Error, Result};
use crate::fields::Record;

/// Default output file name.
pub const DEFAULT_OUTPUT_NAME: &str = "COSHH_output.xlsx";

/// Spreadsheet/table format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Excel workbook
    #[default]
    Xlsx,
    /// Comma-separated values
    Csv,
    /// Pretty-printed JSON array
    Json,
}

impl OutputFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    /// Guess the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" | "excel" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::InvalidInput(format!(
                "unknown output format '{}'",
                other
            ))),
        }
    }
}

/// Write records to `path` in the given format.
pub fn write_records(records: &[Record], path: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Xlsx => write_xlsx(records, path),
        OutputFormat::Csv => write_csv(records, path),
        OutputFormat::Json => write_json(records, path),
    }
}
