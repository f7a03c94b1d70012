//! Batch run configuration.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::output::{OutputFormat, DEFAULT_OUTPUT_NAME};

/// Where to read sheets from and where to write the table.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory scanned (non-recursively) for `.pdf` files
    pub input_dir: PathBuf,

    /// Output file, overwritten on every run
    pub output_path: PathBuf,

    /// Output format
    pub format: OutputFormat,

    /// Process files in name order instead of directory-listing order
    pub sort: bool,

    /// Number of documents processed at once (1 = sequential)
    pub jobs: usize,
}

impl BatchConfig {
    /// Read from `input_dir` and write `COSHH_output.xlsx` next to the sheets.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        let input_dir = input_dir.into();
        let output_path = input_dir.join(DEFAULT_OUTPUT_NAME);
        Self {
            input_dir,
            output_path,
            format: OutputFormat::Xlsx,
            sort: true,
            jobs: 1,
        }
    }

    /// Use the directory containing the running executable.
    pub fn for_program_dir() -> Result<Self> {
        let exe = std::env::current_exe()?;
        let dir = exe.parent().ok_or_else(|| {
            Error::InvalidInput(format!("{} has no parent directory", exe.display()))
        })?;
        Ok(Self::new(dir))
    }

    /// Set the output file.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Keep directory-listing order.
    pub fn unsorted(mut self) -> Self {
        self.sort = false;
        self
    }

    /// Set the number of parallel jobs (0 is treated as 1).
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Input directory.
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }
}
