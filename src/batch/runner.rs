//! Directory-level batch processing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::extract::{DocumentReader, TextExtractor};
use crate::fields::{FieldExtractor, Record};
use crate::output::write_records;

use super::config::BatchConfig;

/// A document that contributed no row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// File name within the input directory
    pub file: String,
    /// Human-readable cause
    pub reason: String,
}

/// What happened to one document.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// Record built, Source File set
    Processed(Record),
    /// Extraction failed
    Failed(FileFailure),
}

impl FileOutcome {
    /// Whether a record was produced.
    pub fn is_processed(&self) -> bool {
        matches!(self, FileOutcome::Processed(_))
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// File the table was written to
    pub output_path: PathBuf,
    /// Rows written, in output order
    pub records: Vec<Record>,
    /// Documents skipped
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    /// Number of documents seen.
    pub fn total(&self) -> usize {
        self.records.len() + self.failures.len()
    }
}

/// Runs text and field extraction over every PDF in a directory.
pub struct BatchRunner {
    config: BatchConfig,
    reader: Arc<dyn DocumentReader>,
    fields: FieldExtractor,
}

impl BatchRunner {
    /// Create a runner that reads documents with the default [`TextExtractor`].
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            reader: Arc::new(TextExtractor::new()),
            fields: FieldExtractor::new(),
        }
    }

    /// Replace the document reader.
    pub fn with_reader(mut self, reader: Arc<dyn DocumentReader>) -> Self {
        self.reader = reader;
        self
    }

    /// Run configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// List the `.pdf` files (case-insensitive) directly inside the input directory.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let dir = &self.config.input_dir;
        if !dir.is_dir() {
            return Err(Error::InvalidInput(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && has_pdf_extension(&path) {
                files.push(path);
            }
        }

        if self.config.sort {
            files.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
        }
        Ok(files)
    }

    /// Extract one document. Failures are logged, never returned as errors.
    pub fn process_file(&self, path: &Path) -> FileOutcome {
        let name = file_name(path);

        let result = self
            .reader
            .read_text(path)
            .map(|text| self.fields.extract(&text));

        match result {
            Ok(record) => {
                log::debug!("Processed {}: {}", name, record.chemical_name);
                FileOutcome::Processed(record.with_source_file(name))
            }
            Err(e) => {
                log::error!("Failed on {}: {}", name, e);
                FileOutcome::Failed(FileFailure {
                    file: name,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Process every document and write the table.
    pub fn run(&self) -> Result<BatchReport> {
        self.run_with_progress(&|_, _| {})
    }

    /// Like [`run`](Self::run), calling `on_file` after each document.
    pub fn run_with_progress(
        &self,
        on_file: &(dyn Fn(&Path, &FileOutcome) + Sync),
    ) -> Result<BatchReport> {
        let files = self.discover()?;
        log::info!(
            "Found {} PDF file(s) in {}",
            files.len(),
            self.config.input_dir.display()
        );

        let outcomes = self.process_all(&files, on_file)?;

        let mut records = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Processed(record) => records.push(record),
                FileOutcome::Failed(failure) => failures.push(failure),
            }
        }

        write_records(&records, &self.config.output_path, self.config.format)?;
        log::info!(
            "Extraction complete. Output saved to {}",
            self.config.output_path.display()
        );

        Ok(BatchReport {
            output_path: self.config.output_path.clone(),
            records,
            failures,
        })
    }

    /// Outcomes in the same order as `files`.
    fn process_all(
        &self,
        files: &[PathBuf],
        on_file: &(dyn Fn(&Path, &FileOutcome) + Sync),
    ) -> Result<Vec<FileOutcome>> {
        let process = |path: &PathBuf| {
            let outcome = self.process_file(path);
            on_file(path, &outcome);
            outcome
        };

        if self.config.jobs <= 1 {
            return Ok(files.iter().map(process).collect());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .build()
            .map_err(|e| Error::InvalidInput(format!("cannot start worker pool: {}", e)))?;
        Ok(pool.install(|| files.par_iter().map(process).collect()))
    }
}

/// Process every PDF under `config.input_dir` with the default extractor.
pub fn run(config: BatchConfig) -> Result<BatchReport> {
    BatchRunner::new(config).run()
}

fn has_pdf_extension(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase().ends_with(".pdf"))
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
