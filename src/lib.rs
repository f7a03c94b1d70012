//! # coshh
//!
//! Turns a folder of COSHH safety-data-sheet PDFs into one spreadsheet.
//!
//! Each PDF is read page by page; pages without embedded text are rendered
//! and OCR'd. Keyword and pattern heuristics then fill a fixed set of hazard
//! fields, and all records are written as one table.
//!
//! ## Quick Start
//!
//! ```no_run
//! use coshh::{run, BatchConfig};
//!
//! fn main() -> coshh::Result<()> {
//!     let report = run(BatchConfig::new("./sheets"))?;
//!     println!(
//!         "{} rows written to {}",
//!         report.records.len(),
//!         report.output_path.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Fields
//!
//! Chemical Name, Hazard Classification, Exposure Risks, Control Measures,
//! Emergency Procedures, Additional Recommendations and Source File. See
//! [`fields`] for the matching rules.

pub mod batch;
pub mod error;
pub mod extract;
pub mod fields;
pub mod output;

// Re-export commonly used types
pub use batch::{run, BatchConfig, BatchReport, BatchRunner, FileFailure, FileOutcome};
pub use error::{Error, Result};
pub use extract::{
    DocumentReader, ErrorMode, ExtractOptions, ExtractedText, OcrEngine, OcrPolicy,
    TesseractOcr, TextExtractor, TextOrigin,
};
pub use fields::{extract_fields, FieldExtractor, Record, COLUMNS};
pub use output::{write_records, OutputFormat};

use std::path::Path;
use std::sync::Arc;

/// Extract the full text of a PDF, OCR'ing image-only pages.
///
/// # Example
///
/// ```no_run
/// let text = coshh::extract_text("acetone.pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    TextExtractor::new().read_text(path.as_ref())
}

/// Extract the full text of a PDF with custom options.
pub fn extract_text_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<ExtractedText> {
    TextExtractor::with_options(options).extract_path(path)
}

/// Extract one record from a PDF, with Source File set to its file name.
///
/// # Example
///
/// ```no_run
/// let record = coshh::extract_record("acetone.pdf").unwrap();
/// assert_eq!(record.source_file, "acetone.pdf");
/// ```
pub fn extract_record<P: AsRef<Path>>(path: P) -> Result<Record> {
    Coshh::new().process_file(path)
}

/// Builder tying extraction options, OCR engine and batch settings together.
///
/// # Example
///
/// ```no_run
/// use coshh::{BatchConfig, Coshh, ErrorMode, OutputFormat};
///
/// let report = Coshh::new()
///     .with_error_mode(ErrorMode::Strict)
///     .with_dpi(200)
///     .run(BatchConfig::new("./sheets").with_format(OutputFormat::Csv))?;
/// # Ok::<(), coshh::Error>(())
/// ```
pub struct Coshh {
    options: ExtractOptions,
    ocr: Option<Arc<dyn OcrEngine>>,
}

impl Coshh {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
            ocr: None,
        }
    }

    /// Replace all extraction options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Set how pages with undecodable text are handled.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.options = self.options.with_error_mode(mode);
        self
    }

    /// Set OCR raster resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.options = self.options.with_dpi(dpi);
        self
    }

    /// Set OCR language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.options = self.options.with_language(language);
        self
    }

    /// Set OCR policy.
    pub fn with_ocr_policy(mut self, policy: OcrPolicy) -> Self {
        self.options = self.options.with_ocr_policy(policy);
        self
    }

    /// Use a custom OCR engine.
    pub fn with_ocr(mut self, ocr: Arc<dyn OcrEngine>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    /// Build the text extractor.
    pub fn extractor(&self) -> TextExtractor {
        let extractor = TextExtractor::with_options(self.options.clone());
        match &self.ocr {
            Some(ocr) => extractor.with_ocr(ocr.clone()),
            None => extractor,
        }
    }

    /// Extract the text of one PDF.
    pub fn extract_text<P: AsRef<Path>>(&self, path: P) -> Result<ExtractedText> {
        self.extractor().extract_path(path)
    }

    /// Extract one record, Source File set to the file name.
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<Record> {
        let path = path.as_ref();
        let text = self.extractor().read_text(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(extract_fields(&text).with_source_file(name))
    }

    /// Build a batch runner for `config`.
    pub fn runner(&self, config: BatchConfig) -> BatchRunner {
        BatchRunner::new(config).with_reader(Arc::new(self.extractor()))
    }

    /// Process a directory and write the table.
    pub fn run(&self, config: BatchConfig) -> Result<BatchReport> {
        self.runner(config).run()
    }
}

impl Default for Coshh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builder() {
        let coshh = Coshh::new()
            .with_error_mode(ErrorMode::Strict)
            .with_dpi(150)
            .with_ocr_policy(OcrPolicy::Disabled);

        let extractor = coshh.extractor();
        assert_eq!(extractor.options().error_mode, ErrorMode::Strict);
        assert_eq!(extractor.options().dpi, 150);
        assert_eq!(extractor.options().ocr_policy, OcrPolicy::Disabled);
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_extract_text_missing_file() {
        let result = extract_text("/nonexistent/coshh/missing.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_extract_record_not_a_pdf() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"this is plain text, not a PDF").unwrap();

        let result = extract_record(file.path());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }
}
