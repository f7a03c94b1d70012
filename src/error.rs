//! Error types for the coshh library.

use std::io;
use thiserror::Error;

/// Result type alias for coshh operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while turning safety data sheets into a table.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error decoding the embedded text of a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error rasterising a page for OCR.
    #[error("Page render error: {0}")]
    Render(String),

    /// Error running the OCR engine.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Error writing the spreadsheet.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Error serialising records to CSV or JSON.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Caller supplied something unusable (bad directory, bad option value).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Spreadsheet(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Serialize(format!("CSV: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(format!("JSON: {}", err))
    }
}
