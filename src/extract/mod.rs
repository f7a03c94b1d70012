//! Text extraction from safety-data-sheet PDFs.

mod content;
mod ocr;
mod options;
mod source;
mod text;

pub use ocr::{OcrEngine, TesseractOcr};
pub use options::{ErrorMode, ExtractOptions, OcrPolicy, DEFAULT_DPI, DEFAULT_PAGE_SEGMENTATION};
pub use source::{ensure_pdf_header, LopdfSource, PageSource};
pub use text::{DocumentReader, ExtractedText, PageText, TextExtractor, TextOrigin};
