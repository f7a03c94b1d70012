//! Page source abstraction.
//!
//! Isolates the concrete PDF library (lopdf) from the extraction logic so
//! the OCR fallback can be exercised without real documents.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use lopdf::Document as LopdfDocument;

use crate::error::{Error, Result};

use super::content;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Read access to the embedded text of a document's pages.
pub trait PageSource {
    /// Page numbers in document order (1-based).
    fn page_numbers(&self) -> Vec<u32>;

    /// Embedded text of one page. May be empty for image-only pages.
    fn page_text(&self, page: u32) -> Result<String>;
}

/// Check that the file starts with the PDF header.
pub fn ensure_pdf_header<P: AsRef<Path>>(path: P) -> Result<()> {
    let mut header = [0u8; 8];
    let mut file = File::open(path)?;
    let read = file.read(&mut header)?;
    if read < PDF_MAGIC.len() || !header.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }
    Ok(())
}

/// [`PageSource`] backed by `lopdf::Document`.
pub struct LopdfSource {
    doc: LopdfDocument,
}

impl LopdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        ensure_pdf_header(path)?;

        let doc = LopdfDocument::load(path)?;
        if doc.is_encrypted() {
            log::warn!("{} is encrypted; embedded text may be unreadable", path.display());
        }
        Ok(Self { doc })
    }

    /// Load from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if !data.starts_with(PDF_MAGIC) {
            return Err(Error::UnknownFormat);
        }
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc })
    }
}

impl PageSource for LopdfSource {
    fn page_numbers(&self) -> Vec<u32> {
        self.doc.get_pages().keys().copied().collect()
    }

    fn page_text(&self, page: u32) -> Result<String> {
        let pages = self.doc.get_pages();
        let page_id = pages
            .get(&page)
            .ok_or_else(|| Error::TextExtract(format!("Page {}: not found", page)))?;

        content::page_text(&self.doc, *page_id)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))
    }
}
