//! OCR fallback for image-only pages.
//!
//! The default engine shells out to `pdftoppm` (poppler-utils) to rasterise a
//! single page and to `tesseract` to read it back.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

use super::options::ExtractOptions;

/// Recognises the text of one rendered PDF page.
pub trait OcrEngine: Send + Sync {
    /// Engine name, used in log lines.
    fn name(&self) -> &str;

    /// Render `page` of the PDF at `path` and return the recognised text.
    fn recognize_page(&self, path: &Path, page: u32, options: &ExtractOptions) -> Result<String>;
}

/// OCR through the `pdftoppm` and `tesseract` command-line tools.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    pdftoppm: PathBuf,
    tesseract: PathBuf,
}

impl TesseractOcr {
    /// Use the tools found on `PATH`.
    pub fn new() -> Self {
        Self::with_binaries("pdftoppm", "tesseract")
    }

    /// Use explicit tool locations.
    pub fn with_binaries(pdftoppm: impl Into<PathBuf>, tesseract: impl Into<PathBuf>) -> Self {
        Self {
            pdftoppm: pdftoppm.into(),
            tesseract: tesseract.into(),
        }
    }

    /// Check whether both tools can be launched.
    pub fn is_available(&self) -> bool {
        let pdftoppm = Command::new(&self.pdftoppm).arg("-v").output().is_ok();
        let tesseract = Command::new(&self.tesseract)
            .arg("--version")
            .output()
            .is_ok();

        if !pdftoppm {
            log::debug!("pdftoppm not found - install poppler-utils for OCR support");
        }
        if !tesseract {
            log::debug!("tesseract not found - install tesseract-ocr for OCR support");
        }

        pdftoppm && tesseract
    }

    /// Rasterise one page to a PNG inside `dir`.
    fn render_page(&self, path: &Path, page: u32, dpi: u32, dir: &Path) -> Result<PathBuf> {
        let prefix = dir.join(format!("page-{}", page));
        let page_arg = page.to_string();

        let output = Command::new(&self.pdftoppm)
            .arg("-png")
            .arg("-singlefile")
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-f")
            .arg(&page_arg)
            .arg("-l")
            .arg(&page_arg)
            .arg(path)
            .arg(&prefix)
            .output()
            .map_err(|e| Error::Render(format!("Failed to run pdftoppm: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Render(format!(
                "pdftoppm failed on page {}: {}",
                page,
                stderr.trim()
            )));
        }

        let image = prefix.with_extension("png");
        if !image.exists() {
            return Err(Error::Render(format!(
                "pdftoppm produced no image for page {}",
                page
            )));
        }
        Ok(image)
    }

    fn recognize_image(&self, image: &Path, options: &ExtractOptions) -> Result<String> {
        let output = Command::new(&self.tesseract)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&options.language)
            .arg("--psm")
            .arg(options.page_segmentation.to_string())
            .output()
            .map_err(|e| Error::Ocr(format!("Failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr(format!("tesseract failed: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize_page(&self, path: &Path, page: u32, options: &ExtractOptions) -> Result<String> {
        // Raster lives only as long as this call.
        let scratch = tempfile::tempdir()?;
        let image = self.render_page(path, page, options.dpi, scratch.path())?;
        self.recognize_image(&image, options)
    }
}
