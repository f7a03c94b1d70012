//! Page-by-page text extraction with OCR fallback.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;

use super::ocr::{OcrEngine, TesseractOcr};
use super::options::{ErrorMode, ExtractOptions, OcrPolicy};
use super::source::{LopdfSource, PageSource};

/// Where a page's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOrigin {
    /// Text stored in the PDF content stream
    Embedded,
    /// Text recognised from the rendered page
    Ocr,
}

/// Per-page provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageText {
    /// Page number (1-based)
    pub number: u32,
    /// Source of the text
    pub origin: TextOrigin,
    /// Characters contributed by this page
    pub chars: usize,
}

/// Full text of one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractedText {
    /// Page texts in document order, each followed by a newline
    pub text: String,
    /// Provenance of each page
    pub pages: Vec<PageText>,
}

impl ExtractedText {
    /// Number of pages whose text came from OCR.
    pub fn ocr_page_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.origin == TextOrigin::Ocr)
            .count()
    }

    /// Take the text, dropping provenance.
    pub fn into_text(self) -> String {
        self.text
    }

    fn push_page(&mut self, number: u32, origin: TextOrigin, text: &str) {
        self.text.push_str(text);
        self.text.push('\n');
        self.pages.push(PageText {
            number,
            origin,
            chars: text.chars().count(),
        });
    }
}

/// Anything that can turn a document on disk into text.
///
/// The batch runner only depends on this trait.
pub trait DocumentReader: Send + Sync {
    /// Return the full text of the document at `path`.
    fn read_text(&self, path: &Path) -> Result<String>;
}

/// Extracts embedded text from each page, OCR'ing pages that have none.
pub struct TextExtractor {
    options: ExtractOptions,
    ocr: Arc<dyn OcrEngine>,
}

impl TextExtractor {
    /// Create an extractor with default options and the tesseract engine.
    pub fn new() -> Self {
        Self::with_options(ExtractOptions::default())
    }

    /// Create an extractor with custom options and the tesseract engine.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self {
            options,
            ocr: Arc::new(TesseractOcr::new()),
        }
    }

    /// Replace the OCR engine.
    pub fn with_ocr(mut self, ocr: Arc<dyn OcrEngine>) -> Self {
        self.ocr = ocr;
        self
    }

    /// Current options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Open the PDF at `path` and extract its text.
    pub fn extract_path<P: AsRef<Path>>(&self, path: P) -> Result<ExtractedText> {
        let path = path.as_ref();
        let source = LopdfSource::open(path)?;
        self.extract_from(&source, path)
    }

    /// Extract text from an already opened source.
    ///
    /// `path` is handed to the OCR engine, which renders pages from the file.
    pub fn extract_from(&self, source: &dyn PageSource, path: &Path) -> Result<ExtractedText> {
        let mut embedded = Vec::new();
        for number in source.page_numbers() {
            let text = match source.page_text(number) {
                Ok(text) => text,
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!(
                        "{}: no usable text on page {} ({}), treating as image",
                        path.display(),
                        number,
                        e
                    );
                    String::new()
                }
            };
            embedded.push((number, text));
        }

        let all_blank = embedded.iter().all(|(_, text)| text.trim().is_empty());

        let mut result = ExtractedText::default();
        for (number, text) in embedded {
            let blank = text.trim().is_empty();
            let use_ocr = blank
                && match self.options.ocr_policy {
                    OcrPolicy::PerPage => true,
                    OcrPolicy::WholeDocument => all_blank,
                    OcrPolicy::Disabled => false,
                };

            if use_ocr {
                log::debug!(
                    "{}: page {} has no embedded text, running {}",
                    path.display(),
                    number,
                    self.ocr.name()
                );
                let recognized = self.ocr.recognize_page(path, number, &self.options)?;
                result.push_page(number, TextOrigin::Ocr, &recognized);
            } else {
                result.push_page(number, TextOrigin::Embedded, &text);
            }
        }

        Ok(result)
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentReader for TextExtractor {
    fn read_text(&self, path: &Path) -> Result<String> {
        self.extract_path(path).map(ExtractedText::into_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakePages(Vec<&'static str>);

    impl PageSource for FakePages {
        fn page_numbers(&self) -> Vec<u32> {
            (1..=self.0.len() as u32).collect()
        }

        fn page_text(&self, page: u32) -> Result<String> {
            match self.0[(page - 1) as usize] {
                "<broken>" => Err(Error::TextExtract(format!("Page {}: bad font", page))),
                text => Ok(text.to_string()),
            }
        }
    }

    #[derive(Default)]
    struct CountingOcr {
        calls: AtomicUsize,
    }

    impl OcrEngine for CountingOcr {
        fn name(&self) -> &str {
            "counting"
        }

        fn recognize_page(&self, _path: &Path, page: u32, _: &ExtractOptions) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("ocr page {}", page))
        }
    }

    fn extractor(options: ExtractOptions) -> (TextExtractor, Arc<CountingOcr>) {
        let ocr = Arc::new(CountingOcr::default());
        let extractor = TextExtractor::with_options(options).with_ocr(ocr.clone());
        (extractor, ocr)
    }

    #[test]
    fn test_embedded_pages_skip_ocr() {
        let (extractor, ocr) = extractor(ExtractOptions::default());
        let source = FakePages(vec!["Product name: Acetone", "H225 Highly flammable."]);

        let result = extractor.extract_from(&source, Path::new("a.pdf")).unwrap();

        assert_eq!(result.text, "Product name: Acetone\nH225 Highly flammable.\n");
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.ocr_page_count(), 0);
    }

    #[test]
    fn test_blank_pages_are_ocred() {
        let (extractor, ocr) = extractor(ExtractOptions::default());
        let source = FakePages(vec!["  \n ", ""]);

        let result = extractor.extract_from(&source, Path::new("scan.pdf")).unwrap();

        assert_eq!(result.text, "ocr page 1\nocr page 2\n");
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 2);
        assert_eq!(result.ocr_page_count(), 2);
    }

    #[test]
    fn test_mixed_document_keeps_page_order() {
        let (extractor, _) = extractor(ExtractOptions::default());
        let source = FakePages(vec!["first", "", "third"]);

        let result = extractor.extract_from(&source, Path::new("mixed.pdf")).unwrap();

        assert_eq!(result.text, "first\nocr page 2\nthird\n");
        let origins: Vec<_> = result.pages.iter().map(|p| p.origin).collect();
        assert_eq!(
            origins,
            vec![TextOrigin::Embedded, TextOrigin::Ocr, TextOrigin::Embedded]
        );
    }

    #[test]
    fn test_whole_document_policy() {
        let options = ExtractOptions::new().with_ocr_policy(OcrPolicy::WholeDocument);
        let (extractor, ocr) = extractor(options.clone());
        let source = FakePages(vec!["first", ""]);
        let result = extractor.extract_from(&source, Path::new("m.pdf")).unwrap();
        assert_eq!(result.text, "first\n\n");
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);

        let (extractor, ocr) = self::extractor(options);
        let source = FakePages(vec!["", " "]);
        let result = extractor.extract_from(&source, Path::new("s.pdf")).unwrap();
        assert_eq!(result.text, "ocr page 1\nocr page 2\n");
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_ocr_disabled() {
        let (extractor, ocr) = extractor(ExtractOptions::new().without_ocr());
        let source = FakePages(vec![""]);

        let result = extractor.extract_from(&source, Path::new("s.pdf")).unwrap();

        assert_eq!(result.text, "\n");
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_strict_mode_propagates_page_error() {
        let (extractor, _) = extractor(ExtractOptions::new().with_error_mode(ErrorMode::Strict));
        let source = FakePages(vec!["ok", "<broken>"]);

        let err = extractor
            .extract_from(&source, Path::new("bad.pdf"))
            .unwrap_err();
        assert!(matches!(err, Error::TextExtract(_)));
    }

    #[test]
    fn test_lenient_mode_ocrs_broken_page() {
        let (extractor, ocr) = extractor(ExtractOptions::default());
        let source = FakePages(vec!["ok", "<broken>"]);

        let result = extractor.extract_from(&source, Path::new("bad.pdf")).unwrap();

        assert_eq!(result.text, "ok\nocr page 2\n");
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ocr_failure_propagates() {
        struct FailingOcr;
        impl OcrEngine for FailingOcr {
            fn name(&self) -> &str {
                "failing"
            }
            fn recognize_page(&self, _: &Path, _: u32, _: &ExtractOptions) -> Result<String> {
                Err(Error::Ocr("engine crashed".to_string()))
            }
        }

        let extractor = TextExtractor::new().with_ocr(Arc::new(FailingOcr));
        let err = extractor
            .extract_from(&FakePages(vec![""]), Path::new("s.pdf"))
            .unwrap_err();
        assert!(matches!(err, Error::Ocr(_)));
    }
}
