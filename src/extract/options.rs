//! Text extraction options and configuration.

/// Resolution pages are rendered at before OCR.
pub const DEFAULT_DPI: u32 = 300;

/// Tesseract page segmentation mode 6: assume a single uniform block of text.
pub const DEFAULT_PAGE_SEGMENTATION: u8 = 6;

/// Options for extracting text from safety data sheets.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode for embedded text decoding
    pub error_mode: ErrorMode,

    /// When OCR is used in place of embedded text
    pub ocr_policy: OcrPolicy,

    /// Raster resolution for OCR
    pub dpi: u32,

    /// Tesseract language code
    pub language: String,

    /// Tesseract page segmentation mode (`--psm`)
    pub page_segmentation: u8,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Set OCR policy.
    pub fn with_ocr_policy(mut self, policy: OcrPolicy) -> Self {
        self.ocr_policy = policy;
        self
    }

    /// Never run OCR.
    pub fn without_ocr(mut self) -> Self {
        self.ocr_policy = OcrPolicy::Disabled;
        self
    }

    /// Set raster resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set OCR language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set tesseract page segmentation mode.
    pub fn with_page_segmentation(mut self, psm: u8) -> Self {
        self.page_segmentation = psm;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            ocr_policy: OcrPolicy::PerPage,
            dpi: DEFAULT_DPI,
            language: "eng".to_string(),
            page_segmentation: DEFAULT_PAGE_SEGMENTATION,
        }
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the document on any page error
    Strict,
    /// Treat pages with undecodable text as image-only
    #[default]
    Lenient,
}

/// Which pages are sent to OCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OcrPolicy {
    /// OCR every page without embedded text
    #[default]
    PerPage,
    /// OCR only when no page of the document has embedded text
    WholeDocument,
    /// Embedded text only
    Disabled,
}

impl std::str::FromStr for OcrPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "per-page" | "page" => Ok(OcrPolicy::PerPage),
            "whole-document" | "document" => Ok(OcrPolicy::WholeDocument),
            "off" | "disabled" | "none" => Ok(OcrPolicy::Disabled),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown OCR policy '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .with_error_mode(ErrorMode::Strict)
            .with_dpi(150)
            .with_language("deu")
            .with_ocr_policy(OcrPolicy::WholeDocument)
            .with_page_segmentation(4);

        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.dpi, 150);
        assert_eq!(options.language, "deu");
        assert_eq!(options.ocr_policy, OcrPolicy::WholeDocument);
        assert_eq!(options.page_segmentation, 4);
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.ocr_policy, OcrPolicy::PerPage);
        assert_eq!(options.dpi, 300);
        assert_eq!(options.page_segmentation, DEFAULT_PAGE_SEGMENTATION);
    }

    #[test]
    fn test_ocr_policy_from_str() {
        assert_eq!("per-page".parse::<OcrPolicy>().unwrap(), OcrPolicy::PerPage);
        assert_eq!("OFF".parse::<OcrPolicy>().unwrap(), OcrPolicy::Disabled);
        assert!("sometimes".parse::<OcrPolicy>().is_err());
    }
}
