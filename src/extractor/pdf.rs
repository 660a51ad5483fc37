use std::path::Path;

use crate::error::ExtractError;

/// Extracts the text layer of a PDF with `pdf-extract`.
///
/// Scanned (image-only) PDFs extract successfully but produce blank text;
/// callers treat that as a warning rather than a failure.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl super::Extractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = super::read_bytes(path)?;
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractError::Pdf {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
