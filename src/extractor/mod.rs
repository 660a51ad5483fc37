use std::path::Path;

use tracing::info;

use crate::error::ExtractError;
use crate::models::DocumentFormat;

pub mod docx;
pub mod pdf;

/// Turns a document on disk into plain text.
pub trait Extractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Extract text from `path` using the extractor for `format`.
pub fn extract_text(path: &Path, format: DocumentFormat) -> Result<String, ExtractError> {
    let text = match format {
        DocumentFormat::Pdf => pdf::PdfExtractor::new().extract(path)?,
        DocumentFormat::Docx => docx::DocxExtractor::new().extract(path)?,
    };
    info!(
        path = %path.display(),
        %format,
        chars = text.chars().count(),
        "extracted text"
    );
    Ok(text)
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ExtractError> {
    std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })
}
