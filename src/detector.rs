use std::path::Path;

use crate::error::ExtractError;
use crate::models::DocumentFormat;

/// Determine the document format from the file extension (case-insensitive).
pub fn detect_format(path: &Path) -> Result<DocumentFormat, ExtractError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "pdf" => Ok(DocumentFormat::Pdf),
        "docx" => Ok(DocumentFormat::Docx),
        _ => Err(ExtractError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        }),
    }
}
