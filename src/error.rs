use std::path::PathBuf;

use thiserror::Error;

/// Failures between a path on disk and its plain text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type '{extension}' for {}. Use PDF or DOCX.", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Failed to extract text from PDF {}: {reason}", path.display())]
    Pdf { path: PathBuf, reason: String },

    #[error("Failed to extract text from DOCX {}: {reason}", path.display())]
    Docx { path: PathBuf, reason: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
