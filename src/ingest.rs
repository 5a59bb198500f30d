//! Input validation applied before FAQs are generated.
//!
//! Rejects text that is too short to analyze and files that are the wrong
//! type or too large, each as its own error.

use crate::config::IngestConfig;
use crate::extract::{extract_bytes, DocumentKind, ExtractError, ExtractedText};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("text is too short: {length} characters, at least {min} required")]
    TextTooShort { length: usize, min: usize },
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("file is too large: {size} bytes, limit is {max} bytes")]
    FileTooLarge { size: u64, max: u64 },
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Check that trimmed `text` is long enough to generate FAQs from
pub fn validate_text<'a>(text: &'a str, config: &IngestConfig) -> Result<&'a str, IngestError> {
    let trimmed = text.trim();
    let length = trimmed.chars().count();
    if length < config.min_text_length {
        return Err(IngestError::TextTooShort {
            length,
            min: config.min_text_length,
        });
    }
    Ok(trimmed)
}

/// Read a local document and extract its text.
///
/// The file type and size are checked before the file is read.
pub fn read_file(path: &Path, config: &IngestConfig) -> Result<ExtractedText, IngestError> {
    let kind = DocumentKind::from_path(path)
        .ok_or_else(|| IngestError::UnsupportedFileType(path.display().to_string()))?;

    let size = std::fs::metadata(path)?.len();
    if size > config.max_file_size {
        return Err(IngestError::FileTooLarge {
            size,
            max: config.max_file_size,
        });
    }

    let bytes = std::fs::read(path)?;
    let extracted = extract_bytes(kind, &bytes)?;
    info!(path = %path.display(), ?kind, chars = extracted.text.len(), "Read document");
    Ok(extracted)
}
