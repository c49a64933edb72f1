//! PDF text extraction.
//!
//! Path and size checks run before the parser is invoked, so a bad path
//! never reaches the extraction library or the network.

use std::path::Path;

use tracing::debug;

use crate::error::{DocChatError, Result};

/// Extract the full text of a PDF document.
///
/// # Errors
///
/// - [`DocChatError::FileNotFound`] if `path` does not exist.
/// - [`DocChatError::EmptyFile`] if the file has zero bytes.
/// - [`DocChatError::Extraction`] if the PDF parser fails.
pub fn extract_pdf_text(path: &Path) -> Result<String> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| DocChatError::FileNotFound { path: path.to_path_buf() })?;
    if metadata.len() == 0 {
        return Err(DocChatError::EmptyFile { path: path.to_path_buf() });
    }

    let text = pdf_extract::extract_text(path).map_err(|e| DocChatError::Extraction {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    debug!(path = %path.display(), text_len = text.len(), "extracted document text");
    Ok(text)
}
