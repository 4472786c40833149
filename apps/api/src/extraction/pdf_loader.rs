//! PDF text loading: one uploaded document in, one trimmed text blob out.

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to decode PDF: {0}")]
    Decode(String),
}

/// Extracts the text of every page, joined with a single space and trimmed.
///
/// Pages that yield no text contribute an empty string. Either the whole
/// document decodes or an error is returned; there are no partial results.
///
/// CPU-bound: call through `tokio::task::spawn_blocking` from async code.
pub fn extract_text_from_pdf(bytes: &[u8]) -> Result<String, PdfError> {
    // The decoder panics on some malformed inputs instead of returning an error.
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| PdfError::Decode("decoder panicked on malformed input".to_string()))?
    .map_err(|e| PdfError::Decode(e.to_string()))?;

    Ok(join_pages(&pages))
}

fn join_pages(pages: &[String]) -> String {
    pages.join(" ").trim().to_string()
}
