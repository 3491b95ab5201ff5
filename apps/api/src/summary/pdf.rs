use axum::body::Bytes;
use tracing::debug;

use crate::errors::AppError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
/// Upload limit for the PDF route; JSON routes keep axum's default.
pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

const UNREADABLE_PDF: &str = "Could not extract text from PDF.";

/// Extracts the text of an uploaded PDF in memory. Nothing touches disk.
///
/// Parsing runs on the blocking pool; a panic inside the parser is reported
/// as an unreadable PDF rather than taking the request down with it.
pub async fn extract_text(bytes: Bytes) -> Result<String, AppError> {
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| {
            if e.is_panic() {
                debug!("PDF parser panicked");
                AppError::InvalidInput(UNREADABLE_PDF.to_string())
            } else {
                AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}"))
            }
        })?;

    let text = extracted.map_err(|e| {
        debug!("PDF extraction failed: {e}");
        AppError::InvalidInput(UNREADABLE_PDF.to_string())
    })?;

    if text.trim().is_empty() {
        return Err(AppError::InvalidInput(UNREADABLE_PDF.to_string()));
    }

    Ok(text)
}
