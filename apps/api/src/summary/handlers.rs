//! Axum route handlers for the Summary API.

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, Multipart, State,
    },
    http::Method,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::summary::models::{SummaryRequest, SummaryResponse};
use crate::summary::pdf::{self, PDF_CONTENT_TYPE};
use crate::validation::validate_resume_text;

/// POST /api/v1/summarize
///
/// Summarizes raw resume text. Body rejections (bad JSON, wrong content type)
/// are reported as `InvalidInput` so every response keeps the error schema.
pub async fn handle_summarize(
    State(state): State<AppState>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;

    summarize_text(&state, &request.resume_text, request.instructions.as_deref()).await
}

/// POST /api/v1/summarize/pdf
///
/// Multipart upload: a `file` part holding the resume PDF and an optional
/// `instructions` text part. The extracted text follows the same path as
/// `/summarize`. The upload is never stored.
pub async fn handle_summarize_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummaryResponse>, AppError> {
    let mut multipart = multipart.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;

    let mut file = None;
    let mut instructions = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let is_pdf = field
                    .content_type()
                    .is_some_and(|ct| ct.starts_with(PDF_CONTENT_TYPE));
                if !is_pdf {
                    return Err(AppError::InvalidInput(
                        "Invalid file type. Please upload a PDF.".to_string(),
                    ));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Could not read upload: {e}")))?;
                file = Some(bytes);
            }
            Some("instructions") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Could not read instructions: {e}")))?;
                instructions = Some(text);
            }
            _ => {}
        }
    }

    let bytes = file.ok_or_else(|| {
        AppError::InvalidInput("Missing 'file' part with the resume PDF".to_string())
    })?;
    info!("Extracting text from uploaded PDF ({} bytes)", bytes.len());
    let text = pdf::extract_text(bytes).await?;

    summarize_text(&state, &text, instructions.as_deref()).await
}

/// Fallback for any non-POST method on the summarize paths, so those
/// responses keep the error schema too.
pub async fn handle_method_not_allowed(method: Method) -> AppError {
    AppError::InvalidInput(format!("Method {method} is not allowed here; use POST"))
}

/// Validated → Invoking → Succeeded | Failed.
async fn summarize_text(
    state: &AppState,
    resume_text: &str,
    instructions: Option<&str>,
) -> Result<Json<SummaryResponse>, AppError> {
    validate_resume_text(resume_text, state.config.max_resume_chars)
        .map_err(AppError::InvalidInput)?;

    let summary = state.summarizer.summarize(resume_text, instructions).await?;

    Ok(Json(SummaryResponse { summary }))
}
