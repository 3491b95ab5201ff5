use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/summarize`.
///
/// A missing `resume_text` deserializes to an empty string so it is reported
/// through the same validation path as an empty one.
#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}
