//! Model Client: the single point of entry for calls to the local inference backend.
//!
//! No other module talks to Ollama directly. Handlers depend on the
//! `Summarizer` trait so they can be exercised with a fake in tests.
//!
//! Every failure is classified into a `ModelError`; callers never see an
//! opaque transport error.
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::validation::validate_resume_text;

pub mod prompts;

use prompts::{build_summary_prompt, Prompt};

const GENERATE_PATH: &str = "/api/generate";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const RETRY_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Inference backend is unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Inference backend did not respond within {} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Inference backend returned an unusable result: {0}")]
    Model(String),
}

impl ModelError {
    /// Machine-readable kind surfaced in error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ModelError::InvalidInput(_) => "InvalidInput",
            ModelError::BackendUnavailable(_) => "BackendUnavailable",
            ModelError::Timeout(_) => "Timeout",
            ModelError::Model(_) => "ModelError",
        }
    }
}

/// Anything that can turn resume text into a summary.
///
/// Carried in `AppState` as `Arc<dyn Summarizer>`.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        resume_text: &str,
        instructions: Option<&str>,
    ) -> Result<String, ModelError>;

    /// Identifier of the model requests are sent to.
    fn model(&self) -> &str;
}

/// One request-scoped call to the backend.
#[derive(Debug)]
pub struct ModelInvocation<'a> {
    pub model: &'a str,
    pub prompt: Prompt,
}

impl<'a> ModelInvocation<'a> {
    pub fn new(model: &'a str, resume_text: &str, instructions: Option<&str>) -> Self {
        Self {
            model,
            prompt: build_summary_prompt(resume_text, instructions),
        }
    }

    fn request_body(&self) -> GenerateRequest<'_> {
        GenerateRequest {
            model: self.model,
            system: &self.prompt.system,
            prompt: &self.prompt.user,
            stream: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    done: bool,
    #[serde(default)]
    done_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

/// Summarizer backed by Ollama's `/api/generate` endpoint.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    generate_url: String,
    model: String,
    timeout: Duration,
    connect_retries: u32,
    max_resume_chars: usize,
}

impl OllamaClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;

        Ok(Self {
            client,
            generate_url: format!("{}{GENERATE_PATH}", config.ollama_base_url()),
            model: config.model.clone(),
            timeout: config.model_timeout,
            connect_retries: config.connect_retries,
            max_resume_chars: config.max_resume_chars,
        })
    }

    /// Sends the invocation, retrying only when no connection could be made.
    async fn invoke(&self, invocation: &ModelInvocation<'_>) -> Result<String, ModelError> {
        let body = invocation.request_body();
        let mut attempt = 0;

        let response = loop {
            match self.client.post(&self.generate_url).json(&body).send().await {
                Ok(response) => break response,
                Err(e) if e.is_connect() && attempt < self.connect_retries => {
                    attempt += 1;
                    warn!(
                        "Inference backend connect failed ({e}), retry {attempt}/{} after {}ms",
                        self.connect_retries,
                        RETRY_DELAY.as_millis()
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(self.classify_transport_error(e)),
            }
        };

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        if !status.is_success() {
            // backend text stays in the logs; it may carry traces or paths
            let message = serde_json::from_str::<OllamaError>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            warn!("Inference backend returned {status}: {message}");
            return Err(ModelError::Model(format!(
                "backend responded with status {}",
                status.as_u16()
            )));
        }

        parse_generation(&text)
    }

    fn classify_transport_error(&self, err: reqwest::Error) -> ModelError {
        warn!("Inference backend transport error: {err}");
        if err.is_connect() {
            ModelError::BackendUnavailable("could not connect to the inference backend".to_string())
        } else if err.is_timeout() {
            ModelError::Timeout(self.timeout)
        } else if err.is_decode() || err.is_body() {
            ModelError::Model("could not read the backend response".to_string())
        } else {
            ModelError::BackendUnavailable("request to the inference backend failed".to_string())
        }
    }
}

#[async_trait]
impl Summarizer for OllamaClient {
    async fn summarize(
        &self,
        resume_text: &str,
        instructions: Option<&str>,
    ) -> Result<String, ModelError> {
        validate_resume_text(resume_text, self.max_resume_chars)
            .map_err(ModelError::InvalidInput)?;

        let invocation = ModelInvocation::new(&self.model, resume_text, instructions);
        let started = Instant::now();

        let outcome = match tokio::time::timeout(self.timeout, self.invoke(&invocation)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ModelError::Timeout(self.timeout)),
        };

        match &outcome {
            Ok(summary) => debug!(
                "Model call succeeded: model={}, prompt_chars={}, summary_chars={}, elapsed={:?}",
                invocation.model,
                invocation.prompt.user.len(),
                summary.len(),
                started.elapsed()
            ),
            Err(e) => warn!(
                "Model call failed: model={}, kind={}, elapsed={:?}: {e}",
                invocation.model,
                e.kind(),
                started.elapsed()
            ),
        }

        outcome
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Turns a successful backend body into a summary, rejecting anything partial.
fn parse_generation(body: &str) -> Result<String, ModelError> {
    let generated: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| ModelError::Model(format!("malformed backend response: {e}")))?;

    if !generated.done {
        return Err(ModelError::Model(format!(
            "generation did not complete (done_reason: {})",
            generated.done_reason.as_deref().unwrap_or("unknown")
        )));
    }

    let summary = strip_code_fences(&generated.response);
    if summary.is_empty() {
        return Err(ModelError::Model("model returned an empty summary".to_string()));
    }

    Ok(summary.to_string())
}

/// Strips a ```lang ... ``` fence only when it wraps the whole output.
/// Anything else is returned trimmed but otherwise untouched.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return text;
    };
    // drop the optional language tag on the opening line
    let inner = match inner.find('\n') {
        Some(idx) if !inner[..idx].contains(' ') => &inner[idx + 1..],
        _ => inner,
    };
    if inner.contains("```") {
        return text;
    }
    inner.trim()
}
