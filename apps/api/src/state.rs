use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::Summarizer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; nothing here is shared mutably between requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Model Client. Default: `OllamaClient`; tests swap in a fake.
    pub summarizer: Arc<dyn Summarizer>,
}
