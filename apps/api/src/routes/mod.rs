pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::summary::handlers;
use crate::summary::pdf::MAX_PDF_BYTES;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/summarize",
            post(handlers::handle_summarize).fallback(handlers::handle_method_not_allowed),
        )
        .route(
            "/summarize",
            post(handlers::handle_summarize).fallback(handlers::handle_method_not_allowed),
        )
        .route(
            "/api/v1/summarize/pdf",
            post(handlers::handle_summarize_pdf)
                .fallback(handlers::handle_method_not_allowed)
                .layer(DefaultBodyLimit::max(MAX_PDF_BYTES)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::{ModelError, Summarizer};

    struct NeverCalled;

    #[async_trait]
    impl Summarizer for NeverCalled {
        async fn summarize(&self, _: &str, _: Option<&str>) -> Result<String, ModelError> {
            panic!("health check must not call the model");
        }

        fn model(&self) -> &str {
            "gemma3:1b"
        }
    }

    #[tokio::test]
    async fn test_health_reports_model() {
        let router = build_router(AppState {
            config: Config::from_lookup(|_| None).unwrap(),
            summarizer: Arc::new(NeverCalled),
        });

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["model"], "gemma3:1b");
    }
}
