pub mod analyze;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::error::AnalysisError;
use crate::llm::ProfileModel;

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn ProfileModel>,
}

impl AppState {
    pub fn new(model: Arc<dyn ProfileModel>) -> Self {
        AppState { model }
    }
}

async fn method_not_allowed() -> AnalysisError {
    AnalysisError::MethodNotAllowed
}

pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(|| async { concat!("Welcome to ", env!("CARGO_PKG_NAME"), "!") }))
        .route(
            "/api/analyze",
            post(analyze::analyze).fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}
