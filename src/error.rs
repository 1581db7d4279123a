use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::profile::validate::SchemaError;

/// Failure taxonomy for the analysis endpoint. Every variant maps to a
/// single human-readable message; internal detail (credentials, raw upstream
/// bodies, validation traces) stays on the server side of the boundary.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Server configuration error")]
    ServerConfiguration,
    #[error("Server error during analysis: {0}")]
    Upstream(String),
    #[error("The analysis result did not match the expected format")]
    SchemaMismatch(#[from] SchemaError),
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl AnalysisError {
    pub fn status(&self) -> StatusCode {
        match self {
            AnalysisError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AnalysisError::ServerConfiguration => StatusCode::INTERNAL_SERVER_ERROR,
            AnalysisError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AnalysisError::SchemaMismatch(_) => StatusCode::BAD_GATEWAY,
            AnalysisError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        if let AnalysisError::SchemaMismatch(source) = &self {
            warn!("Model output failed validation: {source}");
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mismatch_hides_internal_detail() {
        let err = AnalysisError::SchemaMismatch(SchemaError::Missing("breed"));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(!err.to_string().contains("breed"));
    }

    #[test]
    fn bad_request_surfaces_its_message_verbatim() {
        let err = AnalysisError::BadRequest("Missing image data".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing image data");
    }

    #[test]
    fn configuration_error_never_names_the_credential() {
        let message = AnalysisError::ServerConfiguration.to_string().to_lowercase();
        assert!(!message.contains("key"));
        assert!(!message.contains("gemini"));
    }
}
