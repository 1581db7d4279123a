pub mod gemini;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AnalysisError;
use crate::profile::request::AnalysisRequest;

/// The upstream generative model as an opaque capability: given an image and
/// optional location, return structured JSON. The raw value is passed on for
/// validation untouched.
#[async_trait]
pub trait ProfileModel: Send + Sync {
    async fn generate_profile(&self, request: &AnalysisRequest) -> Result<Value, AnalysisError>;
}

pub use gemini::{GeminiClient, GeminiSettings};
