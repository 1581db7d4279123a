use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::AnalysisError;
use crate::llm::ProfileModel;
use crate::profile::prompt::{build_instruction, response_schema, PROMPT_VERSION};
use crate::profile::request::AnalysisRequest;
use crate::utils::http::get_http_client;
use crate::utils::timing::log_llm_timing;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_REQUEST_TIMEOUT: Duration = Duration::from_secs(90);
const ERROR_BODY_SUMMARY_LIMIT: usize = 2000;

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub top_k: i32,
    pub top_p: f32,
    pub max_output_tokens: i32,
    pub safety_profile: String,
}

impl GeminiSettings {
    pub fn from_config(config: &Config) -> Self {
        GeminiSettings {
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            temperature: config.gemini_temperature,
            top_k: config.gemini_top_k,
            top_p: config.gemini_top_p,
            max_output_tokens: config.gemini_max_output_tokens,
            safety_profile: config.gemini_safety_settings.clone(),
        }
    }
}

pub struct GeminiClient {
    settings: GeminiSettings,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

fn summarize_error_body(body: &str) -> (Option<String>, String) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return (None, "empty response body".to_string());
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let message = value
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .map(|v| v.to_string())
            .or_else(|| {
                value
                    .get("message")
                    .and_then(|v| v.as_str())
                    .map(|v| v.to_string())
            });
        return (
            message,
            truncate_for_log(&value.to_string(), ERROR_BODY_SUMMARY_LIMIT),
        );
    }

    (None, truncate_for_log(trimmed, ERROR_BODY_SUMMARY_LIMIT))
}

fn build_safety_settings(profile: &str) -> Vec<Value> {
    let threshold = match profile {
        "standard" => "BLOCK_MEDIUM_AND_ABOVE",
        _ => "OFF",
    };

    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
        "HARM_CATEGORY_CIVIC_INTEGRITY",
    ]
    .iter()
    .map(|category| json!({ "category": category, "threshold": threshold }))
    .collect()
}

fn extract_text(response: GeminiResponse) -> Option<String> {
    let mut text_parts = Vec::new();
    for candidate in response.candidates.unwrap_or_default() {
        if let Some(content) = candidate.content {
            for part in content.parts.unwrap_or_default() {
                if let Some(text) = part.text {
                    if !text.trim().is_empty() {
                        text_parts.push(text);
                    }
                }
            }
        }
    }

    if text_parts.is_empty() {
        None
    } else {
        Some(text_parts.join("\n"))
    }
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Self {
        GeminiClient { settings }
    }

    fn redact_api_key(&self, text: &str) -> String {
        let key = self.settings.api_key.trim();
        if key.is_empty() {
            return text.to_string();
        }
        text.replace(key, "[redacted]")
    }

    /// The image travels as an inline part ahead of the instruction text, and
    /// the generation config pins the strict JSON output schema.
    fn build_payload(&self, request: &AnalysisRequest) -> Value {
        let instruction = build_instruction(request.location.as_ref());
        let encoded = general_purpose::STANDARD.encode(&request.image_bytes);

        json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "inlineData": { "mimeType": request.mime_type, "data": encoded } },
                    { "text": instruction }
                ]
            }],
            "generationConfig": {
                "temperature": self.settings.temperature,
                "topK": self.settings.top_k,
                "topP": self.settings.top_p,
                "maxOutputTokens": self.settings.max_output_tokens,
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            },
            "safetySettings": build_safety_settings(&self.settings.safety_profile),
        })
    }

    async fn call_api(&self, payload: &Value) -> Result<GeminiResponse, AnalysisError> {
        let client = get_http_client();
        let url = format!("{}/{}:generateContent", GEMINI_API_BASE, self.settings.model);

        let response = client
            .post(&url)
            .header("x-goog-api-key", &self.settings.api_key)
            .timeout(GEMINI_REQUEST_TIMEOUT)
            .json(payload)
            .send()
            .await
            .map_err(|err| {
                let err_text = self.redact_api_key(&err.to_string());
                warn!(
                    "Gemini request failed to send: {} (timeout={}, connect={})",
                    err_text,
                    err.is_timeout(),
                    err.is_connect()
                );
                AnalysisError::Upstream(err_text)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let (message, body_summary) = summarize_error_body(&self.redact_api_key(&body));
            warn!("Gemini API error: status={}, body={}", status, body_summary);
            let detail = message.unwrap_or_else(|| format!("upstream returned status {status}"));
            return Err(AnalysisError::Upstream(detail));
        }

        response.json::<GeminiResponse>().await.map_err(|err| {
            warn!("Failed to decode Gemini response envelope: {err}");
            AnalysisError::Upstream("The model returned an unreadable response".to_string())
        })
    }
}

#[async_trait]
impl ProfileModel for GeminiClient {
    async fn generate_profile(&self, request: &AnalysisRequest) -> Result<Value, AnalysisError> {
        if self.settings.api_key.trim().is_empty() {
            warn!("GEMINI_API_KEY is not set; rejecting analysis request");
            return Err(AnalysisError::ServerConfiguration);
        }

        let payload = self.build_payload(request);
        debug!(
            target: "llm.gemini",
            model = %self.settings.model,
            prompt_version = PROMPT_VERSION,
            mime_type = %request.mime_type,
            image_bytes = request.image_bytes.len(),
            has_location = request.location.is_some(),
            "submitting analysis"
        );

        let metadata = json!({
            "promptVersion": PROMPT_VERSION,
            "mimeType": request.mime_type,
            "hasLocation": request.location.is_some(),
        });
        let response = log_llm_timing(
            "gemini",
            &self.settings.model,
            "generate_profile",
            Some(metadata),
            || async { self.call_api(&payload).await },
        )
        .await?;

        let text = extract_text(response).ok_or_else(|| {
            AnalysisError::Upstream("The model returned an empty response".to_string())
        })?;

        serde_json::from_str::<Value>(text.trim()).map_err(|err| {
            warn!("Gemini output was not valid JSON: {err}");
            AnalysisError::Upstream("The model returned malformed output".to_string())
        })
    }
}
