use base64::{engine::general_purpose, Engine as _};
use tracing::warn;

use crate::error::AnalysisError;
use crate::profile::types::{AnalyzePayload, GeoPoint};

pub const SUPPORTED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

/// Maps declared mime tags onto the canonical form the upstream model
/// accepts. `image/jpg` is a common browser artifact.
pub fn normalize_mime_type(mime_type: &str) -> String {
    let lowered = mime_type.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "image/jpg" => "image/jpeg".to_string(),
        _ => lowered,
    }
}

pub fn is_supported_mime(mime_type: &str) -> bool {
    SUPPORTED_IMAGE_TYPES.contains(&mime_type)
}

pub fn detect_mime_type(data: &[u8]) -> Option<String> {
    infer::get(data).map(|kind| kind.mime_type().to_string())
}

/// A validated per-submission payload: non-empty image bytes, a supported
/// mime type, and an optional coordinate pair. Discarded after the response.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub image_bytes: Vec<u8>,
    pub mime_type: String,
    pub location: Option<GeoPoint>,
}

impl AnalysisRequest {
    pub fn new(
        image_bytes: Vec<u8>,
        mime_type: &str,
        location: Option<GeoPoint>,
    ) -> Result<Self, AnalysisError> {
        if image_bytes.is_empty() {
            return Err(AnalysisError::BadRequest("Missing image data".to_string()));
        }

        let mime_type = normalize_mime_type(mime_type);
        if mime_type.is_empty() {
            return Err(AnalysisError::BadRequest("Missing image data".to_string()));
        }
        if !is_supported_mime(&mime_type) {
            return Err(AnalysisError::BadRequest(format!(
                "Unsupported image type: {mime_type}"
            )));
        }

        if let Some(detected) = detect_mime_type(&image_bytes) {
            let detected = normalize_mime_type(&detected);
            if detected != mime_type {
                warn!(
                    "Declared image type {} disagrees with sniffed type {}",
                    mime_type, detected
                );
            }
        }

        Ok(AnalysisRequest {
            image_bytes,
            mime_type,
            location,
        })
    }

    /// Server-side direction: decode a transport payload into a validated
    /// request. Missing fields and undecodable base64 are client errors.
    pub fn from_wire(payload: AnalyzePayload) -> Result<Self, AnalysisError> {
        let encoded = payload
            .base64_image
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AnalysisError::BadRequest("Missing image data".to_string()))?;
        let mime_type = payload
            .mime_type
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AnalysisError::BadRequest("Missing image data".to_string()))?;

        let image_bytes = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|_| AnalysisError::BadRequest("Could not read image".to_string()))?;

        AnalysisRequest::new(image_bytes, mime_type, payload.location)
    }

    /// Client-side direction: encode for transport.
    pub fn to_wire(&self) -> AnalyzePayload {
        AnalyzePayload {
            base64_image: Some(general_purpose::STANDARD.encode(&self.image_bytes)),
            mime_type: Some(self.mime_type.clone()),
            location: self.location,
        }
    }
}
