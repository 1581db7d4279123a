use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use crate::error::AnalysisError;
use crate::handlers::AppState;
use crate::profile::request::AnalysisRequest;
use crate::profile::types::{AnalyzePayload, AnimalProfile};
use crate::profile::validate::validate_profile;
use crate::utils::timing::{complete_request_timer, start_request_timer, RequestTimer};

/// One analysis is one independent round trip: build the request, make a
/// single upstream call, validate the output wholesale.
pub async fn analyze(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnimalProfile>, AnalysisError> {
    let mut timer = start_request_timer("analyze");
    let result = run_analysis(&state, &body, &mut timer).await;
    match &result {
        Ok(_) => complete_request_timer(&mut timer, "success", None),
        Err(err) => complete_request_timer(&mut timer, "error", Some(err.to_string())),
    }
    result.map(Json)
}

async fn run_analysis(
    state: &AppState,
    body: &[u8],
    timer: &mut RequestTimer,
) -> Result<AnimalProfile, AnalysisError> {
    let payload: AnalyzePayload = serde_json::from_slice(body)
        .map_err(|_| AnalysisError::BadRequest("Invalid request body".to_string()))?;

    let request = AnalysisRequest::from_wire(payload)?;
    timer.record_request(
        &request.mime_type,
        request.image_bytes.len(),
        request.location.is_some(),
    );

    let raw = state.model.generate_profile(&request).await?;
    let profile = validate_profile(raw)?;
    Ok(profile)
}
