use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use tracing::info;

/// Wall-clock accounting for one analysis request, written to the
/// `relay.timing` target so the timing files stay free of general chatter.
#[derive(Debug)]
pub struct RequestTimer {
    endpoint: String,
    mime_type: Option<String>,
    image_bytes: usize,
    has_location: bool,
    started_at: DateTime<Utc>,
    started_perf: Instant,
    status: String,
    detail: Option<String>,
    completed: bool,
}

impl RequestTimer {
    pub fn new(endpoint: &str) -> Self {
        RequestTimer {
            endpoint: endpoint.to_string(),
            mime_type: None,
            image_bytes: 0,
            has_location: false,
            started_at: Utc::now(),
            started_perf: Instant::now(),
            status: "success".to_string(),
            detail: None,
            completed: false,
        }
    }

    pub fn record_request(&mut self, mime_type: &str, image_bytes: usize, has_location: bool) {
        self.mime_type = Some(mime_type.to_string());
        self.image_bytes = image_bytes;
        self.has_location = has_location;
    }

    pub fn log_received(&self) {
        info!(
            target: "relay.timing",
            "event=request_received endpoint={} received_at={}",
            self.endpoint,
            self.started_at.to_rfc3339()
        );
    }

    pub fn mark_status(&mut self, status: &str, detail: Option<String>) {
        self.status = status.to_string();
        self.detail = detail;
    }

    pub fn log_completed(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;
        let completed_at = Utc::now();
        let duration = self.started_perf.elapsed().as_secs_f64();
        info!(
            target: "relay.timing",
            "event=request_completed endpoint={} mime_type={:?} image_bytes={} has_location={} started_at={} response_sent_at={} duration_s={:.3} status={} detail={}",
            self.endpoint,
            self.mime_type,
            self.image_bytes,
            self.has_location,
            self.started_at.to_rfc3339(),
            completed_at.to_rfc3339(),
            duration,
            self.status,
            self.detail.clone().unwrap_or_default()
        );
    }
}

pub fn start_request_timer(endpoint: &str) -> RequestTimer {
    let timer = RequestTimer::new(endpoint);
    timer.log_received();
    timer
}

pub fn complete_request_timer(timer: &mut RequestTimer, status: &str, detail: Option<String>) {
    timer.mark_status(status, detail);
    timer.log_completed();
}

pub async fn log_llm_timing<T, E, F, Fut>(
    provider: &str,
    model: &str,
    operation: &str,
    metadata: Option<JsonValue>,
    call: F,
) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let started_at = Utc::now();
    let started_perf = Instant::now();
    let metadata_text = metadata
        .as_ref()
        .map(|value| value.to_string())
        .unwrap_or_else(|| "{}".to_string());
    info!(
        target: "relay.timing",
        "event=llm_request provider={} model={} operation={} started_at={} metadata={}",
        provider,
        model,
        operation,
        started_at.to_rfc3339(),
        metadata_text
    );

    let result = call().await;
    let status = if result.is_ok() { "success" } else { "error" };

    let completed_at = Utc::now();
    let duration = started_perf.elapsed().as_secs_f64();
    info!(
        target: "relay.timing",
        "event=llm_response provider={} model={} operation={} completed_at={} duration_s={:.3} status={} metadata={}",
        provider,
        model,
        operation,
        completed_at.to_rfc3339(),
        duration,
        status,
        metadata_text
    );

    result
}
