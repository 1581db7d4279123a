//! Ephemeral per-session flow state for the browser layer.
//!
//! Both the analysis and the location flows are explicit state machines.
//! Every submission gets a monotonically increasing request id; a completion
//! or failure carrying any other id is stale and ignored, which makes the
//! "late response after reset" race benign: only the current id can ever be
//! written into the single result slot.

use crate::error::AnalysisError;
use crate::profile::request::AnalysisRequest;
use crate::profile::types::{AnimalProfile, GeoPoint};

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisPhase {
    #[default]
    Idle,
    Pending {
        request_id: RequestId,
    },
    Ready {
        request_id: RequestId,
        profile: Box<AnimalProfile>,
    },
    Failed {
        request_id: RequestId,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFailure {
    PermissionDenied,
    Unavailable,
    Timeout,
    Unknown,
}

impl LocationFailure {
    /// Advisory only: a location failure never blocks analysis.
    pub fn advisory_message(&self) -> &'static str {
        match self {
            LocationFailure::PermissionDenied => {
                "Location access denied. You can try again from the header button."
            }
            LocationFailure::Unavailable => "Location information is currently unavailable.",
            LocationFailure::Timeout => "Request for location timed out.",
            LocationFailure::Unknown => "An unknown error occurred while getting location.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LocationPhase {
    #[default]
    Idle,
    Pending,
    Acquired(GeoPoint),
    Failed(LocationFailure),
}

#[derive(Debug, Default)]
pub struct AnalysisFlow {
    last_request_id: RequestId,
    analysis: AnalysisPhase,
    location: LocationPhase,
}

impl AnalysisFlow {
    pub fn new() -> Self {
        AnalysisFlow::default()
    }

    pub fn analysis(&self) -> &AnalysisPhase {
        &self.analysis
    }

    pub fn location_phase(&self) -> &LocationPhase {
        &self.location
    }

    /// The id currently awaiting a result, if any.
    pub fn current_request(&self) -> Option<RequestId> {
        match self.analysis {
            AnalysisPhase::Pending { request_id } => Some(request_id),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<&AnimalProfile> {
        match &self.analysis {
            AnalysisPhase::Ready { profile, .. } => Some(profile),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.analysis {
            AnalysisPhase::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Builds the transport request for a newly selected image, attaching the
    /// acquired location if there is one, and moves the flow to pending.
    /// The prior result is discarded unconditionally. On a build failure the
    /// flow lands in `Failed` with the user-facing message.
    pub fn submit(
        &mut self,
        image_bytes: Vec<u8>,
        mime_type: &str,
    ) -> Result<(RequestId, AnalysisRequest), AnalysisError> {
        let request_id = self.next_request_id();
        match AnalysisRequest::new(image_bytes, mime_type, self.location()) {
            Ok(request) => {
                self.analysis = AnalysisPhase::Pending { request_id };
                Ok((request_id, request))
            }
            Err(err) => {
                self.analysis = AnalysisPhase::Failed {
                    request_id,
                    message: err.to_string(),
                };
                Err(err)
            }
        }
    }

    /// Starts a new pending analysis without building the request. Used when
    /// the payload is assembled elsewhere.
    pub fn begin_analysis(&mut self) -> RequestId {
        let request_id = self.next_request_id();
        self.analysis = AnalysisPhase::Pending { request_id };
        request_id
    }

    /// Stores a result. Returns false when the response is stale, in which
    /// case the state is untouched.
    pub fn complete_analysis(&mut self, request_id: RequestId, profile: AnimalProfile) -> bool {
        if self.current_request() != Some(request_id) {
            return false;
        }
        self.analysis = AnalysisPhase::Ready {
            request_id,
            profile: Box::new(profile),
        };
        true
    }

    /// Records a failure. Stale failures are ignored the same way stale
    /// results are.
    pub fn fail_analysis(&mut self, request_id: RequestId, message: impl Into<String>) -> bool {
        if self.current_request() != Some(request_id) {
            return false;
        }
        self.analysis = AnalysisPhase::Failed {
            request_id,
            message: message.into(),
        };
        true
    }

    /// Clears the current image and result. The acquired location survives a
    /// reset so the next submission can still carry it.
    pub fn reset(&mut self) {
        self.analysis = AnalysisPhase::Idle;
    }

    pub fn begin_location_request(&mut self) {
        self.location = LocationPhase::Pending;
    }

    pub fn location_acquired(&mut self, point: GeoPoint) {
        self.location = LocationPhase::Acquired(point);
    }

    pub fn location_failed(&mut self, failure: LocationFailure) {
        self.location = LocationPhase::Failed(failure);
    }

    pub fn location(&self) -> Option<GeoPoint> {
        match self.location {
            LocationPhase::Acquired(point) => Some(point),
            _ => None,
        }
    }

    fn next_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }
}

#[cfg(test)]
mod tests {
    use crate::profile::types::{HygieneTask, SizeInfo};

    use super::*;

    fn sample_profile(breed: &str) -> AnimalProfile {
        AnimalProfile {
            breed: breed.to_string(),
            confidence: 0.9,
            description: "desc".to_string(),
            temperament: vec!["calm".to_string()],
            fun_fact: "fact".to_string(),
            lifespan: "10 years".to_string(),
            size: SizeInfo {
                height: "30 cm".to_string(),
                weight: "4 kg".to_string(),
            },
            origin: "somewhere".to_string(),
            diet: "kibble".to_string(),
            care_and_needs: "care".to_string(),
            common_health_issues: "none".to_string(),
            estimated_age: "Adult".to_string(),
            hygiene_schedule: vec![HygieneTask {
                task: "brushing".to_string(),
                frequency: "weekly".to_string(),
            }],
            nearby_stores: None,
            vet_hospitals: None,
            local_welfare: None,
        }
    }

    fn png_bytes() -> Vec<u8> {
        b"\x89PNG\r\n\x1a\nrest".to_vec()
    }

    #[test]
    fn request_ids_increase_monotonically() {
        let mut flow = AnalysisFlow::new();
        let first = flow.begin_analysis();
        let second = flow.begin_analysis();
        assert!(second > first);
    }

    #[test]
    fn stale_responses_are_ignored() {
        let mut flow = AnalysisFlow::new();
        let first = flow.begin_analysis();
        let second = flow.begin_analysis();

        assert!(!flow.complete_analysis(first, sample_profile("Beagle")));
        assert!(flow.profile().is_none());

        assert!(flow.complete_analysis(second, sample_profile("Corgi")));
        assert_eq!(flow.profile().unwrap().breed, "Corgi");
    }

    #[test]
    fn late_failure_for_a_superseded_request_is_ignored() {
        let mut flow = AnalysisFlow::new();
        let first = flow.begin_analysis();
        let second = flow.begin_analysis();

        assert!(!flow.fail_analysis(first, "network down"));
        assert!(flow.error_message().is_none());
        assert_eq!(flow.current_request(), Some(second));
    }

    #[test]
    fn result_slot_is_last_write_wins() {
        let mut flow = AnalysisFlow::new();
        let first = flow.begin_analysis();
        assert!(flow.complete_analysis(first, sample_profile("Beagle")));

        let second = flow.begin_analysis();
        assert!(flow.profile().is_none());
        assert!(flow.complete_analysis(second, sample_profile("Husky")));
        assert_eq!(flow.profile().unwrap().breed, "Husky");
    }

    #[test]
    fn completed_request_does_not_accept_a_second_result() {
        let mut flow = AnalysisFlow::new();
        let id = flow.begin_analysis();
        assert!(flow.complete_analysis(id, sample_profile("Beagle")));
        assert!(!flow.complete_analysis(id, sample_profile("Husky")));
        assert_eq!(flow.profile().unwrap().breed, "Beagle");
    }

    #[test]
    fn submit_attaches_the_acquired_location() {
        let mut flow = AnalysisFlow::new();
        let point = GeoPoint {
            latitude: 37.77,
            longitude: -122.41,
        };
        flow.begin_location_request();
        flow.location_acquired(point);

        let (_, request) = flow.submit(png_bytes(), "image/png").unwrap();
        assert_eq!(request.location, Some(point));
    }

    #[test]
    fn location_failure_does_not_block_analysis() {
        let mut flow = AnalysisFlow::new();
        flow.begin_location_request();
        flow.location_failed(LocationFailure::PermissionDenied);

        let (id, request) = flow.submit(png_bytes(), "image/png").unwrap();
        assert!(request.location.is_none());
        assert!(flow.complete_analysis(id, sample_profile("Beagle")));
    }

    #[test]
    fn rejected_submission_lands_in_failed_with_the_message() {
        let mut flow = AnalysisFlow::new();
        let err = flow.submit(Vec::new(), "image/png").unwrap_err();
        assert_eq!(flow.error_message(), Some(err.to_string().as_str()));
        assert!(flow.current_request().is_none());
    }

    #[test]
    fn reset_clears_the_result_but_keeps_the_location() {
        let mut flow = AnalysisFlow::new();
        let point = GeoPoint {
            latitude: 1.0,
            longitude: 2.0,
        };
        flow.location_acquired(point);
        let id = flow.begin_analysis();
        flow.complete_analysis(id, sample_profile("Beagle"));

        flow.reset();
        assert_eq!(flow.analysis(), &AnalysisPhase::Idle);
        assert_eq!(flow.location(), Some(point));
    }

    #[test]
    fn each_location_failure_has_a_distinct_advisory() {
        let failures = [
            LocationFailure::PermissionDenied,
            LocationFailure::Unavailable,
            LocationFailure::Timeout,
            LocationFailure::Unknown,
        ];
        for pair in failures.windows(2) {
            assert_ne!(pair[0].advisory_message(), pair[1].advisory_message());
        }
    }
}
