//! Instruction and output-schema construction for the analysis call.
//!
//! The instruction text and the response schema are fixed configuration
//! data, versioned together: bumping either means bumping
//! [`PROMPT_VERSION`], so wire-contract changes are visible in the timing
//! logs without diffing prompt wording.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::config;
use crate::profile::types::GeoPoint;

pub const PROMPT_VERSION: &str = "1";

/// Builds the full instruction for one analysis. The only branch is on
/// location presence: with coordinates the model is asked for plausible
/// nearby stores and vets plus real welfare organizations; without, for
/// generic examples with the welfare section omitted.
pub fn build_instruction(location: Option<&GeoPoint>) -> String {
    let location_guidance = match location {
        Some(point) => config::LOCATION_SERVICES_PROMPT
            .replace("{latitude}", &point.latitude.to_string())
            .replace("{longitude}", &point.longitude.to_string()),
        None => config::GENERIC_SERVICES_PROMPT.to_string(),
    };

    config::ANALYSIS_PROMPT.replace("{location_guidance}", &location_guidance)
}

static RESPONSE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "breed": { "type": "STRING" },
            "confidence": { "type": "NUMBER" },
            "description": { "type": "STRING" },
            "temperament": { "type": "ARRAY", "items": { "type": "STRING" } },
            "funFact": { "type": "STRING" },
            "lifespan": { "type": "STRING" },
            "size": {
                "type": "OBJECT",
                "properties": {
                    "height": { "type": "STRING" },
                    "weight": { "type": "STRING" }
                },
                "required": ["height", "weight"]
            },
            "origin": { "type": "STRING" },
            "diet": { "type": "STRING" },
            "careAndNeeds": { "type": "STRING" },
            "commonHealthIssues": { "type": "STRING" },
            "estimatedAge": { "type": "STRING" },
            "hygieneSchedule": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "task": { "type": "STRING" },
                        "frequency": { "type": "STRING" }
                    },
                    "required": ["task", "frequency"]
                }
            },
            "nearbyStores": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "address": { "type": "STRING" },
                        "rating": { "type": "NUMBER" }
                    },
                    "required": ["name", "address", "rating"]
                }
            },
            "vetHospitals": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "address": { "type": "STRING" },
                        "hours": { "type": "STRING" }
                    },
                    "required": ["name", "address", "hours"]
                }
            },
            "localWelfare": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "organizationName": { "type": "STRING" },
                        "contactInfo": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    },
                    "required": ["organizationName", "contactInfo", "description"]
                }
            }
        },
        "required": [
            "breed",
            "confidence",
            "description",
            "temperament",
            "funFact",
            "lifespan",
            "size",
            "origin",
            "diet",
            "careAndNeeds",
            "commonHealthIssues",
            "estimatedAge",
            "hygieneSchedule"
        ]
    })
});

pub fn response_schema() -> &'static Value {
    &RESPONSE_SCHEMA
}
