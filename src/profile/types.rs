use serde::{Deserialize, Serialize};

/// Wire form of an analysis submission. Presence of the image fields is
/// checked by the request builder, not by serde, so that an absent field and
/// an empty one produce the same client-facing error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzePayload {
    #[serde(default)]
    pub base64_image: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// The validated structured profile returned by the model. Constructed once
/// per analysis by the response validator and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalProfile {
    pub breed: String,
    pub confidence: f64,
    pub description: String,
    pub temperament: Vec<String>,
    pub fun_fact: String,
    pub lifespan: String,
    pub size: SizeInfo,
    pub origin: String,
    pub diet: String,
    pub care_and_needs: String,
    pub common_health_issues: String,
    pub estimated_age: String,
    pub hygiene_schedule: Vec<HygieneTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearby_stores: Option<Vec<Store>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vet_hospitals: Option<Vec<VetHospital>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_welfare: Option<Vec<WelfareContact>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeInfo {
    pub height: String,
    pub weight: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HygieneTask {
    pub task: String,
    pub frequency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub name: String,
    pub address: String,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VetHospital {
    pub name: String,
    pub address: String,
    pub hours: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelfareContact {
    pub organization_name: String,
    pub contact_info: String,
    pub description: String,
}
