//! Response validation: the gate between the model's raw output and the
//! presentation layer. Acceptance is all-or-nothing; nothing of a rejected
//! payload is exposed downstream.

use serde_json::Value;

use crate::profile::types::AnimalProfile;

/// Internal reason a payload was rejected. Logged server-side; the boundary
/// surfaces only the generic format-mismatch message.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("response is not a JSON object")]
    NotAnObject,
    #[error("response shape mismatch: {0}")]
    Shape(String),
    #[error("missing required field `{0}`")]
    Missing(&'static str),
    #[error("field `{0}` must be a non-empty string")]
    EmptyField(&'static str),
    #[error("field `{0}` is out of range")]
    OutOfRange(&'static str),
    #[error("field `temperament` must contain at least one entry")]
    EmptyTemperament,
}

const REQUIRED_FIELDS: &[&str] = &[
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
    "hygieneSchedule",
];

/// Checks an arbitrary JSON value against the profile shape and returns the
/// typed profile on success.
pub fn validate_profile(value: Value) -> Result<AnimalProfile, SchemaError> {
    let object = value.as_object().ok_or(SchemaError::NotAnObject)?;
    for field in REQUIRED_FIELDS.iter().copied() {
        if !object.contains_key(field) {
            return Err(SchemaError::Missing(field));
        }
    }

    let profile: AnimalProfile =
        serde_json::from_value(value).map_err(|err| SchemaError::Shape(err.to_string()))?;

    check_invariants(&profile)?;
    Ok(profile)
}

fn check_invariants(profile: &AnimalProfile) -> Result<(), SchemaError> {
    let required_strings = [
        ("breed", &profile.breed),
        ("description", &profile.description),
        ("funFact", &profile.fun_fact),
        ("lifespan", &profile.lifespan),
        ("origin", &profile.origin),
        ("diet", &profile.diet),
        ("careAndNeeds", &profile.care_and_needs),
        ("commonHealthIssues", &profile.common_health_issues),
        ("estimatedAge", &profile.estimated_age),
        ("size.height", &profile.size.height),
        ("size.weight", &profile.size.weight),
    ];
    for (name, value) in required_strings {
        if value.trim().is_empty() {
            return Err(SchemaError::EmptyField(name));
        }
    }

    if !(0.0..=1.0).contains(&profile.confidence) {
        return Err(SchemaError::OutOfRange("confidence"));
    }

    if profile.temperament.is_empty() {
        return Err(SchemaError::EmptyTemperament);
    }
    if profile.temperament.iter().any(|entry| entry.trim().is_empty()) {
        return Err(SchemaError::EmptyField("temperament"));
    }

    if let Some(stores) = &profile.nearby_stores {
        for store in stores {
            if !(0.0..=5.0).contains(&store.rating) {
                return Err(SchemaError::OutOfRange("nearbyStores.rating"));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_response(with_services: bool) -> Value {
        let mut value = json!({
            "breed": "Golden Retriever",
            "confidence": 0.94,
            "description": "A friendly, intelligent sporting dog.",
            "temperament": ["Friendly", "Devoted", "Confident"],
            "funFact": "Goldens were bred to retrieve waterfowl undamaged.",
            "lifespan": "10-12 years",
            "size": { "height": "51-61 cm", "weight": "25-34 kg" },
            "origin": "Scotland",
            "diet": "High-quality kibble with measured portions.",
            "careAndNeeds": "Daily exercise and regular brushing.",
            "commonHealthIssues": "Hip dysplasia, ear infections.",
            "estimatedAge": "Adult, 3-5 years",
            "hygieneSchedule": [
                { "task": "Brushing", "frequency": "Weekly" },
                { "task": "Bathing", "frequency": "Every 6-8 weeks" }
            ]
        });
        if with_services {
            value["nearbyStores"] = json!([
                { "name": "Pawsitive Supplies", "address": "12 Mission St", "rating": 4.5 }
            ]);
            value["vetHospitals"] = json!([
                { "name": "Bay Vet Clinic", "address": "98 Harrison Ave", "hours": "Mon-Fri 9am-6pm" }
            ]);
            value["localWelfare"] = json!([
                {
                    "organizationName": "ASPCA",
                    "contactInfo": "www.aspca.org",
                    "description": "National animal welfare organization."
                }
            ]);
        }
        value
    }

    #[test]
    fn accepts_a_complete_profile_without_optional_sections() {
        let profile = validate_profile(sample_response(false)).unwrap();
        assert_eq!(profile.breed, "Golden Retriever");
        assert!(profile.local_welfare.is_none());
        assert!(profile.nearby_stores.is_none());
    }

    #[test]
    fn accepts_a_profile_with_all_optional_sections() {
        let profile = validate_profile(sample_response(true)).unwrap();
        assert_eq!(profile.local_welfare.unwrap().len(), 1);
        assert_eq!(profile.vet_hospitals.unwrap().len(), 1);
    }

    #[test]
    fn rejects_when_any_required_field_is_removed() {
        let required = [
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
            "hygieneSchedule",
        ];
        for field in required {
            let mut value = sample_response(false);
            value.as_object_mut().unwrap().remove(field);
            assert!(
                matches!(validate_profile(value), Err(SchemaError::Missing(name)) if name == field),
                "expected rejection without `{field}`"
            );
        }
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        let mut value = sample_response(false);
        value["temperament"] = json!("Friendly");
        assert!(validate_profile(value).is_err());

        let mut value = sample_response(false);
        value["confidence"] = json!("very sure");
        assert!(validate_profile(value).is_err());
    }

    #[test]
    fn rejects_confidence_outside_unit_interval() {
        for bad in [-0.1, 1.2] {
            let mut value = sample_response(false);
            value["confidence"] = json!(bad);
            assert!(matches!(
                validate_profile(value),
                Err(SchemaError::OutOfRange("confidence"))
            ));
        }
    }

    #[test]
    fn rejects_store_rating_outside_five_stars() {
        let mut value = sample_response(true);
        value["nearbyStores"][0]["rating"] = json!(6.0);
        assert!(matches!(
            validate_profile(value),
            Err(SchemaError::OutOfRange("nearbyStores.rating"))
        ));
    }

    #[test]
    fn rejects_empty_temperament() {
        let mut value = sample_response(false);
        value["temperament"] = json!([]);
        assert!(matches!(
            validate_profile(value),
            Err(SchemaError::EmptyTemperament)
        ));
    }

    #[test]
    fn rejects_blank_required_strings() {
        let mut value = sample_response(false);
        value["breed"] = json!("   ");
        assert!(matches!(
            validate_profile(value),
            Err(SchemaError::EmptyField("breed"))
        ));
    }

    #[test]
    fn rejects_malformed_optional_records() {
        let mut value = sample_response(true);
        value["vetHospitals"][0].as_object_mut().unwrap().remove("hours");
        assert!(validate_profile(value).is_err());
    }

    #[test]
    fn rejects_non_object_payloads() {
        assert!(matches!(
            validate_profile(json!("a dog")),
            Err(SchemaError::NotAnObject)
        ));
        assert!(matches!(
            validate_profile(json!(null)),
            Err(SchemaError::NotAnObject)
        ));
    }

    #[test]
    fn ignores_unknown_extra_fields() {
        let mut value = sample_response(false);
        value["modelNote"] = json!("extra");
        assert!(validate_profile(value).is_ok());
    }
}
