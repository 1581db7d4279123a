pub mod prompt;
pub mod request;
pub mod types;
pub mod validate;

pub use request::AnalysisRequest;
pub use types::{AnalyzePayload, AnimalProfile, GeoPoint};
