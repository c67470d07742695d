use serde::{Deserialize, Serialize};

use super::Recommendations;

/// Result of an image analysis (X-ray, MRI, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalImage {
    pub filename: String,
    pub analysis_type: String,
    #[serde(default)]
    pub findings: String,
    #[serde(default)]
    pub recommendations: Recommendations,
    #[serde(default)]
    pub created_at: String,
}
