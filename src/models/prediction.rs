use serde::{Deserialize, Serialize};

use super::Recommendations;

/// Model-derived risk assessment. Scores are fractions in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthPrediction {
    pub cardiovascular_risk: f64,
    pub diabetes_risk: f64,
    pub overall_health_score: f64,
    #[serde(default)]
    pub recommendations: Recommendations,
    #[serde(default)]
    pub created_at: String,
}
