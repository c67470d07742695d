use serde::{Deserialize, Serialize};

/// Identity and demographics shown in the report header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInfo {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub phone: String,
    pub weight: Option<f64>, // kg
    pub height: Option<f64>, // cm
    /// Registration timestamp (ISO-8601).
    pub created_at: Option<String>,
}

impl PatientInfo {
    pub fn weight_kg(&self) -> Option<f64> {
        present_measurement(self.weight)
    }

    pub fn height_cm(&self) -> Option<f64> {
        present_measurement(self.height)
    }
}

/// Current vital signs snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vitals {
    #[serde(rename = "bloodSugar")]
    pub blood_sugar: f64, // mg/dL
    #[serde(rename = "systolicBP")]
    pub systolic_bp: f64, // mmHg
    #[serde(rename = "diastolicBP")]
    pub diastolic_bp: f64, // mmHg
}

/// Zero counts as "not recorded" for optional body measurements.
pub(crate) fn present_measurement(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}
