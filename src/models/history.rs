use std::fmt;

use serde::{Deserialize, Serialize};

use super::patient::present_measurement;

/// One historical vital-sign reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub blood_pressure_systolic: f64,
    pub blood_pressure_diastolic: f64,
    pub blood_sugar: f64,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub notes: Option<String>,
    #[serde(default)]
    pub recorded_at: String,
    pub recorded_by: RecorderId,
}

impl HealthRecord {
    pub fn weight_kg(&self) -> Option<f64> {
        present_measurement(self.weight)
    }

    pub fn height_cm(&self) -> Option<f64> {
        present_measurement(self.height)
    }

    /// Notes worth printing: present and not blank.
    pub fn notes_text(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.is_empty())
    }
}

/// Who recorded a reading. The web client sends numeric user ids; imports
/// may carry a name instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecorderId {
    User(u64),
    Named(String),
}

impl fmt::Display for RecorderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecorderId::User(id) => write!(f, "{id}"),
            RecorderId::Named(name) => f.write_str(name),
        }
    }
}
