use serde::{Deserialize, Deserializer, Serialize};

use super::{HealthPrediction, HealthRecord, MedicalImage, PatientInfo, Vitals};

/// Everything the compositor needs for one report. Read-only during a
/// generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientReportInput {
    pub patient_info: PatientInfo,
    pub vitals: Vitals,
    #[serde(default)]
    pub medical_history: String,
    #[serde(default)]
    pub health_history: Vec<HealthRecord>,
    #[serde(default)]
    pub health_predictions: Vec<HealthPrediction>,
    #[serde(default)]
    pub medical_images: Vec<MedicalImage>,
    pub generated_by: String,
    pub generated_at: Option<String>,
}

/// Recommendation list. Accepts either a JSON array or a bare string; a bare
/// string becomes a one-element list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Recommendations(Vec<String>);

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl From<String> for Recommendations {
    fn from(single: String) -> Self {
        Self(vec![single])
    }
}

impl From<&str> for Recommendations {
    fn from(single: &str) -> Self {
        Self(vec![single.to_string()])
    }
}

impl From<Vec<String>> for Recommendations {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

impl<'de> Deserialize<'de> for Recommendations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(String),
            Many(Vec<String>),
        }

        Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
            Some(OneOrMany::One(s)) if s.is_empty() => Self::default(),
            Some(OneOrMany::One(s)) => Self::from(s),
            Some(OneOrMany::Many(v)) => Self(v),
            None => Self::default(),
        })
    }
}

impl<'a> IntoIterator for &'a Recommendations {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
