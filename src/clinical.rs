//! Derived clinical metrics printed in the report.
//!
//! Cutoffs are fixed clinical values and intentionally not configurable:
//! - BMI: < 18.5 underweight, > 25 overweight (on the 1-decimal rounded value)
//! - BP: > 140/90 high, > 120/80 elevated
//! - Blood sugar: > 200 mg/dL high, > 140 mg/dL elevated

use std::fmt;

use serde::Serialize;

const BMI_UNDERWEIGHT_BELOW: f64 = 18.5;
const BMI_OVERWEIGHT_ABOVE: f64 = 25.0;

const BP_HIGH_SYSTOLIC: f64 = 140.0;
const BP_HIGH_DIASTOLIC: f64 = 90.0;
const BP_ELEVATED_SYSTOLIC: f64 = 120.0;
const BP_ELEVATED_DIASTOLIC: f64 = 80.0;

const SUGAR_HIGH: f64 = 200.0;
const SUGAR_ELEVATED: f64 = 140.0;

// ─── BMI ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
}

impl BmiCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
        }
    }

    fn classify(bmi: f64) -> Self {
        if bmi > BMI_OVERWEIGHT_ABOVE {
            BmiCategory::Overweight
        } else if bmi < BMI_UNDERWEIGHT_BELOW {
            BmiCategory::Underweight
        } else {
            BmiCategory::Normal
        }
    }
}

/// Body-mass index rounded to one decimal, plus its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bmi {
    /// Rounded value as printed, e.g. "22.9".
    pub display: String,
    pub value: f64,
    pub category: BmiCategory,
}

impl fmt::Display for Bmi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BMI: {} kg/m² ({})", self.display, self.category.as_str())
    }
}

/// BMI = weight / (height/100)². Classification uses the rounded value so
/// the printed number and category never disagree at a cutoff.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> Bmi {
    let height_m = height_cm / 100.0;
    let raw = weight_kg / (height_m * height_m);
    let value = round_1(raw);
    let display = format!("{value:.1}");
    Bmi {
        category: BmiCategory::classify(value),
        display,
        value,
    }
}

// ─── Readings ─────────────────────────────────────────────────────────────────

/// Status of a single blood-pressure or blood-sugar reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadingStatus {
    Normal,
    Elevated,
    High,
}

impl ReadingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadingStatus::Normal => "Normal",
            ReadingStatus::Elevated => "Elevated",
            ReadingStatus::High => "High",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn bp_status(systolic: f64, diastolic: f64) -> ReadingStatus {
    if systolic > BP_HIGH_SYSTOLIC || diastolic > BP_HIGH_DIASTOLIC {
        ReadingStatus::High
    } else if systolic > BP_ELEVATED_SYSTOLIC || diastolic > BP_ELEVATED_DIASTOLIC {
        ReadingStatus::Elevated
    } else {
        ReadingStatus::Normal
    }
}

pub fn sugar_status(blood_sugar: f64) -> ReadingStatus {
    if blood_sugar > SUGAR_HIGH {
        ReadingStatus::High
    } else if blood_sugar > SUGAR_ELEVATED {
        ReadingStatus::Elevated
    } else {
        ReadingStatus::Normal
    }
}

/// Fraction in [0, 1] as a percentage with one decimal: 0.1234 → "12.3%".
pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", round_1(fraction * 100.0))
}

/// One decimal, ties away from zero. `{:.1}` alone rounds exact ties to even.
fn round_1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
