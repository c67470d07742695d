//! Input contract checks, run before any drawing.
//!
//! A report is either produced from valid input or not at all: empty
//! identity fields, NaN/∞ numbers and negative body measurements are
//! rejected with the offending field named.

use crate::error::ReportError;
use crate::models::PatientReportInput;

pub fn validate_input(input: &PatientReportInput) -> Result<(), ReportError> {
    let result = check(input);
    if let Err(e) = &result {
        tracing::warn!("Report input rejected: {e}");
    }
    result
}

fn check(input: &PatientReportInput) -> Result<(), ReportError> {
    let info = &input.patient_info;
    if info.id.trim().is_empty() {
        return Err(ReportError::MissingField("patientInfo.id"));
    }
    if input.generated_by.trim().is_empty() {
        return Err(ReportError::MissingField("generatedBy"));
    }
    // The id becomes part of the output filename.
    if info.id.contains(['/', '\\', '\0']) || info.id.contains("..") {
        return Err(ReportError::InvalidField {
            field: "patientInfo.id".into(),
            reason: "must not contain path separators or '..'".into(),
        });
    }

    measurement("patientInfo.weight", info.weight)?;
    measurement("patientInfo.height", info.height)?;

    finite("vitals.bloodSugar", input.vitals.blood_sugar)?;
    finite("vitals.systolicBP", input.vitals.systolic_bp)?;
    finite("vitals.diastolicBP", input.vitals.diastolic_bp)?;

    for (i, record) in input.health_history.iter().enumerate() {
        let field = |name: &str| format!("healthHistory[{i}].{name}");
        finite(&field("bloodPressureSystolic"), record.blood_pressure_systolic)?;
        finite(&field("bloodPressureDiastolic"), record.blood_pressure_diastolic)?;
        finite(&field("bloodSugar"), record.blood_sugar)?;
        measurement(&field("weight"), record.weight)?;
        measurement(&field("height"), record.height)?;
    }

    for (i, prediction) in input.health_predictions.iter().enumerate() {
        let field = |name: &str| format!("healthPredictions[{i}].{name}");
        finite(&field("cardiovascularRisk"), prediction.cardiovascular_risk)?;
        finite(&field("diabetesRisk"), prediction.diabetes_risk)?;
        finite(&field("overallHealthScore"), prediction.overall_health_score)?;
    }

    Ok(())
}

fn finite(field: &str, value: f64) -> Result<(), ReportError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ReportError::NonFinite {
            field: field.to_string(),
            value,
        })
    }
}

fn measurement(field: &str, value: Option<f64>) -> Result<(), ReportError> {
    let Some(value) = value else {
        return Ok(());
    };
    finite(field, value)?;
    if value < 0.0 {
        return Err(ReportError::InvalidField {
            field: field.to_string(),
            reason: format!("must not be negative, got {value}"),
        });
    }
    Ok(())
}
