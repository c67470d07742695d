//! Patient report compositor: one layout pass over one record.
//!
//! A single vertical cursor walks down the page. Every text block is wrapped
//! by the canvas, drawn at the cursor, and advances it by
//! `lines × line_height`. Pagination is checked only at block boundaries
//! (history record, prediction, image section, image record, footer) against
//! per-block thresholds; a block that starts above its threshold is drawn in
//! full even if it runs past the page bottom.
//!
//! Section order is fixed: title, patient information, current vitals,
//! medical history, health history timeline, AI analysis, image analysis,
//! footer. The last three content sections disappear entirely when empty.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::canvas::{FontFamily, FontStyle, PageCanvas, PdfCanvas};
use crate::clinical::{bp_status, compute_bmi, percent, sugar_status};
use crate::config::{LayoutConfig, ReportConfig, PRODUCT_TAGLINE};
use crate::datetime::{strip_raw_timestamp, Clock, DateFormatter, LocaleFormatter, SystemClock};
use crate::error::ReportError;
use crate::models::{
    HealthPrediction, HealthRecord, MedicalImage, PatientReportInput, Recommendations,
};
use crate::validation::validate_input;

pub const REPORT_TITLE: &str = "PATIENT MEDICAL REPORT";
pub const DOCUMENT_TITLE: &str = "Patient Medical Report";
const FONT_FAMILY: FontFamily = FontFamily::Helvetica;

/// Block that a pagination check ran in front of. Indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Block {
    HistoryRecord(usize),
    Prediction(usize),
    ImageSection,
    Image(usize),
    Footer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageBreak {
    pub before: Block,
    /// Cursor position that tripped the threshold.
    pub cursor_y: f32,
    /// 1-based number of the page that was started.
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSummary {
    pub pages: usize,
    pub page_breaks: Vec<PageBreak>,
    pub final_cursor_y: f32,
}

/// `patient_<id>_report.<ext>`
pub fn report_filename(patient_id: &str, extension: &str) -> String {
    format!("patient_{patient_id}_report.{extension}")
}

pub struct ReportCompositor<C = SystemClock, F = LocaleFormatter> {
    layout: LayoutConfig,
    clock: C,
    formatter: F,
}

impl ReportCompositor<SystemClock, LocaleFormatter> {
    pub fn with_defaults() -> Self {
        Self {
            layout: LayoutConfig::default(),
            clock: SystemClock,
            formatter: LocaleFormatter::default(),
        }
    }

    pub fn from_config(config: &ReportConfig) -> Result<Self, ReportError> {
        let formatter = LocaleFormatter::from_config(&config.locale)?;
        Self::new(config.layout.clone(), SystemClock, formatter)
    }
}

impl<C: Clock, F: DateFormatter> ReportCompositor<C, F> {
    pub fn new(layout: LayoutConfig, clock: C, formatter: F) -> Result<Self, ReportError> {
        layout.validate()?;
        Ok(Self {
            layout,
            clock,
            formatter,
        })
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Lay the whole report out on `canvas`. Input is validated first; on a
    /// contract violation nothing is drawn.
    pub fn compose<K: PageCanvas>(
        &self,
        input: &PatientReportInput,
        canvas: &mut K,
    ) -> Result<LayoutSummary, ReportError> {
        validate_input(input)?;

        let _span = tracing::info_span!("compose_report").entered();
        tracing::info!(
            history = input.health_history.len(),
            predictions = input.health_predictions.len(),
            images = input.medical_images.len(),
            "Composing patient report"
        );

        let mut out = Cursor::new(canvas, &self.layout);

        self.write_title(&mut out)?;
        self.write_patient_info(&mut out, input)?;
        self.write_vitals(&mut out, input)?;
        self.write_medical_history(&mut out, input)?;
        if !input.health_history.is_empty() {
            self.write_health_history(&mut out, &input.health_history)?;
        }
        if !input.health_predictions.is_empty() {
            self.write_predictions(&mut out, &input.health_predictions)?;
        }
        if !input.medical_images.is_empty() {
            self.write_images(&mut out, &input.medical_images)?;
        }
        self.write_footer(&mut out, input)?;

        let summary = out.finish();
        tracing::info!(
            pages = summary.pages,
            breaks = summary.page_breaks.len(),
            final_cursor_y = summary.final_cursor_y,
            "Patient report composed"
        );
        Ok(summary)
    }

    /// Compose into `canvas` and save it as
    /// `out_dir/patient_<id>_report.<ext>`. I/O errors surface unchanged.
    pub fn export<K: PageCanvas>(
        &self,
        input: &PatientReportInput,
        mut canvas: K,
        out_dir: &Path,
    ) -> Result<PathBuf, ReportError> {
        self.compose(input, &mut canvas)?;

        std::fs::create_dir_all(out_dir)?;
        let path = out_dir.join(report_filename(&input.patient_info.id, canvas.extension()));
        canvas.save(&path)?;

        tracing::info!(path = %path.display(), "Report saved");
        Ok(path)
    }

    // ─── Sections ─────────────────────────────────────────────────────────

    fn write_title<K: PageCanvas>(&self, out: &mut Cursor<'_, K>) -> Result<(), ReportError> {
        out.font(FontStyle::Bold, self.layout.title_font_size)?;
        out.line(REPORT_TITLE);
        out.gap(self.layout.gap_after_title);
        Ok(())
    }

    fn write_patient_info<K: PageCanvas>(
        &self,
        out: &mut Cursor<'_, K>,
        input: &PatientReportInput,
    ) -> Result<(), ReportError> {
        let info = &input.patient_info;
        out.heading("Patient Information")?;
        out.line(&format!("Patient ID: {}", info.id));
        out.line(&format!("Name: {}", info.name));
        out.line(&format!("Age: {} years", info.age));
        out.line(&format!("Phone: {}", info.phone));
        let since = self
            .formatter
            .format_date(info.created_at.as_deref().unwrap_or_default());
        out.line(&format!("Patient Since: {since}"));
        out.gap(self.layout.gap_after_section);
        Ok(())
    }

    fn write_vitals<K: PageCanvas>(
        &self,
        out: &mut Cursor<'_, K>,
        input: &PatientReportInput,
    ) -> Result<(), ReportError> {
        let vitals = &input.vitals;
        let info = &input.patient_info;
        out.heading("Current Vital Signs")?;
        out.line(&format!("Blood Sugar: {} mg/dL", vitals.blood_sugar));
        out.line(&format!(
            "Blood Pressure: {}/{} mmHg",
            vitals.systolic_bp, vitals.diastolic_bp
        ));

        let (weight, height) = (info.weight_kg(), info.height_cm());
        if let (Some(w), Some(h)) = (weight, height) {
            out.line(&compute_bmi(w, h).to_string());
        }
        if weight.is_some() || height.is_some() {
            let mut stats = Vec::new();
            if let Some(w) = weight {
                stats.push(format!("Weight: {w} kg"));
            }
            if let Some(h) = height {
                stats.push(format!("Height: {h} cm"));
            }
            out.line(&format!("Physical Stats: {}", stats.join(", ")));
        }

        out.gap(self.layout.gap_after_section);
        Ok(())
    }

    fn write_medical_history<K: PageCanvas>(
        &self,
        out: &mut Cursor<'_, K>,
        input: &PatientReportInput,
    ) -> Result<(), ReportError> {
        out.heading("Medical History")?;
        out.line(&input.medical_history);
        out.gap(self.layout.gap_after_section);
        Ok(())
    }

    fn write_health_history<K: PageCanvas>(
        &self,
        out: &mut Cursor<'_, K>,
        records: &[HealthRecord],
    ) -> Result<(), ReportError> {
        let layout = &self.layout;
        out.heading("Health History & Vital Signs Timeline")?;
        out.line(&format!("Total Records: {}", records.len()));
        out.gap(layout.gap_after_heading);

        for (i, record) in records.iter().enumerate() {
            out.break_if_past(layout.history_break_at, Block::HistoryRecord(i));

            out.font(FontStyle::Bold, layout.body_font_size)?;
            out.line(&format!(
                "Record {} - {}",
                i + 1,
                strip_raw_timestamp(&record.recorded_at)
            ));
            out.gap(layout.gap_after_record_heading);

            out.font(FontStyle::Normal, layout.body_font_size)?;
            let x = layout.indent_x;
            out.line_at(
                &format!(
                    "Blood Pressure: {}/{} mmHg",
                    record.blood_pressure_systolic, record.blood_pressure_diastolic
                ),
                x,
            );
            out.line_at(&format!("Blood Sugar: {} mg/dL", record.blood_sugar), x);

            let (weight, height) = (record.weight_kg(), record.height_cm());
            if let Some(w) = weight {
                out.line_at(&format!("Weight: {w} kg"), x);
            }
            if let Some(h) = height {
                out.line_at(&format!("Height: {h} cm"), x);
            }
            if let (Some(w), Some(h)) = (weight, height) {
                out.line_at(&compute_bmi(w, h).to_string(), x);
            }
            if let Some(notes) = record.notes_text() {
                out.line_at(&format!("Notes: {notes}"), x);
            }

            let bp = bp_status(record.blood_pressure_systolic, record.blood_pressure_diastolic);
            let sugar = sugar_status(record.blood_sugar);
            out.line_at(&format!("BP Status: {bp} | Sugar Status: {sugar}"), x);
            out.gap(layout.gap_after_record);
        }

        out.gap(layout.gap_after_section);
        Ok(())
    }

    fn write_predictions<K: PageCanvas>(
        &self,
        out: &mut Cursor<'_, K>,
        predictions: &[HealthPrediction],
    ) -> Result<(), ReportError> {
        let layout = &self.layout;
        out.heading("AI Health Analysis")?;

        for (i, prediction) in predictions.iter().enumerate() {
            out.break_if_past(layout.prediction_break_at, Block::Prediction(i));

            out.font(FontStyle::Bold, layout.body_font_size)?;
            let date = self.formatter.format_date(&prediction.created_at);
            out.line(&format!("Analysis {} - {date}", i + 1));
            out.gap(layout.gap_after_record_heading);

            out.font(FontStyle::Normal, layout.body_font_size)?;
            out.line(&format!(
                "Cardiovascular Risk: {}",
                percent(prediction.cardiovascular_risk)
            ));
            out.line(&format!("Diabetes Risk: {}", percent(prediction.diabetes_risk)));
            out.line(&format!(
                "Overall Health Score: {}",
                percent(prediction.overall_health_score)
            ));
            self.write_recommendations(out, &prediction.recommendations);
            out.gap(layout.gap_after_record);
        }
        Ok(())
    }

    fn write_images<K: PageCanvas>(
        &self,
        out: &mut Cursor<'_, K>,
        images: &[MedicalImage],
    ) -> Result<(), ReportError> {
        let layout = &self.layout;
        out.break_if_past(layout.image_section_break_at, Block::ImageSection);
        out.heading("Medical Image Analysis")?;

        for (i, image) in images.iter().enumerate() {
            out.break_if_past(layout.image_break_at, Block::Image(i));

            out.font(FontStyle::Bold, layout.body_font_size)?;
            out.line(&format!(
                "Image {} - {}",
                i + 1,
                image.analysis_type.to_uppercase()
            ));
            out.gap(layout.gap_after_record_heading);

            out.font(FontStyle::Normal, layout.body_font_size)?;
            out.line(&format!("Filename: {}", image.filename));
            let date = self.formatter.format_date(&image.created_at);
            out.line(&format!("Analysis Date: {date}"));
            out.line(&format!("Findings: {}", image.findings));
            self.write_recommendations(out, &image.recommendations);
            out.gap(layout.gap_after_record);
        }
        Ok(())
    }

    fn write_recommendations<K: PageCanvas>(
        &self,
        out: &mut Cursor<'_, K>,
        recommendations: &Recommendations,
    ) {
        if recommendations.is_empty() {
            return;
        }
        out.line("Recommendations:");
        for rec in recommendations {
            out.line_at(&format!("• {rec}"), self.layout.indent_x);
        }
    }

    fn write_footer<K: PageCanvas>(
        &self,
        out: &mut Cursor<'_, K>,
        input: &PatientReportInput,
    ) -> Result<(), ReportError> {
        let layout = &self.layout;
        out.break_if_past(layout.footer_break_at, Block::Footer);
        out.gap(layout.gap_before_footer);

        let generated_on = match input.generated_at.as_deref().filter(|s| !s.is_empty()) {
            Some(at) => self.formatter.format_date_time(at),
            None => self.formatter.format_date_time(&self.clock.now().to_rfc3339()),
        };

        out.font(FontStyle::Italic, layout.footer_font_size)?;
        out.line(&format!("Report generated on: {generated_on}"));
        out.line(&format!("Generated by: {}", input.generated_by));
        out.line(PRODUCT_TAGLINE);
        Ok(())
    }
}

/// Export with the system clock, default locale and default layout.
pub fn export_pdf_report(
    input: &PatientReportInput,
    out_dir: &Path,
) -> Result<PathBuf, ReportError> {
    let compositor = ReportCompositor::with_defaults();
    let canvas = PdfCanvas::new(DOCUMENT_TITLE, compositor.layout())?
        .with_timestamp(compositor.clock().now())?;
    compositor.export(input, canvas, out_dir)
}

// ─── Cursor ───────────────────────────────────────────────────────────────────

/// Vertical write position plus the canvas it writes to. Owned by a single
/// compose call.
struct Cursor<'a, K> {
    canvas: &'a mut K,
    layout: &'a LayoutConfig,
    y: f32,
    breaks: Vec<PageBreak>,
}

impl<'a, K: PageCanvas> Cursor<'a, K> {
    fn new(canvas: &'a mut K, layout: &'a LayoutConfig) -> Self {
        Self {
            canvas,
            layout,
            y: layout.top_margin,
            breaks: Vec::new(),
        }
    }

    fn font(&mut self, style: FontStyle, size: f32) -> Result<(), ReportError> {
        self.canvas.set_font_size(size);
        self.canvas.set_font(style, FONT_FAMILY)
    }

    fn line(&mut self, text: &str) {
        self.line_at(text, self.layout.left_x);
    }

    fn line_at(&mut self, text: &str, x: f32) {
        let lines = self.canvas.wrap_text(text, self.layout.max_line_width);
        self.canvas.draw_text(&lines, x, self.y, self.layout.line_height);
        self.y += lines.len() as f32 * self.layout.line_height;
    }

    fn gap(&mut self, mm: f32) {
        self.y += mm;
    }

    /// Section heading in heading size, then back to the body font.
    fn heading(&mut self, title: &str) -> Result<(), ReportError> {
        self.font(FontStyle::Bold, self.layout.heading_font_size)?;
        self.line(title);
        self.gap(self.layout.gap_after_heading);
        self.font(FontStyle::Normal, self.layout.body_font_size)
    }

    fn break_if_past(&mut self, threshold: f32, before: Block) {
        if self.y <= threshold {
            return;
        }
        self.canvas.new_page();
        let page = self.canvas.page_count();
        tracing::debug!(?before, cursor_y = self.y, page, "Page break");
        self.breaks.push(PageBreak {
            before,
            cursor_y: self.y,
            page,
        });
        self.y = self.layout.top_margin;
    }

    fn finish(self) -> LayoutSummary {
        LayoutSummary {
            pages: self.canvas.page_count(),
            page_breaks: self.breaks,
            final_cursor_y: self.y,
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::TextCanvas;
    use crate::datetime::FixedClock;
    use crate::models::*;
    use chrono::{TimeZone, Utc};

    fn compositor() -> ReportCompositor<FixedClock, LocaleFormatter> {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        ReportCompositor::new(LayoutConfig::default(), clock, LocaleFormatter::default()).unwrap()
    }

    fn minimal_input() -> PatientReportInput {
        PatientReportInput {
            patient_info: PatientInfo {
                id: "P-001".into(),
                name: "Jane Doe".into(),
                age: 42,
                phone: "555-0100".into(),
                weight: None,
                height: None,
                created_at: None,
            },
            vitals: Vitals {
                blood_sugar: 110.0,
                systolic_bp: 122.0,
                diastolic_bp: 78.0,
            },
            medical_history: String::new(),
            health_history: vec![],
            health_predictions: vec![],
            medical_images: vec![],
            generated_by: "Dr. Chen".into(),
            generated_at: Some("2024-05-01T09:30:00Z".into()),
        }
    }

    fn record(systolic: f64, diastolic: f64, sugar: f64) -> HealthRecord {
        HealthRecord {
            blood_pressure_systolic: systolic,
            blood_pressure_diastolic: diastolic,
            blood_sugar: sugar,
            weight: None,
            height: None,
            notes: None,
            recorded_at: "2024-03-01T08:15:30.123Z".into(),
            recorded_by: RecorderId::User(7),
        }
    }

    fn prediction(recommendations: Recommendations) -> HealthPrediction {
        HealthPrediction {
            cardiovascular_risk: 0.123,
            diabetes_risk: 0.4,
            overall_health_score: 0.82,
            recommendations,
            created_at: "2024-02-10T09:00:00Z".into(),
        }
    }

    fn image(recommendations: Recommendations) -> MedicalImage {
        MedicalImage {
            filename: "chest.png".into(),
            analysis_type: "xray".into(),
            findings: "No acute cardiopulmonary process.".into(),
            recommendations,
            created_at: "2024-04-02T12:00:00Z".into(),
        }
    }

    fn full_input() -> PatientReportInput {
        let mut input = minimal_input();
        input.patient_info.weight = Some(70.0);
        input.patient_info.height = Some(175.0);
        input.patient_info.created_at = Some("2024-01-15T10:30:00Z".into());
        input.medical_history = "Hypertension diagnosed 2019.".into();
        input.health_history = vec![record(150.0, 70.0, 150.0)];
        input.health_predictions = vec![prediction(vec!["Walk daily".to_string()].into())];
        input.medical_images = vec![image("Follow up in 6 months".into())];
        input
    }

    fn compose(input: &PatientReportInput) -> (TextCanvas, LayoutSummary) {
        let mut canvas = TextCanvas::new();
        let summary = compositor().compose(input, &mut canvas).unwrap();
        (canvas, summary)
    }

    fn position(canvas: &TextCanvas, prefix: &str) -> usize {
        canvas
            .texts()
            .iter()
            .position(|t| t.starts_with(prefix))
            .unwrap_or_else(|| panic!("missing line: {prefix}"))
    }

    #[test]
    fn section_order() {
        let (canvas, summary) = compose(&full_input());
        let order = [
            REPORT_TITLE,
            "Patient Information",
            "Current Vital Signs",
            "Medical History",
            "Health History & Vital Signs Timeline",
            "AI Health Analysis",
            "Medical Image Analysis",
            "Report generated on:",
        ];
        let positions: Vec<usize> = order.iter().map(|h| position(&canvas, h)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        // The image section starts below 200 mm and moves to page 2.
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.page_breaks[0].before, Block::ImageSection);
    }

    #[test]
    fn empty_sections_omitted() {
        let (canvas, _) = compose(&minimal_input());
        assert!(!canvas.contains("Health History & Vital Signs Timeline"));
        assert!(!canvas.contains("Total Records"));
        assert!(!canvas.contains("AI Health Analysis"));
        assert!(!canvas.contains("Medical Image Analysis"));
        // Always-present sections stay.
        assert!(canvas.contains("Patient Information"));
        assert!(canvas.contains("Current Vital Signs"));
        assert!(canvas.contains("Medical History"));
        assert!(canvas.contains("EHR - Hospital Management System"));
    }

    #[test]
    fn patient_info_lines() {
        let (canvas, _) = compose(&full_input());
        let texts = canvas.texts();
        assert!(texts.contains(&"Patient ID: P-001"));
        assert!(texts.contains(&"Name: Jane Doe"));
        assert!(texts.contains(&"Age: 42 years"));
        assert!(texts.contains(&"Phone: 555-0100"));
        assert!(texts.contains(&"Patient Since: 1/15/2024"));
    }

    #[test]
    fn patient_since_absent_is_na() {
        let (canvas, _) = compose(&minimal_input());
        assert!(canvas.texts().contains(&"Patient Since: N/A"));
    }

    #[test]
    fn vitals_with_bmi() {
        let (canvas, _) = compose(&full_input());
        let texts = canvas.texts();
        assert!(texts.contains(&"Blood Sugar: 110 mg/dL"));
        assert!(texts.contains(&"Blood Pressure: 122/78 mmHg"));
        assert!(texts.contains(&"BMI: 22.9 kg/m² (Normal)"));
        assert!(texts.contains(&"Physical Stats: Weight: 70 kg, Height: 175 cm"));
    }

    #[test]
    fn vitals_weight_only_has_no_bmi() {
        let mut input = minimal_input();
        input.patient_info.weight = Some(82.5);
        let (canvas, _) = compose(&input);
        assert!(!canvas.contains("BMI:"));
        assert!(canvas.texts().contains(&"Physical Stats: Weight: 82.5 kg"));
    }

    #[test]
    fn history_record_block() {
        let mut input = minimal_input();
        let mut r = record(150.0, 70.0, 150.0);
        r.weight = Some(90.0);
        r.height = Some(160.0);
        r.notes = Some("Felt dizzy".into());
        input.health_history = vec![r];

        let (canvas, _) = compose(&input);
        let texts = canvas.texts();
        assert!(texts.contains(&"Total Records: 1"));
        assert!(texts.contains(&"Record 1 - 2024-03-01 08:15:30"));
        assert!(texts.contains(&"Blood Pressure: 150/70 mmHg"));
        assert!(texts.contains(&"Weight: 90 kg"));
        assert!(texts.contains(&"Height: 160 cm"));
        assert!(texts.contains(&"BMI: 35.2 kg/m² (Overweight)"));
        assert!(texts.contains(&"Notes: Felt dizzy"));
        assert!(texts.contains(&"BP Status: High | Sugar Status: Elevated"));

        let (_, heading) = canvas.find("Record 1").unwrap();
        assert_eq!(heading.style, FontStyle::Bold);
        assert_eq!(heading.x, 20.0);
        let (_, body) = canvas.find("BP Status").unwrap();
        assert_eq!(body.style, FontStyle::Normal);
        assert_eq!(body.x, 25.0);
    }

    #[test]
    fn history_order_preserved() {
        let mut input = minimal_input();
        let mut later = record(110.0, 70.0, 100.0);
        later.recorded_at = "2024-06-01T00:00:00Z".into();
        let mut earlier = record(110.0, 70.0, 100.0);
        earlier.recorded_at = "2023-01-01T00:00:00Z".into();
        input.health_history = vec![later, earlier];

        let (canvas, _) = compose(&input);
        assert!(canvas.texts().contains(&"Record 1 - 2024-06-01 00:00:00"));
        assert!(canvas.texts().contains(&"Record 2 - 2023-01-01 00:00:00"));
    }

    #[test]
    fn malformed_timestamps_render_na_and_continue() {
        let mut input = full_input();
        input.health_history[0].recorded_at = "not-a-date".into();
        input.health_predictions[0].created_at = "not-a-date".into();
        input.medical_images[0].created_at = "not-a-date".into();
        input.generated_at = Some("not-a-date".into());

        let (canvas, _) = compose(&input);
        let texts = canvas.texts();
        assert!(texts.contains(&"Record 1 - N/A"));
        assert!(texts.contains(&"Analysis 1 - N/A"));
        assert!(texts.contains(&"Analysis Date: N/A"));
        assert!(texts.contains(&"Report generated on: N/A"));
        assert!(texts.contains(&"Generated by: Dr. Chen"));
    }

    #[test]
    fn prediction_block() {
        let mut input = minimal_input();
        input.health_predictions = vec![prediction(
            vec!["Walk daily".to_string(), "Cut sugar".to_string()].into(),
        )];
        let (canvas, _) = compose(&input);
        let texts = canvas.texts();
        assert!(texts.contains(&"Analysis 1 - 2/10/2024"));
        assert!(texts.contains(&"Cardiovascular Risk: 12.3%"));
        assert!(texts.contains(&"Diabetes Risk: 40.0%"));
        assert!(texts.contains(&"Overall Health Score: 82.0%"));
        assert!(texts.contains(&"Recommendations:"));
        assert!(texts.contains(&"• Walk daily"));
        assert!(texts.contains(&"• Cut sugar"));
        let (_, bullet) = canvas.find("• Cut sugar").unwrap();
        assert_eq!(bullet.x, 25.0);
    }

    #[test]
    fn prediction_without_recommendations() {
        let mut input = minimal_input();
        input.health_predictions = vec![prediction(Recommendations::default())];
        let (canvas, _) = compose(&input);
        assert!(!canvas.contains("Recommendations:"));
    }

    #[test]
    fn empty_string_recommendation_prints_no_section() {
        let mut input = minimal_input();
        let empty: Recommendations = serde_json::from_str(r#""""#).unwrap();
        input.health_predictions = vec![prediction(empty.clone())];
        input.medical_images = vec![image(empty)];
        let (canvas, _) = compose(&input);
        assert!(!canvas.contains("Recommendations:"));
        assert!(!canvas.contains("•"));
    }

    #[test]
    fn image_block() {
        let mut input = minimal_input();
        input.medical_images = vec![image("Follow up in 6 months".into())];
        let (canvas, _) = compose(&input);
        let texts = canvas.texts();
        assert!(texts.contains(&"Image 1 - XRAY"));
        assert!(texts.contains(&"Filename: chest.png"));
        assert!(texts.contains(&"Analysis Date: 4/2/2024"));
        assert!(texts.contains(&"Findings: No acute cardiopulmonary process."));
        assert!(texts.contains(&"• Follow up in 6 months"));
    }

    #[test]
    fn single_recommendation_matches_list() {
        let mut single = minimal_input();
        single.health_predictions = vec![prediction("Reduce salt".into())];
        single.medical_images = vec![image("Reduce salt".into())];

        let mut listed = minimal_input();
        listed.health_predictions = vec![prediction(vec!["Reduce salt".to_string()].into())];
        listed.medical_images = vec![image(vec!["Reduce salt".to_string()].into())];

        let (a, _) = compose(&single);
        let (b, _) = compose(&listed);
        assert_eq!(a.render(), b.render());
        assert_eq!(a.texts().iter().filter(|t| t.starts_with('•')).count(), 2);
    }

    #[test]
    fn footer_uses_generated_at() {
        let (canvas, _) = compose(&minimal_input());
        assert!(canvas
            .texts()
            .contains(&"Report generated on: 5/1/2024, 9:30:00 AM"));
        let (_, line) = canvas.find("Report generated on").unwrap();
        assert_eq!(line.style, FontStyle::Italic);
        assert_eq!(line.font_size, 10.0);
    }

    #[test]
    fn footer_falls_back_to_clock() {
        let mut input = minimal_input();
        input.generated_at = None;
        let (canvas, _) = compose(&input);
        assert!(canvas
            .texts()
            .contains(&"Report generated on: 5/1/2024, 12:00:00 PM"));
    }

    #[test]
    fn title_font() {
        let (canvas, _) = compose(&minimal_input());
        let (page, title) = canvas.find(REPORT_TITLE).unwrap();
        assert_eq!(page, 0);
        assert_eq!(title.y, 20.0);
        assert_eq!(title.font_size, 20.0);
        assert_eq!(title.style, FontStyle::Bold);
    }

    // Default geometry: the timeline's first record starts at y=155 and a
    // bare record (no weight/height/notes) is 31 mm tall, so records begin at
    // 155, 186, 217, 248, 279. The fifth is the first past the 250 threshold.

    #[test]
    fn history_breaks_exactly_at_threshold_crossing() {
        let mut input = minimal_input();
        input.health_history = (0..5).map(|_| record(110.0, 70.0, 100.0)).collect();

        let (canvas, summary) = compose(&input);
        assert_eq!(
            summary.page_breaks,
            vec![PageBreak {
                before: Block::HistoryRecord(4),
                cursor_y: 279.0,
                page: 2,
            }]
        );
        assert_eq!(summary.pages, 2);

        let (page, fourth) = canvas.find("Record 4").unwrap();
        assert_eq!((page, fourth.y), (0, 248.0));
        let (page, fifth) = canvas.find("Record 5").unwrap();
        assert_eq!((page, fifth.y), (1, 20.0));
    }

    #[test]
    fn history_breaks_on_each_full_page() {
        let mut input = minimal_input();
        input.health_history = (0..13).map(|_| record(110.0, 70.0, 100.0)).collect();

        let (canvas, summary) = compose(&input);
        let breaks: Vec<Block> = summary
            .page_breaks
            .iter()
            .map(|b| b.before)
            .filter(|b| matches!(b, Block::HistoryRecord(_)))
            .collect();
        // Continuation pages start at 20: records at 20, 51, ..., 237, then 268.
        assert_eq!(breaks, vec![Block::HistoryRecord(4), Block::HistoryRecord(12)]);
        assert_eq!(canvas.find("Record 12").map(|(p, l)| (p, l.y)), Some((1, 237.0)));
        assert_eq!(canvas.find("Record 13").map(|(p, l)| (p, l.y)), Some((2, 20.0)));
    }

    #[test]
    fn block_may_run_past_page_bottom() {
        let mut input = minimal_input();
        let mut records: Vec<HealthRecord> = (0..4).map(|_| record(110.0, 70.0, 100.0)).collect();
        records[3].notes = Some("line\n".repeat(20).trim_end().to_string());
        input.health_history = records;

        let (canvas, summary) = compose(&input);
        // Record 4 starts at 248 (not past 250) and is drawn whole on page 1.
        assert!(summary
            .page_breaks
            .iter()
            .all(|b| !matches!(b.before, Block::HistoryRecord(_))));
        let last = canvas.pages()[0]
            .lines
            .iter()
            .filter(|l| l.text.starts_with("BP Status"))
            .last()
            .unwrap();
        assert!(last.y > 297.0, "status line at {}", last.y);
    }

    #[test]
    fn image_section_break_before_heading() {
        let mut input = minimal_input();
        // Two records end the timeline at 217, +10 → 227 > 200.
        input.health_history = (0..2).map(|_| record(110.0, 70.0, 100.0)).collect();
        input.medical_images = vec![image(Recommendations::default())];

        let (canvas, summary) = compose(&input);
        assert_eq!(summary.page_breaks[0].before, Block::ImageSection);
        assert_eq!(summary.page_breaks[0].cursor_y, 227.0);
        let (page, heading) = canvas.find("Medical Image Analysis").unwrap();
        assert_eq!((page, heading.y), (1, 20.0));
        let (page, first) = canvas.find("Image 1").unwrap();
        assert_eq!((page, first.y), (1, 30.0));
    }

    #[test]
    fn image_record_threshold() {
        let mut input = minimal_input();
        // Heading at 135 → records from 145. Bare image block: 5+3+15+8 = 31.
        // Starts 145, 176, 207, 238 → fourth is past 230.
        input.medical_images = (0..4).map(|_| image(Recommendations::default())).collect();

        let (canvas, summary) = compose(&input);
        assert_eq!(summary.page_breaks[0].before, Block::Image(3));
        assert_eq!(canvas.find("Image 3").map(|(p, l)| (p, l.y)), Some((0, 207.0)));
        assert_eq!(canvas.find("Image 4").map(|(p, l)| (p, l.y)), Some((1, 20.0)));
    }

    #[test]
    fn prediction_threshold() {
        let mut input = minimal_input();
        // Heading at 135 → blocks from 145. Bare prediction: 5+3+15+8 = 31.
        // Starts 145, 176, 207, 238, 269 → fifth is past 250.
        input.health_predictions = (0..5)
            .map(|_| prediction(Recommendations::default()))
            .collect();

        let (canvas, summary) = compose(&input);
        assert_eq!(summary.page_breaks[0].before, Block::Prediction(4));
        assert_eq!(canvas.find("Analysis 4").map(|(p, l)| (p, l.y)), Some((0, 238.0)));
        assert_eq!(canvas.find("Analysis 5").map(|(p, l)| (p, l.y)), Some((1, 20.0)));
    }

    #[test]
    fn footer_break() {
        let mut input = minimal_input();
        // Four records end at 279, +10 → 289 > 250.
        input.health_history = (0..4).map(|_| record(110.0, 70.0, 100.0)).collect();

        let (canvas, summary) = compose(&input);
        assert_eq!(summary.page_breaks.len(), 1);
        assert_eq!(summary.page_breaks[0].before, Block::Footer);
        let (page, line) = canvas.find("Report generated on").unwrap();
        assert_eq!((page, line.y), (1, 40.0));
        // Three footer lines after it.
        assert_eq!(summary.final_cursor_y, 55.0);
    }

    #[test]
    fn deterministic_output() {
        let input = full_input();
        let mut a = TextCanvas::new();
        let mut b = TextCanvas::new();
        compositor().compose(&input, &mut a).unwrap();
        compositor().compose(&input, &mut b).unwrap();
        assert_eq!(a.into_bytes().unwrap(), b.into_bytes().unwrap());
    }

    #[test]
    fn contract_violation_draws_nothing() {
        let mut input = minimal_input();
        input.generated_by = String::new();
        let mut canvas = TextCanvas::new();
        let err = compositor().compose(&input, &mut canvas).unwrap_err();
        assert!(matches!(err, ReportError::MissingField("generatedBy")));
        assert!(canvas.texts().is_empty());
    }

    #[test]
    fn nan_vital_rejected() {
        let mut input = minimal_input();
        input.vitals.blood_sugar = f64::NAN;
        let mut canvas = TextCanvas::new();
        assert!(matches!(
            compositor().compose(&input, &mut canvas),
            Err(ReportError::NonFinite { .. })
        ));
    }

    #[test]
    fn report_filename_format() {
        assert_eq!(report_filename("P-001", "pdf"), "patient_P-001_report.pdf");
    }

    #[test]
    fn export_text_report() {
        let tmp = tempfile::tempdir().unwrap();
        let out_dir = tmp.path().join("exports");
        let path = compositor()
            .export(&full_input(), TextCanvas::new(), &out_dir)
            .unwrap();

        assert_eq!(path, out_dir.join("patient_P-001_report.txt"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("PATIENT MEDICAL REPORT"));
        assert!(text.contains("Generated by: Dr. Chen"));
    }

    #[test]
    fn export_pdf_report_writes_pdf() {
        let tmp = tempfile::tempdir().unwrap();
        let path = export_pdf_report(&full_input(), tmp.path()).unwrap();
        assert!(path.ends_with("patient_P-001_report.pdf"));
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn export_invalid_input_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut input = minimal_input();
        input.patient_info.id = String::new();
        assert!(compositor()
            .export(&input, TextCanvas::new(), tmp.path())
            .is_err());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn rejects_invalid_layout() {
        let layout = LayoutConfig {
            line_height: -1.0,
            ..LayoutConfig::default()
        };
        assert!(ReportCompositor::new(layout, SystemClock, LocaleFormatter::default()).is_err());
    }
}
