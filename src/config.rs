use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Application-level constants
pub const APP_NAME: &str = "EHR";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Last footer line of every report.
pub const PRODUCT_TAGLINE: &str = "EHR - Hospital Management System";

/// Filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "ehr_report=info"
}

/// Get the application data directory
/// ~/EHR/ when a home directory is known, ./EHR otherwise
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default destination for exported reports
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

// ═══════════════════════════════════════════════════════════
// Report configuration
// ═══════════════════════════════════════════════════════════

/// Page geometry, spacing and pagination thresholds. All distances are in
/// millimetres measured down from the top of the page; font sizes in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub top_margin: f32,
    /// x of headings and top-level lines.
    pub left_x: f32,
    /// x of record bodies and bullet lines.
    pub indent_x: f32,
    /// Wrap width, shared by both indent levels.
    pub max_line_width: f32,
    /// Cursor advance per wrapped line, regardless of font size.
    pub line_height: f32,

    pub title_font_size: f32,
    pub heading_font_size: f32,
    pub body_font_size: f32,
    pub footer_font_size: f32,

    pub gap_after_title: f32,
    pub gap_after_heading: f32,
    pub gap_after_section: f32,
    pub gap_after_record_heading: f32,
    pub gap_after_record: f32,
    pub gap_before_footer: f32,

    pub history_break_at: f32,
    pub prediction_break_at: f32,
    /// Checked once before the image section heading.
    pub image_section_break_at: f32,
    pub image_break_at: f32,
    pub footer_break_at: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            top_margin: 20.0,
            left_x: 20.0,
            indent_x: 25.0,
            max_line_width: 180.0,
            line_height: 5.0,

            title_font_size: 20.0,
            heading_font_size: 16.0,
            body_font_size: 12.0,
            footer_font_size: 10.0,

            gap_after_title: 10.0,
            gap_after_heading: 5.0,
            gap_after_section: 10.0,
            gap_after_record_heading: 3.0,
            gap_after_record: 8.0,
            gap_before_footer: 20.0,

            history_break_at: 250.0,
            prediction_break_at: 250.0,
            image_section_break_at: 200.0,
            image_break_at: 230.0,
            footer_break_at: 250.0,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ReportError> {
        if !(self.line_height > 0.0) {
            return Err(ReportError::Config(format!(
                "line_height must be positive, got {}",
                self.line_height
            )));
        }
        if !(self.max_line_width > 0.0) || self.max_line_width > self.page_width {
            return Err(ReportError::Config(format!(
                "max_line_width {} does not fit page width {}",
                self.max_line_width, self.page_width
            )));
        }
        if !(self.top_margin >= 0.0) || self.top_margin >= self.page_height {
            return Err(ReportError::Config(format!(
                "top_margin {} outside page height {}",
                self.top_margin, self.page_height
            )));
        }
        let thresholds = [
            ("history_break_at", self.history_break_at),
            ("prediction_break_at", self.prediction_break_at),
            ("image_section_break_at", self.image_section_break_at),
            ("image_break_at", self.image_break_at),
            ("footer_break_at", self.footer_break_at),
        ];
        for (name, value) in thresholds {
            if !(value > self.top_margin && value < self.page_height) {
                return Err(ReportError::Config(format!(
                    "{name} {value} must lie between top margin {} and page height {}",
                    self.top_margin, self.page_height
                )));
            }
        }
        Ok(())
    }
}

/// Date rendering. Patterns are chrono `strftime` strings; the defaults
/// read like en-US `toLocaleDateString` / `toLocaleString`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    pub date_format: String,
    pub date_time_format: String,
    pub utc_offset_minutes: i32,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            date_format: "%-m/%-d/%Y".into(),
            date_time_format: "%-m/%-d/%Y, %-I:%M:%S %p".into(),
            utc_offset_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub layout: LayoutConfig,
    pub locale: LocaleConfig,
}

impl ReportConfig {
    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ReportError> {
        let raw = std::fs::read_to_string(path)?;
        let config: ReportConfig = serde_json::from_str(&raw)?;
        config.layout.validate()?;
        tracing::debug!(path = %path.display(), "Loaded report configuration");
        Ok(config)
    }
}
