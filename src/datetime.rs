//! Time and date-formatting capabilities injected into the compositor.
//!
//! Wall-clock time and locale date strings are the only non-deterministic
//! inputs of a report, so both come in through traits: [`Clock`] and
//! [`DateFormatter`]. Every field render yields a [`FieldText`]; a missing or
//! unparseable timestamp becomes [`FieldText::Unavailable`] ("N/A") instead of
//! an error.

use std::fmt::{self, Write as _};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

use crate::config::LocaleConfig;
use crate::error::ReportError;

pub const NOT_AVAILABLE: &str = "N/A";

/// Outcome of rendering one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldText {
    Text(String),
    Unavailable,
}

impl fmt::Display for FieldText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldText::Text(s) => f.write_str(s),
            FieldText::Unavailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

// ─── Clock ────────────────────────────────────────────────────────────────────

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ─── Parsing ──────────────────────────────────────────────────────────────────

/// An ISO-8601 timestamp as found in client payloads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timestamp {
    /// Carries `Z` or an explicit offset.
    Zoned(DateTime<FixedOffset>),
    /// No offset: wall-clock time in the reader's zone.
    Local(NaiveDateTime),
    /// Date only, taken as midnight UTC.
    DateOnly(NaiveDate),
}

pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(Timestamp::Zoned(dt));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(Timestamp::Local(naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(Timestamp::DateOnly)
}

/// Raw timestamp for timeline headings: first `T` becomes a space, first `Z`
/// is dropped, fractional seconds are cut. No locale conversion.
/// `2024-03-01T08:15:30.123Z` → `2024-03-01 08:15:30`.
pub fn strip_raw_timestamp(raw: &str) -> FieldText {
    if parse_timestamp(raw).is_none() {
        if !raw.is_empty() {
            tracing::debug!(value = raw, "Unparseable timeline timestamp");
        }
        return FieldText::Unavailable;
    }
    let stripped = raw.replacen('T', " ", 1).replacen('Z', "", 1);
    let head = stripped.split('.').next().unwrap_or_default();
    FieldText::Text(head.to_string())
}

// ─── Formatting ───────────────────────────────────────────────────────────────

pub trait DateFormatter: Send + Sync {
    fn format_date(&self, iso: &str) -> FieldText;
    fn format_date_time(&self, iso: &str) -> FieldText;
}

/// chrono-pattern formatter pinned to a fixed UTC offset.
#[derive(Debug, Clone)]
pub struct LocaleFormatter {
    date_pattern: String,
    date_time_pattern: String,
    offset: FixedOffset,
}

impl LocaleFormatter {
    pub fn new(
        date_pattern: impl Into<String>,
        date_time_pattern: impl Into<String>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            date_pattern: date_pattern.into(),
            date_time_pattern: date_time_pattern.into(),
            offset,
        }
    }

    pub fn from_config(config: &LocaleConfig) -> Result<Self, ReportError> {
        let offset = config
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ReportError::Config(format!(
                    "UTC offset out of range: {} minutes",
                    config.utc_offset_minutes
                ))
            })?;
        check_pattern(&config.date_format)?;
        check_pattern(&config.date_time_format)?;
        Ok(Self::new(
            config.date_format.clone(),
            config.date_time_format.clone(),
            offset,
        ))
    }

    fn localize(&self, ts: Timestamp) -> Option<DateTime<FixedOffset>> {
        match ts {
            Timestamp::Zoned(dt) => Some(dt.with_timezone(&self.offset)),
            Timestamp::Local(naive) => self.offset.from_local_datetime(&naive).single(),
            Timestamp::DateOnly(date) => {
                let midnight = date.and_hms_opt(0, 0, 0)?;
                Some(Utc.from_utc_datetime(&midnight).with_timezone(&self.offset))
            }
        }
    }

    fn render(&self, iso: &str, pattern: &str) -> FieldText {
        match parse_timestamp(iso).and_then(|ts| self.localize(ts)) {
            Some(dt) => {
                let mut out = String::new();
                match write!(out, "{}", dt.format(pattern)) {
                    Ok(()) => FieldText::Text(out),
                    Err(_) => {
                        tracing::warn!(pattern, "Invalid date pattern rendered as N/A");
                        FieldText::Unavailable
                    }
                }
            }
            None => {
                if !iso.is_empty() {
                    tracing::debug!(value = iso, "Unparseable timestamp rendered as N/A");
                }
                FieldText::Unavailable
            }
        }
    }
}

fn check_pattern(pattern: &str) -> Result<(), ReportError> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(ReportError::Config(format!("invalid date pattern: {pattern:?}")));
    }
    Ok(())
}

impl Default for LocaleFormatter {
    fn default() -> Self {
        let config = LocaleConfig::default();
        Self::new(config.date_format, config.date_time_format, Utc.fix())
    }
}

impl DateFormatter for LocaleFormatter {
    fn format_date(&self, iso: &str) -> FieldText {
        self.render(iso, &self.date_pattern)
    }

    fn format_date_time(&self, iso: &str) -> FieldText {
        self.render(iso, &self.date_time_pattern)
    }
}
