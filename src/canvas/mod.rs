//! Page canvas capability used by the compositor.
//!
//! The compositor only ever talks to [`PageCanvas`]; it never touches a PDF
//! API directly. Two backends:
//! - [`PdfCanvas`]: printpdf, builtin fonts, A4 by default
//! - [`TextCanvas`]: records every placed line; plain-text output

pub mod pdf;
pub mod text;

pub use pdf::PdfCanvas;
pub use text::{PlacedLine, TextCanvas, TextPage};

use std::path::Path;

use crate::error::ReportError;

const PT_TO_MM: f32 = 0.352_778;
/// Average glyph advance as a fraction of the font size (Helvetica-ish).
const AVG_GLYPH_EM: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Helvetica,
    Times,
    Courier,
}

pub trait PageCanvas {
    fn set_font(&mut self, style: FontStyle, family: FontFamily) -> Result<(), ReportError>;

    fn set_font_size(&mut self, points: f32);

    /// Split `text` into lines no wider than `max_width` mm at the current
    /// font size. Always returns at least one line.
    fn wrap_text(&self, text: &str, max_width: f32) -> Vec<String>;

    /// Draw `lines` with the first baseline at `y` (mm from the page top),
    /// each following line `line_height` lower.
    fn draw_text(&mut self, lines: &[String], x: f32, y: f32, line_height: f32);

    fn new_page(&mut self);

    fn page_count(&self) -> usize;

    /// File extension of the serialized document, without the dot.
    fn extension(&self) -> &'static str;

    fn into_bytes(self) -> Result<Vec<u8>, ReportError>
    where
        Self: Sized;

    fn save(self, path: &Path) -> Result<(), ReportError>
    where
        Self: Sized,
    {
        let bytes = self.into_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// How many characters fit in `max_width` mm at `font_size` pt.
pub fn chars_per_line(max_width: f32, font_size: f32) -> usize {
    let glyph_mm = font_size * PT_TO_MM * AVG_GLYPH_EM;
    if glyph_mm <= 0.0 {
        return usize::MAX;
    }
    ((max_width / glyph_mm).floor() as usize).max(1)
}

/// Word-wrap helper shared by the backends. Explicit newlines are kept as
/// line breaks; words longer than a line are split.
pub fn wrap_to_width(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let max_chars = chars_per_line(max_width, font_size);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph.trim_end_matches('\r'), max_chars, &mut lines);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn wrap_paragraph(paragraph: &str, max_chars: usize, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0;

    for word in paragraph.split_whitespace() {
        let mut word_len = word.chars().count();
        let mut rest = word;
        while word_len > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let split = rest
                .char_indices()
                .nth(max_chars)
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            lines.push(rest[..split].to_string());
            rest = &rest[split..];
            word_len -= max_chars;
        }
        if rest.is_empty() {
            continue;
        }
        if current_len + word_len + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(rest);
        current_len += word_len;
    }
    if !current.is_empty() || paragraph.trim().is_empty() {
        lines.push(current);
    }
}
