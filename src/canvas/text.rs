//! Plain-text backend. Keeps every placed line with its position and font so
//! layout can be inspected; serializes to text with form feeds between pages.

use super::{wrap_to_width, FontFamily, FontStyle, PageCanvas};
use crate::error::ReportError;

/// Millimetres per output column when turning x positions into indentation.
const MM_PER_COLUMN: f32 = 2.5;
const PAGE_SEPARATOR: char = '\u{c}';

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub style: FontStyle,
    pub family: FontFamily,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPage {
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone)]
pub struct TextCanvas {
    pages: Vec<TextPage>,
    style: FontStyle,
    family: FontFamily,
    font_size: f32,
}

impl Default for TextCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCanvas {
    pub fn new() -> Self {
        Self {
            pages: vec![TextPage::default()],
            style: FontStyle::Normal,
            family: FontFamily::Helvetica,
            font_size: 12.0,
        }
    }

    pub fn pages(&self) -> &[TextPage] {
        &self.pages
    }

    /// First line whose text starts with `prefix`, with its 0-based page.
    pub fn find(&self, prefix: &str) -> Option<(usize, &PlacedLine)> {
        self.pages.iter().enumerate().find_map(|(page, p)| {
            p.lines
                .iter()
                .find(|l| l.text.starts_with(prefix))
                .map(|l| (page, l))
        })
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.find(prefix).is_some()
    }

    /// All line texts in draw order, pages concatenated.
    pub fn texts(&self) -> Vec<&str> {
        self.pages
            .iter()
            .flat_map(|p| p.lines.iter().map(|l| l.text.as_str()))
            .collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                out.push(PAGE_SEPARATOR);
                out.push('\n');
            }
            for line in &page.lines {
                let indent = (line.x / MM_PER_COLUMN).round().max(0.0) as usize;
                out.extend(std::iter::repeat(' ').take(indent));
                out.push_str(&line.text);
                out.push('\n');
            }
        }
        out
    }
}

impl PageCanvas for TextCanvas {
    fn set_font(&mut self, style: FontStyle, family: FontFamily) -> Result<(), ReportError> {
        self.style = style;
        self.family = family;
        Ok(())
    }

    fn set_font_size(&mut self, points: f32) {
        self.font_size = points;
    }

    fn wrap_text(&self, text: &str, max_width: f32) -> Vec<String> {
        wrap_to_width(text, max_width, self.font_size)
    }

    fn draw_text(&mut self, lines: &[String], x: f32, y: f32, line_height: f32) {
        let (style, family, font_size) = (self.style, self.family, self.font_size);
        if let Some(page) = self.pages.last_mut() {
            for (i, text) in lines.iter().enumerate() {
                page.lines.push(PlacedLine {
                    text: text.clone(),
                    x,
                    y: y + i as f32 * line_height,
                    font_size,
                    style,
                    family,
                });
            }
        }
    }

    fn new_page(&mut self) {
        self.pages.push(TextPage::default());
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn into_bytes(self) -> Result<Vec<u8>, ReportError> {
        Ok(self.render().into_bytes())
    }
}
