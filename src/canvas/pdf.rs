//! PDF backend via `printpdf` builtin fonts.
//!
//! printpdf measures y from the page bottom; the canvas contract measures
//! from the top, so every draw flips against the page height.

use std::collections::HashMap;
use std::io::BufWriter;

use chrono::{DateTime, Utc};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use super::{wrap_to_width, FontFamily, FontStyle, PageCanvas};
use crate::config::LayoutConfig;
use crate::error::ReportError;

const LAYER_NAME: &str = "Layer 1";

pub struct PdfCanvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    page_width: f32,
    page_height: f32,
    fonts: HashMap<(FontFamily, FontStyle), IndirectFontRef>,
    font: IndirectFontRef,
    font_size: f32,
    pages: usize,
}

impl PdfCanvas {
    /// New single-page document sized from `layout`, Helvetica 12 pt selected.
    pub fn new(title: &str, layout: &LayoutConfig) -> Result<Self, ReportError> {
        let (doc, page1, layer1) = PdfDocument::new(
            title,
            Mm(layout.page_width),
            Mm(layout.page_height),
            LAYER_NAME,
        );
        let layer = doc.get_page(page1).get_layer(layer1);
        let font = load_font(&doc, FontFamily::Helvetica, FontStyle::Normal)?;
        let mut fonts = HashMap::new();
        fonts.insert((FontFamily::Helvetica, FontStyle::Normal), font.clone());

        Ok(Self {
            doc,
            layer,
            page_width: layout.page_width,
            page_height: layout.page_height,
            fonts,
            font,
            font_size: layout.body_font_size,
            pages: 1,
        })
    }

    /// Pin document id and metadata dates so output does not depend on the
    /// wall clock at save time.
    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Result<Self, ReportError> {
        let when = time::OffsetDateTime::from_unix_timestamp(at.timestamp())
            .map_err(|e| ReportError::Canvas(format!("PDF date error: {e}")))?;
        self.doc = self
            .doc
            .with_document_id(format!("ehr-report-{}", at.timestamp()))
            .with_creation_date(when)
            .with_mod_date(when)
            .with_metadata_date(when);
        Ok(self)
    }
}

fn builtin(family: FontFamily, style: FontStyle) -> BuiltinFont {
    match (family, style) {
        (FontFamily::Helvetica, FontStyle::Normal) => BuiltinFont::Helvetica,
        (FontFamily::Helvetica, FontStyle::Bold) => BuiltinFont::HelveticaBold,
        (FontFamily::Helvetica, FontStyle::Italic) => BuiltinFont::HelveticaOblique,
        (FontFamily::Times, FontStyle::Normal) => BuiltinFont::TimesRoman,
        (FontFamily::Times, FontStyle::Bold) => BuiltinFont::TimesBold,
        (FontFamily::Times, FontStyle::Italic) => BuiltinFont::TimesItalic,
        (FontFamily::Courier, FontStyle::Normal) => BuiltinFont::Courier,
        (FontFamily::Courier, FontStyle::Bold) => BuiltinFont::CourierBold,
        (FontFamily::Courier, FontStyle::Italic) => BuiltinFont::CourierOblique,
    }
}

fn load_font(
    doc: &PdfDocumentReference,
    family: FontFamily,
    style: FontStyle,
) -> Result<IndirectFontRef, ReportError> {
    doc.add_builtin_font(builtin(family, style))
        .map_err(|e| ReportError::Canvas(format!("PDF font error: {e}")))
}

impl PageCanvas for PdfCanvas {
    fn set_font(&mut self, style: FontStyle, family: FontFamily) -> Result<(), ReportError> {
        let font = match self.fonts.get(&(family, style)) {
            Some(font) => font.clone(),
            None => {
                let font = load_font(&self.doc, family, style)?;
                self.fonts.insert((family, style), font.clone());
                font
            }
        };
        self.font = font;
        Ok(())
    }

    fn set_font_size(&mut self, points: f32) {
        self.font_size = points;
    }

    fn wrap_text(&self, text: &str, max_width: f32) -> Vec<String> {
        wrap_to_width(text, max_width, self.font_size)
    }

    fn draw_text(&mut self, lines: &[String], x: f32, y: f32, line_height: f32) {
        for (i, line) in lines.iter().enumerate() {
            let baseline = y + i as f32 * line_height;
            self.layer.use_text(
                line.as_str(),
                self.font_size,
                Mm(x),
                Mm(self.page_height - baseline),
                &self.font,
            );
        }
    }

    fn new_page(&mut self) {
        let (page, layer) =
            self.doc
                .add_page(Mm(self.page_width), Mm(self.page_height), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages += 1;
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn into_bytes(self) -> Result<Vec<u8>, ReportError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| ReportError::Canvas(format!("PDF save error: {e}")))?;
        buf.into_inner()
            .map_err(|e| ReportError::Canvas(format!("PDF buffer error: {e}")))
    }
}
