//! Embedded page text rebuilt from the page content stream.
//!
//! Text-showing operators are walked in stream order while the text line
//! matrix is tracked, so a new output line starts whenever the baseline
//! moves (`Td`/`TD`/`Tm`) or a next-line operator (`T*`, `'`, `"`) runs.
//! Font encodings are resolved only for the font a show operator actually
//! uses; a font lopdf cannot decode falls back to plain byte decoding.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

/// Baseline movement (text space units) still treated as the same line.
const LINE_TOLERANCE: f32 = 1.0;

/// Negative `TJ` adjustment (thousandths of an em) rendered as a space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Extract the text of one page, one output line per text line.
pub(crate) fn page_text(doc: &LopdfDocument, page_id: ObjectId) -> Result<String> {
    let data = page_content(doc, page_id)?;
    let content = Content::decode(&data).map_err(|e| Error::PdfParse(e.to_string()))?;

    let fonts = doc.get_page_fonts(page_id).unwrap_or_else(|e| {
        log::warn!("Unreadable font resources: {}", e);
        BTreeMap::new()
    });

    let mut matrix = LineMatrix::default();
    let mut lines = LineWriter::default();
    let mut font: Option<&Dictionary> = None;

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                // Leading is text state and survives BT.
                matrix = LineMatrix {
                    leading: matrix.leading,
                    ..LineMatrix::default()
                };
                lines.gap();
            }
            "Tf" => {
                if let Some(Object::Name(name)) = op.operands.first() {
                    font = fonts.get(name).copied();
                }
            }
            "TL" => {
                if let Some(leading) = op.operands.first().and_then(number) {
                    matrix.leading = leading;
                }
            }
            "Td" | "TD" => {
                let tx = op.operands.first().and_then(number).unwrap_or(0.0);
                let ty = op.operands.get(1).and_then(number).unwrap_or(0.0);
                if op.operator == "TD" {
                    matrix.leading = -ty;
                }
                matrix.translate(tx, ty);
                if tx != 0.0 {
                    lines.gap();
                }
            }
            "Tm" => {
                let values: Vec<f32> = op.operands.iter().filter_map(number).collect();
                if let [a, b, c, d, e, f] = values[..] {
                    matrix.set(a, b, c, d, e, f);
                    lines.gap();
                }
            }
            "T*" => {
                matrix.next_line();
                lines.break_line();
            }
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    lines.show(matrix.y(), &decode(doc, font, bytes));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    let mut text = String::new();
                    for item in items {
                        match item {
                            Object::String(bytes, _) => text.push_str(&decode(doc, font, bytes)),
                            other => {
                                if let Some(adjustment) = number(other) {
                                    if -adjustment > TJ_SPACE_THRESHOLD && !text.ends_with(' ') {
                                        text.push(' ');
                                    }
                                }
                            }
                        }
                    }
                    lines.show(matrix.y(), &text);
                }
            }
            "'" | "\"" => {
                matrix.next_line();
                lines.break_line();
                let index = if op.operator == "\"" { 2 } else { 0 };
                if let Some(Object::String(bytes, _)) = op.operands.get(index) {
                    lines.show(matrix.y(), &decode(doc, font, bytes));
                }
            }
            _ => {}
        }
    }

    Ok(lines.finish())
}

/// Concatenated, decompressed content streams of a page.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    // A page without Contents is blank.
    let contents = match page.get(b"Contents") {
        Ok(contents) => contents,
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(r) => stream_content(doc, *r),
        Object::Array(parts) => {
            let mut content = Vec::new();
            for part in parts {
                if let Object::Reference(r) = part {
                    content.extend(stream_content(doc, *r)?);
                    content.push(b' ');
                }
            }
            Ok(content)
        }
        _ => Err(Error::PdfParse("Invalid content stream".to_string())),
    }
}

fn stream_content(doc: &LopdfDocument, id: ObjectId) -> Result<Vec<u8>> {
    match doc.get_object(id) {
        // Unfiltered streams have nothing to decompress.
        Ok(Object::Stream(s)) => Ok(s.decompressed_content().unwrap_or_else(|_| s.content.clone())),
        Ok(_) => Err(Error::PdfParse("Invalid content stream".to_string())),
        Err(e) => Err(Error::PdfParse(e.to_string())),
    }
}

/// Decode a shown string with the current font, if its encoding is usable.
fn decode(doc: &LopdfDocument, font: Option<&Dictionary>, bytes: &[u8]) -> String {
    match font.and_then(|f| f.get_font_encoding(doc).ok()) {
        Some(ref encoding) => LopdfDocument::decode_text(encoding, bytes)
            .unwrap_or_else(|_| decode_text_simple(bytes)),
        None => decode_text_simple(bytes),
    }
}

/// Decode raw string bytes: UTF-16BE with BOM, then UTF-8, then Latin-1.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Text line matrix, reduced to what baseline tracking needs.
struct LineMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
}

impl Default for LineMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: 0.0,
        }
    }
}

impl LineMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn y(&self) -> f32 {
        self.f
    }
}

/// Accumulates shown text, starting a new line when the baseline changes.
#[derive(Default)]
struct LineWriter {
    out: String,
    baseline: Option<f32>,
    pending_break: bool,
    pending_gap: bool,
}

impl LineWriter {
    fn break_line(&mut self) {
        self.pending_break = true;
    }

    fn gap(&mut self) {
        self.pending_gap = true;
    }

    fn show(&mut self, y: f32, text: &str) {
        if text.is_empty() {
            return;
        }

        if !self.out.is_empty() {
            let moved = self
                .baseline
                .is_some_and(|baseline| (baseline - y).abs() > LINE_TOLERANCE);
            if self.pending_break || moved {
                let trimmed = self.out.trim_end_matches(' ').len();
                self.out.truncate(trimmed);
                self.out.push('\n');
            } else if self.pending_gap
                && !self.out.ends_with(char::is_whitespace)
                && !text.starts_with(char::is_whitespace)
            {
                self.out.push(' ');
            }
        }

        self.out.push_str(text);
        self.baseline = Some(y);
        self.pending_break = false;
        self.pending_gap = false;
    }

    fn finish(self) -> String {
        self.out.trim_end_matches(' ').to_string()
    }
}
