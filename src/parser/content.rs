//! Content stream interpretation.
//!
//! Walks the text operators of a page content stream and emits one
//! [`TextRun`] per text-showing operator, positioned in default user space
//! (the coordinate system link annotations use).

use std::collections::{BTreeMap, HashMap};

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::TextRun;

use super::backend::decode_text_simple;

/// `TJ` adjustments (thousandths of an em) larger than this become a space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Glyph width used when a code is missing from `/Widths` (thousandths).
const DEFAULT_GLYPH_WIDTH: f32 = 500.0;

/// Approximate advance of a proportional Latin glyph (thousandths of an em),
/// for fonts that carry no `/Widths`.
fn estimated_glyph_width(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | 't' | 'f' | 'r' | 'I' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 280.0,
        ' ' => 278.0,
        'm' | 'w' | 'M' | 'W' => 830.0,
        c if c.is_uppercase() => 670.0,
        _ => DEFAULT_GLYPH_WIDTH,
    }
}

/// Collect the text runs of a page.
pub(crate) fn collect_page_runs(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<TextRun>> {
    let fonts = doc
        .get_page_fonts(page_id)
        .map_err(|e| Error::TextExtract(e.to_string()))?;
    let data = page_content(doc, page_id)?;
    let content = Content::decode(&data).map_err(|e| Error::TextExtract(e.to_string()))?;

    let mut interpreter = Interpreter::new(doc, fonts);
    for op in &content.operations {
        interpreter.apply(&op.operator, &op.operands);
    }
    Ok(interpreter.runs)
}

/// Decompressed content of a page, with multiple streams concatenated.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let contents = match page_dict.get(b"Contents") {
        Ok(obj) => obj,
        Err(_) => return Ok(Vec::new()),
    };

    match resolve(doc, contents) {
        Object::Stream(s) => Ok(s
            .decompressed_content()
            .unwrap_or_else(|_| s.content.clone())),
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Stream(s) = resolve(doc, obj) {
                    if let Ok(data) = s.decompressed_content() {
                        content.extend_from_slice(&data);
                        content.push(b' ');
                    }
                }
            }
            Ok(content)
        }
        _ => Err(Error::TextExtract("Invalid content stream".to_string())),
    }
}

pub(crate) fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Affine transform `[a b c d e f]` using the row-vector convention of PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[Object]) -> Option<Matrix> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f32> = operands[..6].iter().filter_map(get_number).collect();
        if n.len() < 6 {
            return None;
        }
        Some(Matrix {
            a: n[0],
            b: n[1],
            c: n[2],
            d: n[3],
            e: n[4],
            f: n[5],
        })
    }

    fn translation(tx: f32, ty: f32) -> Matrix {
        Matrix {
            e: tx,
            f: ty,
            ..Matrix::IDENTITY
        }
    }

    /// `self × other`
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Advance widths of a simple (single-byte) font.
#[derive(Debug, Clone)]
struct FontMetrics {
    first_char: u32,
    widths: Vec<f32>,
    missing_width: f32,
}

impl FontMetrics {
    fn from_font(doc: &LopdfDocument, font: &Dictionary) -> Option<FontMetrics> {
        let subtype = font.get(b"Subtype").ok().and_then(|o| o.as_name().ok())?;
        if subtype == b"Type0" {
            return None;
        }

        let first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|o| resolve(doc, o).as_i64().ok())? as u32;
        let widths_obj = resolve(doc, font.get(b"Widths").ok()?);
        let widths: Vec<f32> = widths_obj
            .as_array()
            .ok()?
            .iter()
            .map(|o| get_number(resolve(doc, o)).unwrap_or(0.0))
            .collect();

        let missing_width = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| resolve(doc, o).as_dict().ok())
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(get_number)
            .filter(|w| *w > 0.0)
            .unwrap_or(DEFAULT_GLYPH_WIDTH);

        Some(FontMetrics {
            first_char,
            widths,
            missing_width,
        })
    }

    fn glyph_width(&self, code: u8) -> f32 {
        (code as u32)
            .checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .filter(|w| *w > 0.0)
            .unwrap_or(self.missing_width)
    }
}

/// Text state parameters (PDF 32000-1, 9.3).
#[derive(Debug, Clone)]
struct TextState {
    font_name: Vec<u8>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scaling: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_name: Vec::new(),
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
            leading: 0.0,
        }
    }
}

struct Interpreter<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
    metrics: HashMap<Vec<u8>, Option<FontMetrics>>,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    tm: Matrix,
    tlm: Matrix,
    state: TextState,
    in_text_block: bool,
    runs: Vec<TextRun>,
}

impl<'a> Interpreter<'a> {
    fn new(doc: &'a LopdfDocument, fonts: BTreeMap<Vec<u8>, &'a Dictionary>) -> Self {
        Self {
            doc,
            fonts,
            metrics: HashMap::new(),
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            state: TextState::default(),
            in_text_block: false,
            runs: Vec::new(),
        }
    }

    fn apply(&mut self, operator: &str, operands: &[Object]) {
        match operator {
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => {
                if let Some(ctm) = self.ctm_stack.pop() {
                    self.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.ctm = m.then(&self.ctm);
                }
            }
            "BT" => {
                self.in_text_block = true;
                self.tm = Matrix::IDENTITY;
                self.tlm = Matrix::IDENTITY;
            }
            "ET" => self.in_text_block = false,
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.state.font_name = name.clone();
                }
                if let Some(size) = operands.get(1).and_then(get_number) {
                    self.state.font_size = size;
                }
            }
            "Tc" => {
                if let Some(v) = operands.first().and_then(get_number) {
                    self.state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = operands.first().and_then(get_number) {
                    self.state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = operands.first().and_then(get_number) {
                    self.state.horizontal_scaling = v / 100.0;
                }
            }
            "TL" => {
                if let Some(v) = operands.first().and_then(get_number) {
                    self.state.leading = v;
                }
            }
            "Td" | "TD" => {
                let tx = operands.first().and_then(get_number).unwrap_or(0.0);
                let ty = operands.get(1).and_then(get_number).unwrap_or(0.0);
                if operator == "TD" {
                    self.state.leading = -ty;
                }
                self.move_line(tx, ty);
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.tm = m;
                    self.tlm = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(s @ Object::String(..)) = operands.first() {
                    self.show(std::slice::from_ref(s));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    self.show(items);
                }
            }
            "'" => {
                self.next_line();
                if let Some(s @ Object::String(..)) = operands.first() {
                    self.show(std::slice::from_ref(s));
                }
            }
            "\"" => {
                if let Some(v) = operands.first().and_then(get_number) {
                    self.state.word_spacing = v;
                }
                if let Some(v) = operands.get(1).and_then(get_number) {
                    self.state.char_spacing = v;
                }
                self.next_line();
                if let Some(s @ Object::String(..)) = operands.get(2) {
                    self.show(std::slice::from_ref(s));
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).then(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_line(0.0, -leading);
    }

    /// Show strings and `TJ` adjustments as a single run.
    fn show(&mut self, items: &[Object]) {
        if !self.in_text_block {
            return;
        }

        let font_name = self.state.font_name.clone();
        let metrics = self.metrics_for(&font_name);
        let encoding = self
            .fonts
            .get(&font_name)
            .and_then(|f| f.get_font_encoding(self.doc).ok());

        let size = self.state.font_size;
        let scaling = self.state.horizontal_scaling;
        let mut text = String::new();
        let mut advance = 0.0;

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let decoded = match encoding {
                        Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                            .unwrap_or_else(|_| decode_text_simple(bytes)),
                        None => decode_text_simple(bytes),
                    };

                    match metrics {
                        Some(ref m) => {
                            for &code in bytes.iter() {
                                let mut w = m.glyph_width(code) / 1000.0 * size
                                    + self.state.char_spacing;
                                if code == b' ' {
                                    w += self.state.word_spacing;
                                }
                                advance += w * scaling;
                            }
                        }
                        // No /Widths (standard 14 fonts): estimate per character
                        None => {
                            for c in decoded.chars() {
                                let mut w = estimated_glyph_width(c) / 1000.0 * size
                                    + self.state.char_spacing;
                                if c == ' ' {
                                    w += self.state.word_spacing;
                                }
                                advance += w * scaling;
                            }
                        }
                    }
                    text.push_str(&decoded);
                }
                other => {
                    if let Some(adjustment) = get_number(other) {
                        advance -= adjustment / 1000.0 * size * scaling;
                        if -adjustment > TJ_SPACE_THRESHOLD
                            && text.chars().last().map(|c| !c.is_whitespace()).unwrap_or(false)
                        {
                            text.push(' ');
                        }
                    }
                }
            }
        }

        let trm = self.tm.then(&self.ctm);
        if !text.trim().is_empty() {
            let mut run = TextRun::new(text, trm.e, trm.f)
                .with_font_size(size * trm.vertical_scale());
            if advance > 0.0 {
                run = run.with_width(advance * trm.horizontal_scale());
            }
            self.runs.push(run);
        }

        self.tm = Matrix::translation(advance, 0.0).then(&self.tm);
    }

    fn metrics_for(&mut self, font_name: &[u8]) -> Option<FontMetrics> {
        if let Some(cached) = self.metrics.get(font_name) {
            return cached.clone();
        }
        let metrics = self
            .fonts
            .get(font_name)
            .and_then(|font| FontMetrics::from_font(self.doc, font));
        self.metrics.insert(font_name.to_vec(), metrics.clone());
        metrics
    }
}
