//! PDF content-stream interpretation.
//!
//! Walks each page's operator stream with a simplified text-rendering state
//! machine and emits positioned, styled spans. Handled operators: BT, ET,
//! Tf, Tm, Td, TD, T*, TL, Tc, Tw, Tz, Ts, Tj, TJ, ' and ". Coordinates are
//! converted to top-based y so "above" sorts first.

use std::collections::HashMap;

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

use cvsift_core::{Block, Line, Page, Span, StyledDocument};

/// Approximate character width as a fraction of font size; a reasonable
/// default for proportional fonts when glyph metrics are unavailable.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Spans whose y differs by less than this belong to the same line.
const Y_TOLERANCE: f32 = 1.0;

/// A vertical gap larger than this multiple of the font size starts a new
/// block.
const BLOCK_GAP_FACTOR: f32 = 1.4;

/// Fallback page size (US Letter) when no MediaBox is present.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// A positioned span in page space, before line/block grouping.
#[derive(Debug, Clone)]
pub(crate) struct RawSpan {
    pub text: String,
    pub x: f32,
    /// Top-based y: grows downward.
    pub y: f32,
    pub width: f32,
    pub size: f32,
    pub font: String,
    pub bold: bool,
}

/// One interpreted page: dimensions plus the flat span stream.
#[derive(Debug, Clone)]
pub(crate) struct RawPage {
    pub width: f32,
    pub height: f32,
    pub spans: Vec<RawSpan>,
}

#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
    bold: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
            bold: false,
        }
    }
}

impl TextState {
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    fn y(&self) -> f32 {
        self.text_matrix[5]
    }

    /// Rendered size: nominal size scaled by the matrix's vertical scale.
    fn effective_font_size(&self) -> f32 {
        let scale = (self.text_matrix[1].powi(2) + self.text_matrix[3].powi(2)).sqrt();
        (self.font_size * scale).abs()
    }

    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }

    fn set_font(&mut self, key: Vec<u8>, base_font: &str, size: f32) {
        self.font_key = key;
        self.font_size = size;
        self.bold = base_font.to_uppercase().contains("BOLD");
        self.font_name = base_font.to_string();
    }
}

fn to_f32(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}

/// Decode PDF string bytes: UTF-16BE when BOM-prefixed, otherwise a Latin-1
/// passthrough. Subset fonts without a usable encoding may decode lossily;
/// the wordflow engine's native path compensates.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter(|c| c.len() == 2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&utf16)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a lopdf::Dictionary> {
    match obj {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Map font resource keys (the `/F1`-style names) to base-font names.
fn page_fonts(doc: &Document, page_id: ObjectId) -> HashMap<Vec<u8>, String> {
    let mut fonts = HashMap::new();
    let Ok(page_dict) = doc.get_dictionary(page_id) else {
        return fonts;
    };
    let Some(resources) = page_dict.get(b"Resources").ok().and_then(|r| resolve_dict(doc, r))
    else {
        return fonts;
    };
    let Some(font_dict) = resources.get(b"Font").ok().and_then(|f| resolve_dict(doc, f)) else {
        return fonts;
    };
    for (key, obj) in font_dict.iter() {
        let base = resolve_dict(doc, obj)
            .and_then(|d| d.get(b"BaseFont").ok())
            .and_then(|n| n.as_name_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| String::from_utf8_lossy(key).to_string());
        fonts.insert(key.clone(), base);
    }
    fonts
}

fn page_dimensions(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    if let Ok(page_dict) = doc.get_dictionary(page_id) {
        if let Ok(media_box) = page_dict.get(b"MediaBox") {
            if let Ok(array) = media_box.as_array() {
                if array.len() >= 4 {
                    let width = to_f32(&array[2]).unwrap_or(DEFAULT_PAGE_SIZE.0);
                    let height = to_f32(&array[3]).unwrap_or(DEFAULT_PAGE_SIZE.1);
                    return (width, height);
                }
            }
        }
    }
    DEFAULT_PAGE_SIZE
}

fn estimate_width(text: &str, state: &TextState) -> f32 {
    text.chars().count() as f32 * state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale
}

fn advance_after_show(text: &str, state: &mut TextState) {
    let mut dx = 0.0;
    for ch in text.chars() {
        dx += state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale + state.char_spacing;
        if ch == ' ' {
            dx += state.word_spacing;
        }
    }
    state.advance_x(dx);
}

fn emit_span(text: String, state: &TextState, x: f32, spans: &mut Vec<RawSpan>) {
    if text.is_empty() {
        return;
    }
    spans.push(RawSpan {
        width: estimate_width(&text, state),
        x,
        y: state.y() + state.text_rise,
        size: state.effective_font_size(),
        font: state.font_name.clone(),
        bold: state.bold,
        text,
    });
}

fn show_string(operand: &Object, state: &mut TextState, spans: &mut Vec<RawSpan>) {
    if let Object::String(bytes, _) = operand {
        let text = decode_pdf_string(bytes);
        let x = state.x();
        emit_span(text.clone(), state, x, spans);
        advance_after_show(&text, state);
    }
}

/// TJ: strings interleaved with kerning adjustments. A displacement large
/// enough to look like a word gap becomes a space in the accumulated run.
fn show_tj_array(items: &[Object], state: &mut TextState, spans: &mut Vec<RawSpan>) {
    let mut buf = String::new();
    let mut run_x = state.x();

    for item in items {
        match item {
            Object::String(bytes, _) => {
                if buf.is_empty() {
                    run_x = state.x();
                }
                let fragment = decode_pdf_string(bytes);
                buf.push_str(&fragment);
                advance_after_show(&fragment, state);
            }
            other => {
                if let Some(adjust) = to_f32(other) {
                    let dx = -adjust / 1000.0 * state.font_size * state.horiz_scale;
                    let gap_threshold =
                        state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * 0.3;
                    if dx > gap_threshold && !buf.ends_with(' ') && !buf.is_empty() {
                        buf.push(' ');
                    }
                    state.advance_x(dx);
                }
            }
        }
    }
    emit_span(buf, state, run_x, spans);
}

/// Interpret one page's content stream into a flat span list (bottom-up y).
fn interpret_page(doc: &Document, page_id: ObjectId) -> Vec<RawSpan> {
    let fonts = page_fonts(doc, page_id);
    let Ok(raw_content) = doc.get_page_content(page_id) else {
        return Vec::new();
    };
    let Ok(content) = Content::decode(&raw_content) else {
        return Vec::new();
    };

    let mut state = TextState::default();
    let mut spans: Vec<RawSpan> = Vec::new();

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            // Font state survives ET: some PDFs reuse the font set earlier.
            "ET" => {}
            "Tf" => {
                if operands.len() >= 2 {
                    let key = match &operands[0] {
                        Object::Name(name) => name.clone(),
                        _ => Vec::new(),
                    };
                    let size = to_f32(&operands[1]).unwrap_or(0.0);
                    let base = fonts
                        .get(&key)
                        .cloned()
                        .unwrap_or_else(|| String::from_utf8_lossy(&key).to_string());
                    state.set_font(key, &base, size);
                }
            }
            "Tm" => {
                let values: Vec<f32> = operands.iter().take(6).filter_map(to_f32).collect();
                if values.len() == 6 {
                    state.text_matrix = [
                        values[0], values[1], values[2], values[3], values[4], values[5],
                    ];
                    state.line_matrix = state.text_matrix;
                }
            }
            "Td" => {
                if operands.len() >= 2 {
                    let tx = to_f32(&operands[0]).unwrap_or(0.0);
                    let ty = to_f32(&operands[1]).unwrap_or(0.0);
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                if operands.len() >= 2 {
                    let tx = to_f32(&operands[0]).unwrap_or(0.0);
                    let ty = to_f32(&operands[1]).unwrap_or(0.0);
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => {
                state.translate_line(0.0, -state.leading);
            }
            "TL" => {
                if let Some(value) = operands.first().and_then(to_f32) {
                    state.leading = value;
                }
            }
            "Tc" => {
                if let Some(value) = operands.first().and_then(to_f32) {
                    state.char_spacing = value;
                }
            }
            "Tw" => {
                if let Some(value) = operands.first().and_then(to_f32) {
                    state.word_spacing = value;
                }
            }
            "Tz" => {
                if let Some(value) = operands.first().and_then(to_f32) {
                    state.horiz_scale = value / 100.0;
                }
            }
            "Ts" => {
                if let Some(value) = operands.first().and_then(to_f32) {
                    state.text_rise = value;
                }
            }
            "Tj" => {
                if let Some(first) = operands.first() {
                    show_string(first, &mut state, &mut spans);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    show_tj_array(items, &mut state, &mut spans);
                }
            }
            "'" => {
                state.translate_line(0.0, -state.leading);
                if let Some(first) = operands.first() {
                    show_string(first, &mut state, &mut spans);
                }
            }
            "\"" => {
                if operands.len() >= 3 {
                    if let Some(aw) = to_f32(&operands[0]) {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = to_f32(&operands[1]) {
                        state.char_spacing = ac;
                    }
                    state.translate_line(0.0, -state.leading);
                    show_string(&operands[2], &mut state, &mut spans);
                }
            }
            _ => { /* non-text operators are ignored */ }
        }
    }
    spans
}

/// Interpret every page into raw spans with top-based coordinates.
pub(crate) fn load_raw_pages(doc: &Document) -> Vec<RawPage> {
    let mut pages = Vec::new();
    for (_page_num, page_id) in doc.get_pages() {
        let (width, height) = page_dimensions(doc, page_id);
        let mut spans = interpret_page(doc, page_id);
        for span in &mut spans {
            span.y = height - span.y;
        }
        pages.push(RawPage {
            width,
            height,
            spans,
        });
    }
    pages
}

/// Group one page's spans into lines (by y tolerance, column-split at the
/// midline so side-by-side columns never merge into one line) and lines into
/// blocks (by vertical gap).
pub(crate) fn build_page(raw: &RawPage) -> Page {
    let mid_x = raw.width / 2.0;
    let left: Vec<&RawSpan> = raw.spans.iter().filter(|s| s.x < mid_x).collect();
    let right: Vec<&RawSpan> = raw.spans.iter().filter(|s| s.x >= mid_x).collect();

    let mut blocks = Vec::new();
    blocks.extend(group_blocks(&left));
    blocks.extend(group_blocks(&right));

    Page {
        width: raw.width,
        height: raw.height,
        blocks,
    }
}

fn group_blocks(spans: &[&RawSpan]) -> Vec<Block> {
    let lines = group_lines(spans);
    let mut blocks: Vec<Block> = Vec::new();

    for line in lines {
        let start_new = match blocks.last() {
            None => true,
            Some(block) => {
                let prev = block.lines.last().expect("blocks are never empty");
                let gap = line.y0 - prev.y0;
                let reference = prev.max_size().max(12.0);
                gap > BLOCK_GAP_FACTOR * reference
            }
        };
        if start_new {
            blocks.push(Block {
                x0: line.x0,
                y0: line.y0,
                lines: vec![line],
            });
        } else {
            let block = blocks.last_mut().unwrap();
            block.x0 = block.x0.min(line.x0);
            block.lines.push(line);
        }
    }
    blocks
}

fn group_lines(spans: &[&RawSpan]) -> Vec<Line> {
    let mut sorted: Vec<&RawSpan> = spans.to_vec();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<(f32, Vec<&RawSpan>)> = Vec::new();
    for span in sorted {
        match lines.last_mut() {
            Some((line_y, members)) if (span.y - *line_y).abs() <= Y_TOLERANCE => {
                members.push(span);
            }
            _ => lines.push((span.y, vec![span])),
        }
    }

    lines
        .into_iter()
        .map(|(y0, members)| {
            let mut members = members;
            members.sort_by(|a, b| a.x.total_cmp(&b.x));
            let x0 = members.iter().map(|s| s.x).fold(f32::INFINITY, f32::min);
            Line {
                spans: members
                    .iter()
                    .map(|s| Span {
                        text: s.text.clone(),
                        font: s.font.clone(),
                        size: s.size,
                        bold: s.bold,
                    })
                    .collect(),
                x0,
                y0,
            }
        })
        .collect()
}

/// Build the styled document model for the segmenters.
pub(crate) fn build_styled_document(doc: &Document) -> StyledDocument {
    let pages = load_raw_pages(doc).iter().map(build_page).collect();
    StyledDocument { pages }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str, x: f32, y: f32, size: f32, bold: bool) -> RawSpan {
        RawSpan {
            text: text.to_string(),
            x,
            y,
            width: text.len() as f32 * size * APPROX_CHAR_WIDTH_RATIO,
            size,
            font: if bold { "Helvetica-Bold" } else { "Helvetica" }.to_string(),
            bold,
        }
    }

    #[test]
    fn decode_latin1_passthrough() {
        assert_eq!(decode_pdf_string(b"Hello"), "Hello");
    }

    #[test]
    fn decode_utf16_with_bom() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_pdf_string(&bytes), "Hi");
    }

    #[test]
    fn spans_on_same_y_form_one_line_sorted_by_x() {
        let page = RawPage {
            width: 612.0,
            height: 792.0,
            spans: vec![
                raw("World", 100.0, 50.0, 10.0, false),
                raw("Hello ", 40.0, 50.2, 10.0, false),
            ],
        };
        let built = build_page(&page);
        assert_eq!(built.blocks.len(), 1);
        assert_eq!(built.blocks[0].lines.len(), 1);
        assert_eq!(built.blocks[0].lines[0].text(), "Hello World");
    }

    #[test]
    fn columns_do_not_merge_into_one_line() {
        let page = RawPage {
            width: 612.0,
            height: 792.0,
            spans: vec![
                raw("left cell", 40.0, 50.0, 10.0, false),
                raw("right cell", 400.0, 50.0, 10.0, false),
            ],
        };
        let built = build_page(&page);
        let texts: Vec<String> = built
            .blocks
            .iter()
            .flat_map(|b| &b.lines)
            .map(|l| l.text())
            .collect();
        assert_eq!(texts, vec!["left cell", "right cell"]);
    }

    #[test]
    fn distant_lines_split_into_blocks() {
        let page = RawPage {
            width: 612.0,
            height: 792.0,
            spans: vec![
                raw("first", 40.0, 50.0, 10.0, false),
                raw("second", 40.0, 62.0, 10.0, false),
                raw("far away", 40.0, 200.0, 10.0, false),
            ],
        };
        let built = build_page(&page);
        assert_eq!(built.blocks.len(), 2);
        assert_eq!(built.blocks[0].lines.len(), 2);
        assert_eq!(built.blocks[1].lines[0].text(), "far away");
    }

    #[test]
    fn bold_flag_comes_from_font_name() {
        let mut state = TextState::default();
        state.set_font(b"F1".to_vec(), "Arial-BoldMT", 12.0);
        assert!(state.bold);
        state.set_font(b"F1".to_vec(), "ArialMT", 12.0);
        assert!(!state.bold);
    }

    #[test]
    fn effective_size_scales_with_text_matrix() {
        let mut state = TextState::default();
        state.set_font(b"F1".to_vec(), "Helvetica", 1.0);
        state.text_matrix = [12.0, 0.0, 0.0, 12.0, 0.0, 0.0];
        assert!((state.effective_font_size() - 12.0).abs() < 0.01);
    }
}
