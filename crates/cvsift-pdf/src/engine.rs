//! The two text engines and the layout engine over lopdf documents.

use std::path::Path;

use lopdf::Document;

use cvsift_core::{dehyphenate, normalize_block, BackendError, LayoutEngine, StyledDocument,
    TextEngine};

use crate::content::{build_page, build_styled_document, load_raw_pages, RawPage, RawSpan};
use crate::tables::detect_table_rows;

/// Below this many non-whitespace characters a page's native text is
/// considered sparse and the engine falls back to reconstruction.
const SPARSE_THRESHOLD: usize = 20;

/// Rows are keyed by top-based y rounded to one decimal when regrouping
/// words into lines.
const ROW_KEY_SCALE: f32 = 10.0;

fn open(path: &Path) -> Result<Document, BackendError> {
    Document::load(path).map_err(|err| BackendError::Open(err.to_string()))
}

fn non_whitespace_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Join per-page normalized texts: split to lines, dehyphenate across page
/// boundaries, drop blanks.
fn finish(pages_text: Vec<String>) -> String {
    let mut lines: Vec<String> = Vec::new();
    for page_text in pages_text {
        lines.extend(page_text.lines().map(str::to_string));
    }
    dehyphenate(lines)
        .into_iter()
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Regroup the interpreted word stream into lines: bucket spans by rounded
/// vertical position, order rows top to bottom, order words left to right,
/// and rebuild each line with single spaces.
fn rebuild_from_words(spans: &[RawSpan]) -> String {
    let mut rows: Vec<(i64, Vec<&RawSpan>)> = Vec::new();
    for span in spans {
        if span.text.trim().is_empty() {
            continue;
        }
        let key = (span.y * ROW_KEY_SCALE).round() as i64;
        match rows.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(span),
            None => rows.push((key, vec![span])),
        }
    }
    rows.sort_by_key(|(key, _)| *key);

    let mut lines = Vec::new();
    for (_, mut members) in rows {
        members.sort_by(|a, b| a.x.total_cmp(&b.x));
        let line = members
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines.join("\n")
}

/// Words-first text engine.
///
/// Per page: the library's native linear extraction first; when sparse, a
/// word-level rebuild from the interpreted span stream. Detected table rows
/// are appended as pipe-delimited lines after the paragraph text.
#[derive(Debug, Default)]
pub struct WordflowEngine;

impl WordflowEngine {
    pub fn new() -> Self {
        Self
    }
}

impl TextEngine for WordflowEngine {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let doc = open(path)?;
        let raw_pages = load_raw_pages(&doc);

        let mut pages_text = Vec::with_capacity(raw_pages.len());
        for (idx, (page_num, _)) in doc.get_pages().into_iter().enumerate() {
            let native = doc.extract_text(&[page_num]).unwrap_or_default();
            let spans: &[RawSpan] = raw_pages.get(idx).map(|p| p.spans.as_slice()).unwrap_or(&[]);

            let mut page_text = if non_whitespace_len(&native) >= SPARSE_THRESHOLD {
                native
            } else {
                tracing::debug!(page = page_num, "native text sparse, rebuilding from words");
                rebuild_from_words(spans)
            };

            for row in detect_table_rows(spans) {
                page_text.push('\n');
                page_text.push_str(&row);
            }
            pages_text.push(normalize_block(&page_text));
        }
        Ok(finish(pages_text))
    }
}

/// Span-reconstruction text engine.
///
/// Per page: linear text from the styled block/line model; when sparse, the
/// same structure rebuilt by joining span texts with single spaces.
#[derive(Debug, Default)]
pub struct SpanstreamEngine;

impl SpanstreamEngine {
    pub fn new() -> Self {
        Self
    }
}

fn page_linear_text(raw: &RawPage) -> String {
    let page = build_page(raw);
    page.blocks
        .iter()
        .flat_map(|block| &block.lines)
        .map(|line| line.text())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn page_spaced_text(raw: &RawPage) -> String {
    let page = build_page(raw);
    page.blocks
        .iter()
        .flat_map(|block| &block.lines)
        .map(|line| {
            line.spans
                .iter()
                .map(|s| s.text.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

impl TextEngine for SpanstreamEngine {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let doc = open(path)?;
        let raw_pages = load_raw_pages(&doc);

        let mut pages_text = Vec::with_capacity(raw_pages.len());
        for raw in &raw_pages {
            let linear = page_linear_text(raw);
            let page_text = if non_whitespace_len(&linear) >= SPARSE_THRESHOLD {
                linear
            } else {
                page_spaced_text(raw)
            };
            pages_text.push(normalize_block(&page_text));
        }
        Ok(finish(pages_text))
    }
}

/// Layout engine: the styled page/block/line/span model for segmentation.
#[derive(Debug, Default)]
pub struct PdfLayoutEngine;

impl PdfLayoutEngine {
    pub fn new() -> Self {
        Self
    }
}

impl LayoutEngine for PdfLayoutEngine {
    fn load_document(&self, path: &Path) -> Result<StyledDocument, BackendError> {
        let doc = open(path)?;
        Ok(build_styled_document(&doc))
    }
}
