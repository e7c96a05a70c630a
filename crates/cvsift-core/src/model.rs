//! The styled document model produced by layout engines and consumed by the
//! section segmenters.
//!
//! Coordinates are top-based: y grows downward, so "above" means a smaller
//! y. Pages hold blocks, blocks hold lines, lines hold spans; a span is the
//! smallest run of uniformly styled text.

use std::collections::BTreeMap;

/// A minimal styled text fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Span {
    pub text: String,
    pub font: String,
    pub size: f32,
    pub bold: bool,
}

/// A horizontal line of text assembled from one or more spans.
#[derive(Debug, Clone, Default)]
pub struct Line {
    pub spans: Vec<Span>,
    pub x0: f32,
    pub y0: f32,
}

impl Line {
    /// Concatenated span texts, trimmed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            out.push_str(&span.text);
        }
        out.trim().to_string()
    }

    /// True if any span is bold-styled.
    pub fn is_bold(&self) -> bool {
        self.spans.iter().any(|s| s.bold)
    }

    /// Maximum font size across the line's spans.
    pub fn max_size(&self) -> f32 {
        self.spans.iter().map(|s| s.size).fold(0.0, f32::max)
    }
}

/// A vertical group of consecutive lines.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub lines: Vec<Line>,
    pub x0: f32,
    pub y0: f32,
}

/// A single page: width (used to split into left/right columns) and blocks.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub width: f32,
    pub height: f32,
    pub blocks: Vec<Block>,
}

/// A loaded document as a sequence of pages.
#[derive(Debug, Clone, Default)]
pub struct StyledDocument {
    pub pages: Vec<Page>,
}

impl StyledDocument {
    /// True when no page carries any text.
    pub fn is_empty(&self) -> bool {
        self.pages
            .iter()
            .all(|p| p.blocks.iter().all(|b| b.lines.is_empty()))
    }
}

/// The closed set of section labels a line can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionTag {
    Summary,
    Experience,
    Skills,
    Projects,
    Education,
    Certifications,
    Personal,
    Languages,
    Others,
    Preamble,
}

impl SectionTag {
    pub const ALL: [SectionTag; 10] = [
        SectionTag::Summary,
        SectionTag::Experience,
        SectionTag::Skills,
        SectionTag::Projects,
        SectionTag::Education,
        SectionTag::Certifications,
        SectionTag::Personal,
        SectionTag::Languages,
        SectionTag::Others,
        SectionTag::Preamble,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionTag::Summary => "summary",
            SectionTag::Experience => "experience",
            SectionTag::Skills => "skills",
            SectionTag::Projects => "projects",
            SectionTag::Education => "education",
            SectionTag::Certifications => "certifications",
            SectionTag::Personal => "personal",
            SectionTag::Languages => "languages",
            SectionTag::Others => "others",
            SectionTag::Preamble => "preamble",
        }
    }
}

/// Segmentation output: each tag mapped to its joined, whitespace-cleaned
/// text. Missing tags read as empty.
#[derive(Debug, Clone, Default)]
pub struct Sections {
    map: BTreeMap<SectionTag, String>,
}

impl Sections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: SectionTag, text: String) {
        self.map.insert(tag, text);
    }

    pub fn text(&self, tag: SectionTag) -> &str {
        self.map.get(&tag).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.map.values().all(|t| t.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionTag, &str)> {
        self.map.iter().map(|(tag, text)| (*tag, text.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, size: f32, bold: bool) -> Span {
        Span {
            text: text.to_string(),
            font: if bold { "Helvetica-Bold" } else { "Helvetica" }.to_string(),
            size,
            bold,
        }
    }

    #[test]
    fn line_text_concatenates_spans() {
        let line = Line {
            spans: vec![span("Tech", 10.0, false), span("nical Skills ", 10.0, true)],
            x0: 0.0,
            y0: 0.0,
        };
        assert_eq!(line.text(), "Technical Skills");
        assert!(line.is_bold());
        assert_eq!(line.max_size(), 10.0);
    }

    #[test]
    fn sections_default_to_empty() {
        let sections = Sections::new();
        assert_eq!(sections.text(SectionTag::Skills), "");
        assert!(sections.is_empty());
    }

    #[test]
    fn empty_document_detection() {
        let mut doc = StyledDocument::default();
        assert!(doc.is_empty());
        doc.pages.push(Page {
            width: 612.0,
            height: 792.0,
            blocks: vec![Block {
                lines: vec![Line {
                    spans: vec![span("hello", 11.0, false)],
                    x0: 10.0,
                    y0: 20.0,
                }],
                x0: 10.0,
                y0: 20.0,
            }],
        });
        assert!(!doc.is_empty());
    }
}
