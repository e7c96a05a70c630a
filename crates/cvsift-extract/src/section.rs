//! Layout-aware section segmentation.
//!
//! Two deliberately separate segmenters implement the same interface
//! (`&StyledDocument -> Sections`): the column-aware segmenter feeds
//! everything downstream except skills, and the refined segmenter — stricter
//! header rules, pre-pass header collection — sources only the skills bucket.
//! Their divergence reflects different robustness trade-offs against
//! unreliable extraction ordering, so they are not unified.

use once_cell::sync::Lazy;
use regex::Regex;

use cvsift_core::{Line, SectionTag, Sections, StyledDocument};

/// Font size above which a short matching line counts as a header even when
/// not bold.
const HEADER_SIZE_THRESHOLD: f32 = 11.0;
/// Maximum words in a column-segmenter header line.
const HEADER_MAX_WORDS: usize = 7;
/// Maximum words in a refined-segmenter header line.
const REFINED_HEADER_MAX_WORDS: usize = 5;
/// Size delta over the page median that marks a refined header.
const REFINED_SIZE_DELTA: f32 = 1.5;
/// Median used when a document carries no span sizes at all.
const DEFAULT_MEDIAN_SIZE: f32 = 11.0;

/// Unanchored header patterns for the column-aware segmenter, matched
/// against lower-cased line text. Order matters: first match wins.
static SECTION_PATTERNS: Lazy<Vec<(SectionTag, Regex)>> = Lazy::new(|| {
    [
        (
            SectionTag::Education,
            r"\b(education|academic|qualification|degree)\b",
        ),
        (
            SectionTag::Experience,
            r"\b(experience|work|employment|job history|professional background)\b",
        ),
        (
            SectionTag::Skills,
            r"\b(skills|technical skills|key skills|competencies|expertise|technologies|core skills)\b",
        ),
        (SectionTag::Projects, r"\b(projects|portfolio|works)\b"),
        (
            SectionTag::Certifications,
            r"\b(certifications|certificates|accreditations)\b",
        ),
        (
            SectionTag::Summary,
            r"\b(summary|profile|objective|about me|professional summary)\b",
        ),
        (
            SectionTag::Languages,
            r"\b(language|languages|known languages|spoken languages)\b",
        ),
    ]
    .into_iter()
    .map(|(tag, pattern)| (tag, Regex::new(pattern).unwrap()))
    .collect()
});

/// Anchored header patterns for the refined segmenter: the whole line must
/// be the header phrase (with optional trailing colon).
static REFINED_PATTERNS: Lazy<Vec<(SectionTag, Regex)>> = Lazy::new(|| {
    [
        (
            SectionTag::Summary,
            r"(?i)^\s*(summary|profile|professional\s+summary|about\s+me|objective|career\s+objective)\s*:?\s*$",
        ),
        (
            SectionTag::Experience,
            r"(?i)^\s*(experience|work(\s+experience)?|employment|professional(\s+experience)?|career\s+history|sap\s+experience)\s*:?\s*$",
        ),
        (
            SectionTag::Skills,
            r"(?i)^\s*(skills?|skils|technical\s+skills?|key\s+skills?|core\s+competenc(y|ies)|expertise)\s*:?\s*$",
        ),
        (
            SectionTag::Projects,
            r"(?i)^\s*(projects?|project\s+portfolio|works?)\s*:?\s*$",
        ),
        (
            SectionTag::Education,
            r"(?i)^\s*(education|academic|qualifications?|degree)\s*:?\s*$",
        ),
        (
            SectionTag::Certifications,
            r"(?i)^\s*(certifications?|certificates?|accreditations?|awards?)\s*:?\s*$",
        ),
        (
            SectionTag::Personal,
            r"(?i)^\s*(personal\s+details|contact|contact\s+info)\s*:?\s*$",
        ),
    ]
    .into_iter()
    .map(|(tag, pattern)| (tag, Regex::new(pattern).unwrap()))
    .collect()
});

static BULLET_EDGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-•●▪□■–—❖]+\s*|\s*[•●▪□■–—❖]+\s*$").unwrap());
static MULTI_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static PREAMBLE_EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.\-]+@[\w.\-]+\.\w+").unwrap());
static PREAMBLE_PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\+91[-\s]?)?[6-9]\d{9}\b").unwrap());

fn clean_ws(text: &str) -> String {
    MULTI_WS_RE.replace_all(text.trim(), " ").to_string()
}

fn strip_bullets(text: &str) -> String {
    clean_ws(&BULLET_EDGE_RE.replace_all(text, ""))
}

fn join_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| clean_ws(l))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Column-aware segmenter.
///
/// Blocks are split into left/right columns by their leftmost x relative to
/// the page midline; the left column is processed fully before the right one
/// (two-column resumes read column-first, not row-interleaved). A short line
/// matching a header pattern switches the running section when it is bold or
/// over the size threshold; the header line itself is not kept as content.
pub fn segment_columns(doc: &StyledDocument) -> Sections {
    let mut collected: Vec<(SectionTag, Vec<String>)> = SectionTag::ALL
        .iter()
        .map(|tag| (*tag, Vec::new()))
        .collect();
    let mut current = SectionTag::Others;

    for page in &doc.pages {
        let mid_x = page.width / 2.0;

        let mut left: Vec<_> = page.blocks.iter().filter(|b| b.x0 < mid_x).collect();
        let mut right: Vec<_> = page.blocks.iter().filter(|b| b.x0 >= mid_x).collect();
        left.sort_by(|a, b| a.y0.total_cmp(&b.y0));
        right.sort_by(|a, b| a.y0.total_cmp(&b.y0));

        for block in left.into_iter().chain(right) {
            for line in &block.lines {
                let text = line.text();
                if text.is_empty() {
                    continue;
                }

                if let Some(tag) = match_header(&text, line) {
                    current = tag;
                    continue;
                }

                if let Some((_, lines)) = collected.iter_mut().find(|(tag, _)| *tag == current) {
                    lines.push(text);
                }
            }
        }
    }

    let mut sections = Sections::new();
    for (tag, lines) in &collected {
        sections.insert(*tag, join_lines(lines));
    }
    sections
}

fn match_header(text: &str, line: &Line) -> Option<SectionTag> {
    if text.split_whitespace().count() > HEADER_MAX_WORDS {
        return None;
    }
    let lowered = text.to_lowercase();
    for (tag, pattern) in SECTION_PATTERNS.iter() {
        if pattern.is_match(&lowered) {
            if line.is_bold() || line.max_size() > HEADER_SIZE_THRESHOLD {
                return Some(*tag);
            }
            return None;
        }
    }
    None
}

/// Median span size of the first page, the refined segmenter's baseline for
/// header detection.
fn first_page_median_size(doc: &StyledDocument) -> f32 {
    let mut sizes: Vec<f32> = doc
        .pages
        .first()
        .map(|page| {
            page.blocks
                .iter()
                .flat_map(|b| &b.lines)
                .flat_map(|l| &l.spans)
                .filter(|s| !s.text.trim().is_empty())
                .map(|s| s.size)
                .collect()
        })
        .unwrap_or_default();
    if sizes.is_empty() {
        return DEFAULT_MEDIAN_SIZE;
    }
    sizes.sort_by(f32::total_cmp);
    let mid = sizes.len() / 2;
    let median = if sizes.len() % 2 == 1 {
        sizes[mid]
    } else {
        (sizes[mid - 1] + sizes[mid]) / 2.0
    };
    if median == 0.0 {
        DEFAULT_MEDIAN_SIZE
    } else {
        median
    }
}

fn refined_header_tag(text: &str) -> Option<SectionTag> {
    REFINED_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(tag, _)| *tag)
}

fn is_refined_header(text: &str, line: &Line, median: f32) -> bool {
    if text.split_whitespace().count() > REFINED_HEADER_MAX_WORDS {
        return false;
    }
    if refined_header_tag(text).is_none() {
        return false;
    }
    // "engineer" in a short bold line is a job headline, not a section header.
    if text.to_lowercase().contains("engineer") {
        return false;
    }
    line.is_bold() || line.max_size() >= median + REFINED_SIZE_DELTA
}

/// Document-global ordering key: page first, then vertical position.
type DocPos = (usize, f32);

fn pos_before(a: DocPos, b: DocPos) -> bool {
    a.0 < b.0 || (a.0 == b.0 && a.1 < b.1)
}

/// Refined segmenter, used by the pipeline only for the skills bucket.
///
/// Headers are collected in a pre-pass sorted by document position, and each
/// body line is assigned to whichever header lies immediately above it —
/// robust against engines that emit blocks out of reading order. Also
/// derives `personal` and `summary` buckets from the pre-header preamble.
pub fn segment_refined(doc: &StyledDocument) -> Sections {
    let median = first_page_median_size(doc);

    let mut headers: Vec<(SectionTag, DocPos)> = Vec::new();
    for (page_idx, page) in doc.pages.iter().enumerate() {
        for block in &page.blocks {
            for line in &block.lines {
                let text = line.text();
                if text.is_empty() {
                    continue;
                }
                if is_refined_header(&text, line, median) {
                    if let Some(tag) = refined_header_tag(&text) {
                        headers.push((tag, (page_idx, line.y0)));
                    }
                }
            }
        }
    }
    headers.sort_by(|(_, a), (_, b)| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let mut buckets: Vec<(SectionTag, Vec<String>)> = Vec::new();
    let mut push_line = |tag: SectionTag, text: String| {
        if let Some((_, lines)) = buckets.iter_mut().find(|(t, _)| *t == tag) {
            lines.push(text);
        } else {
            buckets.push((tag, vec![text]));
        }
    };

    for (page_idx, page) in doc.pages.iter().enumerate() {
        for block in &page.blocks {
            for line in &block.lines {
                let text = line.text();
                if text.is_empty() {
                    continue;
                }
                if is_refined_header(&text, line, median) {
                    continue;
                }

                let pos = (page_idx, line.y0);
                let owner = headers
                    .iter()
                    .take_while(|(_, hpos)| pos_before(*hpos, pos))
                    .last()
                    .map(|(tag, _)| *tag);

                let cleaned = strip_bullets(&text);
                if cleaned.is_empty() {
                    continue;
                }
                push_line(owner.unwrap_or(SectionTag::Preamble), cleaned);
            }
        }
    }

    let bucket_text = |tag: SectionTag| -> Vec<String> {
        buckets
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, lines)| lines.clone())
            .unwrap_or_default()
    };

    let preamble_lines = bucket_text(SectionTag::Preamble);
    let preamble_text = preamble_lines.join("\n");

    let email = PREAMBLE_EMAIL_RE
        .find(&preamble_text)
        .map(|m| m.as_str().to_string());
    let phone = PREAMBLE_PHONE_RE
        .find(&preamble_text)
        .map(|m| m.as_str().to_string());

    let mut personal: Vec<String> = Vec::new();
    if let Some(first) = preamble_lines.first() {
        personal.push(first.clone());
    }
    personal.extend(email.clone());
    personal.extend(phone.clone());
    personal.dedup();

    let summary_lines: Vec<String> = preamble_lines
        .iter()
        .filter(|line| {
            let lowered = line.to_lowercase();
            email.as_deref().map_or(true, |e| !line.contains(e))
                && phone.as_deref().map_or(true, |p| !line.contains(p))
                && !lowered.contains("address")
                && !lowered.contains("india")
                && !personal.contains(*line)
                && line.split_whitespace().count() > 5
        })
        .cloned()
        .collect();

    let mut sections = Sections::new();
    sections.insert(SectionTag::Personal, personal.join("\n"));
    sections.insert(SectionTag::Preamble, join_lines(&preamble_lines));
    if !summary_lines.is_empty() {
        sections.insert(SectionTag::Summary, summary_lines.join("\n"));
    } else {
        sections.insert(SectionTag::Summary, join_lines(&bucket_text(SectionTag::Summary)));
    }
    for tag in [
        SectionTag::Experience,
        SectionTag::Projects,
        SectionTag::Skills,
        SectionTag::Education,
        SectionTag::Certifications,
    ] {
        sections.insert(tag, join_lines(&bucket_text(tag)));
    }
    sections
}

/// Lightweight text-only fallback for inputs without layout information: a
/// line matching any header pattern switches the running section.
pub fn segment_plain(text: &str) -> Sections {
    let mut collected: Vec<(SectionTag, Vec<String>)> = SectionTag::ALL
        .iter()
        .map(|tag| (*tag, Vec::new()))
        .collect();
    let mut current = SectionTag::Others;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let lowered = line.to_lowercase();
        let matched = SECTION_PATTERNS
            .iter()
            .find(|(_, pattern)| pattern.is_match(&lowered))
            .map(|(tag, _)| *tag);
        if let Some(tag) = matched {
            current = tag;
            continue;
        }
        if let Some((_, lines)) = collected.iter_mut().find(|(tag, _)| *tag == current) {
            lines.push(line.to_string());
        }
    }

    let mut sections = Sections::new();
    for (tag, lines) in &collected {
        sections.insert(*tag, join_lines(lines));
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvsift_core::{Block, Page, Span};

    fn span(text: &str, size: f32, bold: bool) -> Span {
        Span {
            text: text.to_string(),
            font: if bold { "Arial-BoldMT" } else { "ArialMT" }.to_string(),
            size,
            bold,
        }
    }

    fn line(text: &str, x0: f32, y0: f32, size: f32, bold: bool) -> Line {
        Line {
            spans: vec![span(text, size, bold)],
            x0,
            y0,
        }
    }

    fn block(lines: Vec<Line>) -> Block {
        let x0 = lines.iter().map(|l| l.x0).fold(f32::INFINITY, f32::min);
        let y0 = lines.iter().map(|l| l.y0).fold(f32::INFINITY, f32::min);
        Block { lines, x0, y0 }
    }

    fn single_page(blocks: Vec<Block>) -> StyledDocument {
        StyledDocument {
            pages: vec![Page {
                width: 612.0,
                height: 792.0,
                blocks,
            }],
        }
    }

    #[test]
    fn header_line_excluded_but_body_included() {
        let doc = single_page(vec![block(vec![
            line("Jane Doe", 50.0, 40.0, 14.0, true),
            line("Experience", 50.0, 80.0, 12.0, true),
            line("Acme Corp, Jan 2020 to Present", 50.0, 100.0, 10.0, false),
            line("Built data pipelines", 50.0, 120.0, 10.0, false),
        ])]);
        let sections = segment_columns(&doc);
        let experience = sections.text(SectionTag::Experience);
        assert!(!experience.contains("Experience"));
        assert!(experience.contains("Acme Corp, Jan 2020 to Present"));
        assert!(experience.contains("Built data pipelines"));
        // The pre-header line lands in Others.
        assert!(sections.text(SectionTag::Others).contains("Jane Doe"));
    }

    #[test]
    fn non_bold_small_header_is_not_a_header() {
        let doc = single_page(vec![block(vec![
            line("Experience", 50.0, 80.0, 10.0, false),
            line("some body text", 50.0, 100.0, 10.0, false),
        ])]);
        let sections = segment_columns(&doc);
        // No style signal: the matching line is ordinary content.
        assert!(sections.text(SectionTag::Experience).is_empty());
        assert!(sections.text(SectionTag::Others).contains("Experience"));
    }

    #[test]
    fn left_column_processed_before_right() {
        let doc = single_page(vec![
            block(vec![
                line("Skills", 400.0, 40.0, 12.0, true),
                line("Python", 400.0, 60.0, 10.0, false),
            ]),
            block(vec![
                line("Experience", 50.0, 40.0, 12.0, true),
                line("Acme Corp", 50.0, 60.0, 10.0, false),
            ]),
        ]);
        let sections = segment_columns(&doc);
        assert_eq!(sections.text(SectionTag::Experience), "Acme Corp");
        assert_eq!(sections.text(SectionTag::Skills), "Python");
    }

    #[test]
    fn section_persists_across_pages() {
        let mut doc = single_page(vec![block(vec![
            line("Experience", 50.0, 80.0, 12.0, true),
            line("first page entry", 50.0, 100.0, 10.0, false),
        ])]);
        doc.pages.push(Page {
            width: 612.0,
            height: 792.0,
            blocks: vec![block(vec![line(
                "second page entry",
                50.0,
                40.0,
                10.0,
                false,
            )])],
        });
        let sections = segment_columns(&doc);
        let experience = sections.text(SectionTag::Experience);
        assert!(experience.contains("first page entry"));
        assert!(experience.contains("second page entry"));
    }

    #[test]
    fn refined_assigns_body_to_nearest_header_above() {
        let doc = single_page(vec![block(vec![
            line("Jane Doe", 50.0, 30.0, 11.0, false),
            line("Skills", 50.0, 60.0, 13.0, true),
            line("• Python, SQL", 50.0, 80.0, 10.0, false),
            line("Education", 50.0, 110.0, 13.0, true),
            line("B.Tech, 2015", 50.0, 130.0, 10.0, false),
        ])]);
        let sections = segment_refined(&doc);
        assert_eq!(sections.text(SectionTag::Skills), "Python, SQL");
        assert_eq!(sections.text(SectionTag::Education), "B.Tech, 2015");
        assert!(sections.text(SectionTag::Personal).contains("Jane Doe"));
    }

    #[test]
    fn refined_requires_whole_line_header_match() {
        // Anchored patterns: a bold job headline mentioning a section word is
        // not a header, so the following body stays in the preamble.
        let doc = single_page(vec![block(vec![
            line("Software Engineer Experience", 50.0, 40.0, 14.0, true),
            line("body line here", 50.0, 60.0, 10.0, false),
        ])]);
        let sections = segment_refined(&doc);
        assert!(sections.text(SectionTag::Experience).is_empty());
        assert!(sections.text(SectionTag::Preamble).contains("body line here"));
    }

    #[test]
    fn refined_uses_size_delta_over_median() {
        // Median size is 10; a 12pt non-bold "Skills" line clears the
        // +1.5 threshold.
        let doc = single_page(vec![block(vec![
            line("filler one", 50.0, 20.0, 10.0, false),
            line("filler two", 50.0, 30.0, 10.0, false),
            line("filler three", 50.0, 40.0, 10.0, false),
            line("Skills", 50.0, 60.0, 12.0, false),
            line("Python", 50.0, 80.0, 10.0, false),
        ])]);
        let sections = segment_refined(&doc);
        assert_eq!(sections.text(SectionTag::Skills), "Python");
    }

    #[test]
    fn refined_derives_personal_and_summary_from_preamble() {
        let doc = single_page(vec![block(vec![
            line("Jane Doe", 50.0, 20.0, 12.0, false),
            line("jane.doe@example.com 9876543210", 50.0, 40.0, 10.0, false),
            line(
                "Seasoned data practitioner with broad pipeline exposure",
                50.0,
                60.0,
                10.0,
                false,
            ),
        ])]);
        let sections = segment_refined(&doc);
        let personal = sections.text(SectionTag::Personal);
        assert!(personal.contains("Jane Doe"));
        assert!(personal.contains("jane.doe@example.com"));
        assert!(personal.contains("9876543210"));
        assert!(sections
            .text(SectionTag::Summary)
            .contains("Seasoned data practitioner"));
    }

    #[test]
    fn plain_fallback_switches_on_header_lines() {
        let text = "intro line\nSkills\nPython, SQL\nExperience\nAcme Corp 2020";
        let sections = segment_plain(text);
        assert_eq!(sections.text(SectionTag::Skills), "Python, SQL");
        assert_eq!(sections.text(SectionTag::Experience), "Acme Corp 2020");
        assert_eq!(sections.text(SectionTag::Others), "intro line");
    }
}
