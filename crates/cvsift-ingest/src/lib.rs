//! Unified document ingestion.
//!
//! Dispatches to the appropriate extraction backends based on file
//! extension and wraps everything in the never-failing parse contract:
//! callers always receive a well-formed [`ResumeRecord`].

use std::path::Path;

use cvsift_core::{BackendError, LayoutEngine, StyledDocument, TextEngine};
use cvsift_extract::Pipeline;
use cvsift_pdf::{PdfLayoutEngine, SpanstreamEngine, WordflowEngine};

// Re-export the record types for boundary crates
pub use cvsift_core::{PersonalInfo, ResumeRecord, ZERO_EXPERIENCE};

/// Extensions accepted at the upload boundary. Only `pdf` and `txt` have
/// extraction backends; `docx` and `rtf` pass the filename filter but
/// degrade to an explanatory fallback record.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["pdf", "docx", "txt", "rtf"];

/// True when the path's extension passes the boundary filename filter.
pub fn is_accepted(path: &Path) -> bool {
    ACCEPTED_EXTENSIONS.contains(&extension_of(path).as_str())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Plain-text backend: the file's contents serve both text engines; there is
/// no layout information, so the styled document is empty and segmentation
/// falls back to the naive line scanner.
struct PlainTextEngine;

impl TextEngine for PlainTextEngine {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(cvsift_core::normalize_block(&raw))
    }
}

impl LayoutEngine for PlainTextEngine {
    fn load_document(&self, _path: &Path) -> Result<StyledDocument, BackendError> {
        Ok(StyledDocument::default())
    }
}

/// Parse one document into a [`ResumeRecord`]. Never fails: unsupported
/// formats and internal errors degrade to the fallback record.
pub fn parse(path: &Path) -> ResumeRecord {
    let ext = extension_of(path);
    tracing::debug!(path = %path.display(), ext = %ext, "parsing document");

    match ext.as_str() {
        "pdf" => {
            let wordflow = WordflowEngine::new();
            let spanstream = SpanstreamEngine::new();
            let layout = PdfLayoutEngine::new();
            Pipeline {
                wordflow: &wordflow,
                spanstream: &spanstream,
                layout: &layout,
            }
            .process(path)
        }
        "txt" => {
            let engine = PlainTextEngine;
            Pipeline {
                wordflow: &engine,
                spanstream: &engine,
                layout: &engine,
            }
            .process(path)
        }
        "docx" | "rtf" => ResumeRecord::fallback(format!(
            "no extraction backend for .{} documents",
            ext
        )),
        other => ResumeRecord::fallback(format!("unsupported file extension: {:?}", other)),
    }
}

/// Pretty-printed JSON form of [`parse`].
pub fn parse_to_json(path: &Path) -> String {
    parse(path).to_json_pretty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_extension_filter() {
        assert!(is_accepted(Path::new("resume.pdf")));
        assert!(is_accepted(Path::new("resume.PDF")));
        assert!(is_accepted(Path::new("resume.docx")));
        assert!(!is_accepted(Path::new("resume.png")));
        assert!(!is_accepted(Path::new("resume")));
    }

    #[test]
    fn docx_degrades_to_explanatory_fallback() {
        let record = parse(Path::new("resume.docx"));
        assert_eq!(record.personal_info.name, "Unknown");
        assert!(record.error.unwrap().contains(".docx"));
    }

    #[test]
    fn unknown_extension_degrades_to_fallback() {
        let record = parse(Path::new("resume.png"));
        assert!(record.error.unwrap().contains("unsupported"));
    }

    #[test]
    fn unreadable_pdf_degrades_to_fallback() {
        let record = parse(Path::new("/nonexistent/resume.pdf"));
        assert_eq!(record.personal_info.name, "Unknown");
        assert_eq!(record.skills, Vec::<String>::new());
        assert_eq!(record.total_experience, ZERO_EXPERIENCE);
        assert!(!record.error.unwrap().is_empty());
    }
}
