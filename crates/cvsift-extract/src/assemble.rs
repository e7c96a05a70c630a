//! End-to-end record assembly with a single failure boundary.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use cvsift_core::{
    BackendError, DualText, LayoutEngine, ResumeRecord, SectionTag, TextEngine,
};

use crate::contact::{extract_email, extract_github, extract_linkedin, extract_location,
    extract_phone};
use crate::experience::calculate_total_experience;
use crate::name::{extract_name, resolve_name};
use crate::section::{segment_columns, segment_plain, segment_refined};
use crate::skills::extract_skills;

/// The full extraction pipeline over a pair of text engines and one layout
/// engine.
pub struct Pipeline<'a> {
    pub wordflow: &'a dyn TextEngine,
    pub spanstream: &'a dyn TextEngine,
    pub layout: &'a dyn LayoutEngine,
}

impl Pipeline<'_> {
    /// Parse one document into a [`ResumeRecord`].
    ///
    /// This is the single point where partial-failure tolerance is enforced:
    /// any error or panic anywhere below degrades to the fixed fallback
    /// record carrying the failure message, never a propagated error.
    pub fn process(&self, path: &Path) -> ResumeRecord {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.run(path)));
        match result {
            Ok(Ok(record)) => record,
            Ok(Err(err)) => {
                tracing::warn!(path = %path.display(), error = %err, "parse degraded to fallback");
                ResumeRecord::fallback(err.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload);
                tracing::error!(path = %path.display(), panic = %message, "parse panicked");
                ResumeRecord::fallback(message)
            }
        }
    }

    fn run(&self, path: &Path) -> Result<ResumeRecord, BackendError> {
        let dual = dual_text(self.wordflow, self.spanstream, path);
        let preferred = dual.preferred();

        let email = extract_email(preferred);
        let phone = extract_phone(preferred);
        let linkedin = extract_linkedin(preferred);
        let github = extract_github(preferred);

        let name = resolve_name(
            extract_name(preferred),
            extract_name(if dual.spanstream.is_empty() {
                &dual.combined
            } else {
                &dual.spanstream
            }),
        );

        let location = extract_location(preferred, false);

        let document = self.layout.load_document(path)?;
        let (primary, refined) = if document.is_empty() {
            // Plain-text inputs carry no style information; both segmenter
            // roles are served by the naive line scanner.
            (segment_plain(preferred), None)
        } else {
            (segment_columns(&document), Some(segment_refined(&document)))
        };

        // Skills come from the refined segmenter, falling back to the
        // primary one when its bucket is empty.
        let refined_skills = refined
            .as_ref()
            .map(|sections| sections.text(SectionTag::Skills).to_string())
            .unwrap_or_default();
        let skills_text = if refined_skills.trim().is_empty() {
            primary.text(SectionTag::Skills).to_string()
        } else {
            refined_skills
        };
        let skills = extract_skills(&skills_text);

        let total_experience = calculate_total_experience(primary.text(SectionTag::Experience));

        let mut record = ResumeRecord::default();
        record.personal_info.name = name;
        record.personal_info.email = email;
        record.personal_info.phone = phone;
        record.personal_info.linkedin = linkedin;
        record.personal_info.github = github;
        record.personal_info.location = location;
        record.skills = skills;
        record.total_experience = total_experience;
        Ok(record)
    }
}

/// Run both text engines, degrading each failure to an empty string.
fn dual_text(wordflow: &dyn TextEngine, spanstream: &dyn TextEngine, path: &Path) -> DualText {
    let first = wordflow.extract_text(path).unwrap_or_else(|err| {
        tracing::debug!(path = %path.display(), error = %err, "wordflow engine failed");
        String::new()
    });
    let second = spanstream.extract_text(path).unwrap_or_else(|err| {
        tracing::debug!(path = %path.display(), error = %err, "spanstream engine failed");
        String::new()
    });
    let combined = format!("{}\n{}", first, second).trim().to_string();
    DualText {
        combined,
        wordflow: first,
        spanstream: second,
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "internal panic during parsing".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvsift_core::{Block, Line, Page, Span, StyledDocument, ZERO_EXPERIENCE};

    struct FixedText(&'static str);

    impl TextEngine for FixedText {
        fn extract_text(&self, _path: &Path) -> Result<String, BackendError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingText;

    impl TextEngine for FailingText {
        fn extract_text(&self, _path: &Path) -> Result<String, BackendError> {
            Err(BackendError::Open("cannot open".into()))
        }
    }

    struct EmptyLayout;

    impl LayoutEngine for EmptyLayout {
        fn load_document(&self, _path: &Path) -> Result<StyledDocument, BackendError> {
            Ok(StyledDocument::default())
        }
    }

    struct FailingLayout;

    impl LayoutEngine for FailingLayout {
        fn load_document(&self, _path: &Path) -> Result<StyledDocument, BackendError> {
            Err(BackendError::Open("unreadable document".into()))
        }
    }

    struct FixedLayout(StyledDocument);

    impl LayoutEngine for FixedLayout {
        fn load_document(&self, _path: &Path) -> Result<StyledDocument, BackendError> {
            Ok(self.0.clone())
        }
    }

    fn styled_resume() -> StyledDocument {
        let line = |text: &str, y0: f32, size: f32, bold: bool| Line {
            spans: vec![Span {
                text: text.to_string(),
                font: if bold { "Helvetica-Bold" } else { "Helvetica" }.to_string(),
                size,
                bold,
            }],
            x0: 50.0,
            y0,
        };
        StyledDocument {
            pages: vec![Page {
                width: 612.0,
                height: 792.0,
                blocks: vec![Block {
                    x0: 50.0,
                    y0: 30.0,
                    lines: vec![
                        line("Jane Doe", 30.0, 14.0, true),
                        line("Skills", 60.0, 12.0, true),
                        line("Python, SQL, Docker", 80.0, 10.0, false),
                        line("Experience", 110.0, 12.0, true),
                        line("Acme Corp Jan 2020 to Jan 2022", 130.0, 10.0, false),
                    ],
                }],
            }],
        }
    }

    const SAMPLE_TEXT: &str = "Jane Doe\njane.doe@example.com\n9876543210\nSkills\nPython, SQL\n";

    #[test]
    fn layout_failure_yields_fallback_record() {
        let pipeline = Pipeline {
            wordflow: &FixedText(SAMPLE_TEXT),
            spanstream: &FixedText(SAMPLE_TEXT),
            layout: &FailingLayout,
        };
        let record = pipeline.process(Path::new("missing.pdf"));
        assert_eq!(record.personal_info.name, "Unknown");
        assert!(record.skills.is_empty());
        assert_eq!(record.total_experience, ZERO_EXPERIENCE);
        let error = record.error.expect("fallback carries the error");
        assert!(error.contains("unreadable document"));
    }

    #[test]
    fn text_engine_failure_degrades_to_empty_not_fallback() {
        let pipeline = Pipeline {
            wordflow: &FailingText,
            spanstream: &FixedText(SAMPLE_TEXT),
            layout: &EmptyLayout,
        };
        let record = pipeline.process(Path::new("resume.pdf"));
        // The surviving engine's text still drives extraction.
        assert_eq!(record.personal_info.name, "Jane Doe");
        assert_eq!(
            record.personal_info.email.as_deref(),
            Some("jane.doe@example.com")
        );
        assert!(record.error.is_none());
    }

    #[test]
    fn full_record_from_styled_document() {
        let pipeline = Pipeline {
            wordflow: &FixedText(SAMPLE_TEXT),
            spanstream: &FixedText(SAMPLE_TEXT),
            layout: &FixedLayout(styled_resume()),
        };
        let record = pipeline.process(Path::new("resume.pdf"));
        assert_eq!(record.personal_info.name, "Jane Doe");
        assert_eq!(record.skills, vec!["PYTHON", "SQL", "DOCKER"]);
        assert_eq!(record.total_experience, "2 years and 0 months");
        assert!(record.error.is_none());
    }

    #[test]
    fn skills_fall_back_to_primary_segmenter_when_refined_bucket_empty() {
        // "Key Skills and Tools" trips the unanchored column-segmenter
        // pattern but not the refined segmenter's whole-line patterns, so
        // only the primary segmenter carries a skills bucket.
        let line = |text: &str, y0: f32, size: f32, bold: bool| Line {
            spans: vec![Span {
                text: text.to_string(),
                font: if bold { "Helvetica-Bold" } else { "Helvetica" }.to_string(),
                size,
                bold,
            }],
            x0: 50.0,
            y0,
        };
        let doc = StyledDocument {
            pages: vec![Page {
                width: 612.0,
                height: 792.0,
                blocks: vec![Block {
                    x0: 50.0,
                    y0: 30.0,
                    lines: vec![
                        line("Key Skills and Tools", 30.0, 12.0, true),
                        line("Python, Redis", 50.0, 10.0, false),
                    ],
                }],
            }],
        };
        let pipeline = Pipeline {
            wordflow: &FixedText(SAMPLE_TEXT),
            spanstream: &FixedText(SAMPLE_TEXT),
            layout: &FixedLayout(doc),
        };
        let record = pipeline.process(Path::new("resume.pdf"));
        assert_eq!(record.skills, vec!["PYTHON", "REDIS"]);
    }

    #[test]
    fn plain_text_input_uses_naive_segmentation() {
        let pipeline = Pipeline {
            wordflow: &FixedText(SAMPLE_TEXT),
            spanstream: &FixedText(""),
            layout: &EmptyLayout,
        };
        let record = pipeline.process(Path::new("resume.txt"));
        assert_eq!(record.skills, vec!["PYTHON", "SQL"]);
    }

    #[test]
    fn both_engines_failing_still_returns_a_record() {
        let pipeline = Pipeline {
            wordflow: &FailingText,
            spanstream: &FailingText,
            layout: &EmptyLayout,
        };
        let record = pipeline.process(Path::new("resume.pdf"));
        assert_eq!(record.personal_info.name, "Unknown");
        assert!(record.error.is_none());
    }
}
