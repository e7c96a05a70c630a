use std::path::Path;

use thiserror::Error;

use crate::model::StyledDocument;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    Open(String),
    #[error("failed to extract text: {0}")]
    Extraction(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for linear text extraction engines.
///
/// Each engine independently reconstructs a document's prose. The pipeline
/// runs two of them over the same file and lets the field extractors pick
/// whichever text suits them; an engine failure is degraded to an empty
/// string by the assembler rather than aborting the parse.
pub trait TextEngine: Send + Sync {
    /// Extract the full text content of a document.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;
}

/// Trait for style-aware document loading.
///
/// Implementors produce the [`StyledDocument`] model (pages, blocks, lines,
/// spans with font metadata) that the section segmenters consume. Formats
/// without layout information return an empty document.
pub trait LayoutEngine: Send + Sync {
    fn load_document(&self, path: &Path) -> Result<StyledDocument, BackendError>;
}

/// The combined output of the two text engines.
#[derive(Debug, Clone, Default)]
pub struct DualText {
    /// Both engine texts joined with a newline, trimmed.
    pub combined: String,
    /// The words-first engine's text (preferred for linear prose).
    pub wordflow: String,
    /// The span-reconstruction engine's text.
    pub spanstream: String,
}

impl DualText {
    /// The wordflow text when non-empty, otherwise the combined text.
    ///
    /// Sparse word-level reconstruction tends to damage contact-info layout
    /// less, so extractors that want coherent prose start here.
    pub fn preferred(&self) -> &str {
        if self.wordflow.is_empty() {
            &self.combined
        } else {
            &self.wordflow
        }
    }
}
