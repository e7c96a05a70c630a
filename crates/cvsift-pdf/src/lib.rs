//! lopdf-based extraction backends.
//!
//! This crate is the only place that touches the PDF library directly; the
//! rest of the pipeline sees it through the [`cvsift_core`] engine traits.
//! Two independently implemented text engines cover the same document — a
//! words-first reconstruction tolerant of broken reading order, and a
//! span-stream reconstruction that preserves the style metadata the
//! segmenters need.

mod content;
mod engine;
mod tables;

pub use engine::{PdfLayoutEngine, SpanstreamEngine, WordflowEngine};

// Re-export the trait surface so callers can wire engines without naming core
pub use cvsift_core::{BackendError, LayoutEngine, TextEngine};
