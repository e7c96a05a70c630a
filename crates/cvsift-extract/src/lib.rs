//! Heuristic extraction pipeline: segmentation, field extractors, and the
//! never-failing record assembler.
//!
//! The pipeline is synchronous and holds no state across calls; the only
//! process-wide data are the lazily-initialized, read-only vocabulary tables
//! in [`vocab`].

pub mod assemble;
pub mod contact;
pub mod experience;
pub mod name;
pub mod section;
pub mod skills;
pub mod vocab;

pub use assemble::Pipeline;
pub use contact::{extract_email, extract_github, extract_linkedin, extract_location,
    extract_phone};
pub use experience::calculate_total_experience;
pub use name::{extract_name, resolve_name};
pub use section::{segment_columns, segment_plain, segment_refined};
pub use skills::extract_skills;

// Re-export domain types from core (canonical definitions live there)
pub use cvsift_core::{
    BackendError, DualText, LayoutEngine, PersonalInfo, ResumeRecord, SectionTag, Sections,
    StyledDocument, TextEngine,
};
