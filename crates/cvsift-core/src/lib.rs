pub mod backend;
pub mod model;
pub mod normalize;
pub mod record;

// Re-export for convenience
pub use backend::{BackendError, DualText, LayoutEngine, TextEngine};
pub use model::{Block, Line, Page, SectionTag, Sections, Span, StyledDocument};
pub use normalize::{dehyphenate, normalize_block};
pub use record::{PersonalInfo, ResumeRecord, ZERO_EXPERIENCE};
