//! Data model shared by the extraction and rendering stages.
//!
//! Each stage consumes the previous stage's values and produces new ones;
//! nothing here is mutated once its producing stage has finished.

mod geometry;
mod link;
mod page;
mod run;

pub use geometry::Rect;
pub use link::{CandidateLink, LinkAnnotation, LinkPosition, LINK_SUBTYPE};
pub use page::{PageContent, PageOutput};
pub use run::{Line, TextRun};
