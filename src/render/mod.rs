//! Rendering module: from page text and candidate links to Markdown.

mod assemble;
pub mod classify;
mod markdown;
mod normalize;
mod options;
mod reflow;
mod result;
mod splice;

pub use assemble::assemble;
pub use classify::{LineClassifier, LineKind, LineRule, ListMarker};
pub use markdown::{format_document, format_page, FormattedPage, MarkdownFormatter};
pub use normalize::normalize_text;
pub use options::{PageSeparator, RenderOptions};
pub use reflow::{join_paragraph, reflow};
pub use result::{ConversionStats, ConvertResult};
pub use splice::{splice_links, LinkSplicer, SpliceReport};
