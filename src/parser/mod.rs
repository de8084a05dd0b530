//! PDF parsing module.
//!
//! Turns a page's content stream and annotations into text lines and
//! candidate links.

mod annotations;
mod backend;
mod content;
mod layout;
mod links;
mod options;

pub use backend::{decode_text_simple, DocumentInfo, LopdfBackend, PageSource};
pub use layout::{extract_lines, extract_text};
pub use links::{locate_links, merge_link_text, LinkLocator};
pub use options::{ErrorMode, ExtractOptions, PageSelection, Tolerances};
