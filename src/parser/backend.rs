//! PDF backend abstraction layer.
//!
//! The converter only sees [`PageSource`]: a page count plus the text runs
//! and link annotations of each page. [`LopdfBackend`] implements it on top
//! of `lopdf`; in-memory pages implement it for callers that decode PDFs
//! some other way.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};
use serde::Serialize;

use crate::detect;
use crate::error::{Error, Result};
use crate::model::{LinkAnnotation, PageContent, TextRun};

use super::annotations::collect_page_annotations;
use super::content::{collect_page_runs, resolve};

/// Source of per-page text runs and annotations.
///
/// Pages are 1-indexed. A failing page must not affect the others; the
/// converter isolates errors per page.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Text runs of a page, in decoder order.
    fn text_runs(&self, page: u32) -> Result<Vec<TextRun>>;

    /// Annotations of a page, in decoder order.
    fn link_annotations(&self, page: u32) -> Result<Vec<LinkAnnotation>>;

    /// Retrieve everything needed to convert a page.
    fn page_content(&self, page: u32) -> Result<PageContent> {
        Ok(PageContent {
            number: page,
            runs: self.text_runs(page)?,
            annotations: self.link_annotations(page)?,
        })
    }
}

/// Pages already decoded into memory; page N is the N-th element.
impl PageSource for Vec<PageContent> {
    fn page_count(&self) -> u32 {
        self.len() as u32
    }

    fn text_runs(&self, page: u32) -> Result<Vec<TextRun>> {
        Ok(self.page(page)?.runs.clone())
    }

    fn link_annotations(&self, page: u32) -> Result<Vec<LinkAnnotation>> {
        Ok(self.page(page)?.annotations.clone())
    }
}

trait PageLookup {
    fn page(&self, page: u32) -> Result<&PageContent>;
}

impl PageLookup for Vec<PageContent> {
    fn page(&self, page: u32) -> Result<&PageContent> {
        page.checked_sub(1)
            .and_then(|i| self.get(i as usize))
            .ok_or(Error::PageOutOfRange(page, self.len() as u32))
    }
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // Try UTF-16BE first (BOM marker)
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    // Try UTF-8
    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Fallback: Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// LopdfBackend
// ---------------------------------------------------------------------------

/// Concrete [`PageSource`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::load_bytes(&data)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let header = detect::check_header(data)?;
        log::debug!("PDF {} header at offset {}", header.version, header.offset);

        let doc = LopdfDocument::load_mem(data)?;
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text may not be readable");
        }

        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }

    /// Load from a reader.
    pub fn load_reader<R: std::io::Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Read version, page count and the document information dictionary.
    pub fn info(&self) -> DocumentInfo {
        let dict = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .map(|obj| resolve(&self.doc, obj))
            .and_then(|obj| obj.as_dict().ok());
        let field = |key: &[u8]| dict.and_then(|d| info_string(d, key));

        DocumentInfo {
            version: self.version(),
            page_count: self.page_count(),
            encrypted: self.is_encrypted(),
            title: field(b"Title"),
            author: field(b"Author"),
            creator: field(b"Creator"),
            producer: field(b"Producer"),
        }
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }
}

/// Document-level facts, independent of page content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    pub version: String,
    pub page_count: u32,
    pub encrypted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
}

fn info_string(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => {
            let text = decode_text_simple(bytes);
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        _ => None,
    }
}

impl PageSource for LopdfBackend {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn text_runs(&self, page: u32) -> Result<Vec<TextRun>> {
        let page_id = self.page_id(page)?;
        collect_page_runs(&self.doc, page_id)
    }

    fn link_annotations(&self, page: u32) -> Result<Vec<LinkAnnotation>> {
        let page_id = self.page_id(page)?;
        collect_page_annotations(&self.doc, page_id, &self.pages)
    }
}
