//! # pdf2md
//!
//! PDF to Markdown conversion that keeps hyperlinks.
//!
//! Text runs are regrouped into lines in reading order, link annotations are
//! matched back to the words they cover, and each page is rendered as
//! Markdown with headers, lists and `[text](url)` links reconstructed.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> pdf2md::Result<()> {
//!     let markdown = pdf2md::to_markdown("document.pdf")?;
//!     println!("{}", markdown);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Hyperlinks**: URI and internal link annotations become Markdown links
//! - **Structure**: Headers, bullet and numbered lists, reflowed paragraphs
//! - **Fault isolation**: A broken page is logged and left empty
//! - **Parallel processing**: Uses Rayon for multi-page documents

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{ConvertOptions, Converter};
pub use detect::{check_header, is_pdf_bytes, PdfHeader};
pub use error::{Error, Result};
pub use model::{
    CandidateLink, LinkAnnotation, LinkPosition, PageContent, PageOutput, Rect, TextRun,
};
pub use output::{sanitize_file_name, write_markdown};
pub use parser::{
    DocumentInfo, ErrorMode, ExtractOptions, LopdfBackend, PageSelection, PageSource, Tolerances,
};
pub use render::{ConversionStats, ConvertResult, PageSeparator, RenderOptions};

use std::path::Path;

/// Convert a PDF file to Markdown with default options.
///
/// # Example
///
/// ```no_run
/// let markdown = pdf2md::to_markdown("document.pdf").unwrap();
/// std::fs::write("output.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(convert_file(path)?.markdown)
}

/// Convert a PDF file to Markdown with custom options.
///
/// # Example
///
/// ```no_run
/// use pdf2md::{to_markdown_with_options, ConvertOptions, PageSeparator, RenderOptions};
///
/// let options = ConvertOptions::new()
///     .with_render_options(RenderOptions::new().with_separator(PageSeparator::Rule));
/// let markdown = to_markdown_with_options("document.pdf", options).unwrap();
/// ```
pub fn to_markdown_with_options<P: AsRef<Path>>(path: P, options: ConvertOptions) -> Result<String> {
    Ok(Converter::new(options).convert_file(path)?.markdown)
}

/// Convert a PDF file, returning per-page output and statistics.
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<ConvertResult> {
    Converter::default().convert_file(path)
}

/// Convert a PDF held in memory.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("document.pdf").unwrap();
/// let result = pdf2md::convert_bytes(&data).unwrap();
/// println!("{} links", result.stats.links_spliced);
/// ```
pub fn convert_bytes(data: &[u8]) -> Result<ConvertResult> {
    Converter::default().convert_bytes(data)
}

/// Convert a PDF file without blocking the async runtime.
///
/// The file is read with `tokio::fs` and the conversion runs on the
/// blocking thread pool.
#[cfg(feature = "async")]
pub async fn convert_file_async<P: AsRef<Path>>(
    path: P,
    options: ConvertOptions,
) -> Result<ConvertResult> {
    let data = tokio::fs::read(path.as_ref()).await?;
    tokio::task::spawn_blocking(move || Converter::new(options).convert_bytes(&data))
        .await
        .map_err(|e| Error::Other(format!("Conversion task failed: {}", e)))?
}

/// Builder for converting PDF documents.
///
/// # Example
///
/// ```no_run
/// use pdf2md::{Pdf2Md, PageSelection, PageSeparator};
///
/// let result = Pdf2Md::new()
///     .with_separator(PageSeparator::Rule)
///     .with_pages(PageSelection::Range(1..=10))
///     .with_destinations()
///     .convert("document.pdf")?;
/// println!("{}", result.markdown);
/// # Ok::<(), pdf2md::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pdf2Md {
    options: ConvertOptions,
}

impl Pdf2Md {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip header and list detection; only reflow paragraphs.
    pub fn raw(mut self) -> Self {
        self.options.render = self.options.render.with_formatting(false);
        self
    }

    /// Do not splice links.
    pub fn without_links(mut self) -> Self {
        self.options.render = self.options.render.with_links(false);
        self
    }

    /// Set the page separator.
    pub fn with_separator(mut self, separator: PageSeparator) -> Self {
        self.options.render = self.options.render.with_separator(separator);
        self
    }

    /// Link internal destinations as `#page=N` anchors.
    pub fn with_destinations(mut self) -> Self {
        self.options.extract = self.options.extract.with_destinations(true);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options.extract = self.options.extract.with_pages(pages);
        self
    }

    /// Set geometric tolerances.
    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.options.extract = self.options.extract.with_tolerances(tolerances);
        self
    }

    /// Fail on the first page that cannot be read.
    pub fn strict(mut self) -> Self {
        self.options.extract = self.options.extract.strict();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// The options collected so far.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a PDF file.
    pub fn convert<P: AsRef<Path>>(self, path: P) -> Result<ConvertResult> {
        Converter::new(self.options).convert_file(path)
    }

    /// Convert a PDF from bytes.
    pub fn convert_bytes(self, data: &[u8]) -> Result<ConvertResult> {
        Converter::new(self.options).convert_bytes(data)
    }

    /// Convert pages from any [`PageSource`].
    pub fn convert_source(self, source: &dyn PageSource) -> Result<ConvertResult> {
        Converter::new(self.options).convert_source(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let builder = Pdf2Md::new()
            .raw()
            .without_links()
            .with_separator(PageSeparator::Rule)
            .with_destinations()
            .strict()
            .sequential();

        let options = builder.options();
        assert!(!options.render.preserve_formatting);
        assert!(!options.render.preserve_links);
        assert_eq!(options.render.page_separator, PageSeparator::Rule);
        assert!(options.extract.resolve_destinations);
        assert_eq!(options.extract.error_mode, ErrorMode::Strict);
        assert!(!options.parallel);
    }

    #[test]
    fn test_builder_defaults() {
        let builder = Pdf2Md::new();
        let options = builder.options();
        assert!(options.render.preserve_formatting);
        assert!(options.render.preserve_links);
        assert_eq!(options.extract.error_mode, ErrorMode::Lenient);
        assert!(options.parallel);
    }

    #[test]
    fn test_convert_source_through_builder() {
        let pages = vec![PageContent::new(1).with_run(TextRun::new("hello world", 0.0, 0.0))];
        let result = Pdf2Md::new().convert_source(&pages).unwrap();
        assert_eq!(result.markdown, "hello world");
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_convert_bytes_empty_data() {
        let data: [u8; 0] = [];
        assert!(matches!(convert_bytes(&data), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_convert_bytes_unknown_magic() {
        let data = b"<!DOCTYPE html><html></html>";
        assert!(matches!(convert_bytes(data), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_convert_bytes_truncated_pdf() {
        let data = b"%PDF-1.7\n%truncated";
        assert!(convert_bytes(data).is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = to_markdown("/nonexistent/path/to/file.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
