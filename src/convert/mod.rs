//! Document conversion.
//!
//! Drives the whole pipeline over a [`PageSource`]: pages are retrieved one
//! at a time, converted independently (in parallel when enabled), and
//! joined in page order.
//!
//! # Example
//!
//! ```no_run
//! use pdf2md::convert::{ConvertOptions, Converter};
//!
//! fn main() -> pdf2md::Result<()> {
//!     let converter = Converter::new(ConvertOptions::default());
//!     let result = converter.convert_file("document.pdf")?;
//!     println!("{}", result.markdown);
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;

use crate::error::Result;
use crate::model::{PageContent, PageOutput};
use crate::parser::{
    extract_text, ErrorMode, ExtractOptions, LinkLocator, LopdfBackend, PageSource,
};
use crate::render::{
    assemble, ConversionStats, ConvertResult, FormattedPage, MarkdownFormatter, RenderOptions,
};

/// Options for document conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// What to read from each page
    pub extract: ExtractOptions,

    /// How to render it
    pub render: RenderOptions,

    /// Convert pages on the rayon thread pool
    pub parallel: bool,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Enable or disable parallel page conversion.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Convert pages one after another.
    pub fn sequential(self) -> Self {
        self.with_parallel(false)
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            render: RenderOptions::default(),
            parallel: true,
        }
    }
}

/// A converted page together with what the formatter counted on it.
struct PageResult {
    output: PageOutput,
    formatted: FormattedPage,
}

/// PDF to Markdown converter.
///
/// Holds only immutable options, so one converter can serve many
/// documents, including from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Get the options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a PDF file.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<ConvertResult> {
        let backend = LopdfBackend::load_file(path)?;
        self.convert_source(&backend)
    }

    /// Convert a PDF held in memory.
    pub fn convert_bytes(&self, data: &[u8]) -> Result<ConvertResult> {
        let backend = LopdfBackend::load_bytes(data)?;
        self.convert_source(&backend)
    }

    /// Convert a PDF read from `reader`.
    pub fn convert_reader<R: Read>(&self, reader: R) -> Result<ConvertResult> {
        let backend = LopdfBackend::load_reader(reader)?;
        self.convert_source(&backend)
    }

    /// Convert every selected page of `source`.
    ///
    /// A page whose runs or annotations cannot be retrieved is logged and
    /// left empty, unless [`ErrorMode::Strict`] is selected, in which case
    /// the first such error is returned.
    pub fn convert_source(&self, source: &dyn PageSource) -> Result<ConvertResult> {
        let start = Instant::now();
        if self.options.render.include_images {
            log::warn!("Image extraction is not implemented; include_images is ignored");
        }

        let selection = &self.options.extract.pages;
        let numbers: Vec<u32> = (1..=source.page_count())
            .filter(|n| selection.includes(*n))
            .collect();

        // Retrieval stays on this thread; the source need not be Sync
        let mut contents = Vec::with_capacity(numbers.len());
        let mut failed = Vec::new();
        for number in numbers {
            match source.page_content(number) {
                Ok(content) => contents.push(content),
                Err(e) => {
                    if self.options.extract.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("Failed to read page {}: {}", number, e);
                    failed.push(number);
                }
            }
        }

        let formatter = MarkdownFormatter::new(self.options.render.clone());
        let results: Vec<PageResult> = if self.options.parallel {
            contents
                .par_iter()
                .map(|page| self.convert_page_with(&formatter, page))
                .collect()
        } else {
            contents
                .iter()
                .map(|page| self.convert_page_with(&formatter, page))
                .collect()
        };

        let mut by_number: BTreeMap<u32, PageResult> = results
            .into_iter()
            .map(|r| (r.output.number, r))
            .collect();
        for number in failed {
            by_number.insert(
                number,
                PageResult {
                    output: PageOutput::failed(number),
                    formatted: FormattedPage::default(),
                },
            );
        }

        let mut stats = ConversionStats::new();
        let mut pages = Vec::with_capacity(by_number.len());
        for (_, result) in by_number {
            stats.merge(&page_stats(&result));
            pages.push(result.output);
        }

        let markdown = assemble(&pages, self.options.render.page_separator);
        log::debug!(
            "Converted {} pages ({} failed) in {:?}",
            stats.page_count,
            stats.failed_page_count,
            start.elapsed()
        );

        Ok(ConvertResult::new(markdown, pages, stats))
    }

    /// Convert a single page.
    pub fn convert_page(&self, page: &PageContent) -> PageOutput {
        let formatter = MarkdownFormatter::new(self.options.render.clone());
        self.convert_page_with(&formatter, page).output
    }

    fn convert_page_with(&self, formatter: &MarkdownFormatter, page: &PageContent) -> PageResult {
        let start = Instant::now();
        let extract = &self.options.extract;

        let text = extract_text(&page.runs, &extract.tolerances);
        let links = if self.options.render.preserve_links {
            LinkLocator::from_options(extract).locate(page.number, &page.runs, &page.annotations)
        } else {
            Vec::new()
        };
        let formatted = formatter.format_page(&text, &links);

        log::debug!(
            "Page {}: {} runs, {} links ({} unmatched) in {:?}",
            page.number,
            page.runs.len(),
            links.len(),
            formatted.links_unmatched,
            start.elapsed()
        );

        PageResult {
            output: PageOutput {
                number: page.number,
                markdown: formatted.markdown.clone(),
                links,
                failed: false,
            },
            formatted,
        }
    }
}

fn page_stats(result: &PageResult) -> ConversionStats {
    let mut stats = ConversionStats {
        page_count: 1,
        failed_page_count: result.output.failed as u32,
        links_located: result.output.links.len() as u32,
        links_spliced: result.formatted.links_spliced,
        links_unmatched: result.formatted.links_unmatched,
        header_count: result.formatted.header_count,
        list_item_count: result.formatted.list_item_count,
        ..Default::default()
    };
    stats.count_text(&result.output.markdown);
    stats
}
