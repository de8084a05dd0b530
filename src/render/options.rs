//! Rendering options and configuration.

use super::classify::DEFAULT_HEADER_MAX_LEN;

/// Options for turning page text into Markdown.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Apply header and list heuristics (otherwise only reflow)
    pub preserve_formatting: bool,

    /// Locate link annotations and splice them as Markdown links
    pub preserve_links: bool,

    /// Reserved; image extraction is not implemented
    pub include_images: bool,

    /// Separator placed between pages
    pub page_separator: PageSeparator,

    /// Lines this long or longer are never headers
    pub header_max_len: usize,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable header/list formatting.
    pub fn with_formatting(mut self, preserve: bool) -> Self {
        self.preserve_formatting = preserve;
        self
    }

    /// Enable or disable link splicing.
    pub fn with_links(mut self, preserve: bool) -> Self {
        self.preserve_links = preserve;
        self
    }

    /// Request image extraction (not implemented).
    pub fn with_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }

    /// Set the page separator.
    pub fn with_separator(mut self, separator: PageSeparator) -> Self {
        self.page_separator = separator;
        self
    }

    /// Set the header length cap.
    pub fn with_header_max_len(mut self, len: usize) -> Self {
        self.header_max_len = len;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            preserve_formatting: true,
            preserve_links: true,
            include_images: false,
            page_separator: PageSeparator::BlankLine,
            header_max_len: DEFAULT_HEADER_MAX_LEN,
        }
    }
}

/// What goes between two pages in the assembled document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSeparator {
    /// A horizontal rule (`---`) surrounded by blank lines
    Rule,
    /// A single blank line
    #[default]
    BlankLine,
}

impl PageSeparator {
    /// The literal separator text.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageSeparator::Rule => "\n\n---\n\n",
            PageSeparator::BlankLine => "\n\n",
        }
    }
}
