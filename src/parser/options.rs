//! Extraction options and geometric tolerances.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Geometric tolerances used by line grouping and link location.
///
/// All values are in PDF user-space units (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Maximum baseline difference for two runs to share a line
    pub line_tolerance: f32,
    /// Minimum horizontal gap between runs that becomes a space
    pub space_threshold: f32,
    /// Character width assumed when a run has no reported width
    pub avg_char_width: f32,
    /// Margin added around link rectangles before the containment test
    pub link_margin: f32,
    /// Maximum baseline difference for runs merged into one link
    pub link_line_tolerance: f32,
    /// Runs closer than this many character widths join the same link
    pub adjacency_factor: f32,
    /// Line gaps wider than this multiple of the median spacing start a
    /// new paragraph (0 disables)
    pub paragraph_gap_factor: f32,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            line_tolerance: 3.0,
            space_threshold: 3.0,
            avg_char_width: 8.0,
            link_margin: 2.0,
            link_line_tolerance: 2.0,
            adjacency_factor: 2.0,
            paragraph_gap_factor: 1.5,
        }
    }
}

impl Tolerances {
    /// Set the line grouping tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    /// Set the inter-run spacing threshold.
    pub fn with_space_threshold(mut self, threshold: f32) -> Self {
        self.space_threshold = threshold;
        self
    }

    /// Set the fallback character width.
    pub fn with_avg_char_width(mut self, width: f32) -> Self {
        self.avg_char_width = width;
        self
    }

    /// Set the link rectangle margin.
    pub fn with_link_margin(mut self, margin: f32) -> Self {
        self.link_margin = margin;
        self
    }

    /// Set the paragraph gap factor.
    pub fn with_paragraph_gap_factor(mut self, factor: f32) -> Self {
        self.paragraph_gap_factor = factor;
        self
    }
}

/// Options controlling what is read from each page.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Geometric tolerances
    pub tolerances: Tolerances,

    /// Emit internal destinations (`#page=N`) as links
    pub resolve_destinations: bool,

    /// Page selection (which pages to convert)
    pub pages: PageSelection,

    /// What to do when a page cannot be read
    pub error_mode: ErrorMode,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tolerances.
    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Enable or disable internal destination links.
    pub fn with_destinations(mut self, resolve: bool) -> Self {
        self.resolve_destinations = resolve;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Abort the conversion on the first page that cannot be read.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            resolve_destinations: false,
            pages: PageSelection::All,
            error_mode: ErrorMode::Lenient,
        }
    }
}

/// Error handling mode for per-page failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the whole conversion
    Strict,
    /// Log, blank the page and continue
    #[default]
    Lenient,
}

/// Page selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start = parse_page_number(start, s)?;
                let end = parse_page_number(end, s)?;
                if start > end {
                    return Err(Error::InvalidPageRange(s.to_string()));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start = parse_page_number(start, s)?;
                let end = parse_page_number(end, s)?;
                pages.extend(start..=end);
            } else {
                pages.push(parse_page_number(part, s)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page_number(part: &str, whole: &str) -> Result<u32> {
    match part.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::InvalidPageRange(whole.to_string())),
    }
}
