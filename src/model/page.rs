//! Page-level types.

use serde::{Deserialize, Serialize};

use super::{CandidateLink, LinkAnnotation, TextRun};

/// Everything the PDF decoder supplies for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: u32,
    /// Text runs in decoder order
    pub runs: Vec<TextRun>,
    /// Annotations in decoder order
    pub annotations: Vec<LinkAnnotation>,
}

impl PageContent {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            runs: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Add a text run.
    pub fn with_run(mut self, run: TextRun) -> Self {
        self.runs.push(run);
        self
    }

    /// Add an annotation.
    pub fn with_annotation(mut self, annotation: LinkAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// The result of converting one page.
///
/// Returned by value from the page step to the assembler; nothing about a
/// page outlives the conversion call that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageOutput {
    /// Page number (1-indexed)
    pub number: u32,
    /// Formatted Markdown for the page
    pub markdown: String,
    /// Candidate links located on the page
    pub links: Vec<CandidateLink>,
    /// Whether retrieval failed and the page was blanked
    pub failed: bool,
}

impl PageOutput {
    /// An empty page standing in for one whose retrieval failed.
    pub fn failed(number: u32) -> Self {
        Self {
            number,
            markdown: String::new(),
            links: Vec::new(),
            failed: true,
        }
    }

    /// Check if the page produced no text.
    pub fn is_empty(&self) -> bool {
        self.markdown.trim().is_empty()
    }
}
