//! Conversion result with per-page outputs and statistics.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{CandidateLink, PageOutput};

/// Result of converting a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertResult {
    /// The assembled Markdown
    pub markdown: String,

    /// Per-page outputs in page order
    pub pages: Vec<PageOutput>,

    /// Conversion statistics
    pub stats: ConversionStats,
}

impl ConvertResult {
    /// Create a new result.
    pub fn new(markdown: String, pages: Vec<PageOutput>, stats: ConversionStats) -> Self {
        Self {
            markdown,
            pages,
            stats,
        }
    }

    /// All candidate links, in page order.
    pub fn links(&self) -> impl Iterator<Item = &CandidateLink> {
        self.pages.iter().flat_map(|p| p.links.iter())
    }

    /// Numbers of the pages that could not be read.
    pub fn failed_pages(&self) -> Vec<u32> {
        self.pages
            .iter()
            .filter(|p| p.failed)
            .map(|p| p.number)
            .collect()
    }

    /// Serialize the whole result as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| Error::Other(format!("JSON serialization failed: {}", e)))
    }
}

/// Statistics collected while converting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages processed (including failed ones)
    pub page_count: u32,

    /// Pages whose retrieval failed and were left empty
    pub failed_page_count: u32,

    /// Candidate links located
    pub links_located: u32,

    /// Links inserted as Markdown
    pub links_spliced: u32,

    /// Links whose text could not be found on the page
    pub links_unmatched: u32,

    /// Headers emitted
    pub header_count: u32,

    /// List items emitted
    pub list_item_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,
}

impl ConversionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add word counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ConversionStats) {
        self.page_count += other.page_count;
        self.failed_page_count += other.failed_page_count;
        self.links_located += other.links_located;
        self.links_spliced += other.links_spliced;
        self.links_unmatched += other.links_unmatched;
        self.header_count += other.header_count;
        self.list_item_count += other.list_item_count;
        self.word_count += other.word_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_count_text() {
        let mut stats = ConversionStats::new();
        stats.count_text("Hello, world! This is a test.");
        assert_eq!(stats.word_count, 6);
    }

    #[test]
    fn test_stats_merge() {
        let mut stats1 = ConversionStats {
            page_count: 2,
            links_spliced: 3,
            ..Default::default()
        };
        let stats2 = ConversionStats {
            page_count: 1,
            failed_page_count: 1,
            links_unmatched: 2,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.page_count, 3);
        assert_eq!(stats1.failed_page_count, 1);
        assert_eq!(stats1.links_spliced, 3);
        assert_eq!(stats1.links_unmatched, 2);
    }

    #[test]
    fn test_failed_pages_and_json() {
        let result = ConvertResult::new(
            "text".to_string(),
            vec![
                PageOutput {
                    number: 1,
                    markdown: "text".to_string(),
                    ..Default::default()
                },
                PageOutput::failed(2),
            ],
            ConversionStats::default(),
        );

        assert_eq!(result.failed_pages(), vec![2]);
        assert_eq!(result.links().count(), 0);

        let json = result.to_json(false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["markdown"], "text");
        assert_eq!(value["pages"][1]["failed"], true);
    }
}
