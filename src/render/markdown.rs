//! Markdown formatter.
//!
//! Classifies page lines, runs the list state machine, reflows paragraphs
//! and finally splices link syntax into the result.

use crate::model::{CandidateLink, PageOutput};

use super::assemble::assemble;
use super::classify::{LineClassifier, LineKind};
use super::normalize::normalize_text;
use super::reflow::{join_paragraph, reflow};
use super::splice::LinkSplicer;
use super::RenderOptions;

/// Format the text of one page with default rules.
pub fn format_page(text: &str, links: &[CandidateLink], options: &RenderOptions) -> FormattedPage {
    MarkdownFormatter::new(options.clone()).format_page(text, links)
}

/// Join formatted pages into the final document.
pub fn format_document(pages: &[PageOutput], options: &RenderOptions) -> String {
    assemble(pages, options.page_separator)
}

/// Markdown for one page plus what the formatter found on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedPage {
    pub markdown: String,
    pub header_count: u32,
    pub list_item_count: u32,
    pub links_spliced: u32,
    pub links_unmatched: u32,
}

/// Markdown formatter.
pub struct MarkdownFormatter {
    options: RenderOptions,
    classifier: LineClassifier,
    splicer: LinkSplicer,
}

impl MarkdownFormatter {
    /// Create a formatter with the default classification rules.
    pub fn new(options: RenderOptions) -> Self {
        let classifier = LineClassifier::new(options.header_max_len);
        Self::with_classifier(options, classifier)
    }

    /// Create a formatter with a custom classifier.
    pub fn with_classifier(options: RenderOptions, classifier: LineClassifier) -> Self {
        Self {
            options,
            classifier,
            splicer: LinkSplicer::new(),
        }
    }

    /// Get the options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Format one page of newline-separated lines.
    ///
    /// Never fails: lines no rule recognizes become paragraph text.
    pub fn format_page(&self, text: &str, links: &[CandidateLink]) -> FormattedPage {
        let mut page = if self.options.preserve_formatting {
            self.format_lines(text)
        } else {
            FormattedPage {
                markdown: reflow(&normalize_text(text)),
                ..Default::default()
            }
        };

        if self.options.preserve_links && !links.is_empty() {
            let report = self.splicer.splice(&page.markdown, links);
            page.markdown = report.text;
            page.links_spliced = report.spliced as u32;
            page.links_unmatched = report.unmatched as u32;
        }

        page
    }

    fn format_lines(&self, text: &str) -> FormattedPage {
        let mut writer = BlockWriter::default();
        let mut state = ListState::NotInList;
        let mut header_count = 0;
        let mut list_item_count = 0;

        for raw in text.lines() {
            let line = normalize_text(raw);
            let kind = self.classifier.classify(&line);

            match kind {
                LineKind::Blank => {
                    writer.flush();
                    state = ListState::NotInList;
                }
                LineKind::ListItem { .. } => {
                    state = ListState::InList;
                    list_item_count += 1;
                    writer.push(BlockKind::List, kind.to_markdown().unwrap_or_default());
                }
                _ if state == ListState::InList && is_indented(&line) => {
                    // Continuation of the previous item, kept as-is
                    writer.push(BlockKind::List, line.trim_end().to_string());
                }
                LineKind::Header { .. } => {
                    state = ListState::NotInList;
                    header_count += 1;
                    writer.push(BlockKind::Headers, kind.to_markdown().unwrap_or_default());
                }
                LineKind::Plain => {
                    state = ListState::NotInList;
                    writer.push(BlockKind::Paragraph, line.trim().to_string());
                }
            }
        }

        FormattedPage {
            markdown: writer.finish(),
            header_count,
            list_item_count,
            ..Default::default()
        }
    }
}

fn is_indented(line: &str) -> bool {
    line.starts_with(char::is_whitespace) && !line.trim().is_empty()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
    NotInList,
    InList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Paragraph,
    Headers,
    List,
}

/// Collects output lines into blocks separated by blank lines.
///
/// Consecutive lines of the same kind share a block: paragraph lines are
/// reflowed into one line, headers and list lines stay on their own lines.
#[derive(Default)]
struct BlockWriter {
    blocks: Vec<String>,
    current: Option<(BlockKind, Vec<String>)>,
}

impl BlockWriter {
    fn push(&mut self, kind: BlockKind, line: String) {
        match &mut self.current {
            Some((current_kind, lines)) if *current_kind == kind => lines.push(line),
            _ => {
                self.flush();
                self.current = Some((kind, vec![line]));
            }
        }
    }

    fn flush(&mut self) {
        if let Some((kind, lines)) = self.current.take() {
            let block = match kind {
                BlockKind::Paragraph => join_paragraph(&lines),
                BlockKind::Headers | BlockKind::List => lines.join("\n"),
            };
            if !block.trim().is_empty() {
                self.blocks.push(block);
            }
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        self.blocks.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinkPosition, Rect};

    fn format(text: &str) -> String {
        format_page(text, &[], &RenderOptions::default()).markdown
    }

    fn link(text: &str, url: &str) -> CandidateLink {
        CandidateLink {
            text: text.to_string(),
            url: url.to_string(),
            position: LinkPosition {
                x: 0.0,
                y: 0.0,
                page: 1,
            },
            bounds: Rect::default(),
        }
    }

    #[test]
    fn test_list_continuation() {
        let output = format("- Item one\n  continued\n\nNot a list");
        assert_eq!(output, "- Item one\n  continued\n\nNot a list");
    }

    #[test]
    fn test_dedented_line_ends_list() {
        let output = format("• First\n• Second\nback to prose here");
        assert_eq!(output, "- First\n- Second\n\nback to prose here");
    }

    #[test]
    fn test_header_idempotence() {
        let once = format("INTRODUCTION\nsome body text follows.");
        assert_eq!(once, "## INTRODUCTION\n\nsome body text follows.");
        assert_eq!(format(&once), once);
    }

    #[test]
    fn test_consecutive_headers_stay_adjacent() {
        let output = format("PART ONE\nChapter Overview\nthe body starts here.");
        assert_eq!(
            output,
            "## PART ONE\n## Chapter Overview\n\nthe body starts here."
        );
    }

    #[test]
    fn test_paragraph_reflow() {
        let output = format("this is a line that\nwraps onto the next\n\n\n\nand a new para-\ngraph starts.");
        assert_eq!(
            output,
            "this is a line that wraps onto the next\n\nand a new paragraph starts."
        );
    }

    #[test]
    fn test_ordered_items() {
        let output = format("1. first step\n2) second step");
        assert_eq!(output, "1. first step\n2) second step");
    }

    #[test]
    fn test_raw_mode_skips_classification() {
        let options = RenderOptions::default().with_formatting(false);
        let page = format_page("INTRODUCTION\n- item\nnext", &[], &options);
        assert_eq!(page.markdown, "INTRODUCTION - item next");
        assert_eq!(page.header_count, 0);
    }

    #[test]
    fn test_links_spliced_after_reflow() {
        let page = format_page(
            "click Home\nfor info",
            &[link("Home", "http://a.com")],
            &RenderOptions::default(),
        );
        assert_eq!(page.markdown, "click [Home](http://a.com) for info");
        assert_eq!(page.links_spliced, 1);
    }

    #[test]
    fn test_links_disabled() {
        let options = RenderOptions::default().with_links(false);
        let page = format_page("click Home now", &[link("Home", "http://a.com")], &options);
        assert_eq!(page.markdown, "click Home now");
        assert_eq!(page.links_spliced, 0);
    }

    #[test]
    fn test_counts() {
        let page = format_page(
            "SUMMARY\n- one\n- two\n3. three",
            &[],
            &RenderOptions::default(),
        );
        assert_eq!(page.header_count, 1);
        assert_eq!(page.list_item_count, 3);
    }

    #[test]
    fn test_ligatures_normalized() {
        assert_eq!(format("the \u{FB01}nal o\u{FB00}er"), "the final offer");
    }

    #[test]
    fn test_format_document() {
        let pages = vec![
            PageOutput {
                number: 2,
                markdown: "two".to_string(),
                ..Default::default()
            },
            PageOutput {
                number: 1,
                markdown: "one".to_string(),
                ..Default::default()
            },
        ];
        assert_eq!(format_document(&pages, &RenderOptions::default()), "one\n\ntwo");
    }
}
