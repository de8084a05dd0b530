//! Integration tests for the converter module.

use pdf2md::convert::{ConvertOptions, Converter};
use pdf2md::error::{Error, Result};
use pdf2md::parser::{extract_lines, locate_links, ExtractOptions, PageSource, Tolerances};
use pdf2md::render::{splice_links, RenderOptions};
use pdf2md::{
    CandidateLink, LinkAnnotation, LinkPosition, PageContent, PageSelection, PageSeparator, Rect,
    TextRun,
};

/// Mock source whose listed pages fail during text retrieval.
struct MockSource {
    pages: Vec<PageContent>,
    failing: Vec<u32>,
}

impl MockSource {
    fn new(pages: Vec<PageContent>) -> Self {
        Self {
            pages,
            failing: Vec::new(),
        }
    }

    fn failing_on(mut self, page: u32) -> Self {
        self.failing.push(page);
        self
    }
}

impl PageSource for MockSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn text_runs(&self, page: u32) -> Result<Vec<TextRun>> {
        if self.failing.contains(&page) {
            return Err(Error::TextExtract(format!("page {}: corrupt stream", page)));
        }
        self.pages.text_runs(page)
    }

    fn link_annotations(&self, page: u32) -> Result<Vec<LinkAnnotation>> {
        self.pages.link_annotations(page)
    }
}

fn three_pages() -> Vec<PageContent> {
    vec![
        PageContent::new(1)
            .with_run(TextRun::new("INTRODUCTION", 72.0, 720.0))
            .with_run(TextRun::new("Click", 72.0, 700.0).with_width(30.0))
            .with_run(TextRun::new("Home", 106.0, 700.0).with_width(28.0))
            .with_run(TextRun::new("for info", 140.0, 700.0).with_width(40.0))
            .with_annotation(LinkAnnotation::uri(
                "http://a.com",
                Rect::new(104.0, 695.0, 136.0, 710.0),
            )),
        PageContent::new(2).with_run(TextRun::new("middle page", 72.0, 720.0)),
        PageContent::new(3)
            .with_run(TextRun::new("- first item", 72.0, 720.0))
            .with_run(TextRun::new("- second item", 72.0, 700.0)),
    ]
}

fn candidate(text: &str, url: &str) -> CandidateLink {
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
fn test_full_document() {
    let source = MockSource::new(three_pages());
    let result = Converter::default().convert_source(&source).unwrap();

    assert_eq!(
        result.markdown,
        "## INTRODUCTION\n\nClick [Home](http://a.com) for info\n\nmiddle page\n\n- first item\n- second item"
    );
    assert_eq!(result.stats.page_count, 3);
    assert_eq!(result.stats.failed_page_count, 0);
    assert_eq!(result.stats.links_spliced, 1);
    assert_eq!(result.stats.list_item_count, 2);
}

#[test]
fn test_page_failure_isolation() {
    let source = MockSource::new(three_pages()).failing_on(2);
    let options = ConvertOptions::new()
        .with_render_options(RenderOptions::new().with_separator(PageSeparator::Rule));
    let result = Converter::new(options).convert_source(&source).unwrap();

    let sections: Vec<&str> = result.markdown.split("\n\n---\n\n").collect();
    assert_eq!(sections.len(), 3);
    assert!(sections[0].contains("[Home](http://a.com)"));
    assert_eq!(sections[1], "");
    assert!(sections[2].contains("- first item"));

    assert_eq!(result.failed_pages(), vec![2]);
    assert_eq!(result.stats.failed_page_count, 1);
    assert_eq!(result.stats.page_count, 3);
}

#[test]
fn test_strict_mode_propagates_page_error() {
    let source = MockSource::new(three_pages()).failing_on(2);
    let options =
        ConvertOptions::new().with_extract_options(ExtractOptions::new().strict());
    let result = Converter::new(options).convert_source(&source);

    assert!(matches!(result, Err(Error::TextExtract(_))));
}

#[test]
fn test_deterministic_output() {
    let source = MockSource::new(three_pages());
    let converter = Converter::default();

    let first = converter.convert_source(&source).unwrap();
    let second = converter.convert_source(&source).unwrap();
    assert_eq!(first.markdown, second.markdown);

    let sequential = Converter::new(ConvertOptions::new().sequential())
        .convert_source(&source)
        .unwrap();
    assert_eq!(first.markdown, sequential.markdown);
}

#[test]
fn test_converter_reused_across_documents() {
    let converter = Converter::default();
    let first = converter
        .convert_source(&MockSource::new(three_pages()))
        .unwrap();
    let other = vec![PageContent::new(1).with_run(TextRun::new("unrelated text", 0.0, 0.0))];
    let second = converter.convert_source(&other).unwrap();

    assert_eq!(second.markdown, "unrelated text");
    assert!(second.links().next().is_none());
    assert_eq!(first.links().count(), 1);
}

#[test]
fn test_page_selection_skips_failing_page() {
    let source = MockSource::new(three_pages()).failing_on(2);
    let options = ConvertOptions::new()
        .with_extract_options(ExtractOptions::new().strict().with_pages(
            PageSelection::parse("1,3").unwrap(),
        ));
    let result = Converter::new(options).convert_source(&source).unwrap();

    assert_eq!(result.pages.len(), 2);
    assert!(result.failed_pages().is_empty());
}

#[test]
fn test_header_idempotence() {
    let once = Converter::default()
        .convert_source(&vec![PageContent::new(1).with_run(TextRun::new(
            "SUMMARY",
            0.0,
            0.0,
        ))])
        .unwrap();
    assert_eq!(once.markdown, "## SUMMARY");

    let twice = Converter::default()
        .convert_source(&vec![PageContent::new(1).with_run(TextRun::new(
            once.markdown.clone(),
            0.0,
            0.0,
        ))])
        .unwrap();
    assert_eq!(twice.markdown, "## SUMMARY");
}

#[test]
fn test_no_double_link_wrapping() {
    let text = "Visit [Home](http://x.com) today";
    let report = splice_links(text, &[candidate("Home", "http://x.com")]);
    assert_eq!(report.text, text);
}

#[test]
fn test_exact_link_substitution() {
    let report = splice_links("Click Home for info", &[candidate("Home", "http://a.com")]);
    assert_eq!(report.text.matches("[Home](http://a.com)").count(), 1);
    assert!(report.text.starts_with("Click "));
    assert!(report.text.ends_with(" for info"));
}

#[test]
fn test_line_grouping_by_tolerance() {
    let tolerances = Tolerances::default().with_line_tolerance(0.05);

    let same = vec![
        TextRun::new("left", 0.0, 100.0).with_width(30.0),
        TextRun::new("right", 40.0, 100.02).with_width(30.0),
    ];
    assert_eq!(extract_lines(&same, &tolerances).len(), 1);

    let apart = vec![
        TextRun::new("lower", 0.0, 100.0),
        TextRun::new("upper", 0.0, 110.0),
    ];
    let lines = extract_lines(&apart, &tolerances);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "upper");
    assert_eq!(lines[1].text, "lower");
}

#[test]
fn test_multi_run_link_merge() {
    let runs = vec![
        TextRun::new("Go", 0.0, 100.0),
        TextRun::new("ogle", 16.0, 100.0),
    ];
    let annotations = vec![LinkAnnotation::uri(
        "http://g.com",
        Rect::new(0.0, 95.0, 60.0, 110.0),
    )];

    let links = locate_links(1, &runs, &annotations, &ExtractOptions::default());
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].text, "Google");
    assert_eq!(links[0].url, "http://g.com");
}

#[test]
fn test_link_split_into_glyphs() {
    let mut page = PageContent::new(1).with_annotation(LinkAnnotation::uri(
        "https://apple.com",
        Rect::new(70.0, 695.0, 104.0, 712.0),
    ));
    for (i, c) in "Apple".chars().enumerate() {
        page = page.with_run(TextRun::new(c.to_string(), 72.0 + 6.0 * i as f32, 700.0).with_width(6.0));
    }

    let result = Converter::default().convert_source(&vec![page]).unwrap();
    assert!(result.markdown.contains("[Apple](https://apple.com)"));
    assert_eq!(result.stats.links_spliced, 1);
    assert_eq!(result.stats.links_unmatched, 0);
}

#[test]
fn test_same_url_linked_on_two_lines() {
    let page = PageContent::new(1)
        .with_run(TextRun::new("see", 72.0, 700.0).with_width(18.0))
        .with_run(TextRun::new("Docs", 96.0, 700.0).with_width(24.0))
        .with_run(TextRun::new("and", 72.0, 680.0).with_width(18.0))
        .with_run(TextRun::new("Docs", 96.0, 680.0).with_width(24.0))
        .with_annotation(LinkAnnotation::uri(
            "https://d.io",
            Rect::new(94.0, 695.0, 122.0, 712.0),
        ))
        .with_annotation(LinkAnnotation::uri(
            "https://d.io",
            Rect::new(94.0, 675.0, 122.0, 692.0),
        ));

    let result = Converter::default().convert_source(&vec![page]).unwrap();
    assert_eq!(
        result.markdown,
        "see [Docs](https://d.io) and [Docs](https://d.io)"
    );
    assert_eq!(result.stats.links_located, 2);
    assert_eq!(result.stats.links_spliced, 2);
}
