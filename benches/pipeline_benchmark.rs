//! Benchmarks for the pdf2md conversion pipeline.
//!
//! Run with: cargo bench
//!
//! Pages are synthesized as text runs so the numbers measure layout,
//! link location and formatting without PDF decoding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pdf2md::convert::{ConvertOptions, Converter};
use pdf2md::parser::{extract_text, locate_links, ExtractOptions, Tolerances};
use pdf2md::render::splice_links;
use pdf2md::{LinkAnnotation, PageContent, Rect, TextRun};

const WORDS: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "and", "keeps", "running",
];

/// Creates a page of `lines` lines, with a link on every fifth line.
fn create_page(number: u32, lines: usize) -> PageContent {
    let mut page = PageContent::new(number).with_run(TextRun::new("SECTION HEADING", 72.0, 760.0));

    for line in 0..lines {
        let y = 740.0 - line as f32 * 14.0;
        let mut x = 72.0;
        for (i, word) in WORDS.iter().enumerate() {
            if line % 7 == 0 && i == 0 {
                page = page.with_run(TextRun::new("-", x, y).with_width(6.0));
                x += 10.0;
            }
            let width = word.len() as f32 * 6.0;
            page = page.with_run(TextRun::new(*word, x, y).with_width(width));
            if line % 5 == 0 && i == 3 {
                page = page.with_annotation(LinkAnnotation::uri(
                    format!("https://example.com/{}/{}", number, line),
                    Rect::new(x - 1.0, y - 3.0, x + width - 2.0, y + 10.0),
                ));
            }
            x += width + 5.0;
        }
    }

    page
}

fn create_document(pages: u32) -> Vec<PageContent> {
    (1..=pages).map(|n| create_page(n, 40)).collect()
}

/// Benchmark the per-page stages on their own.
fn bench_page_stages(c: &mut Criterion) {
    let page = create_page(1, 40);
    let tolerances = Tolerances::default();
    let options = ExtractOptions::default();

    c.bench_function("extract_text", |b| {
        b.iter(|| extract_text(black_box(&page.runs), &tolerances));
    });

    c.bench_function("locate_links", |b| {
        b.iter(|| locate_links(1, black_box(&page.runs), &page.annotations, &options));
    });

    let text = extract_text(&page.runs, &tolerances);
    let links = locate_links(1, &page.runs, &page.annotations, &options);
    c.bench_function("splice_links", |b| {
        b.iter(|| splice_links(black_box(&text), &links));
    });
}

/// Benchmark whole-document conversion, parallel and sequential.
fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");

    for page_count in [1, 10, 50].iter() {
        let document = create_document(*page_count);

        group.bench_function(format!("{}_pages_parallel", page_count), |b| {
            let converter = Converter::default();
            b.iter(|| converter.convert_source(black_box(&document)).unwrap());
        });

        group.bench_function(format!("{}_pages_sequential", page_count), |b| {
            let converter = Converter::new(ConvertOptions::new().sequential());
            b.iter(|| converter.convert_source(black_box(&document)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_page_stages, bench_conversion);
criterion_main!(benches);
