//! Performance benchmarks for rs-html-extract.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - Small synthetic HTML (~1KB) for parse, select and extraction
//! - Generated pages of increasing size for throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rs_html_extract::{extract_links, extract_text, extract_with_options, parse, ExtractMode, Options, Selector};

const SAMPLE_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Sample Article</title>
    <link rel="stylesheet" href="/static/site.css">
    <script src="/static/app.js"></script>
</head>
<body>
    <nav>
        <a href="/">Home</a>
        <a href="/about">About</a>
    </nav>
    <article>
        <h1>Sample Article Title</h1>
        <p class="byline">By Jane Doe</p>
        <div class="item"><span>First item</span><p><span>nested</span></p></div>
        <div class="item"><span>Second item</span></div>
        <p>This is the first paragraph of the article. It contains <b>some</b>
        meaningful content &amp; a few references.</p>
        <img src="/img/figure.png" alt="figure">
    </article>
    <footer>
        <p>Copyright 2024</p>
    </footer>
</body>
</html>
"#;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse", |b| {
        b.iter(|| parse(black_box(SAMPLE_HTML)));
    });
}

fn bench_select(c: &mut Criterion) {
    let doc = parse(SAMPLE_HTML);
    let Ok(selector) = Selector::parse("article div.item > span, footer p") else {
        return;
    };

    c.bench_function("select", |b| {
        b.iter(|| doc.select(black_box(&selector)));
    });
}

fn bench_extract(c: &mut Criterion) {
    c.bench_function("extract_text", |b| {
        b.iter(|| extract_text(black_box(SAMPLE_HTML), Some("div.item > span")));
    });
    c.bench_function("extract_links", |b| {
        b.iter(|| extract_links(black_box(SAMPLE_HTML)));
    });

    let options = Options::crawler(ExtractMode::Links);
    c.bench_function("extract_links_crawler", |b| {
        b.iter(|| extract_with_options(black_box(SAMPLE_HTML), black_box(&options)));
    });
}

/// Pages built from repeated list items, to measure throughput by size.
fn bench_large_pages(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_pages");

    for items in [100, 1_000, 10_000] {
        let body: String = (0..items)
            .map(|i| format!(r#"<li class="row"><a href="/item/{i}">Item <b>{i}</b></a></li>"#))
            .collect();
        let html = format!("<html><body><ul>{body}</ul></body></html>");

        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("extract_text", items), &html, |b, html| {
            b.iter(|| extract_text(black_box(html), Some("li.row > a")));
        });
        group.bench_with_input(BenchmarkId::new("extract_links", items), &html, |b, html| {
            b.iter(|| extract_links(black_box(html)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_select, bench_extract, bench_large_pages);
criterion_main!(benches);
