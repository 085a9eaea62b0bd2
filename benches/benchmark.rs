//! Performance benchmarks for rs-siteclone.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - The relevance filter over a synthetic stylesheet of growing size
//! - Section detection and conservative cloning of a small page

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rs_siteclone::{
    clone_conservative, detect_sections, filter_css, CloneContext, FilterConfig, Options,
    ScrapedContext,
};

const SAMPLE_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Sample Campus Page</title>
</head>
<body>
    <header class="site-header">
        <img class="logo" src="/img/logo.svg" alt="Logo">
        <nav class="main-nav">
            <a href="/">Home</a>
            <a href="https://example.com/about">About</a>
        </nav>
    </header>
    <div class="hero-banner"><h1>Welcome</h1></div>
    <main id="content">
        <article class="story">
            <h2>Sample Story</h2>
            <p>The first paragraph carries enough text for the main content detector to
            consider this block, which needs a few hundred bytes of serialized markup
            before it is anything other than noise.</p>
            <p>A second paragraph with an image <img src="photos/quad.jpg"
            srcset="photos/quad-2x.jpg 2x, /photos/quad-3x.jpg 3x"> and a
            <a href="https://example.com/news">link</a> to rewrite.</p>
            <form action="/search"><input name="q"><button class="btn">Go</button></form>
        </article>
    </main>
    <aside class="sidebar"><ul><li>Related</li></ul></aside>
    <footer class="site-footer"><p>Copyright 2026</p></footer>
</body>
</html>
"#;

fn synthetic_css(rules: usize) -> String {
    let mut css = String::from("/* generated */\nbody { margin: 0 }\n");
    for i in 0..rules {
        css.push_str(&format!(".unused-{i} {{ color: #{i:06x} }}\n"));
        css.push_str(&format!(".story .p{i}, h2:hover {{ padding: {i}px }}\n"));
        if i % 10 == 0 {
            css.push_str(&format!("@media (min-width: {i}px) {{ .card-{i} {{ x: y }} }}\n"));
        }
    }
    css
}

fn bench_filter_css(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_css");
    let config = FilterConfig::default();

    for rules in [100usize, 1_000, 10_000] {
        let css = synthetic_css(rules);
        group.throughput(Throughput::Bytes(css.len() as u64));
        group.bench_with_input(BenchmarkId::new("default", rules), &css, |b, css| {
            b.iter(|| filter_css(black_box(SAMPLE_HTML), black_box(css), &config));
        });
    }

    group.finish();
}

fn bench_detect_sections(c: &mut Criterion) {
    let css = synthetic_css(100);
    let options = Options::default();

    c.bench_function("detect_sections", |b| {
        b.iter(|| {
            let mut ctx = CloneContext::new(Some("https://example.com/"), &options.fallback_origin);
            detect_sections(black_box(SAMPLE_HTML), black_box(&css), &mut ctx, &options)
        });
    });
}

fn bench_clone_conservative(c: &mut Criterion) {
    let scraped = ScrapedContext::from_parts("https://example.com/", SAMPLE_HTML, &synthetic_css(100));
    let options = Options::default();

    c.bench_function("clone_conservative", |b| {
        b.iter(|| clone_conservative(black_box(&scraped), &options));
    });
}

criterion_group!(
    benches,
    bench_filter_css,
    bench_detect_sections,
    bench_clone_conservative
);
criterion_main!(benches);
