//! End-to-end clone pipeline with in-memory collaborators.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rs_siteclone::generate::is_faithful;
use rs_siteclone::{
    clone_conservative, clone_url, CloneMode, CloneResult, Error, Generator, Options,
    PageFetcher, ProcessingMethod, Result, ScrapedContext, SectionName,
};

struct MapFetcher(HashMap<&'static str, &'static str>);

#[async_trait]
impl PageFetcher for MapFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.0
            .get(url)
            .map(|body| (*body).to_string())
            .ok_or_else(|| Error::Fetch {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
    }
}

/// Rewrites every section the same way and remembers the prompts it saw.
struct EchoGenerator {
    reply: &'static str,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.to_string())
    }
}

const PAGE_URL: &str = "https://campus.test/news/";

const PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Campus News</title>
<link rel="stylesheet" href="/static/site.css">
<link rel="stylesheet" href="https://down.test/broken.css">
<style>.story { color: #222 }</style>
</head><body>
<header class="masthead"><img src="/img/logo.png"><a href="https://campus.test/">Home</a></header>
<footer><a href="https://campus.test/contact">Contact</a><form action="/subscribe"></form></footer>
</body></html>"#;

fn fetcher() -> MapFetcher {
    MapFetcher(HashMap::from([
        (PAGE_URL, PAGE),
        ("https://campus.test/static/site.css", "header { height: 4rem }"),
    ]))
}

fn fast() -> Options {
    Options {
        generation_delay: Duration::ZERO,
        ..Options::default()
    }
}

#[tokio::test]
async fn conservative_clone_from_url() {
    let result = clone_url(PAGE_URL, &fetcher(), None, &Options::default())
        .await
        .unwrap();

    assert_eq!(result.method, CloneMode::Conservative);
    assert_eq!(result.original_url, PAGE_URL);
    assert_eq!(result.images, ["https://campus.test/img/logo.png"]);

    let doc = &result.combined_html;
    assert!(doc.contains("<title>Campus News</title>"));
    assert!(doc.contains(".story { color: #222 }"));
    assert!(doc.contains("header { height: 4rem }"));
    assert!(doc.contains(r#"src="https://campus.test/img/logo.png""#));
    assert!(!doc.contains(r#"href="https://campus.test/contact""#));
    assert!(doc.contains(r##"action="#""##));
    assert_eq!(doc.matches("<body").count(), 1);
}

#[tokio::test]
async fn unreachable_page_is_fatal() {
    let err = clone_url("https://nowhere.test/", &fetcher(), None, &Options::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Fetch { .. }));
}

#[tokio::test]
async fn image_dropping_rewrite_falls_back_to_original() {
    let generator = EchoGenerator {
        reply: "Here you go:\n```html\n<header><p>A lovely header without any pictures at all, promise.</p></header>\n```\n```css\nheader { color: blue }\n```",
        prompts: Mutex::new(Vec::new()),
    };

    let result = clone_url(PAGE_URL, &fetcher(), Some(&generator), &fast())
        .await
        .unwrap();
    assert_eq!(result.method, CloneMode::Generative);

    let header = result
        .sections
        .iter()
        .find(|s| s.section_name == SectionName::Header)
        .unwrap();
    assert_eq!(header.method, ProcessingMethod::OriginalWithFixes);
    assert!(header.html.contains("<img"));
    assert!(header.html.contains(r##"href="#""##));

    let footer = result
        .sections
        .iter()
        .find(|s| s.section_name == SectionName::Footer)
        .unwrap();
    assert_eq!(footer.method, ProcessingMethod::AiGenerated);
    assert_eq!(footer.css, "header { color: blue }");

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), result.sections.len());
    assert!(prompts.iter().all(|p| p.contains("```html\n")));
}

#[test]
fn fidelity_check_rejects_two_to_zero_images() {
    let original = r#"<div><img src="a.png"><img src="b.png"></div>"#;
    let rewrite = "<div>No pictures here, but plenty of text to pass length.</div>";
    assert!(!is_faithful(original, rewrite, 0.5));
    assert!(is_faithful(original, original, 0.5));
}

#[test]
fn conservative_output_is_stable_under_renormalization() {
    let scraped = ScrapedContext::from_parts(PAGE_URL, PAGE, "body { margin: 0 }");
    let result = clone_conservative(&scraped, &Options::default());

    let again = rs_siteclone::normalize::normalize_html(
        &result.combined_html,
        &rs_siteclone::url_utils::Origin::new(Some(PAGE_URL), "https://fallback.test"),
        rs_siteclone::normalize::Scope::Full,
    );
    assert_eq!(again, result.combined_html);
}

#[test]
fn clone_result_serializes_to_json() {
    let scraped = ScrapedContext::from_parts(PAGE_URL, PAGE, "");
    let result = clone_conservative(&scraped, &Options::default());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["method"], "conservative");
    assert_eq!(json["sections"][0]["section_name"], "entire-site");
    assert_eq!(json["sections"][0]["method"], "conservative");

    let back: CloneResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, result);
}

#[test]
fn document_title_option_overrides_page_title() {
    let scraped = ScrapedContext::from_parts(PAGE_URL, PAGE, "");
    let options = Options {
        document_title: Some("Mirror".to_string()),
        ..Options::default()
    };
    let result = clone_conservative(&scraped, &options);
    assert!(result.combined_html.contains("<title>Mirror</title>"));
}

#[test]
fn repeated_images_listed_once() {
    let scraped = ScrapedContext::from_parts(
        "https://example.com/",
        r#"<html><body><img src="/a.png"><p>x</p><img src="/a.png"></body></html>"#,
        "",
    );
    let result = clone_conservative(&scraped, &Options::default());
    assert_eq!(result.images, ["https://example.com/a.png"]);
}

#[tokio::test]
async fn whole_page_option_uses_a_single_generation_call() {
    let generator = EchoGenerator {
        reply: "```html\n<html><head><title>Campus News</title></head><body><header class=\"masthead\"><img src=\"/img/logo.png\"></header></body></html>\n```\n```css\n.masthead { height: 3rem }\n```",
        prompts: Mutex::new(Vec::new()),
    };
    let options = Options {
        whole_page_generation: true,
        ..fast()
    };

    let result = clone_url(PAGE_URL, &fetcher(), Some(&generator), &options)
        .await
        .unwrap();

    assert_eq!(result.method, CloneMode::WholePage);
    assert_eq!(result.section_count(), 1);
    assert_eq!(result.sections[0].method, ProcessingMethod::AiGenerated);

    let doc = &result.combined_html;
    assert!(doc.find(".masthead { height: 3rem }").unwrap() < doc.find("<title>").unwrap());
    assert!(doc.contains(r#"src="https://campus.test/img/logo.png""#));

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("\"title\": \"Campus News\""));
    assert!(prompts[0].contains("header { height: 4rem }"));
    assert!(!prompts[0].contains("<style"));
}
