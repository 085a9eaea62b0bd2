//! Page Scraping
//!
//! Fetches a page and everything needed to restyle it: title, image list,
//! inline `<style>` blocks and linked stylesheets. The result is an immutable
//! [`ScrapedContext`] snapshot that the clone pipeline consumes.

pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::dom;
use crate::error::Result;
use crate::stylesheet;
use crate::url_utils::{create_absolute_url, parse_url};

pub use client::HttpFetcher;

/// Title recorded when the page has no `<title>`.
pub const UNTITLED: &str = "Untitled";

/// Retrieves the text of a URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Snapshot of a scraped page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedContext {
    pub title: String,
    /// `src` of every `<img>`, as written in the page.
    pub images: Vec<String>,
    pub summary: String,
    /// Inline styles followed by linked stylesheets, in document order.
    pub css_contents: String,
    pub html: String,
    pub url: String,
}

impl ScrapedContext {
    /// Build a context from already retrieved page HTML and CSS.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rs_siteclone::ScrapedContext;
    ///
    /// let ctx = ScrapedContext::from_parts(
    ///     "https://example.com/",
    ///     "<title>Home</title><img src=\"/a.png\">",
    ///     ".a { b: c }",
    /// );
    /// assert_eq!(ctx.title, "Home");
    /// assert_eq!(ctx.summary, "Website: Home\nImages: 1\nCSS rules: 1");
    /// ```
    #[must_use]
    pub fn from_parts(url: &str, html: &str, css: &str) -> Self {
        let assets = PageAssets::collect(html, url);
        Self::assemble(url, html.to_string(), assets.title, assets.images, css.to_string())
    }

    fn assemble(
        url: &str,
        html: String,
        title: String,
        images: Vec<String>,
        css_contents: String,
    ) -> Self {
        let summary = summarize(&title, images.len(), &css_contents);
        Self {
            title,
            images,
            summary,
            css_contents,
            html,
            url: url.to_string(),
        }
    }
}

/// One-paragraph description of a scraped page.
#[must_use]
pub fn summarize(title: &str, image_count: usize, css: &str) -> String {
    let rule_count = stylesheet::parse_rules(&stylesheet::strip_comments(css)).len();
    format!("Website: {title}\nImages: {image_count}\nCSS rules: {rule_count}")
}

/// What the DOM pass pulls out of a page. Owned so that no parsed document
/// is held across an await point.
#[derive(Debug, Default)]
struct PageAssets {
    title: String,
    images: Vec<String>,
    inline_css: String,
    stylesheet_urls: Vec<String>,
}

impl PageAssets {
    fn collect(html: &str, page_url: &str) -> Self {
        let doc = dom::parse(html);

        let title = dom::select_first(&doc, "title")
            .map(|t| dom::text_content(&t).trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let images = dom::select_all(&doc, "img[src]")
            .iter()
            .filter_map(|img| dom::get_attribute(img, "src"))
            .filter(|src| !src.trim().is_empty())
            .collect();

        let mut inline_css = String::new();
        for style in dom::select_all(&doc, "style") {
            inline_css.push_str(&dom::text_content(&style));
            inline_css.push('\n');
        }

        let base = parse_url(page_url);
        let stylesheet_urls = dom::select_all(&doc, r#"link[rel~="stylesheet"][href]"#)
            .iter()
            .filter_map(|link| dom::get_attribute(link, "href"))
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty())
            .map(|href| match &base {
                Some(base) => create_absolute_url(&href, base),
                None => href,
            })
            .collect();

        Self {
            title,
            images,
            inline_css,
            stylesheet_urls,
        }
    }
}

/// Scrape `url`.
///
/// Only the page fetch itself can fail; a linked stylesheet that cannot be
/// fetched is logged and left out.
///
/// # Errors
///
/// Returns the fetcher's error when the page cannot be retrieved.
#[instrument(skip(fetcher))]
pub async fn scrape(url: &str, fetcher: &dyn PageFetcher) -> Result<ScrapedContext> {
    let html = fetcher.fetch_text(url).await?;
    let PageAssets {
        title,
        images,
        mut inline_css,
        stylesheet_urls,
    } = PageAssets::collect(&html, url);

    for href in &stylesheet_urls {
        match fetcher.fetch_text(href).await {
            Ok(css) => {
                debug!(stylesheet = %href, bytes = css.len(), "fetched stylesheet");
                inline_css.push_str(&css);
                inline_css.push('\n');
            }
            Err(e) => warn!(stylesheet = %href, error = %e, "skipping stylesheet"),
        }
    }

    let scraped = ScrapedContext::assemble(url, html, title, images, inline_css);
    debug!(
        html_len = scraped.html.len(),
        css_len = scraped.css_contents.len(),
        images = scraped.images.len(),
        "scraped page"
    );
    Ok(scraped)
}
