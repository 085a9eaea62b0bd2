//! Section Detection
//!
//! Partitions a page into named regions (header, hero, main content,
//! sidebar, footer). Each region is located by its own detector, evaluated
//! independently of the others; a region that no detector finds is simply left
//! out.

pub mod detectors;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::CloneContext;
use crate::dom::{self, Document};
use crate::options::Options;
use crate::relevance;

pub use detectors::{Locator, SectionDetector, MAIN_CONTENT_EXCLUDED_CLASSES, SECTION_DETECTORS};

/// Fixed vocabulary of section names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionName {
    Header,
    Hero,
    MainContent,
    Sidebar,
    Footer,
    /// The whole page processed as one piece (conservative mode).
    EntireSite,
}

impl SectionName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Hero => "hero",
            Self::MainContent => "main-content",
            Self::Sidebar => "sidebar",
            Self::Footer => "footer",
            Self::EntireSite => "entire-site",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named region of a page and the stylesheet that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteSection {
    pub name: SectionName,
    /// Outer HTML of the region.
    pub html: String,
    /// Stylesheet attached to the region.
    pub css: String,
    pub description: String,
    /// Processing order; lower comes first.
    pub priority: u8,
}

impl WebsiteSection {
    /// The whole page as a single section.
    #[must_use]
    pub fn entire_site(html: impl Into<String>, css: impl Into<String>) -> Self {
        Self {
            name: SectionName::EntireSite,
            html: html.into(),
            css: css.into(),
            description: "Entire website processed conservatively".to_string(),
            priority: 0,
        }
    }
}

/// Detect the sections of `html`.
///
/// Every `<img src>` of the page is registered in `ctx` along the way. Each
/// section carries the full stylesheet unless `options.scope_section_css` is
/// set.
///
/// # Example
///
/// ```rust
/// use rs_siteclone::{CloneContext, Options, sections::{detect_sections, SectionName}};
///
/// let html = "<html><body><header>Logo</header><footer>(c)</footer></body></html>";
/// let mut ctx = CloneContext::new(None, "https://example.com");
/// let sections = detect_sections(html, "body{}", &mut ctx, &Options::default());
/// let names: Vec<_> = sections.iter().map(|s| s.name).collect();
/// assert!(names.contains(&SectionName::Header));
/// assert!(names.contains(&SectionName::Footer));
/// ```
#[must_use]
pub fn detect_sections(
    html: &str,
    css: &str,
    ctx: &mut CloneContext,
    options: &Options,
) -> Vec<WebsiteSection> {
    let doc = dom::parse(html);

    for img in dom::select_all(&doc, "img[src]") {
        if let Some(src) = dom::get_attribute(&img, "src") {
            ctx.register_image(&src);
        }
    }
    debug!(images = ctx.images().len(), "registered original images");

    let mut sections = Vec::new();
    for detector in SECTION_DETECTORS {
        let Some(fragment) = locate(&doc, detector, options) else {
            continue;
        };
        debug!(section = %detector.name, bytes = fragment.len(), "detected section");

        let section_css = if options.scope_section_css {
            relevance::filter_css(&fragment, css, &options.filter)
        } else {
            css.to_string()
        };

        sections.push(WebsiteSection {
            name: detector.name,
            html: fragment,
            css: section_css,
            description: detector.description.to_string(),
            priority: detector.priority,
        });
    }

    sections
}

/// Order sections for processing: ascending priority, detection order kept
/// among equals.
pub fn sort_by_priority(sections: &mut [WebsiteSection]) {
    sections.sort_by_key(|section| section.priority);
}

fn locate(doc: &Document, detector: &SectionDetector, options: &Options) -> Option<String> {
    match detector.locator {
        Locator::FirstMatch(candidates) => candidates.iter().find_map(|selector| {
            dom::select_first(doc, selector).map(|sel| dom::outer_html(&sel))
        }),
        Locator::LargestBlock => largest_block(doc, options.min_main_content_len)
            .or_else(|| body_contents(doc)),
    }
}

/// Largest block-level container that is not header, footer, sidebar or
/// navigation chrome, by serialized length. Ties go to the earliest block.
fn largest_block(doc: &Document, min_len: usize) -> Option<String> {
    let mut best: Option<String> = None;

    for block in dom::select_all(doc, "body div, body section, body main, body article") {
        let class = dom::class_name(&block).unwrap_or_default().to_lowercase();
        if MAIN_CONTENT_EXCLUDED_CLASSES
            .iter()
            .any(|excluded| class.contains(excluded))
        {
            continue;
        }

        let markup = dom::outer_html(&block);
        if markup.len() < min_len {
            continue;
        }
        if best.as_ref().is_none_or(|current| markup.len() > current.len()) {
            best = Some(markup);
        }
    }

    best
}

fn body_contents(doc: &Document) -> Option<String> {
    let body = dom::select_first(doc, "body")?;
    let inner = dom::inner_html(&body);
    if inner.trim().is_empty() {
        None
    } else {
        Some(inner.trim().to_string())
    }
}
