//! Generative Rewriting
//!
//! The text-generation collaborator and everything around one call to it:
//! prompt formatting, pulling the `html`/`css` code fences out of free-form
//! output, and the fidelity check that decides whether a rewrite may replace
//! the original fragment.

pub mod client;

use async_trait::async_trait;
use serde::Serialize;

use crate::dom;
use crate::error::Result;
use crate::options::Options;
use crate::patterns::IMG_TAG;
use crate::sections::WebsiteSection;

pub use client::{ClientConfig, MessagesClient};

/// Turns a prompt into free-form text.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

// === Prompt ===

/// Prompt asking for a faithful rewrite of `section`.
///
/// The section's HTML and CSS are each cut to `options.prompt_fragment_limit`
/// characters.
#[must_use]
pub fn format_section_prompt(section: &WebsiteSection, options: &Options) -> String {
    let limit = options.prompt_fragment_limit;
    let html = truncate_chars(&section.html, limit);
    let css = truncate_chars(&section.css, limit);
    let name = section.name;

    format!(
        "Recreate this {name} section with clean HTML and CSS. CRITICAL REQUIREMENTS:
- Keep ALL original styling and layout exactly as shown
- DO NOT CHANGE ANY img src attributes - keep them exactly as they are
- Replace all external navigation links with href=\"#\"
- Preserve all visual elements, colors, fonts, spacing
- Make sure the result looks identical to the original
- IMPORTANT: Copy img tags exactly as they appear in the original
- Keep all CSS classes and styling intact

HTML:
```html
{html}
```

CSS:
```css
{css}
```

Return only:
```html
[recreated HTML with EXACT same img tags, classes, and # navigation links]
```

```css
[recreated CSS with exact original styling]
```"
    )
}

/// Number of image URLs listed in a [`PageSummary`].
pub const SUMMARY_IMAGE_LIMIT: usize = 10;

/// What a whole-page prompt says about the page besides its markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub title: String,
    /// Number of distinct images on the page.
    pub image_count: usize,
    /// The first [`SUMMARY_IMAGE_LIMIT`] image URLs.
    pub images: Vec<String>,
    pub summary: String,
}

impl PageSummary {
    #[must_use]
    pub fn new(title: &str, images: &[String], summary: &str) -> Self {
        Self {
            title: title.to_string(),
            image_count: images.len(),
            images: images.iter().take(SUMMARY_IMAGE_LIMIT).cloned().collect(),
            summary: summary.to_string(),
        }
    }
}

/// Page markup without `script`, `noscript` and `style` elements.
#[must_use]
pub fn minimal_markup(html: &str) -> String {
    let doc = dom::parse_like(html);
    dom::remove_all(&doc, "script, noscript, style");
    dom::serialize_like(&doc, html)
}

/// Prompt asking for the whole page in one go.
///
/// `markup` is cut to `options.page_prompt_html_limit` characters; the CSS is
/// passed whole, so filter it first.
#[must_use]
pub fn format_page_prompt(
    summary: &PageSummary,
    markup: &str,
    css: &str,
    options: &Options,
) -> String {
    let summary_json = serde_json::to_string_pretty(summary).unwrap_or_default();
    let html = truncate_chars(markup, options.page_prompt_html_limit);

    format!(
        "You are a web developer recreating a website from the following information.

## Website Summary
{summary_json}

## Original Website HTML Structure
```html
{html}
```

## Critical CSS from Original
```css
{css}
```

## Requirements
- Recreate the EXACT layout and structure of the original website
- Use the same HTML elements and structure as the original
- Include all images from the original website (use the image URLs provided)
- Match the original styling, colors, fonts, and layout as closely as possible
- Use the CSS from the original website as a base
- Maintain the original navigation, headers, footers, and content sections
- Replace all external navigation links with href=\"#\"

Return BOTH code blocks, in exactly this format:

```html
[complete HTML document]
```

```css
[complete CSS]
```"
    )
}

/// The first `max` characters of `s`.
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(idx, _)| &s[..idx])
}

// === Code fences ===

/// Language of a fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLanguage {
    Html,
    Css,
}

impl CodeLanguage {
    fn accepts_label(self, label: &str) -> bool {
        match self {
            Self::Html => matches!(label, "html" | "htm" | "xhtml"),
            Self::Css => label == "css",
        }
    }

    /// Guess for a fence that carries no label.
    fn accepts_content(self, body: &str) -> bool {
        let body = body.trim_start();
        match self {
            Self::Html => body.starts_with('<'),
            Self::Css => !body.starts_with('<') && body.contains('{'),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Fence<'a> {
    label: String,
    body: &'a str,
}

/// Split `text` into fenced blocks.
///
/// A fence closes at the next line that is only a fence. A fence followed by
/// a label opens the next block instead, leaving the current one
/// unterminated; an unterminated block runs to that point or to the end of
/// the text.
fn scan_fences(text: &str) -> Vec<Fence<'_>> {
    const MARK: &str = "```";
    let mut fences = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = text[cursor..].find(MARK) {
        let after = cursor + rel + MARK.len();
        let line_end = text[after..].find('\n').map_or(text.len(), |i| after + i);
        let info = &text[after..line_end];
        let label_len = info
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(info.len());
        let label = info[..label_len].to_ascii_lowercase();

        // "```html<div>..." keeps the rest of the line as content
        let body_start = if info[label_len..].trim().is_empty() {
            (line_end + 1).min(text.len())
        } else {
            after + label_len
        };

        let (body_end, next) = match text[body_start..].find(MARK) {
            None => (text.len(), text.len()),
            Some(i) => {
                let close = body_start + i;
                let tail_start = close + MARK.len();
                let tail_end = text[tail_start..]
                    .find('\n')
                    .map_or(text.len(), |j| tail_start + j);
                if text[tail_start..tail_end].trim().is_empty() {
                    (close, tail_end)
                } else {
                    (close, close)
                }
            }
        };

        fences.push(Fence {
            label,
            body: &text[body_start..body_end],
        });
        cursor = next;
    }

    fences
}

/// Extract the code of `language` from generated text.
///
/// A fence labeled with the language (any case) wins; failing that, the first
/// unlabeled fence whose content looks like the language. Unterminated fences
/// are accepted. Returns an empty string when nothing usable is found.
///
/// # Example
///
/// ```rust
/// use rs_siteclone::generate::{extract_code_block, CodeLanguage};
///
/// let reply = "Sure!\n```HTML\n<div>x</div>\n```\n```css\n.x { color: red }";
/// assert_eq!(extract_code_block(CodeLanguage::Html, reply), "<div>x</div>");
/// assert_eq!(extract_code_block(CodeLanguage::Css, reply), ".x { color: red }");
/// ```
#[must_use]
pub fn extract_code_block(language: CodeLanguage, text: &str) -> String {
    let fences = scan_fences(text);

    fences
        .iter()
        .find(|fence| language.accepts_label(&fence.label))
        .or_else(|| {
            fences
                .iter()
                .find(|fence| fence.label.is_empty() && language.accepts_content(fence.body))
        })
        .map(|fence| fence.body.trim().to_string())
        .unwrap_or_default()
}

// === Fidelity ===

/// Outcome of comparing a rewritten fragment with its original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fidelity {
    Faithful,
    /// The rewrite has fewer `<img>` elements than the original.
    MissingImages { original: usize, rewritten: usize },
    /// The rewrite is shorter than the allowed fraction of the original.
    TooShort { original: usize, rewritten: usize },
}

impl Fidelity {
    #[must_use]
    pub fn is_faithful(self) -> bool {
        self == Self::Faithful
    }
}

/// Number of `<img` tags in `html`.
#[must_use]
pub fn count_images(html: &str) -> usize {
    IMG_TAG.find_iter(html).count()
}

/// Compare a rewrite against the original fragment.
///
/// # Example
///
/// ```rust
/// use rs_siteclone::generate::{check_fidelity, Fidelity};
///
/// let original = r#"<div><img src="a.png"><img src="b.png"></div>"#;
/// let rewrite = "<div>Two pictures used to be here, now there is this text.</div>";
/// assert_eq!(
///     check_fidelity(original, rewrite, 0.5),
///     Fidelity::MissingImages { original: 2, rewritten: 0 }
/// );
/// ```
#[must_use]
pub fn check_fidelity(original: &str, rewritten: &str, min_length_ratio: f64) -> Fidelity {
    let original_images = count_images(original);
    let rewritten_images = count_images(rewritten);
    if rewritten_images < original_images {
        return Fidelity::MissingImages {
            original: original_images,
            rewritten: rewritten_images,
        };
    }

    if (rewritten.len() as f64) < original.len() as f64 * min_length_ratio {
        return Fidelity::TooShort {
            original: original.len(),
            rewritten: rewritten.len(),
        };
    }

    Fidelity::Faithful
}

/// Whether `rewritten` may replace `original`.
#[must_use]
pub fn is_faithful(original: &str, rewritten: &str, min_length_ratio: f64) -> bool {
    check_fidelity(original, rewritten, min_length_ratio).is_faithful()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::SectionName;

    #[test]
    fn test_extract_labeled_blocks() {
        let text = "```html\n<p>a</p>\n```\n\n```css\np { x: y }\n```";
        assert_eq!(extract_code_block(CodeLanguage::Html, text), "<p>a</p>");
        assert_eq!(extract_code_block(CodeLanguage::Css, text), "p { x: y }");
    }

    #[test]
    fn test_extract_label_case_insensitive() {
        let text = "```Css\n.a{}\n```";
        assert_eq!(extract_code_block(CodeLanguage::Css, text), ".a{}");
    }

    #[test]
    fn test_extract_unlabeled_blocks_by_content() {
        let text = "```\n.a { b: c }\n```\nand\n```\n<section>s</section>\n```";
        assert_eq!(extract_code_block(CodeLanguage::Html, text), "<section>s</section>");
        assert_eq!(extract_code_block(CodeLanguage::Css, text), ".a { b: c }");
    }

    #[test]
    fn test_extract_unterminated_block_runs_to_end() {
        let text = "```html\n<p>a</p>\n```\n```css\n.a { b: c }\n.d { e: f }";
        assert_eq!(
            extract_code_block(CodeLanguage::Css, text),
            ".a { b: c }\n.d { e: f }"
        );
    }

    #[test]
    fn test_extract_unterminated_block_stops_at_next_opening_fence() {
        let text = "```html\n<p>a</p>\n```css\n.a { b: c }\n```";
        assert_eq!(extract_code_block(CodeLanguage::Html, text), "<p>a</p>");
        assert_eq!(extract_code_block(CodeLanguage::Css, text), ".a { b: c }");
    }

    #[test]
    fn test_extract_inline_fence() {
        let text = "```html<b>x</b>```";
        assert_eq!(extract_code_block(CodeLanguage::Html, text), "<b>x</b>");
    }

    #[test]
    fn test_extract_missing_block_is_empty() {
        assert_eq!(extract_code_block(CodeLanguage::Css, "no code here"), "");
        assert_eq!(extract_code_block(CodeLanguage::Html, "```css\n.a{}\n```"), "");
        assert_eq!(extract_code_block(CodeLanguage::Html, ""), "");
    }

    #[test]
    fn test_fidelity_image_loss() {
        let original = r#"<img src="a"><IMG src="b">"#;
        let fidelity = check_fidelity(original, "<div>no images but long enough text</div>", 0.5);
        assert_eq!(
            fidelity,
            Fidelity::MissingImages {
                original: 2,
                rewritten: 0
            }
        );
        assert!(!fidelity.is_faithful());
    }

    #[test]
    fn test_fidelity_length_ratio() {
        let original = "<p>".to_string() + &"x".repeat(100) + "</p>";
        let short = "<p>".to_string() + &"x".repeat(40) + "</p>";
        let long_enough = "<p>".to_string() + &"x".repeat(60) + "</p>";

        assert!(matches!(
            check_fidelity(&original, &short, 0.5),
            Fidelity::TooShort { .. }
        ));
        assert!(check_fidelity(&original, &long_enough, 0.5).is_faithful());
    }

    #[test]
    fn test_fidelity_more_images_is_fine() {
        assert!(check_fidelity("<img>", "<img><img>", 0.5).is_faithful());
    }

    #[test]
    fn test_prompt_truncates_fragments() {
        let section = WebsiteSection {
            name: SectionName::Footer,
            html: "h".repeat(50),
            css: "c".repeat(50),
            description: String::new(),
            priority: 4,
        };
        let options = Options {
            prompt_fragment_limit: 10,
            ..Options::default()
        };
        let prompt = format_section_prompt(&section, &options);

        assert!(prompt.starts_with("Recreate this footer section"));
        assert!(prompt.contains(&format!("```html\n{}\n```", "h".repeat(10))));
        assert!(!prompt.contains(&"h".repeat(11)));
        assert!(prompt.contains(&format!("```css\n{}\n```", "c".repeat(10))));
    }

    #[test]
    fn test_page_summary_lists_first_ten_images() {
        let images: Vec<String> = (0..12).map(|i| format!("https://a.test/{i}.png")).collect();
        let summary = PageSummary::new("Shop", &images, "Website: Shop");
        assert_eq!(summary.image_count, 12);
        assert_eq!(summary.images.len(), SUMMARY_IMAGE_LIMIT);
        assert_eq!(summary.images[9], "https://a.test/9.png");
    }

    #[test]
    fn test_minimal_markup_drops_scripts_and_styles() {
        let html = "<html><head><style>p{}</style><script>x()</script></head>\
                    <body><noscript>n</noscript><p>kept</p></body></html>";
        let out = minimal_markup(html);
        assert!(out.contains("<p>kept</p>"));
        assert!(!out.contains("<style"));
        assert!(!out.contains("<script"));
        assert!(!out.contains("<noscript"));
    }

    #[test]
    fn test_page_prompt_carries_summary_markup_and_css() {
        let summary = PageSummary::new("Shop", &["https://a.test/x.png".to_string()], "s");
        let options = Options {
            page_prompt_html_limit: 8,
            ..Options::default()
        };
        let prompt =
            format_page_prompt(&summary, "<main>0123456789</main>", ".m { a: b }", &options);

        assert!(prompt.contains("\"title\": \"Shop\""));
        assert!(prompt.contains("\"image_count\": 1"));
        assert!(prompt.contains("```html\n<main>01\n```"));
        assert!(prompt.contains("```css\n.m { a: b }\n```"));
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
