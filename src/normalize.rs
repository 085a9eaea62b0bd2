//! URL/Link Normalization
//!
//! Rewrites the resource references of scraped markup so the document works
//! outside its original location: images and responsive image sets become
//! absolute URLs, outbound links and form targets become `#`.
//!
//! Normalization is idempotent, and markup that needs no rewrite is returned
//! byte-for-byte unchanged: the tree is only re-serialized when an attribute
//! actually changed.

use tracing::debug;

use crate::dom::{self, Selection};
use crate::patterns::REWRITABLE_TAG;
use crate::url_utils::Origin;

/// Neutral target replacing outbound links and form actions.
pub const PLACEHOLDER_TARGET: &str = "#";

/// Which references a normalization pass rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Images, srcsets, links and forms.
    Full,
    /// Links and forms only; image references are left alone.
    LinksOnly,
}

/// Normalize the references in `html`.
///
/// # Example
///
/// ```rust
/// use rs_siteclone::normalize::{normalize_html, Scope};
/// use rs_siteclone::url_utils::Origin;
///
/// let origin = Origin::new(Some("https://example.com/"), "https://fallback.test");
/// let html = r#"<img src="/foo.png"><a href="https://example.com/about">About</a>"#;
/// let out = normalize_html(html, &origin, Scope::Full);
/// assert_eq!(out, r##"<img src="https://example.com/foo.png"><a href="#">About</a>"##);
/// ```
#[must_use]
pub fn normalize_html(html: &str, origin: &Origin, scope: Scope) -> String {
    if !REWRITABLE_TAG.is_match(html) {
        return html.to_string();
    }

    let doc = dom::parse_like(html);
    let mut rewritten = 0usize;

    if scope == Scope::Full {
        for img in dom::select_all(&doc, "img[src]") {
            rewritten += usize::from(rewrite_attr(&img, "src", |src| origin.absolutize(src)));
        }
        for source in dom::select_all(&doc, "img[srcset], source[srcset]") {
            rewritten += usize::from(rewrite_attr(&source, "srcset", |set| {
                absolutize_srcset(set, origin)
            }));
        }
    }

    for link in dom::select_all(&doc, "a[href]") {
        rewritten += usize::from(rewrite_attr(&link, "href", |href| {
            if href.trim().starts_with("http") {
                PLACEHOLDER_TARGET.to_string()
            } else {
                href.to_string()
            }
        }));
    }

    for form in dom::select_all(&doc, "form[action]") {
        rewritten += usize::from(rewrite_attr(&form, "action", |_| {
            PLACEHOLDER_TARGET.to_string()
        }));
    }

    if rewritten == 0 {
        return html.to_string();
    }

    debug!(rewritten, ?scope, "normalized references");
    dom::serialize_like(&doc, html)
}

/// Apply `rewrite` to attribute `name`; true when the value changed.
fn rewrite_attr(sel: &Selection, name: &str, rewrite: impl FnOnce(&str) -> String) -> bool {
    let Some(current) = dom::get_attribute(sel, name) else {
        return false;
    };
    let updated = rewrite(&current);
    if updated == current {
        return false;
    }
    dom::set_attribute(sel, name, &updated);
    true
}

/// Absolutize every candidate URL of a `srcset`, keeping its descriptor.
///
/// `data:` candidates are left as they are; the candidates around them are
/// still rewritten.
#[must_use]
pub fn absolutize_srcset(srcset: &str, origin: &Origin) -> String {
    split_srcset(srcset)
        .into_iter()
        .map(|(url, descriptor)| {
            if descriptor.is_empty() {
                origin.absolutize(url)
            } else {
                format!("{} {descriptor}", origin.absolutize(url))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split a `srcset` into `(url, descriptor)` candidates.
///
/// A URL runs to the next whitespace, so commas inside `data:` URLs stay part
/// of the URL; a URL ending in a comma has no descriptor. Descriptors run to
/// the next comma outside parentheses.
fn split_srcset(srcset: &str) -> Vec<(&str, &str)> {
    let mut candidates = Vec::new();
    let mut rest = srcset;

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',');
        if rest.is_empty() {
            break;
        }

        let url_end = rest.find(|c: char| c.is_ascii_whitespace()).unwrap_or(rest.len());
        let raw_url = &rest[..url_end];
        rest = &rest[url_end..];

        let url = raw_url.trim_end_matches(',');
        if url.len() < raw_url.len() {
            candidates.push((url, ""));
            continue;
        }

        let mut depth = 0usize;
        let mut descriptor_end = rest.len();
        for (i, c) in rest.char_indices() {
            match c {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    descriptor_end = i;
                    break;
                }
                _ => {}
            }
        }
        candidates.push((url, rest[..descriptor_end].trim()));
        rest = &rest[descriptor_end..];
    }

    candidates
}
