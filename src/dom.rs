//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate used by section detection,
//! scraping and URL normalization.

// Re-export core types for external use
pub use dom_query::{Document, Selection};

use crate::patterns::DOCUMENT_MARKER;

// === Attribute Operations ===

/// Get element class attribute
#[inline]
#[must_use]
pub fn class_name(sel: &Selection) -> Option<String> {
    sel.attr("class").map(|s| s.to_string())
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Set an attribute value
#[inline]
pub fn set_attribute(sel: &Selection, name: &str, value: &str) {
    sel.set_attr(name, value);
}

// === Content ===

/// Get all text content of node and descendants
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> String {
    sel.text().to_string()
}

/// Get inner HTML content
#[inline]
#[must_use]
pub fn inner_html(sel: &Selection) -> String {
    sel.inner_html().to_string()
}

/// Get outer HTML content
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> String {
    sel.html().to_string()
}

// === Querying ===

/// First element matching `selector`, if any.
///
/// Invalid selectors match nothing.
#[must_use]
pub fn select_first<'a>(doc: &'a Document, selector: &str) -> Option<Selection<'a>> {
    doc.try_select(selector)
        .map(|sel| sel.first())
        .filter(Selection::exists)
}

/// Every element matching `selector`, one `Selection` per node, in document
/// order. Invalid selectors yield nothing.
#[must_use]
pub fn select_all<'a>(doc: &'a Document, selector: &str) -> Vec<Selection<'a>> {
    doc.try_select(selector)
        .map(|sel| sel.nodes().iter().map(|node| Selection::from(*node)).collect())
        .unwrap_or_default()
}

// === Tree Manipulation ===

/// Remove every element matching `selector`, with its subtree.
pub fn remove_all(doc: &Document, selector: &str) {
    if let Some(sel) = doc.try_select(selector) {
        sel.remove();
    }
}

// === Parsing / Serialization ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Whether `html` is a complete document (doctype, `<html>` or `<body>`)
/// rather than a fragment.
#[must_use]
pub fn is_full_document(html: &str) -> bool {
    DOCUMENT_MARKER.is_match(html)
}

/// Parse `html` as a document or, when it has no document markers, as a
/// fragment in `<body>` context.
///
/// Fragment parsing keeps leading `<script>`, `<style>`, `<link>` and `<meta>`
/// elements where they are instead of moving them into an implied `<head>`.
#[must_use]
pub fn parse_like(html: &str) -> Document {
    if is_full_document(html) {
        Document::from(html)
    } else {
        Document::fragment(html)
    }
}

/// Serialize a document produced by [`parse_like`] from `source`.
///
/// Fragments come back as fragments, without the parser's `<html>` wrapper.
#[must_use]
pub fn serialize_like(doc: &Document, source: &str) -> String {
    if is_full_document(source) {
        return doc.html().to_string();
    }
    doc.root()
        .first_element_child()
        .map(|wrapper| wrapper.inner_html().to_string())
        .unwrap_or_default()
}

/// Content of the `<body>` of a complete document; fragments are returned
/// as they are.
#[must_use]
pub fn body_markup(html: &str) -> String {
    if !is_full_document(html) {
        return html.to_string();
    }
    let doc = parse(html);
    doc.select("body").inner_html().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_select() {
        let doc = parse(r#"<div id="main" class="container">content</div>"#);
        let div = doc.select("div");

        assert_eq!(get_attribute(&div, "id"), Some("main".to_string()));
        assert_eq!(class_name(&div), Some("container".to_string()));
        assert_eq!(text_content(&div), "content");
    }

    #[test]
    fn test_select_first_returns_first_match() {
        let doc = parse("<p>one</p><p>two</p>");
        let first = select_first(&doc, "p").unwrap();
        assert_eq!(text_content(&first), "one");
        assert!(select_first(&doc, "table").is_none());
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let doc = parse("<p>one</p>");
        assert!(select_first(&doc, "p[").is_none());
        assert!(select_all(&doc, ":::").is_empty());
    }

    #[test]
    fn test_select_all_one_selection_per_node() {
        let doc = parse(r#"<img src="a.png"><div><img src="b.png"></div>"#);
        let images = select_all(&doc, "img");
        assert_eq!(images.len(), 2);
        assert_eq!(get_attribute(&images[1], "src"), Some("b.png".to_string()));
    }

    #[test]
    fn test_remove_all() {
        let doc = parse_like("<p>a</p><script>x()</script><div><noscript>n</noscript>b</div>");
        remove_all(&doc, "script, noscript");
        assert_eq!(
            serialize_like(&doc, "<p>"),
            "<p>a</p><div>b</div>"
        );
    }

    #[test]
    fn test_set_attribute() {
        let doc = parse(r#"<a href="https://example.com">x</a>"#);
        let link = doc.select("a");
        set_attribute(&link, "href", "#");
        assert_eq!(get_attribute(&link, "href"), Some("#".to_string()));
    }

    #[test]
    fn test_serialize_fragment_has_no_wrappers() {
        let source = r#"<header class="top"><a href="x">y</a></header>"#;
        let doc = parse_like(source);
        let out = serialize_like(&doc, source);
        assert_eq!(out, source);
        assert!(!out.contains("<body>"));
    }

    #[test]
    fn test_fragment_keeps_leading_head_elements() {
        let source = "<script>var a = 1;</script><style>.x{}</style><link rel=\"stylesheet\" href=\"s.css\"><p>hi</p>";
        let doc = parse_like(source);
        assert_eq!(serialize_like(&doc, source), source);
    }

    #[test]
    fn test_serialize_empty_fragment() {
        let doc = parse_like("");
        assert_eq!(serialize_like(&doc, ""), "");
    }

    #[test]
    fn test_serialize_document_keeps_structure() {
        let source = "<!DOCTYPE html><html><head><title>t</title></head><body><p>x</p></body></html>";
        let doc = parse_like(source);
        let out = serialize_like(&doc, source);
        assert!(out.contains("<body><p>x</p></body>"));
        assert!(out.contains("<title>t</title>"));
    }

    #[test]
    fn test_body_markup() {
        let page = "<!DOCTYPE html><html><head><style>p{}</style></head><body>\n<p>x</p>\n</body></html>";
        assert_eq!(body_markup(page), "<p>x</p>");
        assert_eq!(body_markup("<nav>n</nav>"), "<nav>n</nav>");
    }
}
