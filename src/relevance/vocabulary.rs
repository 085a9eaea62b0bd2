//! Built-in vocabularies of the relevance filter.
//!
//! Both lists are data, not logic: [`FilterConfig`](super::FilterConfig)
//! copies them into owned vectors that callers can extend or replace.

/// Structural selectors kept whenever they appear in a stylesheet.
pub const PRIORITY_SELECTORS: &[&str] = &[
    // Document
    "html", "body",
    // Headings and text
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "a", "img",
    // Lists
    "ul", "ol", "li",
    // Tables
    "table", "thead", "tbody", "tfoot", "tr", "th", "td",
    // Form controls
    "form", "input", "button", "select", "textarea", "label",
    // Semantic containers
    "header", "nav", "main", "section", "article", "aside", "footer",
];

/// Substrings of class names that usually carry layout or component styling.
pub const LAYOUT_PATTERNS: &[&str] = &[
    "container", "wrapper", "layout", "nav", "menu", "header", "footer",
    "button", "btn", "card", "grid", "flex", "row", "col", "content",
    "hero", "banner", "logo",
];
