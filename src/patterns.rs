//! Compiled regex patterns for markup and stylesheet scanning.
//!
//! All patterns are compiled once at first use via `LazyLock`.
//! Patterns are organized by the stage of the pipeline that uses them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Stylesheet Patterns
// =============================================================================

/// Matches a `/* ... */` comment. An unterminated comment runs to the end of
/// the input.
pub static CSS_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)/\*.*?(?:\*/|\z)").expect("CSS_COMMENT regex")
});

/// Matches an innermost `selector { body }` block. Capture 1 is the selector
/// list. Blocks that contain nested braces (at-rule wrappers) never match as a
/// whole, only their inner rules do.
pub static CSS_RULE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^{}]+)\{[^{}]*\}").expect("CSS_RULE_BLOCK regex")
});

// =============================================================================
// Markup Identifier Patterns
// =============================================================================

/// Matches an opening tag and captures its name.
pub static OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z][A-Za-z0-9_-]*)").expect("OPEN_TAG regex")
});

/// Matches a `class` attribute (double or single quoted).
/// The leading whitespace keeps `data-class=` and friends out.
pub static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\sclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("CLASS_ATTR regex")
});

/// Matches an `id` attribute (double or single quoted).
pub static ID_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\sid\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("ID_ATTR regex")
});

// =============================================================================
// Normalization / Fidelity Patterns
// =============================================================================

/// Matches an `<img` opening tag.
pub static IMG_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<img\b").expect("IMG_TAG regex")
});

/// Matches any tag whose attributes the normalizer may rewrite.
pub static REWRITABLE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(?:img|source|a|form)\b").expect("REWRITABLE_TAG regex")
});

/// Matches markers of a complete document rather than a fragment.
pub static DOCUMENT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<!doctype|<html\b|<body\b").expect("DOCUMENT_MARKER regex")
});

/// Matches the opening `<head>` tag.
pub static HEAD_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<head\b[^>]*>").expect("HEAD_OPEN regex"));

/// Matches the opening `<html>` tag.
pub static HTML_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html\b[^>]*>").expect("HTML_OPEN regex"));

/// Matches the `charset=` parameter of a Content-Type header value.
pub static CONTENT_TYPE_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^"';\s]+)"#).expect("CONTENT_TYPE_CHARSET regex")
});

/// Matches a charset declared in a `<meta>` tag, either as
/// `<meta charset=...>` or inside an `http-equiv` content value.
pub static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*?\bcharset\s*=\s*["']?([^"'\s;/>]+)"#)
        .expect("META_CHARSET regex")
});
