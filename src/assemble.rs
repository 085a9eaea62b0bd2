//! Document Assembly
//!
//! Recombines processed fragments into one self-contained HTML document:
//! fixed boilerplate head, a single `<style>` block holding every fragment's
//! CSS, and a body holding every fragment's markup, both in the order the
//! parts are given.

use crate::patterns::{HEAD_OPEN, HTML_OPEN};
use crate::sections::SectionName;

/// One processed fragment to place in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyPart<'a> {
    pub name: SectionName,
    pub html: &'a str,
    pub css: &'a str,
}

/// Build the complete document.
///
/// Each non-empty CSS fragment is preceded by `/* <name> styles */`, each
/// non-empty HTML fragment by `<!-- <name> -->`.
///
/// # Example
///
/// ```rust
/// use rs_siteclone::assemble::{assemble_document, AssemblyPart};
/// use rs_siteclone::sections::SectionName;
///
/// let doc = assemble_document("Demo", &[AssemblyPart {
///     name: SectionName::Header,
///     html: "<header>Hi</header>",
///     css: "header { color: red }",
/// }]);
/// assert!(doc.starts_with("<!DOCTYPE html>"));
/// assert!(doc.contains("/* header styles */\nheader { color: red }"));
/// assert!(doc.contains("<!-- header -->\n<header>Hi</header>"));
/// ```
#[must_use]
pub fn assemble_document(title: &str, parts: &[AssemblyPart<'_>]) -> String {
    let css_len: usize = parts.iter().map(|p| p.css.len()).sum();
    let html_len: usize = parts.iter().map(|p| p.html.len()).sum();
    let mut doc = String::with_capacity(css_len + html_len + 512);

    doc.push_str("<!DOCTYPE html>\n");
    doc.push_str("<html lang=\"en\">\n");
    doc.push_str("<head>\n");
    doc.push_str("    <meta charset=\"UTF-8\">\n");
    doc.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    doc.push_str("    <title>");
    doc.push_str(&escape_text(title));
    doc.push_str("</title>\n");
    doc.push_str("    <style>\n");
    for part in parts.iter().filter(|p| !p.css.trim().is_empty()) {
        doc.push_str(&format!("/* {} styles */\n", part.name));
        doc.push_str(&guard_style_text(part.css));
        doc.push('\n');
    }
    doc.push_str("    </style>\n");
    doc.push_str("</head>\n");
    doc.push_str("<body>\n");
    for part in parts.iter().filter(|p| !p.html.trim().is_empty()) {
        doc.push_str(&format!("<!-- {} -->\n", part.name));
        doc.push_str(part.html);
        doc.push('\n');
    }
    doc.push_str("</body>\n");
    doc.push_str("</html>");

    doc
}

/// Insert `css` as a `<style>` element at the start of the `<head>` of
/// `html`.
///
/// A document without `<head>` gets one right after `<html>`; markup with
/// neither gets the `<style>` element in front. Empty HTML or CSS leaves
/// `html` as it is.
///
/// # Example
///
/// ```rust
/// use rs_siteclone::assemble::inline_css;
///
/// let doc = inline_css("<html><head><title>T</title></head><body></body></html>", "p { x: y }");
/// assert!(doc.starts_with("<html><head>\n<style>\np { x: y }\n</style><title>"));
/// assert_eq!(inline_css("<p>x</p>", ""), "<p>x</p>");
/// ```
#[must_use]
pub fn inline_css(html: &str, css: &str) -> String {
    if html.trim().is_empty() || css.trim().is_empty() {
        return html.to_string();
    }
    let style = format!("<style>\n{}\n</style>", guard_style_text(css));

    if let Some(head) = HEAD_OPEN.find(html) {
        return splice(html, head.end(), &format!("\n{style}"));
    }
    if let Some(root) = HTML_OPEN.find(html) {
        return splice(html, root.end(), &format!("\n<head>\n{style}\n</head>"));
    }
    format!("{style}\n{html}")
}

/// Turn generated markup and its CSS into one document.
///
/// A complete document (doctype or `<html>` first) gets the CSS inlined into
/// its head. A fragment becomes the single `entire-site` part of
/// [`assemble_document`]. Empty markup gives an empty string.
#[must_use]
pub fn combine_html_and_css(title: &str, html: &str, css: &str) -> String {
    let lead = html.trim_start();
    if lead.is_empty() {
        return String::new();
    }

    let starts_with = |prefix: &str| {
        lead.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    if starts_with("<!doctype") || starts_with("<html") {
        return inline_css(html, css);
    }

    assemble_document(
        title,
        &[AssemblyPart {
            name: SectionName::EntireSite,
            html,
            css,
        }],
    )
}

fn splice(html: &str, at: usize, insert: &str) -> String {
    let mut out = String::with_capacity(html.len() + insert.len());
    out.push_str(&html[..at]);
    out.push_str(insert);
    out.push_str(&html[at..]);
    out
}

/// Escape text for use as element content.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// A literal `</style` inside CSS (usually in a string or comment) would close
// the element early.
fn guard_style_text(css: &str) -> String {
    css.replace("</style", "<\\/style")
        .replace("</STYLE", "<\\/STYLE")
}
