//! Stylesheet scanning.
//!
//! Splits raw CSS text into rules without parsing declarations. Selector lists
//! are kept as opaque strings; the relevance filter pattern-matches them.

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::patterns::{CSS_COMMENT, CSS_RULE_BLOCK};

/// A top-level stylesheet rule borrowed from its source text.
///
/// `text` is the complete original rule, selector through the matching
/// closing brace, so nested at-rule blocks and multi-line declarations are
/// carried over verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylesheetRule<'a> {
    /// Selector list (or at-rule prelude), trimmed. May be comma-joined.
    pub selector_text: &'a str,
    /// Declaration block between the outer braces. Empty for at-statements
    /// such as `@import url(x);`.
    pub body: &'a str,
    /// The complete rule as it appears in the source.
    pub text: &'a str,
}

impl<'a> StylesheetRule<'a> {
    /// Individual selectors of the selector list, trimmed, empties skipped.
    pub fn selectors(&self) -> impl Iterator<Item = &'a str> {
        split_selectors(self.selector_text)
    }

    /// Whether the rule is an at-rule (`@media`, `@keyframes`, `@import`, ...).
    #[must_use]
    pub fn is_at_rule(&self) -> bool {
        self.selector_text.starts_with('@')
    }
}

/// Split a comma-joined selector list into trimmed, non-empty selectors.
pub fn split_selectors(selector_list: &str) -> impl Iterator<Item = &str> {
    selector_list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Remove every `/* ... */` comment. An unterminated comment removes the rest
/// of the input.
#[must_use]
pub fn strip_comments(css: &str) -> Cow<'_, str> {
    CSS_COMMENT.replace_all(css, "")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    Quoted(u8),
    Comment,
}

/// Find the end of the block opened at `open`.
///
/// `open` must index a `{`. Returns the index just past the matching `}`,
/// counting nested braces and ignoring braces inside quoted strings and
/// comments. Returns `None` when the block is never closed.
///
/// # Example
///
/// ```rust
/// use rs_siteclone::stylesheet::find_rule_end;
///
/// let css = "@media (max-width: 600px) { .a { color: red } } .b { }";
/// let open = css.find('{').unwrap();
/// let end = find_rule_end(css, open).unwrap();
/// assert_eq!(&css[..end], "@media (max-width: 600px) { .a { color: red } }");
/// ```
#[must_use]
pub fn find_rule_end(css: &str, open: usize) -> Option<usize> {
    let bytes = css.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    let mut state = ScanState::Code;
    let mut i = open;

    while i < bytes.len() {
        let b = bytes[i];
        match state {
            ScanState::Code => match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                b'"' | b'\'' => state = ScanState::Quoted(b),
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    state = ScanState::Comment;
                    i += 1;
                }
                _ => {}
            },
            ScanState::Quoted(quote) => {
                if b == b'\\' {
                    i += 1;
                } else if b == quote {
                    state = ScanState::Code;
                }
            }
            ScanState::Comment => {
                if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    state = ScanState::Code;
                    i += 1;
                }
            }
        }
        i += 1;
    }

    None
}

/// Index of the first `{`, `;` or `}` at or after `from` that is outside
/// quoted strings and comments.
fn find_delimiter(css: &str, from: usize) -> Option<usize> {
    let bytes = css.as_bytes();
    let mut state = ScanState::Code;
    let mut i = from;

    while i < bytes.len() {
        let b = bytes[i];
        match state {
            ScanState::Code => match b {
                b'{' | b';' | b'}' => return Some(i),
                b'"' | b'\'' => state = ScanState::Quoted(b),
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    state = ScanState::Comment;
                    i += 1;
                }
                _ => {}
            },
            ScanState::Quoted(quote) => {
                if b == b'\\' {
                    i += 1;
                } else if b == quote {
                    state = ScanState::Code;
                }
            }
            ScanState::Comment => {
                if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    state = ScanState::Code;
                    i += 1;
                }
            }
        }
        i += 1;
    }

    None
}

/// Split `css` into its top-level rules, in source order.
///
/// Comments are not removed here; pass the output of [`strip_comments`] when
/// they should not end up in rule text. An unterminated trailing rule, a stray
/// `}` and a block with an empty selector are skipped.
#[must_use]
pub fn parse_rules(css: &str) -> Vec<StylesheetRule<'_>> {
    let mut rules = Vec::new();
    let mut pos = 0;

    while pos < css.len() {
        let rest = &css[pos..];
        let start = pos + (rest.len() - rest.trim_start().len());
        if start >= css.len() {
            break;
        }

        let Some(delimiter) = find_delimiter(css, start) else {
            break;
        };

        match css.as_bytes()[delimiter] {
            b';' => {
                // `@import url(x);`, `@charset "utf-8";` and stray declarations
                let selector_text = css[start..delimiter].trim();
                if selector_text.starts_with('@') {
                    rules.push(StylesheetRule {
                        selector_text,
                        body: "",
                        text: &css[start..=delimiter],
                    });
                }
                pos = delimiter + 1;
            }
            b'{' => {
                let Some(end) = find_rule_end(css, delimiter) else {
                    break;
                };
                let selector_text = css[start..delimiter].trim();
                if !selector_text.is_empty() {
                    rules.push(StylesheetRule {
                        selector_text,
                        body: &css[delimiter + 1..end - 1],
                        text: &css[start..end],
                    });
                }
                pos = end;
            }
            _ => pos = delimiter + 1,
        }
    }

    rules
}

/// Collect the unique selectors of every complete `selector { ... }` block.
///
/// Comments are discarded first, selector lists are split on commas and
/// trimmed. Rules nested in at-rule blocks contribute their inner selectors;
/// blocks without a closing brace contribute nothing.
#[must_use]
pub fn extract_css_selectors(css: &str) -> BTreeSet<String> {
    let cleaned = strip_comments(css);
    let mut selectors = BTreeSet::new();

    for caps in CSS_RULE_BLOCK.captures_iter(&cleaned) {
        let Some(list) = caps.get(1) else { continue };
        // Text after an at-statement or a closed at-rule wrapper belongs to
        // the next rule only.
        let list = list.as_str().rsplit(';').next().unwrap_or_default();
        for selector in split_selectors(list) {
            selectors.insert(selector.to_string());
        }
    }

    selectors
}
