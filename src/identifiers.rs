//! Identifier sets collected from markup.
//!
//! An [`IdentifierSet`] is the ground truth the relevance filter tests
//! selectors against: every tag name, class token and id value that appears
//! anywhere in a document or fragment. Collection is a flat regex scan, no
//! tree is built.

use std::collections::HashSet;

use crate::patterns::{CLASS_ATTR, ID_ATTR, OPEN_TAG};

/// Tag names, class tokens and id values found in a markup document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet {
    /// Lowercased names of every opening tag.
    pub tags: HashSet<String>,
    /// Every whitespace-separated token of every `class` attribute.
    pub classes: HashSet<String>,
    /// Every `id` attribute value.
    pub ids: HashSet<String>,
}

impl IdentifierSet {
    /// Scan `html` for tag names, classes and ids.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rs_siteclone::IdentifierSet;
    ///
    /// let ids = IdentifierSet::from_html(r#"<div class="card wide" id="hero"><P>x</P></div>"#);
    /// assert!(ids.has_tag("p"));
    /// assert!(ids.has_class("wide"));
    /// assert!(ids.has_id("hero"));
    /// ```
    #[must_use]
    pub fn from_html(html: &str) -> Self {
        let tags = OPEN_TAG
            .captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_ascii_lowercase())
            .collect();

        let classes = CLASS_ATTR
            .captures_iter(html)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .flat_map(|m| m.as_str().split_whitespace())
            .map(str::to_string)
            .collect();

        let ids = ID_ATTR
            .captures_iter(html)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        Self { tags, classes, ids }
    }

    /// Case-insensitive tag lookup.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag.to_ascii_lowercase())
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    #[must_use]
    pub fn has_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// True when nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.classes.is_empty() && self.ids.is_empty()
    }
}
