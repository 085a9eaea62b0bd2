//! Per-operation state of a clone.
//!
//! A `CloneContext` is created at the start of one clone operation, threaded
//! through section detection, processing and assembly, and dropped with the
//! result. Nothing in it is shared between operations.

use std::collections::HashSet;

use crate::url_utils::Origin;

/// State owned by a single clone operation.
#[derive(Debug, Clone)]
pub struct CloneContext {
    origin: Origin,
    images: Vec<String>,
    seen: HashSet<String>,
}

impl CloneContext {
    /// Context for a page at `page_url`, with `fallback_origin` standing in
    /// when the URL is missing or relative.
    #[must_use]
    pub fn new(page_url: Option<&str>, fallback_origin: &str) -> Self {
        Self {
            origin: Origin::new(page_url, fallback_origin),
            images: Vec::new(),
            seen: HashSet::new(),
        }
    }

    #[must_use]
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Record an original image, made absolute against the origin. An image
    /// already registered is not added again.
    pub fn register_image(&mut self, src: &str) {
        let src = src.trim();
        if src.is_empty() {
            return;
        }
        let absolute = self.origin.absolutize(src);
        if self.seen.insert(absolute.clone()) {
            self.images.push(absolute);
        }
    }

    /// Images registered so far, in registration order.
    #[must_use]
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Consume the context, keeping the image registry.
    #[must_use]
    pub fn into_images(self) -> Vec<String> {
        self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_image_absolutizes_and_skips_empty() {
        let mut ctx = CloneContext::new(Some("https://example.com/a/"), "https://fallback.test");
        ctx.register_image("/logo.png");
        ctx.register_image("   ");
        ctx.register_image("photo.jpg");

        assert_eq!(
            ctx.images(),
            ["https://example.com/logo.png", "https://example.com/a/photo.jpg"]
        );
    }

    #[test]
    fn test_register_image_skips_duplicates() {
        let mut ctx = CloneContext::new(Some("https://example.com/"), "https://fallback.test");
        ctx.register_image("/a.png");
        ctx.register_image("https://example.com/a.png");
        ctx.register_image("/b.png");
        ctx.register_image(" /a.png ");

        assert_eq!(
            ctx.into_images(),
            ["https://example.com/a.png", "https://example.com/b.png"]
        );
    }

    #[test]
    fn test_contexts_are_independent() {
        let mut first = CloneContext::new(None, "https://one.test");
        let second = CloneContext::new(None, "https://two.test");
        first.register_image("/x.png");

        assert_eq!(first.images().len(), 1);
        assert!(second.images().is_empty());
        assert_eq!(second.origin().base(), "https://two.test");
    }
}
