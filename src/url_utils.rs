//! URL Utility Functions
//!
//! Validation and resolution helpers used to turn the resource references of
//! a scraped page into URLs that still work once the markup is detached from
//! its original location.

use url::Url;

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    // Must start with http:// or https://
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Parse a URL string into a Url object.
///
/// # Returns
/// * `Some(Url)` if valid absolute URL, `None` otherwise
#[must_use]
pub fn parse_url(url_str: &str) -> Option<Url> {
    is_absolute_url(url_str).1
}

/// Whether `reference` starts with a URI scheme (`data:`, `mailto:`,
/// `javascript:`, `blob:`, `https:` ...).
#[must_use]
pub fn has_scheme(reference: &str) -> bool {
    let Some(colon) = reference.find(':') else {
        return false;
    };
    let scheme = &reference[..colon];
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Convert a relative or absolute URL to absolute form.
///
/// # Arguments
/// * `url_str` - The URL to resolve (can be relative or absolute)
/// * `base` - The base URL for resolution
///
/// # Returns
/// * The absolute URL string, or the original if resolution fails
#[must_use]
pub fn create_absolute_url(url_str: &str, base: &Url) -> String {
    let url_str = url_str.trim();

    if url_str.is_empty() {
        return String::new();
    }

    // data:, javascript:, mailto:, tel: and absolute URLs stay as they are
    if has_scheme(url_str) {
        return url_str.to_string();
    }

    match base.join(url_str) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => url_str.to_string(),
    }
}

/// Get the base URL (scheme + host, plus a non-default port) from a URL.
///
/// # Returns
/// * The base URL in format `scheme://host[:port]`, or empty string if invalid
#[must_use]
pub fn get_base_url(url_str: &str) -> String {
    let Some(url) = parse_url(url_str) else {
        return String::new();
    };
    let Some(host) = url.host_str() else {
        return String::new();
    };

    match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    }
}

/// The location scraped markup originally lived at.
///
/// Built once per clone operation and handed to every normalization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    page: Option<Url>,
    base: String,
}

impl Origin {
    /// Origin of `page_url`; when it is missing or not an absolute http(s)
    /// URL, root-relative references resolve against `fallback` instead.
    #[must_use]
    pub fn new(page_url: Option<&str>, fallback: &str) -> Self {
        let page = page_url.and_then(parse_url);
        let base = page
            .as_ref()
            .map(|url| get_base_url(url.as_str()))
            .filter(|base| !base.is_empty())
            .unwrap_or_else(|| fallback.trim_end_matches('/').to_string());
        Self { page, base }
    }

    /// `scheme://host[:port]` used for root-relative references.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The page URL, when known.
    #[must_use]
    pub fn page_url(&self) -> Option<&Url> {
        self.page.as_ref()
    }

    /// Make a resource reference usable outside the original page.
    ///
    /// * `//host/p` → `https://host/p`
    /// * `http...` → unchanged
    /// * `/p` → origin base + `/p`
    /// * other schemes (`data:`, `blob:`) → unchanged
    /// * anything else → resolved against the page URL (or the base)
    ///
    /// # Example
    ///
    /// ```rust
    /// use rs_siteclone::url_utils::Origin;
    ///
    /// let origin = Origin::new(Some("https://example.com/news/today.html"), "https://fallback.test");
    /// assert_eq!(origin.absolutize("/foo.png"), "https://example.com/foo.png");
    /// assert_eq!(origin.absolutize("img/a.png"), "https://example.com/news/img/a.png");
    /// assert_eq!(origin.absolutize("//cdn.example.com/x.js"), "https://cdn.example.com/x.js");
    /// ```
    #[must_use]
    pub fn absolutize(&self, reference: &str) -> String {
        let trimmed = reference.trim();

        if trimmed.is_empty() || trimmed.starts_with("http") {
            return reference.to_string();
        }
        if trimmed.starts_with("//") {
            return format!("https:{trimmed}");
        }
        if trimmed.starts_with('/') {
            return format!("{}{trimmed}", self.base);
        }
        if has_scheme(trimmed) {
            return reference.to_string();
        }

        match &self.page {
            Some(page) => create_absolute_url(trimmed, page),
            None => format!("{}/{trimmed}", self.base),
        }
    }
}
