//! Configuration options for clone operations.
//!
//! The `Options` struct controls the tunable thresholds of the pipeline:
//! how large a block must be to count as main content, how long to wait
//! between generation calls, how strict the fidelity check is, and so on.

use std::time::Duration;

use crate::relevance::FilterConfig;

/// Title used when neither the options nor the scraped page provide one.
pub const DEFAULT_DOCUMENT_TITLE: &str = "Recreated Website";

/// Origin used to absolutize root-relative references when the page URL is
/// unknown. A stand-in; callers that know the origin should always pass it.
pub const DEFAULT_FALLBACK_ORIGIN: &str = "https://www.example.com";

/// Configuration options for clone operations.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use rs_siteclone::Options;
///
/// let options = Options {
///     generation_delay: Duration::from_millis(250),
///     min_main_content_len: 800,
///     ..Options::default()
/// };
/// assert_eq!(options.prompt_fragment_limit, 3000);
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Title written into the assembled document.
    ///
    /// When `None`, the scraped page title is used, then
    /// [`DEFAULT_DOCUMENT_TITLE`].
    ///
    /// Default: `None`
    pub document_title: Option<String>,

    /// Origin for root-relative references when no page URL is known.
    ///
    /// Default: [`DEFAULT_FALLBACK_ORIGIN`]
    pub fallback_origin: String,

    /// Minimum serialized length (bytes of markup) of a main-content candidate.
    ///
    /// Smaller blocks are treated as noise.
    ///
    /// Default: `500`
    pub min_main_content_len: usize,

    /// Run each detected section's stylesheet through the relevance filter
    /// against that section's markup instead of attaching the full stylesheet.
    ///
    /// Section-local filtering drops styles that target ancestors outside the
    /// fragment, so it stays off unless explicitly requested.
    ///
    /// Default: `false`
    pub scope_section_css: bool,

    /// In conservative mode, keep only the stylesheet rules the relevance
    /// filter judges relevant to the page instead of the full stylesheet.
    ///
    /// Default: `false`
    pub trim_unused_css: bool,

    /// Vocabularies and output cap of the CSS relevance filter.
    pub filter: FilterConfig,

    /// Minimum spacing between two calls to the text-generation collaborator.
    ///
    /// Default: `1s`
    pub generation_delay: Duration,

    /// Number of characters of a section's HTML (and, separately, CSS)
    /// included in a generation prompt.
    ///
    /// Default: `3000`
    pub prompt_fragment_limit: usize,

    /// Number of characters of the page markup included in a whole-page
    /// generation prompt.
    ///
    /// Default: `5000`
    pub page_prompt_html_limit: usize,

    /// When a generator is given, rewrite the page in a single call instead
    /// of section by section.
    ///
    /// Default: `false`
    pub whole_page_generation: bool,

    /// A rewritten fragment shorter than this fraction of the original is
    /// rejected by the fidelity check.
    ///
    /// Default: `0.5`
    pub min_length_ratio: f64,

    /// Upper bound on a single external fetch (page or stylesheet).
    ///
    /// Default: `15s`
    pub fetch_timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            document_title: None,
            fallback_origin: DEFAULT_FALLBACK_ORIGIN.to_string(),
            min_main_content_len: 500,
            scope_section_css: false,
            trim_unused_css: false,
            filter: FilterConfig::default(),
            generation_delay: Duration::from_secs(1),
            prompt_fragment_limit: 3000,
            page_prompt_html_limit: 5000,
            whole_page_generation: false,
            min_length_ratio: 0.5,
            fetch_timeout: Duration::from_secs(15),
        }
    }
}

impl Options {
    /// Resolve the document title: explicit option, then scraped title, then
    /// the built-in default.
    #[must_use]
    pub fn title_for(&self, scraped_title: &str) -> String {
        if let Some(title) = self.document_title.as_deref().filter(|t| !t.trim().is_empty()) {
            return title.to_string();
        }
        let scraped = scraped_title.trim();
        if scraped.is_empty() || scraped == "Untitled" {
            DEFAULT_DOCUMENT_TITLE.to_string()
        } else {
            scraped.to_string()
        }
    }
}
