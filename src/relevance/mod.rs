//! CSS Relevance Filter
//!
//! Reduces a stylesheet to the rules that plausibly style a given document.
//! Relevance is decided per selector by an ordered list of rules evaluated
//! short-circuit, from the precise (exact tag/class/id membership) to the
//! deliberately loose (layout vocabulary, length fallback). Keeping a rule the
//! page does not need is cheap; dropping one it needs breaks the layout, so
//! the list leans towards keeping.

pub mod vocabulary;

use tracing::debug;

use crate::identifiers::IdentifierSet;
use crate::stylesheet::{self, StylesheetRule};

/// Which relevance rule accepted a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relevance {
    /// Selector equals a tag name present in the markup.
    TagName,
    /// `.class` whose class is present in the markup.
    ClassName,
    /// `#id` whose id is present in the markup.
    IdName,
    /// Selector is in the structural priority list.
    PriorityList,
    /// At-rule or selector with a pseudo-class/pseudo-element marker.
    AtRuleOrPseudo,
    /// Selector contains a layout vocabulary token.
    LayoutPattern,
    /// Anything longer than two characters not starting with `_`.
    Fallback,
}

/// Vocabularies, enabled rules and output cap of the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Selectors always kept (see [`vocabulary::PRIORITY_SELECTORS`]).
    pub priority_selectors: Vec<String>,
    /// Substrings that mark a selector as layout-relevant
    /// (see [`vocabulary::LAYOUT_PATTERNS`]).
    pub layout_patterns: Vec<String>,
    /// Rules skipped during evaluation.
    pub disabled_rules: Vec<Relevance>,
    /// Maximum size in bytes of the filtered stylesheet.
    pub max_output_len: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            priority_selectors: vocabulary::PRIORITY_SELECTORS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            layout_patterns: vocabulary::LAYOUT_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            disabled_rules: Vec::new(),
            max_output_len: 100_000,
        }
    }
}

impl FilterConfig {
    /// Copy of this config with `rule` disabled.
    #[must_use]
    pub fn without(mut self, rule: Relevance) -> Self {
        if !self.disabled_rules.contains(&rule) {
            self.disabled_rules.push(rule);
        }
        self
    }

    /// Copy of this config with only the exact-membership rules enabled.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
            .without(Relevance::LayoutPattern)
            .without(Relevance::Fallback)
    }

    #[must_use]
    pub fn is_enabled(&self, rule: Relevance) -> bool {
        !self.disabled_rules.contains(&rule)
    }
}

/// Everything a relevance rule may look at.
pub struct RuleContext<'a> {
    pub identifiers: &'a IdentifierSet,
    pub config: &'a FilterConfig,
}

/// A relevance rule: does `selector` deserve to be kept?
pub type Rule = fn(selector: &str, ctx: &RuleContext) -> bool;

/// Relevance rules in evaluation order. The first match wins.
pub static RELEVANCE_RULES: &[(Relevance, Rule)] = &[
    (Relevance::TagName, is_known_tag),
    (Relevance::ClassName, is_known_class),
    (Relevance::IdName, is_known_id),
    (Relevance::PriorityList, is_priority_selector),
    (Relevance::AtRuleOrPseudo, is_at_rule_or_pseudo),
    (Relevance::LayoutPattern, has_layout_pattern),
    (Relevance::Fallback, passes_fallback),
];

fn is_known_tag(selector: &str, ctx: &RuleContext) -> bool {
    ctx.identifiers.has_tag(selector)
}

fn is_known_class(selector: &str, ctx: &RuleContext) -> bool {
    selector
        .strip_prefix('.')
        .is_some_and(|class| ctx.identifiers.has_class(class))
}

fn is_known_id(selector: &str, ctx: &RuleContext) -> bool {
    selector
        .strip_prefix('#')
        .is_some_and(|id| ctx.identifiers.has_id(id))
}

fn is_priority_selector(selector: &str, ctx: &RuleContext) -> bool {
    ctx.config
        .priority_selectors
        .iter()
        .any(|p| p.eq_ignore_ascii_case(selector))
}

// `:hover`, `::before`, `@media`, `@keyframes` cannot be judged against a
// flat identifier set.
fn is_at_rule_or_pseudo(selector: &str, _ctx: &RuleContext) -> bool {
    selector.starts_with('@') || selector.contains(':')
}

fn has_layout_pattern(selector: &str, ctx: &RuleContext) -> bool {
    let lowered = selector.to_lowercase();
    ctx.config
        .layout_patterns
        .iter()
        .any(|pattern| lowered.contains(pattern.as_str()))
}

fn passes_fallback(selector: &str, _ctx: &RuleContext) -> bool {
    let cleaned = selector.trim();
    cleaned.chars().count() > 2 && !cleaned.starts_with('_')
}

/// Return the first enabled rule that accepts `selector`, if any.
///
/// # Example
///
/// ```rust
/// use rs_siteclone::{IdentifierSet, relevance::{judge_selector, FilterConfig, Relevance}};
///
/// let ids = IdentifierSet::from_html(r#"<div class="promo"></div>"#);
/// let config = FilterConfig::default();
/// assert_eq!(judge_selector(".promo", &ids, &config), Some(Relevance::ClassName));
/// assert_eq!(judge_selector("a:hover", &ids, &config), Some(Relevance::AtRuleOrPseudo));
/// assert_eq!(judge_selector(".x", &ids, &config), None);
/// ```
#[must_use]
pub fn judge_selector(
    selector: &str,
    identifiers: &IdentifierSet,
    config: &FilterConfig,
) -> Option<Relevance> {
    let selector = selector.trim();
    let ctx = RuleContext {
        identifiers,
        config,
    };

    RELEVANCE_RULES
        .iter()
        .filter(|(kind, _)| config.is_enabled(*kind))
        .find(|(_, rule)| rule(selector, &ctx))
        .map(|(kind, _)| *kind)
}

/// Judge a whole rule: the first selector of its list that is relevant
/// decides. At-rules are judged on their prelude as one selector, since
/// commas in `@media a, b` separate media queries, not selectors.
#[must_use]
pub fn judge_rule(
    rule: &StylesheetRule,
    identifiers: &IdentifierSet,
    config: &FilterConfig,
) -> Option<Relevance> {
    if rule.is_at_rule() {
        return judge_selector(rule.selector_text, identifiers, config);
    }
    rule.selectors()
        .find_map(|selector| judge_selector(selector, identifiers, config))
}

/// Filter `css` down to the rules relevant to `html`.
///
/// Returns an empty string when either input is empty. Malformed CSS never
/// errors: unterminated rules are ignored.
///
/// # Example
///
/// ```rust
/// use rs_siteclone::relevance::{filter_css, FilterConfig};
///
/// let html = r#"<div class="a"><p>x</p></div>"#;
/// let css = ".a{color:red} .b{color:blue}";
/// let filtered = filter_css(html, css, &FilterConfig::default());
/// assert!(filtered.contains(".a{color:red}"));
/// assert!(!filtered.contains(".b"));
/// ```
#[must_use]
pub fn filter_css(html: &str, css: &str, config: &FilterConfig) -> String {
    if html.trim().is_empty() || css.trim().is_empty() {
        return String::new();
    }
    let identifiers = IdentifierSet::from_html(html);
    filter_css_with_identifiers(css, &identifiers, config)
}

/// Filter `css` against an already collected identifier set.
#[must_use]
pub fn filter_css_with_identifiers(
    css: &str,
    identifiers: &IdentifierSet,
    config: &FilterConfig,
) -> String {
    let cleaned = stylesheet::strip_comments(css);
    let rules = stylesheet::parse_rules(&cleaned);

    let mut output = String::new();
    let mut kept = 0usize;

    for (index, rule) in rules.iter().enumerate() {
        if judge_rule(rule, identifiers, config).is_none() {
            continue;
        }
        if output.len() + rule.text.len() + 1 > config.max_output_len {
            debug!(
                cap = config.max_output_len,
                remaining = rules.len() - index,
                "filtered stylesheet reached its size cap, truncating"
            );
            break;
        }
        output.push_str(rule.text);
        output.push('\n');
        kept += 1;
    }

    debug!(total = rules.len(), kept, bytes = output.len(), "filtered stylesheet");
    output
}
