//! # rs-siteclone
//!
//! Reconstructs a live web page as one standalone HTML document.
//!
//! A scraped page (HTML plus every stylesheet it pulls in) is either kept
//! whole with its references normalized, or split into sections that a
//! text-generation collaborator rewrites one by one. Either way the result
//! is a single document with one embedded stylesheet, absolute image URLs,
//! and outbound links neutralized.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_siteclone::{clone_conservative, Options, ScrapedContext};
//!
//! let html = r#"<html><head><title>Campus</title></head>
//! <body><header><img src="/logo.png"></header><p>Welcome.</p></body></html>"#;
//! let scraped = ScrapedContext::from_parts("https://example.com/", html, "header { height: 4rem }");
//!
//! let result = clone_conservative(&scraped, &Options::default());
//! assert!(result.combined_html.starts_with("<!DOCTYPE html>"));
//! assert!(result.combined_html.contains("https://example.com/logo.png"));
//! ```
//!
//! ## Features
//!
//! - **CSS Relevance Filter**: keeps the stylesheet rules that plausibly style
//!   a given piece of markup
//! - **Section Detection**: header, hero, main content, sidebar and footer
//!   located by ordered structural detectors
//! - **Link Normalization**: images and srcsets made absolute, links and form
//!   targets replaced by `#`
//! - **Generative Mode**: per-section rewrites guarded by a fidelity check,
//!   or one whole-page rewrite with its CSS inlined into the `<head>`

mod clone;
mod context;
mod error;
mod identifiers;
mod options;
mod patterns;
mod result;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Stylesheet scanning: comments, rules, selectors.
pub mod stylesheet;

/// CSS relevance filter.
pub mod relevance;

/// Section detection.
pub mod sections;

/// URL utilities for validation and resolution.
pub mod url_utils;

/// URL/link normalization of scraped markup.
pub mod normalize;

/// Document assembly.
pub mod assemble;

/// Text-generation collaborator, prompts and fidelity check.
pub mod generate;

/// Page scraping collaborator.
pub mod scrape;

/// Character encoding detection and transcoding.
pub mod encoding;

// Public API - re-exports
pub use clone::{
    clone_conservative, clone_generative, clone_url, clone_whole_page, process_section,
};
pub use context::CloneContext;
pub use error::{Error, Result};
pub use generate::{ClientConfig, Generator, MessagesClient};
pub use identifiers::IdentifierSet;
pub use options::{Options, DEFAULT_DOCUMENT_TITLE, DEFAULT_FALLBACK_ORIGIN};
pub use relevance::{filter_css, FilterConfig, Relevance};
pub use result::{CloneMode, CloneResult, ProcessingMethod, SectionRecord};
pub use scrape::{scrape, HttpFetcher, PageFetcher, ScrapedContext};
pub use sections::{detect_sections, SectionName, WebsiteSection};
