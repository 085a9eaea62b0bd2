//! Section detectors.
//!
//! One detector per section name, in detection order. First-match detectors try
//! their candidate selectors in priority order and stop at the first element
//! found, not the best one.

use super::SectionName;

/// How a detector finds its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// First element matching the first candidate selector that matches.
    FirstMatch(&'static [&'static str]),
    /// Largest qualifying block container, else the body.
    LargestBlock,
}

/// Where to look for a section and how to label it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDetector {
    pub name: SectionName,
    pub description: &'static str,
    pub priority: u8,
    pub locator: Locator,
}

/// Class substrings that disqualify a block from being main content.
pub const MAIN_CONTENT_EXCLUDED_CLASSES: &[&str] = &["header", "footer", "sidebar", "nav", "menu"];

pub static SECTION_DETECTORS: &[SectionDetector] = &[
    SectionDetector {
        name: SectionName::Header,
        description: "Site header with navigation and branding",
        priority: 2,
        locator: Locator::FirstMatch(&[
            "header",
            r#"[role="banner"]"#,
            ".header",
            ".site-header",
            ".main-header",
            ".navigation",
            "nav",
            ".nav",
        ]),
    },
    SectionDetector {
        name: SectionName::Hero,
        description: "Hero banner or main promotional section",
        priority: 2,
        locator: Locator::FirstMatch(&[
            ".hero",
            ".banner",
            ".jumbotron",
            ".hero-section",
            ".main-banner",
            r#"[class*="hero"]"#,
            r#"[class*="banner"]"#,
        ]),
    },
    SectionDetector {
        name: SectionName::MainContent,
        description: "Main content area with primary information",
        priority: 1,
        locator: Locator::LargestBlock,
    },
    SectionDetector {
        name: SectionName::Sidebar,
        description: "Sidebar with secondary navigation or content",
        priority: 3,
        locator: Locator::FirstMatch(&[
            "aside",
            r#"[role="complementary"]"#,
            ".sidebar",
            ".side-nav",
            ".secondary",
            ".widget-area",
        ]),
    },
    SectionDetector {
        name: SectionName::Footer,
        description: "Site footer with links and information",
        priority: 4,
        locator: Locator::FirstMatch(&[
            "footer",
            r#"[role="contentinfo"]"#,
            ".footer",
            ".site-footer",
            ".main-footer",
        ]),
    },
];
