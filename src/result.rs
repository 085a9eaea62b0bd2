//! Result types for clone output.
//!
//! This module defines the structured output of a clone operation: the final
//! document plus one record per processed section.

use serde::{Deserialize, Serialize};

use crate::sections::SectionName;

/// How a section's output was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMethod {
    /// Rewritten by the generation collaborator and accepted by the fidelity
    /// check.
    AiGenerated,
    /// Original markup with links and forms neutralized, used when generation
    /// failed or its output was rejected.
    OriginalWithFixes,
    /// Original markup with references normalized, no generation involved.
    Conservative,
}

/// Which pipeline produced a [`CloneResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneMode {
    Conservative,
    /// Section by section.
    Generative,
    /// One generation call for the whole page.
    WholePage,
}

/// Output record of one processed section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub section_name: SectionName,
    pub description: String,
    pub html: String,
    pub css: String,
    pub method: ProcessingMethod,
    /// Why generation was abandoned for this section, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a clone operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneResult {
    /// The assembled, self-contained HTML document.
    pub combined_html: String,

    /// Processed sections in emission order.
    pub sections: Vec<SectionRecord>,

    pub method: CloneMode,

    /// URL the page was scraped from.
    pub original_url: String,

    /// Absolute URLs of the images found in the original page.
    pub images: Vec<String>,

    pub scraped_html_length: usize,

    pub scraped_css_length: usize,
}

impl CloneResult {
    /// Number of processed sections.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}
