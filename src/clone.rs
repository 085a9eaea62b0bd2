//! Clone Pipeline
//!
//! Turns a [`ScrapedContext`] into a standalone document. Conservative mode
//! keeps the page whole and only normalizes references; generative mode
//! splits it into sections, has each one rewritten, and keeps a rewrite only
//! when it passes the fidelity check. Whole-page mode asks for the entire
//! page in a single call.

use tracing::{debug, info, instrument, warn};

use crate::assemble::{assemble_document, combine_html_and_css, AssemblyPart};
use crate::context::CloneContext;
use crate::dom;
use crate::error::Result;
use crate::generate::{
    check_fidelity, extract_code_block, format_page_prompt, format_section_prompt, minimal_markup,
    CodeLanguage, Fidelity, Generator, PageSummary,
};
use crate::normalize::{normalize_html, Scope};
use crate::options::Options;
use crate::relevance::filter_css;
use crate::result::{CloneMode, CloneResult, ProcessingMethod, SectionRecord};
use crate::scrape::{scrape, PageFetcher, ScrapedContext};
use crate::sections::{detect_sections, sort_by_priority, SectionName, WebsiteSection};
use crate::url_utils::Origin;

/// Clone a page without rewriting any of its content.
///
/// The whole body becomes one `entire-site` section with image references
/// made absolute and outbound links neutralized.
///
/// # Example
///
/// ```rust
/// use rs_siteclone::{clone_conservative, Options, ScrapedContext};
///
/// let scraped = ScrapedContext::from_parts(
///     "https://example.com/",
///     r#"<html><body><img src="/logo.png"><a href="https://example.com/x">x</a></body></html>"#,
///     "body { margin: 0 }",
/// );
/// let result = clone_conservative(&scraped, &Options::default());
/// assert!(result.combined_html.contains(r#"src="https://example.com/logo.png""#));
/// assert!(result.combined_html.contains(r##"href="#""##));
/// assert_eq!(result.section_count(), 1);
/// ```
#[must_use]
pub fn clone_conservative(scraped: &ScrapedContext, options: &Options) -> CloneResult {
    let mut ctx = CloneContext::new(Some(&scraped.url), &options.fallback_origin);
    for src in &scraped.images {
        ctx.register_image(src);
    }

    let normalized = normalize_html(&scraped.html, ctx.origin(), Scope::Full);
    let css = if options.trim_unused_css {
        filter_css(&scraped.html, &scraped.css_contents, &options.filter)
    } else {
        scraped.css_contents.clone()
    };

    let section = WebsiteSection::entire_site(dom::body_markup(&normalized), css);
    let record = SectionRecord {
        section_name: section.name,
        description: section.description,
        html: section.html,
        css: section.css,
        method: ProcessingMethod::Conservative,
        error: None,
    };

    finish(scraped, ctx, vec![record], CloneMode::Conservative, options)
}

/// Clone a page by having `generator` rewrite each detected section.
///
/// Sections are processed one at a time in priority order, with at least
/// `options.generation_delay` between two generator calls. A failed or
/// unfaithful rewrite falls back to the original section with only links
/// and forms neutralized. A page with no detectable section goes through
/// [`clone_whole_page`].
#[instrument(skip_all, fields(url = %scraped.url))]
pub async fn clone_generative(
    scraped: &ScrapedContext,
    generator: &dyn Generator,
    options: &Options,
) -> CloneResult {
    let mut ctx = CloneContext::new(Some(&scraped.url), &options.fallback_origin);
    let mut sections = detect_sections(&scraped.html, &scraped.css_contents, &mut ctx, options);
    if sections.is_empty() {
        warn!("no sections detected, rewriting the whole page");
        return clone_whole_page(scraped, generator, options).await;
    }
    sort_by_priority(&mut sections);
    info!(sections = sections.len(), "processing sections");

    let mut records = Vec::with_capacity(sections.len());
    for (index, section) in sections.iter().enumerate() {
        if index > 0 && !options.generation_delay.is_zero() {
            tokio::time::sleep(options.generation_delay).await;
        }
        records.push(process_section(section, generator, ctx.origin(), options).await);
    }

    finish(scraped, ctx, records, CloneMode::Generative, options)
}

/// Clone a page by having `generator` rewrite all of it in one call.
///
/// The prompt carries a summary of the page, its markup without scripts and
/// styles, and the CSS that applies to it. The returned CSS is inlined into
/// the returned document's `<head>`. A failed call or a reply without HTML
/// gives the conservative clone, with the error recorded on its section.
#[instrument(skip_all, fields(url = %scraped.url))]
pub async fn clone_whole_page(
    scraped: &ScrapedContext,
    generator: &dyn Generator,
    options: &Options,
) -> CloneResult {
    if scraped.html.trim().is_empty() {
        return clone_conservative(scraped, options);
    }

    let mut ctx = CloneContext::new(Some(&scraped.url), &options.fallback_origin);
    for src in &scraped.images {
        ctx.register_image(src);
    }

    let css = filter_css(&scraped.html, &scraped.css_contents, &options.filter);
    let title = options.title_for(&scraped.title);
    let summary = PageSummary::new(&title, ctx.images(), &scraped.summary);
    let prompt = format_page_prompt(&summary, &minimal_markup(&scraped.html), &css, options);
    debug!(prompt_chars = prompt.len(), css_bytes = css.len(), "whole-page prompt");

    let reply = match generator.generate(&prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "whole-page generation failed, cloning conservatively");
            let mut result = clone_conservative(scraped, options);
            if let Some(record) = result.sections.first_mut() {
                record.error = Some(e.to_string());
            }
            return result;
        }
    };

    let html = extract_code_block(CodeLanguage::Html, &reply);
    let generated_css = extract_code_block(CodeLanguage::Css, &reply);
    if html.is_empty() {
        info!("reply carried no html, cloning conservatively");
        return clone_conservative(scraped, options);
    }

    let combined = combine_html_and_css(&title, &html, &generated_css);
    let combined_html = normalize_html(&combined, ctx.origin(), Scope::Full);
    info!(
        images = ctx.images().len(),
        bytes = combined_html.len(),
        "assembled whole-page rewrite"
    );

    CloneResult {
        combined_html,
        sections: vec![SectionRecord {
            section_name: SectionName::EntireSite,
            description: "Entire website generated in one pass".to_string(),
            html,
            css: generated_css,
            method: ProcessingMethod::AiGenerated,
            error: None,
        }],
        method: CloneMode::WholePage,
        original_url: scraped.url.clone(),
        images: ctx.into_images(),
        scraped_html_length: scraped.html.len(),
        scraped_css_length: scraped.css_contents.len(),
    }
}

/// Rewrite one section, falling back to the original on failure.
pub async fn process_section(
    section: &WebsiteSection,
    generator: &dyn Generator,
    origin: &Origin,
    options: &Options,
) -> SectionRecord {
    let prompt = format_section_prompt(section, options);

    let reply = match generator.generate(&prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(section = %section.name, error = %e, "generation failed, keeping original");
            return original_with_fixes(section, origin, Some(e.to_string()));
        }
    };

    let html = extract_code_block(CodeLanguage::Html, &reply);
    let css = extract_code_block(CodeLanguage::Css, &reply);

    match check_fidelity(&section.html, &html, options.min_length_ratio) {
        Fidelity::Faithful => {
            debug!(section = %section.name, bytes = html.len(), "rewrite accepted");
            SectionRecord {
                section_name: section.name,
                description: section.description.clone(),
                html,
                css: if css.trim().is_empty() {
                    section.css.clone()
                } else {
                    css
                },
                method: ProcessingMethod::AiGenerated,
                error: None,
            }
        }
        verdict => {
            info!(section = %section.name, ?verdict, "rewrite rejected, keeping original");
            original_with_fixes(section, origin, None)
        }
    }
}

fn original_with_fixes(
    section: &WebsiteSection,
    origin: &Origin,
    error: Option<String>,
) -> SectionRecord {
    SectionRecord {
        section_name: section.name,
        description: section.description.clone(),
        html: normalize_html(&section.html, origin, Scope::LinksOnly),
        css: section.css.clone(),
        method: ProcessingMethod::OriginalWithFixes,
        error,
    }
}

/// Assemble the records and run the final normalization pass.
fn finish(
    scraped: &ScrapedContext,
    ctx: CloneContext,
    records: Vec<SectionRecord>,
    method: CloneMode,
    options: &Options,
) -> CloneResult {
    let title = options.title_for(&scraped.title);
    let assembled = {
        let parts: Vec<AssemblyPart<'_>> = records
            .iter()
            .map(|record| AssemblyPart {
                name: record.section_name,
                html: &record.html,
                css: &record.css,
            })
            .collect();
        assemble_document(&title, &parts)
    };
    let combined_html = normalize_html(&assembled, ctx.origin(), Scope::Full);
    info!(
        ?method,
        sections = records.len(),
        images = ctx.images().len(),
        bytes = combined_html.len(),
        "assembled document"
    );

    CloneResult {
        combined_html,
        sections: records,
        method,
        original_url: scraped.url.clone(),
        images: ctx.into_images(),
        scraped_html_length: scraped.html.len(),
        scraped_css_length: scraped.css_contents.len(),
    }
}

/// Scrape `url` and clone it, generatively when a generator is given.
///
/// With `options.whole_page_generation` set, the generator rewrites the page
/// in one call instead of section by section.
///
/// # Errors
///
/// Fails only when the page itself cannot be fetched.
#[instrument(skip(fetcher, generator, options))]
pub async fn clone_url(
    url: &str,
    fetcher: &dyn PageFetcher,
    generator: Option<&dyn Generator>,
    options: &Options,
) -> Result<CloneResult> {
    let scraped = scrape(url, fetcher).await?;
    let result = match generator {
        Some(generator) if options.whole_page_generation => {
            clone_whole_page(&scraped, generator, options).await
        }
        Some(generator) => clone_generative(&scraped, generator, options).await,
        None => clone_conservative(&scraped, options),
    };
    Ok(result)
}
