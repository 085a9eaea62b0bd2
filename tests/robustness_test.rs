use rs_siteclone::generate::{extract_code_block, CodeLanguage};
use rs_siteclone::normalize::{normalize_html, Scope};
use rs_siteclone::url_utils::Origin;
use rs_siteclone::{
    clone_conservative, detect_sections, filter_css, CloneContext, FilterConfig, Options,
    ScrapedContext,
};
use std::time::{Duration, Instant};

const MALFORMED_HTML: &[&str] = &[
    "<p>text<div>more",
    "<p><div></p></div>",
    "<html><body><header>content",
    "<div class=\"test id=broken>",
    "&amp text &lt;",
    "text\x00more",
    "<img src=><a href>x</a><form action>",
    "<img srcset=\", , 2x,\">",
    "",
    "   \n\t  ",
];

const MALFORMED_CSS: &[&str] = &[
    ".a { color: red",
    "}}}} .b { x: y }",
    "/* unterminated comment .c { x: y }",
    ".d { content: \"unterminated }",
    "@media screen {",
    "{ orphan: body }",
    ";;;",
    "",
];

fn origin() -> Origin {
    Origin::new(Some("https://example.com/"), "https://fallback.test")
}

#[test]
fn filter_does_not_panic_on_malformed_input() {
    for html in MALFORMED_HTML {
        for css in MALFORMED_CSS {
            let _ = filter_css(html, css, &FilterConfig::default());
            let _ = filter_css(html, css, &FilterConfig::strict());
        }
    }
}

#[test]
fn filter_output_is_drawn_from_input() {
    for css in MALFORMED_CSS {
        let filtered = filter_css("<div class=\"a b d\"></div>", css, &FilterConfig::default());
        for line in filtered.lines() {
            assert!(css.contains(line), "{line:?} not in {css:?}");
        }
    }
}

#[test]
fn section_detection_does_not_panic_on_malformed_html() {
    for html in MALFORMED_HTML {
        let mut ctx = CloneContext::new(Some("https://example.com/"), "https://fallback.test");
        let _ = detect_sections(html, ".a { b: c }", &mut ctx, &Options::default());
    }
}

#[test]
fn normalization_does_not_panic_on_malformed_html() {
    for html in MALFORMED_HTML {
        for scope in [Scope::Full, Scope::LinksOnly] {
            let _ = normalize_html(html, &origin(), scope);
        }
    }
}

#[test]
fn unparseable_page_url_falls_back_to_fallback_origin() {
    let origin = Origin::new(Some("not a url"), "https://fallback.test");
    let out = normalize_html(r#"<img src="/x.png">"#, &origin, Scope::Full);
    assert_eq!(out, r#"<img src="https://fallback.test/x.png">"#);
}

#[test]
fn conservative_clone_does_not_panic_on_malformed_input() {
    for html in MALFORMED_HTML {
        for css in MALFORMED_CSS {
            let scraped = ScrapedContext::from_parts("https://example.com/", html, css);
            let result = clone_conservative(&scraped, &Options::default());
            assert!(result.combined_html.contains("<title>"));
            assert_eq!(result.section_count(), 1);
        }
    }
}

#[test]
fn code_block_extraction_handles_odd_replies() {
    let replies = [
        "",
        "```",
        "``````",
        "```html",
        "```css\n",
        "no fences at all",
        "```html\n<div>unterminated",
        "```\n\n```\n```",
        "```🦀\n<p>x</p>\n```",
    ];
    for reply in replies {
        let _ = extract_code_block(CodeLanguage::Html, reply);
        let _ = extract_code_block(CodeLanguage::Css, reply);
    }
    assert_eq!(
        extract_code_block(CodeLanguage::Html, "```html\n<div>unterminated"),
        "<div>unterminated"
    );
    assert_eq!(extract_code_block(CodeLanguage::Css, "no fences at all"), "");
}

#[test]
fn large_stylesheet_filters_in_reasonable_time() {
    let mut css = String::with_capacity(4 * 1024 * 1024);
    let mut i = 0usize;
    while css.len() < 4 * 1024 * 1024 {
        css.push_str(&format!(".unused-{i} {{ color: red }}\n.keep {{ margin: {i}px }}\n"));
        i += 1;
    }
    let html = "<html><body><div class=\"keep\">x</div></body></html>";

    let start = Instant::now();
    let filtered = filter_css(html, &css, &FilterConfig::strict());
    let elapsed = start.elapsed();

    assert!(filtered.contains(".keep { margin: 0px }"));
    assert!(!filtered.contains(".unused-0 "));
    assert!(elapsed < Duration::from_secs(30), "filtering took {elapsed:?}");
}
