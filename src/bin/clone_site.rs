//! Clone a live page into a standalone HTML document.
//!
//! Usage: clone_site <url> [--generative] [--whole-page] [--trim-css] [--out DIR]
//!
//! Writes `<DIR>/cloned.html` and a JSON report of the processed sections to
//! `<DIR>/report.json`. `--whole-page` rewrites the page in a single
//! generation call and implies `--generative`. Generative mode needs `ANTHROPIC_API_KEY`; set
//! `RUST_LOG=rs_siteclone=debug` for detailed progress.

use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use rs_siteclone::{clone_url, ClientConfig, HttpFetcher, MessagesClient, Options};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_OUT_DIR: &str = "generated";

struct Args {
    url: String,
    generative: bool,
    whole_page: bool,
    trim_css: bool,
    out_dir: PathBuf,
}

fn parse_args() -> Result<Args, String> {
    let mut url = None;
    let mut generative = false;
    let mut whole_page = false;
    let mut trim_css = false;
    let mut out_dir = PathBuf::from(DEFAULT_OUT_DIR);

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--generative" => generative = true,
            "--whole-page" => {
                generative = true;
                whole_page = true;
            }
            "--trim-css" => trim_css = true,
            "--out" => {
                out_dir = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or_else(|| "--out needs a directory".to_string())?;
            }
            flag if flag.starts_with("--") => return Err(format!("unknown flag: {flag}")),
            _ if url.is_none() => url = Some(arg),
            _ => return Err(format!("unexpected argument: {arg}")),
        }
    }

    Ok(Args {
        url: url.ok_or_else(|| "missing <url>".to_string())?,
        generative,
        whole_page,
        trim_css,
        out_dir,
    })
}

#[derive(Serialize)]
struct SectionSummary<'a> {
    section_name: String,
    method: &'a rs_siteclone::ProcessingMethod,
    html_len: usize,
    css_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

#[derive(Serialize)]
struct Report<'a> {
    original_url: &'a str,
    method: &'a rs_siteclone::CloneMode,
    section_count: usize,
    sections: Vec<SectionSummary<'a>>,
    images: &'a [String],
    scraped_html_length: usize,
    scraped_css_length: usize,
    elapsed_ms: u128,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("Usage: clone_site <url> [--generative] [--whole-page] [--trim-css] [--out DIR]");
            std::process::exit(2);
        }
    };

    let options = Options {
        trim_unused_css: args.trim_css,
        whole_page_generation: args.whole_page,
        ..Options::default()
    };
    let fetcher = HttpFetcher::new(options.fetch_timeout)?;
    let generator = if args.generative {
        Some(MessagesClient::new(ClientConfig::from_env()?)?)
    } else {
        None
    };

    let start = Instant::now();
    let result = clone_url(
        &args.url,
        &fetcher,
        generator.as_ref().map(|g| g as &dyn rs_siteclone::Generator),
        &options,
    )
    .await?;
    let elapsed_ms = start.elapsed().as_millis();

    std::fs::create_dir_all(&args.out_dir)?;
    let html_path = args.out_dir.join("cloned.html");
    std::fs::write(&html_path, &result.combined_html)?;

    let report = Report {
        original_url: &result.original_url,
        method: &result.method,
        section_count: result.section_count(),
        sections: result
            .sections
            .iter()
            .map(|s| SectionSummary {
                section_name: s.section_name.to_string(),
                method: &s.method,
                html_len: s.html.len(),
                css_len: s.css.len(),
                error: s.error.as_deref(),
            })
            .collect(),
        images: &result.images,
        scraped_html_length: result.scraped_html_length,
        scraped_css_length: result.scraped_css_length,
        elapsed_ms,
    };
    let report_path = args.out_dir.join("report.json");
    std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)?;

    info!(
        html = %html_path.display(),
        report = %report_path.display(),
        sections = result.section_count(),
        elapsed_ms,
        "clone written"
    );
    Ok(())
}
