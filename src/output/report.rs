use crate::crawler::CrawlResult;
use crate::Result;
use clap::ValueEnum;
use std::fmt::Write;

/// Output format for the crawl report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Pretty-printed JSON object mapping each seed to its product URLs
    #[default]
    Json,

    /// One block per seed: a header line, then one indented URL per line
    Text,
}

/// Renders `result` in the requested format
///
/// Seeds appear in the order they were given; URLs within a seed are sorted.
pub fn render_report(result: &CrawlResult, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        ReportFormat::Text => Ok(render_text(result)),
    }
}

fn render_text(result: &CrawlResult) -> String {
    let mut out = String::new();

    for (i, (seed, urls)) in result.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // Writing to a String cannot fail
        let _ = writeln!(out, "{} ({})", seed, urls.len());
        for url in urls {
            let _ = writeln!(out, "  {}", url);
        }
    }

    out
}
