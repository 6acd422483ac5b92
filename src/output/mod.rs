//! Output module for presenting ranking results
//!
//! This module handles:
//! - Assembling the ranking report of a run
//! - Rendering it as plain text or JSON

mod report;

pub use report::RankingReport;

use std::io::{self, Write};

/// Output format of the ranking report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `Iterations: n` followed by one line per page
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Writes the report as text
///
/// The first line is `Iterations: n`, followed by the ranked pages in
/// descending order, one `<rank>  <url>` per line.
pub fn write_text<W: Write>(report: &RankingReport, out: &mut W) -> io::Result<()> {
    writeln!(out, "Iterations: {}", report.iterations)?;
    writeln!(out, "PageRank values:")?;

    for page in &report.pages {
        writeln!(out, "  {:<10}  {}", page.page_rank, page.url)?;
    }

    Ok(())
}

/// Prints the report as text to stdout
pub fn print_text(report: &RankingReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_text(report, &mut handle)
}

/// Serializes the report as pretty JSON
pub fn to_json(report: &RankingReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Prints the report to stdout in the requested format
pub fn print_report(report: &RankingReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => {
            let json = to_json(report).map_err(io::Error::other)?;
            println!("{}", json);
            Ok(())
        }
    }
}
