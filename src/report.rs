use crate::export::{render_table, write_file, ExportError};
use crate::grouping::Grouping;
use crate::summary::{SummaryRow, SummaryStats};
use std::fmt::Write as _;
use std::path::Path;

const BANNER_WIDTH: usize = 80;
pub const TITLE: &str = "LICENSE PLATE DETECTION SUMMARY";

/// Run settings echoed at the top of the report.
pub fn render_preamble(input: &Path, grouping: &Grouping) -> String {
    let mut out = format!("Parsing license plate detection log: {}\n", input.display());
    if let Some(t) = grouping.threshold() {
        let _ = writeln!(out, "Using similarity threshold: {t}%");
    }
    out
}

/// Banner, plate count and the rendered table.
pub fn render_results(rows: &[SummaryRow], grouping: &Grouping) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "{banner}\n{TITLE}\n{banner}");
    let _ = writeln!(out, "Total unique plates found: {}\n", rows.len());
    let _ = writeln!(out, "Detailed Results:");
    let _ = writeln!(out, "{}", render_table(rows, grouping.reports_similar()));
    out
}

pub fn render_statistics(stats: &SummaryStats) -> String {
    let mut out = String::from("Statistics:\n");
    let _ = writeln!(out, "- Average confidence: {:.2}", stats.average_confidence);
    let _ = writeln!(out, "- Highest confidence: {:.2}", stats.highest_confidence);
    let _ = writeln!(out, "- Lowest confidence: {:.2}", stats.lowest_confidence);
    let _ = writeln!(out, "- Total detections across all plates: {}", stats.total_detections);
    out
}

pub fn render_report(input: &Path, grouping: &Grouping, rows: &[SummaryRow]) -> String {
    let mut out = render_preamble(input, grouping);
    out.push('\n');
    out.push_str(&render_results(rows, grouping));
    if let Some(stats) = SummaryStats::from_rows(rows) {
        out.push('\n');
        out.push_str(&render_statistics(&stats));
    }
    out
}

pub fn write_report(path: &Path, input: &Path, grouping: &Grouping, rows: &[SummaryRow]) -> Result<(), ExportError> {
    write_file(path, &render_report(input, grouping, rows))
}
