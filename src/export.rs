use crate::summary::SummaryRow;
use itertools::Itertools;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed table at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

const COL_PLATE: &str = "plate_found";
const COL_SIMILAR: &str = "similar_plates";
const COL_CONFIDENCE: &str = "confidence_level";
const COL_FIRST: &str = "first_frame";
const COL_LAST: &str = "last_frame";
const COL_TOTAL: &str = "total_detections";

pub fn columns(with_similar: bool) -> Vec<&'static str> {
    let mut cols = vec![COL_PLATE];
    if with_similar { cols.push(COL_SIMILAR); }
    cols.extend([COL_CONFIDENCE, COL_FIRST, COL_LAST, COL_TOTAL]);
    cols
}

/// Shortest round-trip form, always with a decimal point (`80.0`, `83.22`).
pub fn format_decimal(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

pub fn join_similar(similar: &[String]) -> String {
    similar.iter().join(", ")
}

fn quote_field(field: &str) -> String {
    if field.contains(|c| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_fields(row: &SummaryRow, with_similar: bool) -> Vec<String> {
    let mut fields = vec![row.plate.clone()];
    if with_similar { fields.push(join_similar(&row.similar_plates)); }
    fields.extend([
        format_decimal(row.confidence_level),
        row.first_frame.to_string(),
        row.last_frame.to_string(),
        row.total_detections.to_string(),
    ]);
    fields
}

/// Comma-separated table with a header line.
pub fn render_csv(rows: &[SummaryRow], with_similar: bool) -> String {
    let mut out = columns(with_similar).join(",");
    out.push('\n');
    for row in rows {
        out.push_str(&csv_fields(row, with_similar).iter().map(|f| quote_field(f)).join(","));
        out.push('\n');
    }
    out
}

pub fn write_table(path: &Path, rows: &[SummaryRow], with_similar: bool) -> Result<(), ExportError> {
    write_file(path, &render_csv(rows, with_similar))
}

pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), ExportError> {
    let err = |source| ExportError::Write { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(err)?;
    }
    fs::write(path, contents).map_err(err)
}

fn split_record(line: &str, line_no: usize) -> Result<Vec<String>, ExportError> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                chars.next();
                cur.push('"');
            }
            ('"', true) => in_quotes = false,
            ('"', false) if cur.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut cur)),
            _ => cur.push(c),
        }
    }
    if in_quotes {
        return Err(ExportError::Malformed { line: line_no, reason: "unterminated quoted field".into() });
    }
    fields.push(cur);
    Ok(fields)
}

/// Parse a table written by [`render_csv`], in either column layout.
pub fn read_table(text: &str) -> Result<Vec<SummaryRow>, ExportError> {
    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
    let Some((_, header)) = lines.next() else { return Ok(Vec::new()) };
    let header = split_record(header, 1)?;
    let with_similar = match header.iter().map(|h| h.trim()).collect::<Vec<_>>() {
        h if h == columns(true) => true,
        h if h == columns(false) => false,
        _ => return Err(ExportError::Malformed { line: 1, reason: format!("unexpected header {header:?}") }),
    };
    let width = columns(with_similar).len();

    let mut rows = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        let fields = split_record(line, line_no)?;
        if fields.len() != width {
            return Err(ExportError::Malformed {
                line: line_no,
                reason: format!("expected {width} fields, found {}", fields.len()),
            });
        }
        let bad = |what: &str, v: &str| ExportError::Malformed { line: line_no, reason: format!("bad {what} '{v}'") };
        let mut it = fields.into_iter();
        let plate = it.next().unwrap_or_default();
        let similar_plates = if with_similar {
            let raw = it.next().unwrap_or_default();
            if raw.is_empty() { Vec::new() } else { raw.split(", ").map(str::to_string).collect() }
        } else {
            Vec::new()
        };
        let rest: Vec<String> = it.collect();
        let confidence_level = rest[0].trim().parse::<f64>().map_err(|_| bad(COL_CONFIDENCE, &rest[0]))?;
        let first_frame = rest[1].trim().parse::<u64>().map_err(|_| bad(COL_FIRST, &rest[1]))?;
        let last_frame = rest[2].trim().parse::<u64>().map_err(|_| bad(COL_LAST, &rest[2]))?;
        let total_detections = rest[3].trim().parse::<usize>().map_err(|_| bad(COL_TOTAL, &rest[3]))?;
        rows.push(SummaryRow { plate, similar_plates, confidence_level, first_frame, last_frame, total_detections });
    }
    Ok(rows)
}

/// Right-aligned fixed-width rendering for the console and the text report.
pub fn render_table(rows: &[SummaryRow], with_similar: bool) -> String {
    let header: Vec<String> = columns(with_similar).into_iter().map(str::to_string).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            let mut cells = vec![r.plate.clone()];
            if with_similar { cells.push(join_similar(&r.similar_plates)); }
            cells.extend([
                format!("{:.2}", r.confidence_level),
                r.first_frame.to_string(),
                r.last_frame.to_string(),
                r.total_detections.to_string(),
            ]);
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|c| {
            std::iter::once(&header)
                .chain(body.iter())
                .map(|cells| cells[c].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    std::iter::once(&header)
        .chain(body.iter())
        .map(|cells| {
            cells.iter().zip(&widths).map(|(cell, w)| format!("{cell:>w$}", w = *w)).join("  ")
        })
        .join("\n")
}
