use crate::aggregate::PlateAggregate;
use crate::config::{OutputPaths, PipelineConfig, SortOrder};
use crate::export::{self, ExportError};
use crate::grouping::{self, Grouping};
use crate::parser::{self, LogError, PlateEvent};
use crate::report;
use crate::summary::{build_rows, SummaryRow, SummaryStats};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Finished, ranked result of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateSummary {
    pub input: PathBuf,
    pub grouping: Grouping,
    pub sort: SortOrder,
    pub rows: Vec<SummaryRow>,
    pub stats: Option<SummaryStats>,
}

impl PlateSummary {
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

/// Aggregate, group and rank already-parsed events.
pub fn summarize_events<I>(events: I, grouping: Grouping, sort: SortOrder) -> Vec<SummaryRow>
where
    I: IntoIterator<Item = PlateEvent>,
{
    let aggregate = PlateAggregate::from_events(events);
    let distinct = aggregate.len();
    let clusters = grouping::group(aggregate, grouping);
    info!(distinct, clusters = clusters.len(), "summarized plate readings");
    build_rows(&clusters, sort)
}

pub fn summarize_log(path: &Path, grouping: Grouping, sort: SortOrder) -> Result<Vec<SummaryRow>, LogError> {
    let events = parser::read_log(path)?;
    Ok(summarize_events(events, grouping, sort))
}

pub fn summarize(config: &PipelineConfig) -> Result<PlateSummary, LogError> {
    let rows = summarize_log(&config.input, config.grouping, config.sort)?;
    let stats = SummaryStats::from_rows(&rows);
    Ok(PlateSummary {
        input: config.input.clone(),
        grouping: config.grouping,
        sort: config.sort,
        rows,
        stats,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Table,
    Report,
}

impl OutputKind {
    pub fn title(self) -> &'static str {
        match self {
            OutputKind::Table => "Results",
            OutputKind::Report => "Detailed report",
        }
    }
}

#[derive(Debug)]
pub struct OutputStatus {
    pub kind: OutputKind,
    pub path: PathBuf,
    pub result: Result<(), ExportError>,
}

impl OutputStatus {
    pub fn is_ok(&self) -> bool { self.result.is_ok() }
}

/// Write the table and, when configured, the report. A failed file does not stop the other.
pub fn persist(summary: &PlateSummary, outputs: &OutputPaths) -> Vec<OutputStatus> {
    let with_similar = summary.grouping.reports_similar();
    let mut statuses = vec![OutputStatus {
        kind: OutputKind::Table,
        path: outputs.table.clone(),
        result: export::write_table(&outputs.table, &summary.rows, with_similar),
    }];
    if let Some(path) = &outputs.report {
        statuses.push(OutputStatus {
            kind: OutputKind::Report,
            path: path.clone(),
            result: report::write_report(path, &summary.input, &summary.grouping, &summary.rows),
        });
    }
    for s in &statuses {
        match &s.result {
            Ok(()) => info!(path = %s.path.display(), "{} saved", s.kind.title()),
            Err(e) => error!("{e}"),
        }
    }
    statuses
}

#[derive(Debug)]
pub enum RunOutcome {
    /// Input missing or unreadable.
    Failed(LogError),
    /// Input read but no plate readings found; nothing written.
    Empty(PlateSummary),
    Completed { summary: PlateSummary, outputs: Vec<OutputStatus> },
}

pub fn run(config: &PipelineConfig) -> RunOutcome {
    let summary = match summarize(config) {
        Ok(s) => s,
        Err(e) => {
            error!("{e}");
            return RunOutcome::Failed(e);
        }
    };
    if summary.is_empty() {
        return RunOutcome::Empty(summary);
    }
    let outputs = persist(&summary, &config.outputs);
    RunOutcome::Completed { summary, outputs }
}
