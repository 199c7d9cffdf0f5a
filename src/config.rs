use crate::export::format_decimal;
use crate::grouping::Grouping;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_THRESHOLD: f64 = 80.0;

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("invalid similarity threshold '{0}'")]
    NotNumeric(String),
    #[error("similarity threshold {0} should be between 0 and 100")]
    OutOfRange(f64),
}

/// Minimum similarity score (inclusive) for two plate texts to share a cluster.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SimilarityThreshold(f64);

impl SimilarityThreshold {
    pub fn new(value: f64) -> Result<Self, ThresholdError> {
        if (0.0..=100.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ThresholdError::OutOfRange(value))
        }
    }

    pub fn value(self) -> f64 { self.0 }

    pub fn accepts(self, score: f64) -> bool { score >= self.0 }

    /// Lenient resolution for user input: missing means default, invalid warns and falls back to default.
    pub fn resolve(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };
        match raw.parse::<Self>() {
            Ok(t) => t,
            Err(e) => {
                warn!("{e}; using default {DEFAULT_THRESHOLD:.1}");
                Self::default()
            }
        }
    }
}

impl Default for SimilarityThreshold {
    fn default() -> Self { Self(DEFAULT_THRESHOLD) }
}

impl FromStr for SimilarityThreshold {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v: f64 = s.trim().parse().map_err(|_| ThresholdError::NotNumeric(s.to_string()))?;
        Self::new(v)
    }
}

impl TryFrom<f64> for SimilarityThreshold {
    type Error = ThresholdError;

    fn try_from(value: f64) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<SimilarityThreshold> for f64 {
    fn from(t: SimilarityThreshold) -> f64 { t.0 }
}

impl fmt::Display for SimilarityThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_decimal(self.0))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// `confidence_level`, highest first
    #[default]
    Confidence,
    /// `first_frame`, earliest first
    FirstFrame,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confidence" => Ok(SortOrder::Confidence),
            "first-frame" | "first_frame" | "frame" => Ok(SortOrder::FirstFrame),
            other => Err(format!("unknown sort order '{other}' (expected confidence | first-frame)")),
        }
    }
}

/// Where the delimited table and the text report are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub table: PathBuf,
    pub report: Option<PathBuf>,
}

impl OutputPaths {
    /// `plates.txt` -> `plates_summary.csv` + `plates_report.txt`; other names get the suffixes appended.
    pub fn for_input(input: &Path) -> Self {
        let raw = input.to_string_lossy();
        let base = raw.strip_suffix(".txt").unwrap_or(&raw);
        Self {
            table: PathBuf::from(format!("{base}_summary.csv")),
            report: Some(PathBuf::from(format!("{base}_report.txt"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub grouping: Grouping,
    pub sort: SortOrder,
    pub outputs: OutputPaths,
}

impl PipelineConfig {
    pub fn new(input: impl Into<PathBuf>, grouping: Grouping) -> Self {
        let input = input.into();
        let outputs = OutputPaths::for_input(&input);
        Self { input, grouping, sort: SortOrder::default(), outputs }
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_table_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.outputs.table = path.into();
        self
    }

    pub fn with_report_path(mut self, path: Option<PathBuf>) -> Self {
        self.outputs.report = path;
        self
    }
}
