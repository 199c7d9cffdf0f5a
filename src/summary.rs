use crate::config::SortOrder;
use crate::grouping::PlateCluster;
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

/// One ranked line of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "plate_found")]
    pub plate: String,
    pub similar_plates: Vec<String>,
    pub confidence_level: f64,
    pub first_frame: u64,
    pub last_frame: u64,
    pub total_detections: usize,
}

impl SummaryRow {
    /// `None` for a cluster without readings.
    pub fn from_cluster(cluster: &PlateCluster) -> Option<Self> {
        let (first_frame, last_frame) = match cluster.frames.iter().copied().minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(f) => (f, f),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };
        let mean = cluster.confidences.iter().sum::<f64>() / cluster.confidences.len() as f64;
        Some(SummaryRow {
            plate: cluster.representative.clone(),
            similar_plates: cluster.similar.clone(),
            confidence_level: round2(mean),
            first_frame,
            last_frame,
            total_detections: cluster.frames.len(),
        })
    }
}

/// Two-decimal rounding of the exact binary value: 2.675 is stored as 2.67499.. and gives 2.67.
pub fn round2(x: f64) -> f64 {
    format!("{x:.2}").parse().unwrap_or(x)
}

pub fn build_rows(clusters: &[PlateCluster], order: SortOrder) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = clusters.iter().filter_map(SummaryRow::from_cluster).collect();
    sort_rows(&mut rows, order);
    rows
}

/// Stable: rows that compare equal keep their cluster discovery order.
pub fn sort_rows(rows: &mut [SummaryRow], order: SortOrder) {
    match order {
        SortOrder::Confidence => rows.sort_by(|a, b| b.confidence_level.total_cmp(&a.confidence_level)),
        SortOrder::FirstFrame => rows.sort_by_key(|r| r.first_frame),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub unique_plates: usize,
    pub average_confidence: f64,
    pub highest_confidence: f64,
    pub lowest_confidence: f64,
    pub total_detections: usize,
}

impl SummaryStats {
    /// Aggregates over the rows' `confidence_level`; `None` for an empty table.
    pub fn from_rows(rows: &[SummaryRow]) -> Option<Self> {
        if rows.is_empty() { return None; }
        let levels = rows.iter().map(|r| r.confidence_level);
        let (lowest, highest) = match levels.clone().minmax_by(|a, b| a.total_cmp(b)) {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };
        Some(SummaryStats {
            unique_plates: rows.len(),
            average_confidence: levels.sum::<f64>() / rows.len() as f64,
            highest_confidence: highest,
            lowest_confidence: lowest,
            total_detections: rows.iter().map(|r| r.total_detections).sum(),
        })
    }
}
