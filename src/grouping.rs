use crate::aggregate::{PlateAggregate, PlateRecord};
use crate::config::SimilarityThreshold;
use crate::similarity::similarity;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "threshold", rename_all = "snake_case")]
pub enum Grouping {
    /// One cluster per distinct plate text.
    Exact,
    /// Greedy seed-based merging of texts scoring at least the threshold.
    Similarity(SimilarityThreshold),
}

impl Grouping {
    pub fn threshold(&self) -> Option<SimilarityThreshold> {
        match self {
            Grouping::Exact => None,
            Grouping::Similarity(t) => Some(*t),
        }
    }

    /// Whether output tables carry the `similar_plates` column.
    pub fn reports_similar(&self) -> bool { matches!(self, Grouping::Similarity(_)) }
}

impl Default for Grouping {
    fn default() -> Self { Grouping::Similarity(SimilarityThreshold::default()) }
}

/// One logical plate: a set of distinct texts judged to be the same physical plate.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateCluster {
    pub representative: String,
    /// Other member texts in discovery order.
    pub similar: Vec<String>,
    pub confidences: Vec<f64>,
    pub frames: Vec<u64>,
}

impl PlateCluster {
    /// Build a cluster from its members, seed first and joiners in the order they joined.
    ///
    /// The representative is the member with the highest mean confidence over
    /// its own readings; the first such member wins ties.
    pub fn from_members(members: Vec<PlateRecord>) -> Self {
        let mut best = 0usize;
        let mut best_mean = f64::NEG_INFINITY;
        for (i, m) in members.iter().enumerate() {
            let mean = m.mean_confidence();
            if mean > best_mean {
                best = i;
                best_mean = mean;
            }
        }

        let mut representative = String::new();
        let mut similar = Vec::with_capacity(members.len().saturating_sub(1));
        let mut confidences = Vec::new();
        let mut frames = Vec::new();
        for (i, m) in members.into_iter().enumerate() {
            confidences.extend(m.confidences);
            frames.extend(m.frames);
            if i == best { representative = m.text; } else { similar.push(m.text); }
        }
        Self { representative, similar, confidences, frames }
    }

    pub fn member_count(&self) -> usize { self.similar.len() + 1 }

    pub fn contains(&self, text: &str) -> bool {
        self.representative == text || self.similar.iter().any(|s| s == text)
    }
}

impl From<PlateRecord> for PlateCluster {
    fn from(record: PlateRecord) -> Self {
        PlateCluster {
            representative: record.text,
            similar: Vec::new(),
            confidences: record.confidences,
            frames: record.frames,
        }
    }
}

pub fn group(aggregate: PlateAggregate, grouping: Grouping) -> Vec<PlateCluster> {
    match grouping {
        Grouping::Exact => aggregate.into_records().into_iter().map(PlateCluster::from).collect(),
        Grouping::Similarity(t) => group_similar(aggregate, t),
    }
}

/// Single-pass greedy clustering in discovery order.
///
/// Each unconsumed text seeds a cluster and claims every later unconsumed text
/// whose similarity to the seed itself meets the threshold. Membership is not
/// transitive: a text close only to a joiner stays out, and a consumed text is
/// never reconsidered by later seeds.
pub fn group_similar(aggregate: PlateAggregate, threshold: SimilarityThreshold) -> Vec<PlateCluster> {
    let mut slots: Vec<Option<PlateRecord>> = aggregate.into_records().into_iter().map(Some).collect();
    let mut clusters = Vec::new();
    let mut comparisons = 0usize;

    for i in 0..slots.len() {
        let Some(seed) = slots[i].take() else { continue };
        let mut members = vec![seed];
        for j in (i + 1)..slots.len() {
            let Some(candidate) = slots[j].as_ref() else { continue };
            comparisons += 1;
            let score = similarity(&members[0].text, &candidate.text);
            if threshold.accepts(score) {
                debug!(seed = %members[0].text, candidate = %candidate.text, score, "merged plate text");
                if let Some(rec) = slots[j].take() { members.push(rec); }
            }
        }
        clusters.push(PlateCluster::from_members(members));
    }

    debug!(clusters = clusters.len(), comparisons, threshold = threshold.value(), "grouped plate texts");
    clusters
}
