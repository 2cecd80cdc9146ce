//! # Classification Result
//! Score/advisory records produced during one call and the ranked output
//! handed to callers.
//!
//! `assemble()` is the last step of a call: sort categories by probability,
//! sort advisories by weight, drop everything at or below the visibility
//! threshold.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::profile::Category;

/// Default cut-off below which rankings and advisories are hidden.
pub const VISIBILITY_THRESHOLD: f64 = 0.02;

/// Per-category log-probability accumulator, mutated additively by rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEntry {
    pub category: Category,
    pub log_probability: f64,
}

/// Where an advisory came from; lets presentation group them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    Category,
    Humidity,
    Proximity,
    Distance,
    MissingCoordinates,
}

/// Free-form advisory text with a ranking weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryEntry {
    pub text: String,
    pub weight: f64,
    pub kind: AdvisoryKind,
}

impl AdvisoryEntry {
    pub fn new(text: impl Into<String>, weight: f64, kind: AdvisoryKind) -> Self {
        Self {
            text: text.into(),
            weight,
            kind,
        }
    }
}

/// One visible category with its normalized probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub category: Category,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Descending by probability; only entries above the threshold.
    pub rankings: Vec<Ranking>,
    /// Descending by weight; only entries above the threshold.
    pub advisories: Vec<AdvisoryEntry>,
}

impl ClassificationResult {
    /// Highest-ranked category, if any survived the threshold.
    pub fn top(&self) -> Option<Ranking> {
        self.rankings.first().copied()
    }

    pub fn probability_of(&self, category: Category) -> Option<f64> {
        self.rankings
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.probability)
    }

    pub fn has_advisory(&self, kind: AdvisoryKind) -> bool {
        self.advisories.iter().any(|a| a.kind == kind)
    }
}

/// Sort and filter normalized scores and advisories into the final result.
/// Sorting is stable, so ties keep emission order.
pub fn assemble(
    normalized: Vec<Ranking>,
    mut advisories: Vec<AdvisoryEntry>,
    threshold: f64,
) -> ClassificationResult {
    let mut rankings = normalized;
    rankings.retain(|r| r.probability > threshold);
    rankings.sort_by(|a, b| desc(a.probability, b.probability));

    advisories.retain(|a| a.weight > threshold);
    advisories.sort_by(|a, b| desc(a.weight, b.weight));

    ClassificationResult {
        rankings,
        advisories,
    }
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
