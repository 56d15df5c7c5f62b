//! Persona similarity
//!
//! Personas are compared as points in a single 16-dimensional space made of
//! their raw stats (8 virtues, 4 abilities, 4 tendencies). Distance is plain
//! Euclidean with no per-band weighting: tendency differences are measured
//! on their native [-5, 5] scale next to the [0, 10] virtue/ability scale.
//!
//! Display rescaling (`to_display_score`) is kept separate and never feeds
//! back into `distance`.
//!
//! Everything here is a pure function over caller-owned snapshots and is
//! safe to call from any number of threads.

mod attributes;
mod vector;

pub use attributes::{to_display_score, Attribute, Band, ATTRIBUTE_COUNT};
pub use vector::EntityVector;

use serde::Serialize;
use tracing::trace;

/// One candidate in a similarity ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub reference_entity_id: String,
    pub candidate_entity_id: String,
    pub display_name: String,
    pub distance: f64,
}

/// Euclidean distance between two persona vectors over raw stats
///
/// Symmetric, non-negative, zero iff every stat is identical.
pub fn distance(a: &EntityVector, b: &EntityVector) -> f64 {
    a.values()
        .iter()
        .zip(b.values().iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Rank candidates by increasing distance from `reference`
///
/// Candidates sharing the reference's id are excluded. Equal distances keep
/// their input order. No truncation: callers apply their own display limit.
pub fn rank_by_similarity(
    reference: &EntityVector,
    candidates: &[EntityVector],
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .filter(|c| c.entity_id != reference.entity_id)
        .map(|c| RankedCandidate {
            reference_entity_id: reference.entity_id.clone(),
            candidate_entity_id: c.entity_id.clone(),
            display_name: c.display_name.clone(),
            distance: distance(reference, c),
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    trace!(
        reference = %reference.entity_id,
        candidates = ranked.len(),
        "Ranked personas by similarity"
    );
    ranked
}

/// Distance label with one decimal place
pub fn format_distance(distance: f64) -> String {
    format!("{:.1}", distance)
}

/// Pairwise distances for a multi-select comparison view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonMatrix {
    /// Row/column order of `distances`
    pub entity_ids: Vec<String>,
    pub distances: Vec<Vec<f64>>,
}

impl ComparisonMatrix {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.distances.get(row)?.get(col).copied()
    }

    /// Closest other entity to the entity at `row`, if the selection has one
    pub fn nearest(&self, row: usize) -> Option<(usize, f64)> {
        self.distances
            .get(row)?
            .iter()
            .copied()
            .enumerate()
            .filter(|(col, _)| *col != row)
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Compare an arbitrary selection of personas against each other
///
/// The matrix is symmetric with a zero diagonal; each pair is computed once.
pub fn compare_selection(selection: &[EntityVector]) -> ComparisonMatrix {
    let n = selection.len();
    let mut distances = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = distance(&selection[i], &selection[j]);
            distances[i][j] = d;
            distances[j][i] = d;
        }
    }

    ComparisonMatrix {
        entity_ids: selection.iter().map(|e| e.entity_id.clone()).collect(),
        distances,
    }
}

/// A single stat prepared for a profile chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayScore {
    pub attribute: Attribute,
    pub band: Band,
    pub raw: f64,
    /// 0-100 scale
    pub display: f64,
}

/// All sixteen stats of a persona on the display scale, in vector order
pub fn display_profile(entity: &EntityVector) -> Vec<DisplayScore> {
    Attribute::all_variants()
        .iter()
        .map(|&attribute| {
            let raw = entity.get(attribute);
            DisplayScore {
                attribute,
                band: attribute.band(),
                raw,
                display: to_display_score(attribute, raw),
            }
        })
        .collect()
}

/// Population summary for one stat (raw scale)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeStats {
    pub attribute: Attribute,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-stat mean/min/max across a population
///
/// Returns an empty list for an empty population.
pub fn attribute_stats(population: &[EntityVector]) -> Vec<AttributeStats> {
    if population.is_empty() {
        return Vec::new();
    }
    let count = population.len();

    Attribute::all_variants()
        .iter()
        .map(|&attribute| {
            let (sum, min, max) = population.iter().map(|e| e.get(attribute)).fold(
                (0.0, f64::INFINITY, f64::NEG_INFINITY),
                |(sum, min, max), v| (sum + v, min.min(v), max.max(v)),
            );
            AttributeStats {
                attribute,
                count,
                mean: sum / count as f64,
                min,
                max,
            }
        })
        .collect()
}
