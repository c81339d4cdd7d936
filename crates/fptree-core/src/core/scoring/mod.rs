//! Pairwise sequence scoring schemes.
//!
//! A scheme turns the column-wise comparison of two aligned rows into a
//! normalized evolutionary distance in `[0, 1]`. Columns where either row
//! carries a gap are excluded from the comparison; a pair with zero
//! comparable columns has no defined distance and callers must fall back to
//! [`ScoringScheme::max_distance`].

mod blosum62;

use crate::core::models::alignment::is_gap;
use serde::{Deserialize, Serialize};

/// The distance scheme applied to every pair of aligned sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringScheme {
    /// `1 - matches / comparable_columns`.
    Identity,
    /// Log-odds substitution scoring normalized against the better of the
    /// two self-scores: `1 - score(a,b) / max(score(a,a), score(b,b))`,
    /// clamped to `[0, 1]`.
    Blosum62,
}

impl ScoringScheme {
    /// The distance assigned when a pair shares no comparable columns.
    ///
    /// Both schemes are normalized, so the maximum is 1.0.
    pub fn max_distance(&self) -> f64 {
        1.0
    }

    /// Distance between two equal-length aligned rows, or `None` when the
    /// pair has no gap-free column to compare.
    pub fn pair_distance(&self, a: &[u8], b: &[u8]) -> Option<f64> {
        debug_assert_eq!(a.len(), b.len(), "rows must be aligned");
        match self {
            ScoringScheme::Identity => identity_distance(a, b),
            ScoringScheme::Blosum62 => blosum62_distance(a, b),
        }
    }
}

fn identity_distance(a: &[u8], b: &[u8]) -> Option<f64> {
    let mut comparable = 0u64;
    let mut matches = 0u64;
    for (&x, &y) in a.iter().zip(b) {
        if is_gap(x) || is_gap(y) {
            continue;
        }
        comparable += 1;
        if x == y {
            matches += 1;
        }
    }
    if comparable == 0 {
        return None;
    }
    Some(1.0 - matches as f64 / comparable as f64)
}

fn blosum62_distance(a: &[u8], b: &[u8]) -> Option<f64> {
    let mut comparable = 0u64;
    let mut score = 0i64;
    let mut self_a = 0i64;
    let mut self_b = 0i64;
    for (&x, &y) in a.iter().zip(b) {
        if is_gap(x) || is_gap(y) {
            continue;
        }
        comparable += 1;
        score += i64::from(blosum62::score(x, y));
        self_a += i64::from(blosum62::score(x, x));
        self_b += i64::from(blosum62::score(y, y));
    }
    if comparable == 0 {
        return None;
    }
    // Self-scores of standard residues are strictly positive, so the
    // denominator cannot be zero over a non-empty comparison.
    let max_score = self_a.max(self_b) as f64;
    Some((1.0 - score as f64 / max_score).clamp(0.0, 1.0))
}
