//! Distance matrix construction from an alignment.
//!
//! Pure over its inputs: every unordered pair of rows is compared
//! column-wise under the configured [`ScoringScheme`], excluding gap
//! columns. Pairs with no comparable column at all receive the scheme's
//! maximum distance; that fallback is logged and counted, never silent.

use crate::core::models::alignment::Alignment;
use crate::core::models::matrix::DistanceMatrix;
use crate::core::scoring::ScoringScheme;
use crate::engine::error::EngineError;
use tracing::warn;

/// A built matrix plus the diagnostics produced while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceOutcome {
    pub matrix: DistanceMatrix,
    /// Number of pairs that shared zero comparable columns and were
    /// assigned the scheme maximum.
    pub undefined_pairs: usize,
}

/// Builds the symmetric pairwise distance matrix for an alignment.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] when the alignment has fewer than
/// two sequences.
pub fn build(
    alignment: &Alignment,
    scheme: &ScoringScheme,
) -> Result<DistanceOutcome, EngineError> {
    if alignment.len() < 2 {
        return Err(EngineError::InvalidInput(format!(
            "distance matrix requires at least 2 sequences, got {}",
            alignment.len()
        )));
    }

    let mut undefined_pairs = 0usize;
    let matrix = DistanceMatrix::from_fn(alignment.labels(), |i, j| {
        let a = alignment.row(i).expect("index within alignment");
        let b = alignment.row(j).expect("index within alignment");
        match scheme.pair_distance(a.residues(), b.residues()) {
            Some(d) => d,
            None => {
                warn!(
                    taxon_a = a.label().raw(),
                    taxon_b = b.label().raw(),
                    "no comparable columns; assigning maximum distance"
                );
                undefined_pairs += 1;
                scheme.max_distance()
            }
        }
    });

    Ok(DistanceOutcome {
        matrix,
        undefined_pairs,
    })
}
