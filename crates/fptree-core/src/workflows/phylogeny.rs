//! The complete alignment-to-decorated-tree pipeline.

use crate::core::io::decoration::LeafDecoration;
use crate::core::models::alignment::Alignment;
use crate::core::models::tree::Tree;
use crate::engine::config::PhylogenyConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::{annotate, distance, nj, rooting};
use tracing::{info, instrument};

/// Non-fatal conditions encountered during a run.
///
/// Neither condition stops the pipeline, but both change the result in ways
/// a careful caller should surface: an undefined pair means two sequences
/// shared no comparable column, a clamped length means the matrix was not
/// additive enough for neighbor joining to honor it exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub undefined_distance_pairs: usize,
    pub clamped_branch_lengths: usize,
}

/// The output of a full pipeline run.
#[derive(Debug, Clone)]
pub struct PhylogenyResult {
    pub tree: Tree,
    /// One record per leaf, in the order leaves appear in the tree.
    pub decorations: Vec<LeafDecoration>,
    pub diagnostics: Diagnostics,
}

/// Runs the full pipeline: pairwise distances, neighbor joining, optional
/// outgroup rerooting, and leaf annotation.
///
/// # Errors
///
/// Returns an [`EngineError`] for an alignment with fewer than two
/// sequences or an outgroup label that names no leaf.
#[instrument(skip_all, fields(taxa = alignment.len(), columns = alignment.column_count()))]
pub fn run(
    alignment: &Alignment,
    config: &PhylogenyConfig,
    reporter: &ProgressReporter,
) -> Result<PhylogenyResult, EngineError> {
    reporter.report(Progress::StageStart {
        name: "distance matrix",
    });
    let distances = distance::build(alignment, &config.scheme)?;
    reporter.report(Progress::StageFinish);
    info!(
        taxa = distances.matrix.len(),
        undefined_pairs = distances.undefined_pairs,
        "distance matrix computed"
    );

    reporter.report(Progress::StageStart {
        name: "neighbor joining",
    });
    let nj::NjOutcome {
        mut tree,
        clamped_branch_lengths,
    } = nj::build(&distances.matrix, reporter)?;
    reporter.report(Progress::StageFinish);
    info!(
        leaves = tree.leaf_count(),
        clamped = clamped_branch_lengths,
        "tree built"
    );

    if let Some(outgroup) = &config.outgroup {
        reporter.report(Progress::StageStart { name: "rerooting" });
        rooting::reroot(&mut tree, &outgroup.a, &outgroup.b)?;
        reporter.report(Progress::StageFinish);
        info!(a = %outgroup.a, b = %outgroup.b, "tree rerooted at outgroup");
    }

    reporter.report(Progress::StageStart { name: "annotation" });
    let decorations = annotate::annotate(&mut tree, &config.style);
    reporter.report(Progress::StageFinish);

    Ok(PhylogenyResult {
        tree,
        decorations,
        diagnostics: Diagnostics {
            undefined_distance_pairs: distances.undefined_pairs,
            clamped_branch_lengths,
        },
    })
}
