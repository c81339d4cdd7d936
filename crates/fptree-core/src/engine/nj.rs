//! Neighbor-joining tree construction.
//!
//! The classic Saitou-Nei agglomeration: a working set of live nodes, each
//! a row of distances to every other live node, shrinks by one per
//! iteration until two remain. Runtime is O(n^3) with O(n^2) memory, which
//! is fine for the tens-to-low-hundreds of taxa this engine targets; it is
//! deliberately not optimized beyond that.
//!
//! Determinism: ties in the selection criterion are broken by taking the
//! first minimal pair in creation order (alignment order for leaves, then
//! join order), so rebuilding from the same matrix always yields the same
//! tree.

use crate::core::models::ids::NodeId;
use crate::core::models::matrix::DistanceMatrix;
use crate::core::models::tree::Tree;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{debug, warn};

/// A built tree plus the diagnostics produced while building it.
#[derive(Debug, Clone)]
pub struct NjOutcome {
    pub tree: Tree,
    /// Number of computed branch lengths that came out negative and were
    /// clamped to zero.
    pub clamped_branch_lengths: usize,
}

/// Builds an unrooted tree from a distance matrix by neighbor joining.
///
/// The returned tree is rooted at the final join purely for traversal; with
/// three or more taxa that node has three children, the standard
/// representation of an unrooted binary tree (n leaves, n-2 internal
/// nodes). Two taxa are a documented degenerate case: a root with both
/// leaves as children, the single edge split equally.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] for fewer than two taxa.
pub fn build(matrix: &DistanceMatrix, reporter: &ProgressReporter) -> Result<NjOutcome, EngineError> {
    let n = matrix.len();
    if n < 2 {
        return Err(EngineError::InvalidInput(format!(
            "neighbor joining requires at least 2 taxa, got {n}"
        )));
    }

    let mut tree = Tree::new();
    let mut clamped = 0usize;

    if n == 2 {
        let d = matrix.get(0, 1);
        let root = tree.add_internal();
        let a = tree.add_leaf(matrix.label(0).clone());
        let b = tree.add_leaf(matrix.label(1).clone());
        link(&mut tree, root, a, d / 2.0)?;
        link(&mut tree, root, b, d / 2.0)?;
        tree.set_root(root)
            .ok_or_else(|| EngineError::Internal("stale root id".into()))?;
        debug!("degenerate 2-taxon input; returning a single-edge tree");
        return Ok(NjOutcome {
            tree,
            clamped_branch_lengths: 0,
        });
    }

    // Live working set in creation order; `dist[i]` is node i's distances
    // to every other live node, indexed the same way.
    let mut live: Vec<_> = (0..n).map(|i| tree.add_leaf(matrix.label(i).clone())).collect();
    let mut dist: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| matrix.get(i, j)).collect())
        .collect();

    while live.len() > 2 {
        let m = live.len();
        let row_sums: Vec<f64> = dist.iter().map(|row| row.iter().sum()).collect();

        // Selection: minimize Q(a,b) = (m-2) d(a,b) - R(a) - R(b). Strict
        // comparison keeps the first minimal pair in creation order.
        let mut best = (0usize, 1usize);
        let mut best_q = f64::INFINITY;
        for i in 0..m {
            for j in (i + 1)..m {
                let q = (m as f64 - 2.0) * dist[i][j] - row_sums[i] - row_sums[j];
                if q < best_q {
                    best_q = q;
                    best = (i, j);
                }
            }
        }
        let (i, j) = best;
        let d_ij = dist[i][j];

        // Join: branch lengths from the join point to each member. With
        // m == 3 the divisor is 1 and this is the simplified three-taxon
        // formula.
        let mut len_i = d_ij / 2.0 + (row_sums[i] - row_sums[j]) / (2.0 * (m as f64 - 2.0));
        let mut len_j = d_ij - len_i;
        if len_i < 0.0 {
            warn!(length = len_i, "clamping negative branch length to zero");
            len_i = 0.0;
            clamped += 1;
        }
        if len_j < 0.0 {
            warn!(length = len_j, "clamping negative branch length to zero");
            len_j = 0.0;
            clamped += 1;
        }

        let joined = tree.add_internal();
        link(&mut tree, joined, live[i], len_i)?;
        link(&mut tree, joined, live[j], len_j)?;

        // Distance update for every surviving node x:
        // d(u,x) = (d(a,x) + d(b,x) - d(a,b)) / 2.
        let mut new_row = Vec::with_capacity(m - 1);
        for x in 0..m {
            if x == i || x == j {
                continue;
            }
            new_row.push((dist[i][x] + dist[j][x] - d_ij) / 2.0);
        }

        // Remove the higher index first so the lower stays valid; creation
        // order of the survivors is preserved.
        live.remove(j);
        live.remove(i);
        dist.remove(j);
        dist.remove(i);
        for (row, &d_new) in dist.iter_mut().zip(new_row.iter()) {
            row.remove(j);
            row.remove(i);
            row.push(d_new);
        }
        new_row.push(0.0);
        dist.push(new_row);
        live.push(joined);

        reporter.report(Progress::JoinStep {
            remaining: live.len(),
        });
    }

    // Terminal step: attach the remaining node to the last join with the
    // residual edge. live[1] is always the newest internal node here.
    let mut residual = dist[0][1];
    if residual < 0.0 {
        warn!(length = residual, "clamping negative branch length to zero");
        residual = 0.0;
        clamped += 1;
    }
    let root = live[1];
    link(&mut tree, root, live[0], residual)?;
    tree.set_root(root)
        .ok_or_else(|| EngineError::Internal("stale root id".into()))?;

    Ok(NjOutcome {
        tree,
        clamped_branch_lengths: clamped,
    })
}

fn link(tree: &mut Tree, parent: NodeId, child: NodeId, length: f64) -> Result<(), EngineError> {
    tree.attach(parent, child, length)
        .ok_or_else(|| EngineError::Internal("attach of a live node failed".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::label::TaxonLabel;

    const TOL: f64 = 1e-9;

    fn matrix(names: &[&str], distances: &[(usize, usize, f64)]) -> DistanceMatrix {
        let labels: Vec<TaxonLabel> = names.iter().map(|n| TaxonLabel::new(*n)).collect();
        DistanceMatrix::from_fn(labels, |i, j| {
            distances
                .iter()
                .find(|&&(a, b, _)| (a, b) == (i, j) || (a, b) == (j, i))
                .map(|&(_, _, d)| d)
                .expect("distance listed for every pair")
        })
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOL,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn four_taxon_case_matches_hand_computation() {
        // Additive matrix with known solution: leaf edges A=1, B=1, C=2,
        // D=4 and a single internal edge of length 1.
        let m = matrix(
            &["A", "B", "C", "D"],
            &[
                (0, 1, 2.0),
                (0, 2, 4.0),
                (0, 3, 6.0),
                (1, 2, 4.0),
                (1, 3, 6.0),
                (2, 3, 6.0),
            ],
        );
        let outcome = build(&m, &ProgressReporter::new()).unwrap();
        let tree = &outcome.tree;

        assert_eq!(outcome.clamped_branch_lengths, 0);
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.internal_count(), 2);

        let a = tree.find_leaf("A").unwrap();
        let b = tree.find_leaf("B").unwrap();
        let c = tree.find_leaf("C").unwrap();
        let d = tree.find_leaf("D").unwrap();

        assert_close(tree.node(a).unwrap().branch_length, 1.0);
        assert_close(tree.node(b).unwrap().branch_length, 1.0);
        assert_close(tree.node(c).unwrap().branch_length, 2.0);
        assert_close(tree.node(d).unwrap().branch_length, 4.0);

        // A and B are siblings under one internal node; the path to the
        // other side crosses the internal edge.
        assert_eq!(
            tree.lowest_common_ancestor(a, b),
            Some(tree.node(a).unwrap().parent.unwrap())
        );

        // The tree reproduces the input distances exactly (the matrix is
        // additive).
        assert_close(tree.path_distance(a, b).unwrap(), 2.0);
        assert_close(tree.path_distance(a, c).unwrap(), 4.0);
        assert_close(tree.path_distance(a, d).unwrap(), 6.0);
        assert_close(tree.path_distance(b, c).unwrap(), 4.0);
        assert_close(tree.path_distance(b, d).unwrap(), 6.0);
        assert_close(tree.path_distance(c, d).unwrap(), 6.0);
    }

    #[test]
    fn node_counts_and_nonnegative_lengths_hold_for_larger_input() {
        // A perturbed but metric-ish 6-taxon matrix.
        let names = ["t0", "t1", "t2", "t3", "t4", "t5"];
        let base = |i: usize, j: usize| (i as f64 - j as f64).abs() + 1.0;
        let labels: Vec<TaxonLabel> = names.iter().map(|n| TaxonLabel::new(*n)).collect();
        let m = DistanceMatrix::from_fn(labels, |i, j| base(i, j));

        let outcome = build(&m, &ProgressReporter::new()).unwrap();
        let tree = &outcome.tree;

        assert_eq!(tree.leaf_count(), 6);
        assert_eq!(tree.internal_count(), 4);
        for id in tree.preorder() {
            assert!(tree.node(id).unwrap().branch_length >= 0.0);
        }
    }

    #[test]
    fn two_taxon_degenerate_case_splits_the_single_edge() {
        let m = matrix(&["A", "B"], &[(0, 1, 3.0)]);
        let outcome = build(&m, &ProgressReporter::new()).unwrap();
        let tree = &outcome.tree;

        assert_eq!(tree.leaf_count(), 2);
        let a = tree.find_leaf("A").unwrap();
        let b = tree.find_leaf("B").unwrap();
        assert_close(tree.path_distance(a, b).unwrap(), 3.0);
    }

    #[test]
    fn empty_and_single_taxon_inputs_are_rejected() {
        let single = matrix(&["A"], &[]);
        assert!(matches!(
            build(&single, &ProgressReporter::new()),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn negative_branch_lengths_are_clamped_and_counted() {
        // A strongly non-additive matrix that forces a negative computed
        // length: three near-identical taxa and one far outlier.
        let m = matrix(
            &["A", "B", "C", "D"],
            &[
                (0, 1, 0.1),
                (0, 2, 0.1),
                (0, 3, 10.0),
                (1, 2, 0.1),
                (1, 3, 0.2),
                (2, 3, 10.0),
            ],
        );
        let outcome = build(&m, &ProgressReporter::new()).unwrap();

        assert!(outcome.clamped_branch_lengths > 0);
        for id in outcome.tree.preorder() {
            assert!(outcome.tree.node(id).unwrap().branch_length >= 0.0);
        }
    }

    #[test]
    fn join_steps_are_reported() {
        use std::sync::Mutex;
        let steps = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::JoinStep { remaining } = event {
                steps.lock().unwrap().push(remaining);
            }
        }));

        let m = matrix(
            &["A", "B", "C", "D"],
            &[
                (0, 1, 2.0),
                (0, 2, 4.0),
                (0, 3, 6.0),
                (1, 2, 4.0),
                (1, 3, 6.0),
                (2, 3, 6.0),
            ],
        );
        build(&m, &reporter).unwrap();

        assert_eq!(*steps.lock().unwrap(), vec![3, 2]);
    }

    #[test]
    fn rebuilds_are_deterministic() {
        let make = || {
            let m = matrix(
                &["A", "B", "C", "D"],
                &[
                    // All off-diagonal distances equal: every pair ties.
                    (0, 1, 1.0),
                    (0, 2, 1.0),
                    (0, 3, 1.0),
                    (1, 2, 1.0),
                    (1, 3, 1.0),
                    (2, 3, 1.0),
                ],
            );
            let outcome = build(&m, &ProgressReporter::new()).unwrap();
            crate::core::io::newick::to_newick(&outcome.tree).unwrap()
        };
        assert_eq!(make(), make());
    }
}
