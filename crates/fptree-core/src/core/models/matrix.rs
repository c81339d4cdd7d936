use super::label::TaxonLabel;
use nalgebra::DMatrix;

/// A symmetric pairwise distance matrix over a fixed set of taxa.
///
/// Indices correspond 1:1 to the taxa handed to the constructor, in order.
/// The diagonal is fixed to zero and symmetry is enforced by construction:
/// the generator is evaluated once per unordered pair and mirrored.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    labels: Vec<TaxonLabel>,
    values: DMatrix<f64>,
}

impl DistanceMatrix {
    /// Builds a matrix by evaluating `pair_distance(i, j)` for every
    /// unordered pair `i < j`.
    pub fn from_fn(
        labels: Vec<TaxonLabel>,
        mut pair_distance: impl FnMut(usize, usize) -> f64,
    ) -> Self {
        let n = labels.len();
        let mut values = DMatrix::zeros(n, n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = pair_distance(i, j);
                debug_assert!(d >= 0.0, "distances must be non-negative");
                values[(i, j)] = d;
                values[(j, i)] = d;
            }
        }
        Self { labels, values }
    }

    /// Number of taxa.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Distance between taxa `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    pub fn labels(&self) -> &[TaxonLabel] {
        &self.labels
    }

    pub fn label(&self, i: usize) -> &TaxonLabel {
        &self.labels[i]
    }

    /// The underlying dense matrix.
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<TaxonLabel> {
        names.iter().map(|n| TaxonLabel::new(*n)).collect()
    }

    #[test]
    fn matrix_is_symmetric_with_zero_diagonal() {
        let m = DistanceMatrix::from_fn(labels(&["a", "b", "c"]), |i, j| (i + j) as f64);

        for i in 0..3 {
            assert_eq!(m.get(i, i), 0.0);
            for j in 0..3 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
        assert_eq!(m.get(0, 2), 2.0);
        assert_eq!(m.get(1, 2), 3.0);
    }

    #[test]
    fn generator_runs_once_per_unordered_pair() {
        let mut calls = 0;
        let m = DistanceMatrix::from_fn(labels(&["a", "b", "c", "d"]), |_, _| {
            calls += 1;
            1.0
        });
        assert_eq!(calls, 6);
        assert_eq!(m.len(), 4);
    }
}
