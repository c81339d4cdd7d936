use super::label::TaxonLabel;
use std::collections::HashSet;
use thiserror::Error;

/// Symbols treated as alignment gaps.
pub const GAP_SYMBOLS: &[u8] = b"-.";

/// Returns `true` if the byte is an alignment gap symbol.
#[inline]
pub fn is_gap(residue: u8) -> bool {
    GAP_SYMBOLS.contains(&residue)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("Alignment contains no sequences")]
    Empty,

    #[error("Sequence '{label}' is empty")]
    EmptySequence { label: String },

    #[error("Sequence '{label}' has length {found}, expected {expected}")]
    LengthMismatch {
        label: String,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate taxon label: '{0}'")]
    DuplicateLabel(String),
}

/// One row of an alignment: a taxon label and its gapped residues.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSequence {
    label: TaxonLabel,
    residues: Vec<u8>,
}

impl AlignedSequence {
    pub fn label(&self) -> &TaxonLabel {
        &self.label
    }

    pub fn residues(&self) -> &[u8] {
        &self.residues
    }
}

/// An immutable, validated multiple-sequence alignment.
///
/// Invariants enforced at construction: at least one row, every row has the
/// same non-zero column count, and taxon labels are unique. Residues are
/// uppercased at ingestion so scoring schemes can compare bytes directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    rows: Vec<AlignedSequence>,
    column_count: usize,
}

impl Alignment {
    /// Builds an alignment from `(label, residues)` rows, validating the
    /// alignment invariants.
    ///
    /// # Errors
    ///
    /// Returns an [`AlignmentError`] if the row set is empty, a sequence is
    /// empty, row lengths differ, or a label occurs twice.
    pub fn new(rows: Vec<(TaxonLabel, Vec<u8>)>) -> Result<Self, AlignmentError> {
        if rows.is_empty() {
            return Err(AlignmentError::Empty);
        }

        let column_count = rows[0].1.len();
        let mut seen = HashSet::new();
        let mut validated = Vec::with_capacity(rows.len());

        for (label, mut residues) in rows {
            if residues.is_empty() {
                return Err(AlignmentError::EmptySequence {
                    label: label.raw().to_string(),
                });
            }
            if residues.len() != column_count {
                return Err(AlignmentError::LengthMismatch {
                    label: label.raw().to_string(),
                    expected: column_count,
                    found: residues.len(),
                });
            }
            if !seen.insert(label.raw().to_string()) {
                return Err(AlignmentError::DuplicateLabel(label.raw().to_string()));
            }

            residues.make_ascii_uppercase();
            validated.push(AlignedSequence { label, residues });
        }

        Ok(Self {
            rows: validated,
            column_count,
        })
    }

    /// Number of sequences (taxa) in the alignment.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of aligned columns shared by every row.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn row(&self, index: usize) -> Option<&AlignedSequence> {
        self.rows.get(index)
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &AlignedSequence> {
        self.rows.iter()
    }

    /// Taxon labels in row order.
    pub fn labels(&self) -> Vec<TaxonLabel> {
        self.rows.iter().map(|r| r.label.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, seq: &str) -> (TaxonLabel, Vec<u8>) {
        (TaxonLabel::new(label), seq.as_bytes().to_vec())
    }

    #[test]
    fn valid_alignment_is_accepted_and_uppercased() {
        let alignment =
            Alignment::new(vec![row("a", "ac-g"), row("b", "acgg")]).expect("valid alignment");

        assert_eq!(alignment.len(), 2);
        assert_eq!(alignment.column_count(), 4);
        assert_eq!(alignment.row(0).unwrap().residues(), b"AC-G");
    }

    #[test]
    fn empty_alignment_is_rejected() {
        assert_eq!(Alignment::new(vec![]), Err(AlignmentError::Empty));
    }

    #[test]
    fn unequal_row_lengths_are_rejected() {
        let result = Alignment::new(vec![row("a", "ACGT"), row("b", "ACG")]);
        assert_eq!(
            result,
            Err(AlignmentError::LengthMismatch {
                label: "b".into(),
                expected: 4,
                found: 3,
            })
        );
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let result = Alignment::new(vec![row("a", "ACGT"), row("a", "ACGT")]);
        assert_eq!(result, Err(AlignmentError::DuplicateLabel("a".into())));
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let result = Alignment::new(vec![row("a", "")]);
        assert_eq!(
            result,
            Err(AlignmentError::EmptySequence { label: "a".into() })
        );
    }

    #[test]
    fn gap_symbols_are_recognized() {
        assert!(is_gap(b'-'));
        assert!(is_gap(b'.'));
        assert!(!is_gap(b'A'));
    }
}
