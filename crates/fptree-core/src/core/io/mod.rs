//! File formats at the boundary of the pipeline.
//!
//! - [`fasta`] - reads an already-aligned FASTA file into an [`Alignment`]
//! - [`newick`] - serializes and parses trees in Newick notation
//! - [`decoration`] - writes the per-leaf display records as CSV
//!
//! [`Alignment`]: crate::core::models::alignment::Alignment

pub mod decoration;
pub mod fasta;
pub mod newick;
