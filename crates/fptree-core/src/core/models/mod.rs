//! # Core Models Module
//!
//! The fundamental data structures of the pipeline: the immutable input
//! alignment, the taxon label with its optional spectral metadata, the
//! symmetric distance matrix, and the arena-backed phylogenetic tree.
//!
//! ## Key Components
//!
//! - [`alignment`] - Validated multiple-sequence alignment rows
//! - [`label`] - Taxon labels and the `species|protein|ex/em` convention
//! - [`matrix`] - Symmetric, zero-diagonal pairwise distance matrix
//! - [`tree`] - Arena-based tree with stable node ids
//! - [`ids`] - Unique identifier type for tree nodes
//!
//! Each pipeline run owns its data exclusively: the alignment is input and
//! immutable, the distance matrix is derived once, and the tree is built
//! once, re-rooted once, then decorated in place.

pub mod alignment;
pub mod ids;
pub mod label;
pub mod matrix;
pub mod tree;
