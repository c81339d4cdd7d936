//! The pipeline stages and their shared plumbing.
//!
//! Each stage consumes the previous stage's output by value or exclusive
//! reference; nothing here is shared across runs. The stages are:
//!
//! - [`distance`] - alignment to pairwise distance matrix
//! - [`nj`] - distance matrix to unrooted tree (neighbor joining)
//! - [`rooting`] - rerooting at an outgroup edge
//! - [`annotate`] - spectral coloring and display attributes
//!
//! plus [`config`], [`error`], and [`progress`] used by all of them.

pub mod annotate;
pub mod config;
pub mod distance;
pub mod error;
pub mod nj;
pub mod progress;
pub mod rooting;
