//! High-level, user-facing workflows.
//!
//! This layer ties the `engine` stages together into complete runs. Callers
//! that need finer control (a custom matrix, a tree from elsewhere) can use
//! the engine modules directly; everyone else goes through [`phylogeny::run`].

pub mod phylogeny;

pub use phylogeny::{run, Diagnostics, PhylogenyResult};
