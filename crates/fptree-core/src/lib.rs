//! # fptree Core Library
//!
//! A distance-based phylogenetic tree engine for fluorescent protein families.
//! Given a multiple-sequence alignment whose labels carry spectral metadata
//! (`species|protein|ex/em`), it computes pairwise evolutionary distances,
//! builds an unrooted tree by neighbor joining, re-roots it at a chosen
//! outgroup edge, and colors each leaf from its emission wavelength.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models
//!   (`Alignment`, `DistanceMatrix`, the arena-backed `Tree`), pure functions
//!   (scoring schemes, the wavelength-to-RGB mapper), and I/O utilities
//!   (aligned FASTA, Newick, decoration records).
//!
//! - **[`engine`]: The Logic Core.** The pipeline stages that transform one
//!   representation into the next: distance matrix construction, the
//!   neighbor-joining builder, outgroup rerooting, and leaf annotation,
//!   together with configuration, errors, and progress reporting.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer.
//!   It ties `engine` and `core` together to run the complete
//!   alignment-to-decorated-tree pipeline with a single entry point.

pub mod core;
pub mod engine;
pub mod workflows;
