//! Stateless foundation of the engine: data models, pure math, and I/O.
//!
//! Nothing in this layer mutates shared state or depends on [`crate::engine`];
//! every function here is a pure transformation over its inputs.

pub mod color;
pub mod io;
pub mod models;
pub mod scoring;
