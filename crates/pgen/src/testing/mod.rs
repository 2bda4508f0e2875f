//! # Testing Utilities
//!
//! Helpers for testing grammars and the parser built on them.
//!
//! The generators walk a compiled grammar's automata and emit token streams
//! it accepts, which makes them a source of valid inputs for `proptest`
//! strategies, benchmarks and fuzz seeds.

pub mod generators;

pub use generators::*;
