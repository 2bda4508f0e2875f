//! pgen tools - developer utilities for working with pgen grammars
//!
//! Compiles grammar files, dumps their automata, runs token streams
//! through the parser and renders rule graphs.

pub mod cli;
pub mod commands;
pub mod visualize;

pub use commands::{ToolError, run};
pub use visualize::*;
