//! # Parser Module
//!
//! The runtime half of the crate: a pushdown automaton that runs a compiled
//! [`Grammar`](crate::grammar::Grammar) over a token stream and builds a
//! concrete syntax tree.
//!
//! - [`engine`]: the token-at-a-time [`PushdownParser`]
//! - [`driver`]: whole-stream parsing with [`parse_tokens`]
//! - [`parallel`]: batches of independent streams over one shared grammar

pub mod config;
pub mod driver;
pub mod engine;
pub mod parallel;

pub use config::ParserConfig;
pub use driver::{Driver, ParseOutput, parse_tokens};
pub use engine::{ParseStats, Progress, PushdownParser};
pub use parallel::{BatchSummary, JobResult, ParallelConfig, ParallelParser, ParseJob, aggregate_results};
