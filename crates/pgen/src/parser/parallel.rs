//! # Batch Parsing
//!
//! Parses many independent token streams against one shared grammar. With
//! the `parallel` feature the batch runs on a rayon thread pool; without it
//! the same API runs sequentially.

use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::parser::config::ParserConfig;
use crate::parser::driver::Driver;
use crate::syntax::{Node, Token};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One token stream to parse
#[derive(Debug, Clone)]
pub struct ParseJob {
    /// Caller supplied identifier, such as a file path
    pub id: String,
    pub tokens: Vec<Token>,
}

impl ParseJob {
    #[must_use]
    pub fn new(id: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            id: id.into(),
            tokens,
        }
    }
}

/// Result of parsing a single job
#[derive(Debug)]
pub struct JobResult {
    pub id: String,
    pub result: Result<Node, ParseError>,
    pub duration: Duration,
}

impl JobResult {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Configuration for batch parsing
#[derive(Debug, Clone, Default)]
pub struct ParallelConfig {
    /// Number of threads to use (0 = auto)
    pub num_threads: usize,
    /// Applied to every job in the batch
    pub parser: ParserConfig,
}

pub struct ParallelParser {
    grammar: Arc<Grammar>,
    config: ParallelConfig,
}

impl ParallelParser {
    #[must_use]
    pub fn new(grammar: Arc<Grammar>) -> Self {
        Self::with_config(grammar, ParallelConfig::default())
    }

    #[must_use]
    pub const fn with_config(grammar: Arc<Grammar>, config: ParallelConfig) -> Self {
        Self { grammar, config }
    }

    #[must_use]
    pub const fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    /// Parse every job; results come back in input order
    #[cfg(feature = "parallel")]
    pub fn parse_batch(&self, jobs: Vec<ParseJob>) -> Vec<JobResult> {
        let run = || -> Vec<JobResult> {
            jobs.into_par_iter()
                .map(|job| self.parse_one(job))
                .collect()
        };
        if self.config.num_threads == 0 {
            return run();
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads)
            .build()
        {
            Ok(pool) => pool.install(run),
            Err(error) => {
                tracing::warn!(%error, "falling back to the global thread pool");
                run()
            }
        }
    }

    /// Sequential fallback when parallel feature is disabled
    #[cfg(not(feature = "parallel"))]
    pub fn parse_batch(&self, jobs: Vec<ParseJob>) -> Vec<JobResult> {
        jobs.into_iter().map(|job| self.parse_one(job)).collect()
    }

    fn parse_one(&self, job: ParseJob) -> JobResult {
        let start = Instant::now();
        let result = Driver::new(&self.grammar, self.config.parser.clone())
            .parse(job.tokens)
            .map(|output| output.root);
        JobResult {
            id: job.id,
            result,
            duration: start.elapsed(),
        }
    }
}

/// Counts and timings over a finished batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub total_jobs: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_duration: Duration,
    pub avg_duration: Duration,
}

impl BatchSummary {
    /// Percentage of jobs that produced a tree
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.total_jobs == 0 {
            return 0.0;
        }
        self.successful as f64 / self.total_jobs as f64 * 100.0
    }
}

#[must_use]
pub fn aggregate_results(results: &[JobResult]) -> BatchSummary {
    let total_jobs = results.len();
    let successful = results.iter().filter(|r| r.is_ok()).count();
    let total_duration: Duration = results.iter().map(|r| r.duration).sum();
    let avg_duration = u32::try_from(total_jobs)
        .ok()
        .filter(|&n| n > 0)
        .map_or(Duration::ZERO, |n| total_duration / n);

    BatchSummary {
        total_jobs,
        successful,
        failed: total_jobs - successful,
        total_duration,
        avg_duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::compile;
    use crate::syntax::{LineCol, TokenKind};

    fn names(count: usize) -> Vec<Token> {
        let mut tokens: Vec<Token> = (0..count)
            .map(|i| Token::new(TokenKind::Name, format!("n{i}"), LineCol::new(1, i as u32 * 3)))
            .collect();
        tokens.push(Token::end_marker(LineCol::new(2, 0)));
        tokens
    }

    #[test]
    fn test_results_keep_input_order() {
        let grammar = Arc::new(compile("names: NAME+\n").unwrap());
        let parser = ParallelParser::new(grammar);
        let jobs = (1..=8).map(|n| ParseJob::new(format!("job{n}"), names(n))).collect();

        let results = parser.parse_batch(jobs);
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["job1", "job2", "job3", "job4", "job5", "job6", "job7", "job8"]);
        for (n, result) in (1..=8).zip(&results) {
            assert_eq!(result.result.as_ref().unwrap().children().len(), n);
        }
    }

    #[test]
    fn test_aggregate_counts_failures() {
        let grammar = Arc::new(compile("names: NAME+\n").unwrap());
        let parser = ParallelParser::new(grammar);
        let results = parser.parse_batch(vec![
            ParseJob::new("ok", names(2)),
            ParseJob::new("empty", vec![Token::end_marker(LineCol::default())]),
        ]);

        let summary = aggregate_results(&results);
        assert_eq!(summary.total_jobs, 2);
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.failed, 1);
        assert!((summary.success_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_batch_summary() {
        let summary = aggregate_results(&[]);
        assert_eq!(summary.total_jobs, 0);
        assert_eq!(summary.avg_duration, Duration::ZERO);
        assert_eq!(summary.success_rate(), 0.0);
    }
}
