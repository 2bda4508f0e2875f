//! Tests for batch parsing over a shared grammar

use pgen::error::ErrorKind;
use pgen::grammar::{Grammar, compile};
use pgen::parser::{
    ParallelConfig, ParallelParser, ParseJob, ParserConfig, aggregate_results, parse_tokens,
};
use pgen::syntax::{LineCol, Token, TokenKind};
use pgen::testing::{GeneratorConfig, SentenceGenerator};
use std::sync::Arc;

fn create_test_grammar() -> Arc<Grammar> {
    Arc::new(
        compile(
            "expr: term ('+' term)*\n\
             term: factor ('*' factor)*\n\
             factor: NUMBER | '(' expr ')'\n",
        )
        .expect("Failed to compile test grammar"),
    )
}

fn generated_jobs(grammar: &Grammar, count: u64) -> Vec<ParseJob> {
    let generator = SentenceGenerator::new(grammar, GeneratorConfig::default());
    (1..=count)
        .map(|seed| ParseJob::new(format!("seed{seed}"), generator.generate_with_seed(seed)))
        .collect()
}

#[test]
fn test_batch_matches_sequential_parse() {
    let grammar = create_test_grammar();
    let jobs = generated_jobs(&grammar, 32);
    let expected: Vec<_> = jobs
        .iter()
        .map(|job| parse_tokens(&grammar, job.tokens.clone(), &ParserConfig::default()).unwrap())
        .collect();

    let results = ParallelParser::new(Arc::clone(&grammar)).parse_batch(jobs);
    assert_eq!(results.len(), expected.len());
    for (result, tree) in results.iter().zip(&expected) {
        assert_eq!(result.result.as_ref().unwrap(), tree, "job {}", result.id);
    }
}

#[test]
fn test_failures_are_isolated_per_job() {
    let grammar = create_test_grammar();
    let mut jobs = generated_jobs(&grammar, 4);
    jobs.insert(
        2,
        ParseJob::new(
            "broken",
            vec![
                Token::new(TokenKind::Op, "*", LineCol::new(1, 0)),
                Token::end_marker(LineCol::new(1, 1)),
            ],
        ),
    );

    let results = ParallelParser::new(grammar).parse_batch(jobs);
    let failed: Vec<_> = results.iter().filter(|r| !r.is_ok()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].id, "broken");
    assert_eq!(
        failed[0].result.as_ref().unwrap_err().kind(),
        ErrorKind::UnexpectedToken
    );

    let summary = aggregate_results(&results);
    assert_eq!(summary.total_jobs, 5);
    assert_eq!(summary.successful, 4);
    assert_eq!(summary.failed, 1);
}

#[test]
fn test_explicit_thread_count_and_start_rule() {
    let grammar = create_test_grammar();
    let config = ParallelConfig {
        num_threads: 2,
        parser: ParserConfig::with_start("factor"),
    };
    let parser = ParallelParser::with_config(grammar, config);
    let jobs = (0..6)
        .map(|i| {
            ParseJob::new(
                i.to_string(),
                vec![Token::new(TokenKind::Number, i.to_string(), LineCol::new(1, 0))],
            )
        })
        .collect();

    let results = parser.parse_batch(jobs);
    assert!(results.iter().all(|r| r.is_ok()));
    let factor = parser.grammar().symbol_id("factor").unwrap();
    for result in &results {
        assert_eq!(result.result.as_ref().unwrap().kind(), factor);
    }
}

#[test]
fn test_unknown_start_fails_every_job() {
    let grammar = create_test_grammar();
    let config = ParallelConfig {
        num_threads: 0,
        parser: ParserConfig::with_start("statement"),
    };
    let results = ParallelParser::with_config(grammar, config)
        .parse_batch(vec![ParseJob::new("a", Vec::new()), ParseJob::new("b", Vec::new())]);
    assert!(results.iter().all(|r| {
        matches!(&r.result, Err(err) if err.kind() == ErrorKind::UndefinedSymbol)
    }));
}
