//! # Grammar Module
//!
//! Compiles grammar source text into the tables the pushdown parser runs on.
//!
//! ## Overview
//!
//! A grammar is a list of rules, one per line:
//!
//! ```text
//! sum:  term ('+' term)*
//! term: NUMBER | '(' sum ')'
//! ```
//!
//! Bare upper-case names (`NUMBER`, `NAME`, `STRING`, `CHAR`, `OP`,
//! `ENDMARKER`) are token categories, other bare names are rules, and quoted
//! strings are literal keywords or operators. Right-hand sides use `|`,
//! `(...)`, `[...]` (optional), `+` and `*`.
//!
//! Compilation runs in a fixed pipeline:
//!
//! 1. [`rule_parser`] turns each rule into an NFA
//! 2. [`dfa`] builds and minimizes one DFA per rule
//! 3. [`first`] computes FIRST sets, rejecting left recursion and ambiguity
//! 4. [`table`] interns labels and assembles the [`Grammar`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pgen::grammar::compile;
//!
//! let grammar = compile("sum: NUMBER ('+' NUMBER)*\n").unwrap();
//! println!("{}", grammar.report());
//! ```

pub mod config;
pub mod dfa;
pub mod first;
pub mod label;
pub mod lexer;
pub mod nfa;
pub mod rule_parser;
pub mod table;

pub use config::CompileConfig;
pub use dfa::{AutomatonBuilder, RuleDfa};
pub use first::FirstSetResolver;
pub use label::{Label, LabelId};
pub use table::{Dfa, Grammar, GrammarTableAssembler, State, Transition};

use crate::error::GrammarError;
use crate::error::diagnostics::did_you_mean;
use crate::syntax::{LineCol, TokenKind};
use rule_parser::{RuleSource, RuleSyntaxParser};
use std::fmt::Write;
use tracing::{debug, trace};

/// Compile grammar source with the default configuration
pub fn compile(source: &str) -> Result<Grammar, GrammarError> {
    GrammarCompiler::default().compile(source)
}

#[derive(Debug, Clone, Default)]
pub struct GrammarCompiler {
    config: CompileConfig,
}

impl GrammarCompiler {
    #[must_use]
    pub const fn new(config: CompileConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &CompileConfig {
        &self.config
    }

    pub fn compile(&self, source: &str) -> Result<Grammar, GrammarError> {
        let (dfas, start) = self.build_automata(source)?;
        let firsts = FirstSetResolver::new(&dfas).resolve()?;
        let grammar = GrammarTableAssembler::new().assemble(dfas, firsts, &start)?;
        debug!(
            rules = grammar.dfas().len(),
            labels = grammar.labels().len(),
            start = %start,
            "compiled grammar"
        );
        Ok(grammar)
    }

    /// Parse the source and build one DFA per rule, in declaration order.
    ///
    /// Returns the automata together with the start rule's name. Names are
    /// resolved here; FIRST sets are not computed.
    pub fn build_automata(&self, source: &str) -> Result<(Vec<RuleDfa>, String), GrammarError> {
        let rules = RuleSyntaxParser::new(source)?.parse_grammar()?;
        let start = self.start_rule(&rules)?;
        Self::resolve_names(&rules)?;

        let dfas = rules
            .into_iter()
            .map(|rule| {
                let mut states = AutomatonBuilder::build(&rule.nfa, rule.fragment);
                trace!(rule = %rule.name, nfa = rule.nfa.len(), dfa = states.len(), "built DFA");
                if self.config.minimize {
                    AutomatonBuilder::minimize(&mut states);
                }
                RuleDfa {
                    name: rule.name,
                    position: rule.position,
                    states,
                }
            })
            .collect();
        Ok((dfas, start))
    }

    /// Listing of every rule's NFA and DFA
    pub fn dump(&self, source: &str) -> Result<String, GrammarError> {
        let rules = RuleSyntaxParser::new(source)?.parse_grammar()?;
        Self::resolve_names(&rules)?;
        let mut out = String::new();
        for rule in &rules {
            let mut states = AutomatonBuilder::build(&rule.nfa, rule.fragment);
            if self.config.minimize {
                AutomatonBuilder::minimize(&mut states);
            }
            let dfa = RuleDfa {
                name: rule.name.clone(),
                position: rule.position,
                states,
            };
            let _ = write!(out, "{}{}", rule.nfa.dump(&rule.name, rule.fragment), dfa.dump());
        }
        Ok(out)
    }

    fn start_rule(&self, rules: &[RuleSource]) -> Result<String, GrammarError> {
        let Some(first) = rules.first() else {
            return Err(GrammarError::syntax(
                "grammar defines no rules",
                LineCol::default(),
            ));
        };
        let Some(requested) = &self.config.start else {
            return Ok(first.name.to_string());
        };
        if rules.iter().any(|rule| rule.name == requested.as_str()) {
            return Ok(requested.clone());
        }
        let names: Vec<String> = rules.iter().map(|rule| rule.name.to_string()).collect();
        Err(GrammarError::UndefinedSymbol {
            name: requested.clone(),
            position: first.position,
            suggestion: did_you_mean(requested, &names),
        })
    }

    /// Every bare name must be a rule or a token category
    fn resolve_names(rules: &[RuleSource]) -> Result<(), GrammarError> {
        let is_rule = |name: &str| rules.iter().any(|rule| rule.name == name);
        for rule in rules {
            for (name, position) in &rule.references {
                if is_rule(name) || TokenKind::from_name(name).is_some() {
                    continue;
                }
                let candidates: Vec<String> = rules
                    .iter()
                    .map(|rule| rule.name.to_string())
                    .chain(TokenKind::ALL.iter().map(|kind| kind.name().to_string()))
                    .collect();
                return Err(GrammarError::UndefinedSymbol {
                    name: name.to_string(),
                    position: *position,
                    suggestion: did_you_mean(name, &candidates),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_empty_grammar_rejected() {
        let err = compile("# nothing here\n\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GrammarSyntaxError);
    }

    #[test]
    fn test_undefined_symbol_with_suggestion() {
        let err = compile("sum: NUMBR ('+' NUMBER)*\n").unwrap_err();
        let GrammarError::UndefinedSymbol {
            name,
            position,
            suggestion,
        } = err
        else {
            panic!("expected an undefined symbol error");
        };
        assert_eq!(name, "NUMBR");
        assert_eq!(position, LineCol::new(1, 5));
        assert_eq!(suggestion.as_deref(), Some("NUMBER"));
    }

    #[test]
    fn test_start_override() {
        let config = CompileConfig::default().with_start("term");
        let grammar = GrammarCompiler::new(config)
            .compile("sum: term ('+' term)*\nterm: NUMBER\n")
            .unwrap();
        assert_eq!(grammar.symbol_name(grammar.start()), Some("term"));
    }

    #[test]
    fn test_unknown_start_override() {
        let config = CompileConfig::default().with_start("trem");
        let err = GrammarCompiler::new(config)
            .compile("sum: term\nterm: NUMBER\n")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndefinedSymbol);
    }

    #[test]
    fn test_unminimized_keeps_more_states() {
        let source = "a: 'x' 'z' | 'y' 'z'\n";
        let plain = GrammarCompiler::new(CompileConfig::default().with_minimize(false))
            .compile(source)
            .unwrap();
        let minimized = compile(source).unwrap();
        assert!(plain.dfas()[0].states.len() > minimized.dfas()[0].states.len());
    }

    #[test]
    fn test_dump_shows_both_automata() {
        let out = GrammarCompiler::default().dump("sum: NUMBER\n").unwrap();
        assert!(out.contains("Dump of NFA for sum"));
        assert!(out.contains("Dump of DFA for sum"));
    }
}
