//! # pgen
//!
//! A grammar compiler and table-driven pushdown parser.
//!
//! ## Overview
//!
//! pgen reads a grammar written as EBNF-style rules, compiles every rule into
//! a minimized DFA, and checks that the grammar can be parsed with one token
//! of lookahead. The resulting [`Grammar`] drives a generic
//! [`PushdownParser`] that turns a token stream into a concrete syntax tree.
//!
//! - **Grammar compilation**: NFA construction, subset construction, state merging
//! - **Static checks**: left recursion and FIRST/FIRST ambiguity are rejected
//! - **Runtime parsing**: shift, push and pop over a stack of rule automata
//! - **Shared tables**: one immutable grammar backs any number of parses
//!
//! Tokenizing program text is left to the caller; the parser consumes
//! [`Token`]s carrying a category, text and position.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pgen::grammar::compile;
//! use pgen::parser::{parse_tokens, ParserConfig};
//! use pgen::syntax::{pretty::to_sexpr, LineCol, Token, TokenKind};
//!
//! let grammar = compile("sum: NUMBER ('+' NUMBER)*\n").unwrap();
//!
//! let tokens = vec![
//!     Token::new(TokenKind::Number, "1", LineCol::new(1, 0)),
//!     Token::new(TokenKind::Op, "+", LineCol::new(1, 2)),
//!     Token::new(TokenKind::Number, "2", LineCol::new(1, 4)),
//!     Token::end_marker(LineCol::new(1, 5)),
//! ];
//!
//! let root = parse_tokens(&grammar, tokens, &ParserConfig::default()).unwrap();
//! assert_eq!(
//!     to_sexpr(&root, &grammar),
//!     r#"(sum (NUMBER "1") ('+' "+") (NUMBER "2"))"#
//! );
//! ```
//!
//! ## Feature Flags
//!
//! - `serialize`: serde support for grammars, tokens and trees
//! - `diagnostics`: `miette` diagnostics for both error types
//! - `parallel`: batch parsing on a rayon thread pool

pub mod error;
pub mod grammar;
pub mod parser;
pub mod syntax;
pub mod testing;

// Re-export commonly used types
pub use error::{ErrorKind, GrammarError, ParseError};
pub use grammar::{CompileConfig, Grammar, GrammarCompiler, compile};
pub use parser::{ParserConfig, Progress, PushdownParser, parse_tokens};
pub use syntax::{LineCol, Node, SymbolId, Token, TokenKind};
