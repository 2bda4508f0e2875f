//! # Error Types
//!
//! Errors raised while compiling a grammar and while parsing a token stream.
//!
//! Every error is fatal to the operation that raised it: a grammar error
//! aborts compilation before any [`Grammar`](crate::grammar::Grammar) is
//! returned, and a parse error aborts the current parse while leaving the
//! grammar usable for the next one. Nothing is repaired or retried.
//!
//! - [`GrammarError`]: malformed grammar source or structural grammar defects
//! - [`ParseError`]: token streams that do not conform to the grammar
//! - [`ErrorKind`]: the closed set of tags both report through `kind()`
//!
//! When the `diagnostics` feature is enabled, both error types implement
//! [`miette::Diagnostic`] with stable error codes.

pub mod diagnostics;

use crate::syntax::{LineCol, Token};
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Tag identifying what went wrong, independent of the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    GrammarSyntaxError,
    UndefinedSymbol,
    LeftRecursion,
    Ambiguity,
    TableOverflow,
    UnclassifiableToken,
    UnexpectedToken,
    IncompleteInput,
    TooMuchInput,
    InvariantViolation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GrammarError {
    #[error("{message} at {position}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::syntax)))]
    Syntax { message: String, position: LineCol },

    #[error("undefined symbol `{name}` at {position}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::undefined_symbol)))]
    UndefinedSymbol {
        name: String,
        position: LineCol,
        #[cfg_attr(feature = "diagnostics", help)]
        suggestion: Option<String>,
    },

    #[error("left recursion for rule `{rule}`")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::left_recursion)))]
    LeftRecursion { rule: String, position: LineCol },

    #[error(
        "rule `{rule}` is ambiguous; {terminal} is in the first sets of {first} as well as {second}"
    )]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::ambiguity)))]
    Ambiguity {
        rule: String,
        terminal: String,
        first: String,
        second: String,
        position: LineCol,
    },

    #[error("grammar defines more than {limit} {what}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::table_overflow)))]
    TableOverflow { what: &'static str, limit: usize },
}

impl GrammarError {
    #[must_use]
    pub fn syntax(message: impl Into<String>, position: LineCol) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax { .. } => ErrorKind::GrammarSyntaxError,
            Self::UndefinedSymbol { .. } => ErrorKind::UndefinedSymbol,
            Self::LeftRecursion { .. } => ErrorKind::LeftRecursion,
            Self::Ambiguity { .. } => ErrorKind::Ambiguity,
            Self::TableOverflow { .. } => ErrorKind::TableOverflow,
        }
    }

    /// Where in the grammar source the problem was found
    #[must_use]
    pub const fn position(&self) -> Option<LineCol> {
        match self {
            Self::Syntax { position, .. }
            | Self::UndefinedSymbol { position, .. }
            | Self::LeftRecursion { position, .. }
            | Self::Ambiguity { position, .. } => Some(*position),
            Self::TableOverflow { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ParseError {
    #[error("bad token: {token}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::unclassifiable_token)))]
    UnclassifiableToken { token: Token },

    #[error("unexpected token {token} in rule `{rule}` (state {state}); expected one of: {}", .expected.join(", "))]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::unexpected_token)))]
    UnexpectedToken {
        token: Token,
        rule: String,
        state: usize,
        expected: Vec<String>,
    },

    #[error("too much input: {token}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::too_much_input)))]
    TooMuchInput { token: Token },

    #[error("incomplete input at {position}; expected one of: {}", .expected.join(", "))]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::incomplete_input)))]
    IncompleteInput {
        position: LineCol,
        expected: Vec<String>,
    },

    #[error("parse table conflict in rule `{rule}` (state {state}) on {token}: {message}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::invariant_violation)))]
    InvariantViolation {
        token: Token,
        rule: String,
        state: usize,
        message: String,
    },

    #[error("unknown start symbol `{name}`")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::unknown_start)))]
    UnknownStart { name: String },
}

impl ParseError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnclassifiableToken { .. } => ErrorKind::UnclassifiableToken,
            Self::UnexpectedToken { .. } => ErrorKind::UnexpectedToken,
            Self::TooMuchInput { .. } => ErrorKind::TooMuchInput,
            Self::IncompleteInput { .. } => ErrorKind::IncompleteInput,
            Self::InvariantViolation { .. } => ErrorKind::InvariantViolation,
            Self::UnknownStart { .. } => ErrorKind::UndefinedSymbol,
        }
    }

    /// Position of the offending token, if the error has one
    #[must_use]
    pub const fn position(&self) -> Option<LineCol> {
        match self {
            Self::UnclassifiableToken { token }
            | Self::UnexpectedToken { token, .. }
            | Self::TooMuchInput { token }
            | Self::InvariantViolation { token, .. } => Some(token.position),
            Self::IncompleteInput { position, .. } => Some(*position),
            Self::UnknownStart { .. } => None,
        }
    }

    /// The token the parser was holding when it failed
    #[must_use]
    pub const fn token(&self) -> Option<&Token> {
        match self {
            Self::UnclassifiableToken { token }
            | Self::UnexpectedToken { token, .. }
            | Self::TooMuchInput { token }
            | Self::InvariantViolation { token, .. } => Some(token),
            Self::IncompleteInput { .. } | Self::UnknownStart { .. } => None,
        }
    }

    /// Labels that would have been accepted where the parse stopped
    #[must_use]
    pub fn expected(&self) -> &[String] {
        match self {
            Self::UnexpectedToken { expected, .. } | Self::IncompleteInput { expected, .. } => {
                expected
            }
            _ => &[],
        }
    }
}
