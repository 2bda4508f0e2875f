use crate::syntax::{LineCol, TokenKind};
use compact_str::CompactString;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// A token produced by an external tokenizer.
///
/// The parser only looks at the category and, for literal keywords and
/// operators, at the exact text.
///
/// # Example
///
/// ```rust,no_run
/// use pgen::syntax::{LineCol, Token, TokenKind};
///
/// let token = Token::new(TokenKind::Number, "42", LineCol::new(1, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Token {
    /// The lexical category of this token
    pub kind: TokenKind,
    /// The source text that this token represents
    pub text: CompactString,
    /// Where the token starts in the source
    pub position: LineCol,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<CompactString>, position: LineCol) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// The end-of-input marker
    #[must_use]
    pub fn end_marker(position: LineCol) -> Self {
        Self::new(TokenKind::EndMarker, "", position)
    }

    #[must_use]
    pub fn is_end_marker(&self) -> bool {
        self.kind == TokenKind::EndMarker
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} at {}", self.kind, self.text.as_str(), self.position)
    }
}
