//! Tokenizer for grammar source text
//!
//! Raw tokenization is done by a logos lexer. A small pass on top drops
//! newlines nested inside `(...)` or `[...]`, collapses blank lines and
//! converts byte spans to line/column positions.

use crate::error::GrammarError;
use crate::syntax::{LineCol, LineIndex};
use compact_str::CompactString;
use logos::Logos;
use std::fmt;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\f]+")]
#[logos(skip r"#[^\r\n]*")]
enum RawToken {
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Name,

    #[regex(r#"'([^'\\\r\n]|\\.)*'"#)]
    #[regex(r#""([^"\\\r\n]|\\.)*""#)]
    String,

    #[token(":")]
    #[token("|")]
    #[token("+")]
    #[token("*")]
    Op,

    #[token("(")]
    #[token("[")]
    Open,

    #[token(")")]
    #[token("]")]
    Close,

    #[regex(r"\r\n|\n|\r")]
    Newline,
}

/// Lexical category of a grammar source token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKind {
    Name,
    String,
    Op,
    Newline,
    EndMarker,
}

impl fmt::Display for MetaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "NAME",
            Self::String => "STRING",
            Self::Op => "OP",
            Self::Newline => "NEWLINE",
            Self::EndMarker => "ENDMARKER",
        })
    }
}

/// A token of grammar source.
///
/// For strings `text` holds the unquoted, unescaped contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaToken {
    pub kind: MetaKind,
    pub text: CompactString,
    pub position: LineCol,
}

impl MetaToken {
    /// True for the operator token spelled `op`
    #[must_use]
    pub fn is_op(&self, op: &str) -> bool {
        self.kind == MetaKind::Op && self.text == op
    }
}

/// Tokenize grammar source.
///
/// The result always ends with a `NEWLINE` followed by `ENDMARKER`, so a
/// final rule does not need a trailing line break.
pub fn tokenize(source: &str) -> Result<Vec<MetaToken>, GrammarError> {
    let index = LineIndex::new(source);
    let mut lexer = RawToken::lexer(source);
    let mut tokens: Vec<MetaToken> = Vec::new();
    let mut depth = 0usize;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let position = index.line_col(span.start);
        let slice = lexer.slice();

        let Ok(raw) = result else {
            let message = if slice.starts_with(['\'', '"']) {
                "unterminated string literal".to_string()
            } else {
                format!("unexpected character {slice:?}")
            };
            return Err(GrammarError::syntax(message, position));
        };

        let (kind, text) = match raw {
            RawToken::Newline => {
                let at_line_start = tokens.last().is_none_or(|t| t.kind == MetaKind::Newline);
                if depth > 0 || at_line_start {
                    continue;
                }
                (MetaKind::Newline, CompactString::const_new(""))
            }
            RawToken::Name => (MetaKind::Name, CompactString::from(slice)),
            RawToken::String => (MetaKind::String, unquote(slice, position)?),
            RawToken::Op => (MetaKind::Op, CompactString::from(slice)),
            RawToken::Open => {
                depth += 1;
                (MetaKind::Op, CompactString::from(slice))
            }
            RawToken::Close => {
                depth = depth.saturating_sub(1);
                (MetaKind::Op, CompactString::from(slice))
            }
        };
        tokens.push(MetaToken {
            kind,
            text,
            position,
        });
    }

    let end = index.end();
    if tokens.last().is_some_and(|t| t.kind != MetaKind::Newline) {
        tokens.push(MetaToken {
            kind: MetaKind::Newline,
            text: CompactString::const_new(""),
            position: end,
        });
    }
    tokens.push(MetaToken {
        kind: MetaKind::EndMarker,
        text: CompactString::const_new(""),
        position: end,
    });
    Ok(tokens)
}

fn unquote(quoted: &str, position: LineCol) -> Result<CompactString, GrammarError> {
    let body = &quoted[1..quoted.len() - 1];
    let mut out = CompactString::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(escaped @ ('\\' | '\'' | '"')) => out.push(escaped),
            Some(other) => {
                return Err(GrammarError::syntax(
                    format!("unknown escape sequence \\{other}"),
                    position,
                ));
            }
            None => {
                return Err(GrammarError::syntax("dangling escape", position));
            }
        }
    }
    if out.is_empty() {
        return Err(GrammarError::syntax("empty string literal", position));
    }
    Ok(out)
}
