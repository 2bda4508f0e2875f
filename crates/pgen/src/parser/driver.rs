//! # Token Stream Driver
//!
//! Feeds a whole token stream through a [`PushdownParser`] and returns the
//! finished tree. Feeding stops at the first token that completes the start
//! rule; anything after it is not read.

use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::parser::config::ParserConfig;
use crate::parser::engine::{ParseStats, Progress, PushdownParser};
use crate::syntax::{LineCol, Node, Token};

/// A finished parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutput {
    pub root: Node,
    pub stats: ParseStats,
}

/// Parse a complete token stream into a tree
pub fn parse_tokens<I>(grammar: &Grammar, tokens: I, config: &ParserConfig) -> Result<Node, ParseError>
where
    I: IntoIterator<Item = Token>,
{
    Driver::new(grammar, config.clone())
        .parse(tokens)
        .map(|output| output.root)
}

pub struct Driver<'g> {
    grammar: &'g Grammar,
    config: ParserConfig,
}

impl<'g> Driver<'g> {
    #[must_use]
    pub const fn new(grammar: &'g Grammar, config: ParserConfig) -> Self {
        Self { grammar, config }
    }

    /// Parse a stream, returning the tree together with parser counters.
    ///
    /// A stream that runs out before the start rule completes is
    /// [`ParseError::IncompleteInput`] at the last token seen.
    pub fn parse<I>(&self, tokens: I) -> Result<ParseOutput, ParseError>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut parser = PushdownParser::with_config(self.grammar, &self.config)?;
        let mut last = LineCol::default();
        for token in tokens {
            last = token.position;
            if let Progress::Complete(root) = parser.feed(token)? {
                return Ok(ParseOutput {
                    root,
                    stats: parser.stats(),
                });
            }
        }
        Err(ParseError::IncompleteInput {
            position: last,
            expected: parser.expected(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::grammar::compile;
    use crate::syntax::TokenKind;

    #[test]
    fn test_parse_stops_at_completion() {
        let grammar = compile("one: NAME\n").unwrap();
        let tokens = vec![
            Token::new(TokenKind::Name, "a", LineCol::new(1, 0)),
            Token::new(TokenKind::Name, "b", LineCol::new(1, 2)),
        ];
        let output = Driver::new(&grammar, ParserConfig::default())
            .parse(tokens)
            .unwrap();
        assert_eq!(output.root.leaf_texts(), vec!["a"]);
        assert_eq!(output.stats.tokens, 1);
    }

    #[test]
    fn test_exhausted_stream_is_incomplete() {
        let grammar = compile("pair: NAME NAME\n").unwrap();
        let tokens = vec![Token::new(TokenKind::Name, "a", LineCol::new(3, 4))];
        let err = parse_tokens(&grammar, tokens, &ParserConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompleteInput);
        assert_eq!(err.position(), Some(LineCol::new(3, 4)));
        assert_eq!(err.expected(), ["NAME".to_string()]);
    }

    #[test]
    fn test_start_override() {
        let grammar = compile("pair: item item\nitem: NAME\n").unwrap();
        let tokens = vec![Token::new(TokenKind::Name, "a", LineCol::default())];
        let root = parse_tokens(&grammar, tokens, &ParserConfig::with_start("item")).unwrap();
        assert_eq!(root.kind(), grammar.symbol_id("item").unwrap());
    }
}
