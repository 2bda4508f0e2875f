#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier shared by terminals and nonterminals.
///
/// Ids below 256 name terminals (token categories and literal keywords);
/// ids from 256 upward name grammar rules. Id 0 is reserved for the
/// `EMPTY` sentinel carried by the accept label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SymbolId(pub u16);

impl SymbolId {
    /// The sentinel kind of label 0
    pub const EMPTY: Self = Self(0);

    /// Lowest id a nonterminal may receive
    pub const FIRST_NONTERMINAL: u16 = 256;

    /// Lowest id handed out to quoted literals
    pub const FIRST_KEYWORD: u16 = 7;

    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.0 < Self::FIRST_NONTERMINAL
    }

    #[inline]
    #[must_use]
    pub const fn is_nonterminal(self) -> bool {
        !self.is_terminal()
    }

    /// Position of a nonterminal in the grammar's rule tables.
    ///
    /// Returns `None` for terminals.
    #[inline]
    #[must_use]
    pub const fn rule_index(self) -> Option<usize> {
        if self.is_nonterminal() {
            Some((self.0 - Self::FIRST_NONTERMINAL) as usize)
        } else {
            None
        }
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed lexical categories an external tokenizer may produce.
///
/// The grammar refers to them by their upper-case names (`NAME`, `NUMBER`, ...);
/// their ids are stable across every compiled grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum TokenKind {
    EndMarker,
    Name,
    Number,
    String,
    Char,
    Op,
}

impl TokenKind {
    pub const ALL: [Self; 6] = [
        Self::EndMarker,
        Self::Name,
        Self::Number,
        Self::String,
        Self::Char,
        Self::Op,
    ];

    #[must_use]
    pub const fn id(self) -> SymbolId {
        SymbolId(match self {
            Self::EndMarker => 1,
            Self::Name => 2,
            Self::Number => 3,
            Self::String => 4,
            Self::Char => 5,
            Self::Op => 6,
        })
    }

    /// The name grammars use to refer to this category
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EndMarker => "ENDMARKER",
            Self::Name => "NAME",
            Self::Number => "NUMBER",
            Self::String => "STRING",
            Self::Char => "CHAR",
            Self::Op => "OP",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    #[must_use]
    pub fn from_id(id: SymbolId) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// The category a tokenizer would assign to a literal keyword spelling.
    #[must_use]
    pub fn of_literal(spelling: &str) -> Self {
        match spelling.chars().next() {
            None => Self::EndMarker,
            Some(c) if c.is_ascii_digit() => Self::Number,
            Some(c) if c == '_' || c.is_alphabetic() => Self::Name,
            Some('"') => Self::String,
            Some('\'') => Self::Char,
            Some(_) => Self::Op,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ids_are_terminal_and_distinct() {
        let mut seen = Vec::new();
        for kind in TokenKind::ALL {
            let id = kind.id();
            assert!(id.is_terminal());
            assert_ne!(id, SymbolId::EMPTY);
            assert!(id.0 < SymbolId::FIRST_KEYWORD);
            assert!(!seen.contains(&id));
            seen.push(id);
        }
    }

    #[test]
    fn test_name_round_trip() {
        for kind in TokenKind::ALL {
            assert_eq!(TokenKind::from_name(kind.name()), Some(kind));
            assert_eq!(TokenKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(TokenKind::from_name("expr"), None);
    }

    #[test]
    fn test_rule_index() {
        assert_eq!(SymbolId(256).rule_index(), Some(0));
        assert_eq!(SymbolId(260).rule_index(), Some(4));
        assert_eq!(TokenKind::Name.id().rule_index(), None);
    }

    #[test]
    fn test_literal_category() {
        assert_eq!(TokenKind::of_literal("if"), TokenKind::Name);
        assert_eq!(TokenKind::of_literal("0"), TokenKind::Number);
        assert_eq!(TokenKind::of_literal("+="), TokenKind::Op);
        assert_eq!(TokenKind::of_literal("("), TokenKind::Op);
    }
}
