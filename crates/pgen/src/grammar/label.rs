use crate::error::GrammarError;
use crate::syntax::SymbolId;
use ahash::RandomState;
use compact_str::CompactString;
use hashbrown::HashMap;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index into a grammar's label table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct LabelId(pub u16);

impl LabelId {
    /// The accept sentinel `(EMPTY, None)`
    pub const ACCEPT: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub const fn is_accept(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A terminal category, a literal keyword, or a nonterminal.
///
/// `literal` is set only for quoted keywords and operators; it separates
/// `'if'` from the generic `NAME` category it also belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Label {
    pub kind: SymbolId,
    pub literal: Option<CompactString>,
}

impl Label {
    #[must_use]
    pub const fn accept() -> Self {
        Self {
            kind: SymbolId::EMPTY,
            literal: None,
        }
    }

    #[must_use]
    pub const fn symbol(kind: SymbolId) -> Self {
        Self {
            kind,
            literal: None,
        }
    }

    #[must_use]
    pub fn keyword(kind: SymbolId, literal: impl Into<CompactString>) -> Self {
        Self {
            kind,
            literal: Some(literal.into()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }
}

/// Append-only interning table; a label's position is its id.
#[derive(Debug, Clone)]
pub struct LabelTable {
    labels: Vec<Label>,
    index: HashMap<Label, LabelId, RandomState>,
}

impl LabelTable {
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self {
            labels: Vec::new(),
            index: HashMap::with_hasher(RandomState::new()),
        };
        table.labels.push(Label::accept());
        table.index.insert(Label::accept(), LabelId::ACCEPT);
        table
    }

    /// Return the id of `label`, adding it on first sight
    pub fn intern(&mut self, label: Label) -> Result<LabelId, GrammarError> {
        if let Some(&id) = self.index.get(&label) {
            return Ok(id);
        }
        let id = u16::try_from(self.labels.len())
            .map(LabelId)
            .map_err(|_| GrammarError::TableOverflow {
                what: "labels",
                limit: usize::from(u16::MAX),
            })?;
        self.labels.push(label.clone());
        self.index.insert(label, id);
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, label: &Label) -> Option<LabelId> {
        self.index.get(label).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn into_labels(self) -> Vec<Label> {
        self.labels
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_is_label_zero() {
        let table = LabelTable::new();
        assert_eq!(table.get(&Label::accept()), Some(LabelId::ACCEPT));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_intern_reuses_ids() {
        let mut table = LabelTable::new();
        let number = table.intern(Label::symbol(SymbolId(3))).unwrap();
        let plus = table.intern(Label::keyword(SymbolId(7), "+")).unwrap();
        assert_eq!(number, LabelId(1));
        assert_eq!(plus, LabelId(2));
        assert_eq!(table.intern(Label::symbol(SymbolId(3))).unwrap(), number);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_keyword_differs_from_category() {
        let mut table = LabelTable::new();
        let name = table.intern(Label::symbol(SymbolId(2))).unwrap();
        let keyword = table.intern(Label::keyword(SymbolId(2), "if")).unwrap();
        assert_ne!(name, keyword);
    }
}
