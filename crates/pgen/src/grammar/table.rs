//! The compiled grammar tables and the pass that assembles them

use crate::error::GrammarError;
use crate::grammar::dfa::RuleDfa;
use crate::grammar::label::{Label, LabelId, LabelTable};
use crate::grammar::nfa::RawLabel;
use crate::syntax::{SymbolId, Token, TokenKind};
use compact_str::{CompactString, format_compact};
use hashbrown::HashMap;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write;

/// A DFA arc after interning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Transition {
    pub label: LabelId,
    pub target: usize,
}

/// One DFA state. A final state ends with the accept arc `(0, self)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct State {
    pub arcs: Vec<Transition>,
}

impl State {
    #[inline]
    #[must_use]
    pub fn is_accepting(&self) -> bool {
        self.arcs.iter().any(|arc| arc.label.is_accept())
    }

    /// The rule can only end here
    #[inline]
    #[must_use]
    pub fn is_accept_only(&self) -> bool {
        matches!(self.arcs.as_slice(), [arc] if arc.label.is_accept())
    }
}

/// A rule's automaton together with its FIRST set
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Dfa {
    pub symbol: SymbolId,
    pub states: Vec<State>,
    /// Sorted label ids that can begin this rule
    pub first: Vec<LabelId>,
}

impl Dfa {
    #[inline]
    #[must_use]
    pub fn in_first(&self, label: LabelId) -> bool {
        self.first.binary_search(&label).is_ok()
    }
}

/// The immutable artifact the pushdown parser runs on.
///
/// Built once by [`compile`](crate::grammar::compile) and only read
/// afterwards, so one grammar may back any number of concurrent parses.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Grammar {
    symbol_to_id: HashMap<CompactString, SymbolId>,
    id_to_symbol: Vec<CompactString>,
    /// Category names, plus literals under their quoted spelling
    token_to_id: HashMap<CompactString, SymbolId>,
    id_to_token: Vec<CompactString>,
    labels: Vec<Label>,
    keywords: HashMap<CompactString, LabelId>,
    /// Category label per category id, indexed by `SymbolId`
    tokens: Vec<Option<LabelId>>,
    dfas: Vec<Dfa>,
    start: SymbolId,
}

impl Grammar {
    #[inline]
    #[must_use]
    pub const fn start(&self) -> SymbolId {
        self.start
    }

    #[must_use]
    pub fn symbol_id(&self, name: &str) -> Option<SymbolId> {
        self.symbol_to_id.get(name).copied()
    }

    #[must_use]
    pub fn symbol_name(&self, id: SymbolId) -> Option<&str> {
        id.rule_index()
            .and_then(|index| self.id_to_symbol.get(index))
            .map(CompactString::as_str)
    }

    /// Terminal id by category name (`NUMBER`) or quoted literal (`'+'`)
    #[must_use]
    pub fn token_id(&self, name: &str) -> Option<SymbolId> {
        self.token_to_id.get(name).copied()
    }

    /// Human readable name of any terminal or nonterminal id
    #[must_use]
    pub fn name_of(&self, id: SymbolId) -> Option<&str> {
        if id.is_nonterminal() {
            self.symbol_name(id)
        } else {
            self.id_to_token.get(usize::from(id.0)).map(CompactString::as_str)
        }
    }

    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    #[must_use]
    pub fn label(&self, id: LabelId) -> Option<&Label> {
        self.labels.get(id.index())
    }

    /// `'literal'` for keywords, the symbol name otherwise
    #[must_use]
    pub fn label_name(&self, id: LabelId) -> String {
        match self.label(id) {
            Some(Label {
                literal: Some(text),
                ..
            }) => format!("'{text}'"),
            Some(label) => self.name_of(label.kind).unwrap_or("?").to_string(),
            None => format!("<label {id}>"),
        }
    }

    #[must_use]
    pub fn dfas(&self) -> &[Dfa] {
        &self.dfas
    }

    #[must_use]
    pub fn dfa(&self, symbol: SymbolId) -> Option<&Dfa> {
        symbol.rule_index().and_then(|index| self.dfas.get(index))
    }

    /// Rule names in id order
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.id_to_symbol.iter().map(CompactString::as_str)
    }

    /// Label of a keyword spelling
    #[must_use]
    pub fn keyword_label(&self, text: &str) -> Option<LabelId> {
        self.keywords.get(text).copied()
    }

    /// Label of a token category, if the grammar mentions it
    #[must_use]
    pub fn token_label(&self, kind: TokenKind) -> Option<LabelId> {
        self.tokens.get(usize::from(kind.id().0)).copied().flatten()
    }

    /// Map a token to its label: exact keyword text first, then category
    #[must_use]
    pub fn classify(&self, token: &Token) -> Option<LabelId> {
        self.keyword_label(&token.text)
            .or_else(|| self.token_label(token.kind))
    }

    /// Dump every table, for debugging
    #[must_use]
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "symbols");
        for (index, name) in self.id_to_symbol.iter().enumerate() {
            let _ = writeln!(out, "  {} {name}", index + usize::from(SymbolId::FIRST_NONTERMINAL));
        }
        let _ = writeln!(out, "tokens");
        for (index, name) in self.id_to_token.iter().enumerate() {
            let _ = writeln!(out, "  {index} {name}");
        }
        let _ = writeln!(out, "labels");
        for (index, label) in self.labels.iter().enumerate() {
            match &label.literal {
                Some(text) => {
                    let _ = writeln!(out, "  {index} ({}, {text:?})", label.kind);
                }
                None => {
                    let _ = writeln!(out, "  {index} ({}, None)", label.kind);
                }
            }
        }
        let _ = writeln!(out, "dfas");
        for dfa in &self.dfas {
            let name = self.symbol_name(dfa.symbol).unwrap_or("?");
            let first: Vec<String> = dfa.first.iter().map(|l| l.to_string()).collect();
            let _ = writeln!(out, "  {} {name} first {{{}}}", dfa.symbol, first.join(", "));
            for (index, state) in dfa.states.iter().enumerate() {
                let arcs: Vec<String> = state
                    .arcs
                    .iter()
                    .map(|arc| format!("({}, {})", arc.label, arc.target))
                    .collect();
                let _ = writeln!(out, "    {index}: [{}]", arcs.join(", "));
            }
        }
        let _ = writeln!(out, "start {}", self.start);
        out
    }
}

/// Interns every label and packages the rule automata into a [`Grammar`]
pub struct GrammarTableAssembler {
    symbol_to_id: HashMap<CompactString, SymbolId>,
    token_to_id: HashMap<CompactString, SymbolId>,
    id_to_token: Vec<CompactString>,
    labels: LabelTable,
    keywords: HashMap<CompactString, LabelId>,
    tokens: Vec<Option<LabelId>>,
}

impl GrammarTableAssembler {
    /// Highest id a terminal may receive
    pub const MAX_TERMINAL: usize = (SymbolId::FIRST_NONTERMINAL - 1) as usize;

    #[must_use]
    pub fn new() -> Self {
        let mut id_to_token = vec![CompactString::const_new("EMPTY")];
        let mut token_to_id = HashMap::new();
        for kind in TokenKind::ALL {
            token_to_id.insert(CompactString::from(kind.name()), kind.id());
            id_to_token.push(CompactString::from(kind.name()));
        }
        Self {
            symbol_to_id: HashMap::new(),
            token_to_id,
            id_to_token,
            labels: LabelTable::new(),
            keywords: HashMap::new(),
            tokens: vec![None; TokenKind::ALL.len() + 1],
        }
    }

    /// Assemble the grammar.
    ///
    /// `rules` and `firsts` run in parallel; `start` names the rule that
    /// receives the lowest nonterminal id.
    pub fn assemble(
        mut self,
        rules: Vec<RuleDfa>,
        firsts: Vec<BTreeSet<RawLabel>>,
        start: &str,
    ) -> Result<Grammar, GrammarError> {
        let mut ordered: Vec<(RuleDfa, BTreeSet<RawLabel>)> = rules.into_iter().zip(firsts).collect();
        ordered.sort_by(|(a, _), (b, _)| {
            (a.name.as_str() != start, &a.name).cmp(&(b.name.as_str() != start, &b.name))
        });

        let mut id_to_symbol = Vec::with_capacity(ordered.len());
        for (index, (rule, _)) in ordered.iter().enumerate() {
            let id = u16::try_from(index + usize::from(SymbolId::FIRST_NONTERMINAL))
                .map(SymbolId)
                .map_err(|_| GrammarError::TableOverflow {
                    what: "nonterminals",
                    limit: usize::from(u16::MAX - SymbolId::FIRST_NONTERMINAL),
                })?;
            self.symbol_to_id.insert(rule.name.clone(), id);
            id_to_symbol.push(rule.name.clone());
        }

        let mut dfas = Vec::with_capacity(ordered.len());
        for (rule, first_set) in &ordered {
            let symbol = self.symbol_to_id[&rule.name];
            let mut states = Vec::with_capacity(rule.states.len());
            for (index, state) in rule.states.iter().enumerate() {
                let mut arcs = Vec::with_capacity(state.arcs.len() + 1);
                for (raw, &target) in &state.arcs {
                    let label = self.make_label(raw, rule)?;
                    arcs.push(Transition { label, target });
                }
                if state.is_final {
                    arcs.push(Transition {
                        label: LabelId::ACCEPT,
                        target: index,
                    });
                }
                states.push(State { arcs });
            }

            let mut first = Vec::with_capacity(first_set.len());
            for raw in first_set {
                first.push(self.make_label(raw, rule)?);
            }
            first.sort_unstable();
            first.dedup();

            dfas.push(Dfa {
                symbol,
                states,
                first,
            });
        }

        let start = self
            .symbol_to_id
            .get(start)
            .copied()
            .unwrap_or(SymbolId(SymbolId::FIRST_NONTERMINAL));

        Ok(Grammar {
            symbol_to_id: self.symbol_to_id,
            id_to_symbol,
            token_to_id: self.token_to_id,
            id_to_token: self.id_to_token,
            labels: self.labels.into_labels(),
            keywords: self.keywords,
            tokens: self.tokens,
            dfas,
            start,
        })
    }

    fn make_label(&mut self, raw: &RawLabel, rule: &RuleDfa) -> Result<LabelId, GrammarError> {
        match raw {
            RawLabel::Name(name) => {
                if let Some(&symbol) = self.symbol_to_id.get(name) {
                    return self.labels.intern(Label::symbol(symbol));
                }
                let Some(kind) = TokenKind::from_name(name) else {
                    return Err(GrammarError::UndefinedSymbol {
                        name: name.to_string(),
                        position: rule.position,
                        suggestion: None,
                    });
                };
                let label = self.labels.intern(Label::symbol(kind.id()))?;
                self.tokens[usize::from(kind.id().0)] = Some(label);
                Ok(label)
            }
            RawLabel::Literal(text) => {
                if let Some(&label) = self.keywords.get(text) {
                    return Ok(label);
                }
                let id = self.literal_id(text)?;
                let label = self.labels.intern(Label::keyword(id, text.clone()))?;
                self.keywords.insert(text.clone(), label);
                Ok(label)
            }
        }
    }

    fn literal_id(&mut self, text: &CompactString) -> Result<SymbolId, GrammarError> {
        let quoted = format_compact!("'{text}'");
        if let Some(&id) = self.token_to_id.get(&quoted) {
            return Ok(id);
        }
        let next = self.id_to_token.len();
        if next > Self::MAX_TERMINAL {
            return Err(GrammarError::TableOverflow {
                what: "terminals",
                limit: Self::MAX_TERMINAL,
            });
        }
        let id = SymbolId(u16::try_from(next).unwrap_or(u16::MAX));
        self.token_to_id.insert(quoted.clone(), id);
        self.id_to_token.push(quoted);
        Ok(id)
    }
}

impl Default for GrammarTableAssembler {
    fn default() -> Self {
        Self::new()
    }
}
