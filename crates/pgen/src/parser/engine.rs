//! Table-driven pushdown parser
//!
//! The parser keeps a stack of frames, one per rule being recognized. Each
//! token either shifts in the top frame, pushes a new frame for a rule whose
//! FIRST set contains it, or pops a frame that may end here.

use crate::error::ParseError;
use crate::grammar::{Dfa, Grammar, LabelId};
use crate::parser::config::ParserConfig;
use crate::syntax::{LineCol, Node, SymbolId, Token};
use std::collections::BTreeSet;
use tracing::debug;

/// Outcome of feeding one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The start rule is not finished yet
    Incomplete,
    /// The start rule was recognized; the parser accepts no more input
    Complete(Node),
}

impl Progress {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Counters collected while parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Number of tokens fed
    pub tokens: usize,
    pub shifts: usize,
    pub pushes: usize,
    pub pops: usize,
    /// Maximum stack depth
    pub max_depth: usize,
}

#[derive(Debug, Clone)]
struct Frame {
    symbol: SymbolId,
    state: usize,
    node: Node,
}

enum Step {
    Shift(usize),
    Push(SymbolId, usize),
    None,
}

pub struct PushdownParser<'g> {
    grammar: &'g Grammar,
    stack: Vec<Frame>,
    started: bool,
    stats: ParseStats,
}

impl<'g> PushdownParser<'g> {
    /// Parser for the grammar's start symbol
    #[must_use]
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::for_symbol(grammar, grammar.start())
    }

    pub fn with_config(grammar: &'g Grammar, config: &ParserConfig) -> Result<Self, ParseError> {
        let Some(name) = &config.start else {
            return Ok(Self::new(grammar));
        };
        let symbol = grammar
            .symbol_id(name)
            .ok_or_else(|| ParseError::UnknownStart { name: name.clone() })?;
        Ok(Self::for_symbol(grammar, symbol))
    }

    fn for_symbol(grammar: &'g Grammar, symbol: SymbolId) -> Self {
        Self {
            grammar,
            stack: vec![Frame {
                symbol,
                state: 0,
                node: Node::branch(symbol, LineCol::default()),
            }],
            started: false,
            stats: ParseStats {
                max_depth: 1,
                ..ParseStats::default()
            },
        }
    }

    #[must_use]
    pub const fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    #[must_use]
    pub const fn stats(&self) -> ParseStats {
        self.stats
    }

    /// Number of open rules
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether the parse has already completed
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.stack.is_empty()
    }

    /// Feed the next token.
    ///
    /// Every error is fatal to this parse; the grammar stays usable.
    pub fn feed(&mut self, token: Token) -> Result<Progress, ParseError> {
        if self.stack.is_empty() {
            return Err(ParseError::TooMuchInput { token });
        }
        if !self.started {
            self.started = true;
            if let Some(root) = self.stack.first_mut() {
                root.node.set_position(token.position);
            }
        }
        self.stats.tokens += 1;

        let label = match self.grammar.classify(&token) {
            Some(label) => label,
            None if token.is_end_marker() => return self.end_of_input(token.position),
            None => return Err(ParseError::UnclassifiableToken { token }),
        };

        loop {
            let (frame_symbol, frame_state) = match self.stack.last() {
                Some(frame) => (frame.symbol, frame.state),
                None => return Err(ParseError::TooMuchInput { token }),
            };
            let dfa = self.dfa(frame_symbol, &token)?;
            let state = dfa
                .states
                .get(frame_state)
                .ok_or_else(|| self.conflict(&token, "state index out of range"))?;

            match self.select(dfa, frame_state, label, &token)? {
                Step::Shift(target) => {
                    self.shift(label, token, target);
                    return Ok(self.collapse());
                }
                Step::Push(symbol, target) => {
                    self.push(symbol, target, token.position);
                }
                Step::None if state.is_accepting() => {
                    self.pop();
                    if self.stack.is_empty() {
                        return Err(ParseError::TooMuchInput { token });
                    }
                }
                Step::None => {
                    return Err(ParseError::UnexpectedToken {
                        rule: self.rule_name(frame_symbol),
                        state: frame_state,
                        expected: self.expected(),
                        token,
                    });
                }
            }
        }
    }

    /// Pick the single shift or push the lookahead allows in this state
    fn select(
        &self,
        dfa: &Dfa,
        state: usize,
        label: LabelId,
        token: &Token,
    ) -> Result<Step, ParseError> {
        let mut shift = None;
        let mut push: Option<(SymbolId, usize)> = None;

        for arc in &dfa.states[state].arcs {
            if arc.label.is_accept() {
                continue;
            }
            let Some(arc_label) = self.grammar.label(arc.label) else {
                return Err(self.conflict(token, "arc refers to a missing label"));
            };
            if arc_label.is_terminal() {
                if arc.label == label {
                    shift = Some(arc.target);
                }
                continue;
            }
            let Some(sub) = self.grammar.dfa(arc_label.kind) else {
                return Err(self.conflict(token, "arc refers to a missing rule"));
            };
            if sub.in_first(label) {
                if push.is_some() {
                    return Err(self.conflict(token, "two rules start with this token"));
                }
                push = Some((arc_label.kind, arc.target));
            }
        }

        match (shift, push) {
            (Some(_), Some(_)) => Err(self.conflict(token, "token both shifts and starts a rule")),
            (Some(target), None) => Ok(Step::Shift(target)),
            (None, Some((symbol, target))) => Ok(Step::Push(symbol, target)),
            (None, None) => Ok(Step::None),
        }
    }

    fn shift(&mut self, label: LabelId, token: Token, target: usize) {
        let kind = self
            .grammar
            .label(label)
            .map_or(token.kind.id(), |label| label.kind);
        debug!(label = %self.grammar.label_name(label), text = %token.text, target, "shift");
        if let Some(frame) = self.stack.last_mut() {
            frame.node.push_child(Node::leaf(kind, token.text, token.position));
            frame.state = target;
        }
        self.stats.shifts += 1;
    }

    fn push(&mut self, symbol: SymbolId, target: usize, position: LineCol) {
        debug!(rule = %self.rule_name(symbol), "push");
        if let Some(frame) = self.stack.last_mut() {
            frame.state = target;
        }
        self.stack.push(Frame {
            symbol,
            state: 0,
            node: Node::branch(symbol, position),
        });
        self.stats.pushes += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.stack.len());
    }

    /// Pop the top frame into its parent, returning the root once the stack empties
    fn pop(&mut self) -> Option<Node> {
        let frame = self.stack.pop()?;
        debug!(rule = %self.rule_name(frame.symbol), "pop");
        self.stats.pops += 1;
        match self.stack.last_mut() {
            Some(parent) => {
                parent.node.push_child(frame.node);
                None
            }
            None => Some(frame.node),
        }
    }

    /// Pop every frame whose state can only accept
    fn collapse(&mut self) -> Progress {
        while let Some(frame) = self.stack.last() {
            let accept_only = self
                .grammar
                .dfa(frame.symbol)
                .and_then(|dfa| dfa.states.get(frame.state))
                .is_some_and(|state| state.is_accept_only());
            if !accept_only {
                break;
            }
            if let Some(root) = self.pop() {
                debug!("accept");
                return Progress::Complete(root);
            }
        }
        Progress::Incomplete
    }

    /// An end marker the grammar never mentions: close every rule that may end
    fn end_of_input(&mut self, position: LineCol) -> Result<Progress, ParseError> {
        while let Some(frame) = self.stack.last() {
            let accepting = self
                .grammar
                .dfa(frame.symbol)
                .and_then(|dfa| dfa.states.get(frame.state))
                .is_some_and(|state| state.is_accepting());
            if !accepting {
                return Err(ParseError::IncompleteInput {
                    position,
                    expected: self.expected(),
                });
            }
            if let Some(root) = self.pop() {
                debug!("accept");
                return Ok(Progress::Complete(root));
            }
        }
        Err(ParseError::IncompleteInput {
            position,
            expected: Vec::new(),
        })
    }

    /// Labels the top frame would accept next, with rules expanded to their FIRST sets
    #[must_use]
    pub fn expected(&self) -> Vec<String> {
        let Some(frame) = self.stack.last() else {
            return Vec::new();
        };
        let Some(state) = self
            .grammar
            .dfa(frame.symbol)
            .and_then(|dfa| dfa.states.get(frame.state))
        else {
            return Vec::new();
        };

        let mut names = BTreeSet::new();
        for arc in &state.arcs {
            if arc.label.is_accept() {
                continue;
            }
            match self.grammar.label(arc.label) {
                Some(label) if label.is_terminal() => {
                    names.insert(self.grammar.label_name(arc.label));
                }
                Some(label) => {
                    if let Some(sub) = self.grammar.dfa(label.kind) {
                        names.extend(sub.first.iter().map(|&l| self.grammar.label_name(l)));
                    }
                }
                None => {}
            }
        }
        names.into_iter().collect()
    }

    fn dfa(&self, symbol: SymbolId, token: &Token) -> Result<&'g Dfa, ParseError> {
        self.grammar
            .dfa(symbol)
            .ok_or_else(|| self.conflict(token, "frame refers to a missing rule"))
    }

    fn rule_name(&self, symbol: SymbolId) -> String {
        self.grammar
            .symbol_name(symbol)
            .map_or_else(|| symbol.to_string(), str::to_string)
    }

    fn conflict(&self, token: &Token, message: &str) -> ParseError {
        let (rule, state) = self
            .stack
            .last()
            .map_or((String::new(), 0), |frame| (self.rule_name(frame.symbol), frame.state));
        ParseError::InvariantViolation {
            token: token.clone(),
            rule,
            state,
            message: message.to_string(),
        }
    }
}
