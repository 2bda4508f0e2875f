//! Rule-local NFA arena
//!
//! States live in a flat vector and refer to each other by index, so the
//! back-edges introduced by `+` and `*` need no shared ownership.

use compact_str::CompactString;
use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::fmt;

/// A symbolic arc label, before interning
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RawLabel {
    /// A rule or token category name
    Name(CompactString),
    /// A quoted keyword or operator, stored unquoted
    Literal(CompactString),
}

impl fmt::Display for RawLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Literal(text) => write!(f, "'{text}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaArc {
    /// `None` is an epsilon transition
    pub label: Option<RawLabel>,
    pub target: usize,
}

#[derive(Debug, Clone, Default)]
pub struct NfaState {
    pub arcs: SmallVec<[NfaArc; 2]>,
}

/// Entry and exit state of a sub-automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: usize,
    pub accept: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Nfa {
    states: Vec<NfaState>,
}

impl Nfa {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self) -> usize {
        self.states.push(NfaState::default());
        self.states.len() - 1
    }

    pub fn add_arc(&mut self, from: usize, to: usize, label: Option<RawLabel>) {
        self.states[from].arcs.push(NfaArc { label, target: to });
    }

    #[must_use]
    pub fn state(&self, index: usize) -> &NfaState {
        &self.states[index]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Every state reachable from `state` through epsilon arcs, itself included
    pub fn epsilon_closure(&self, state: usize, into: &mut BTreeSet<usize>) {
        let mut pending = vec![state];
        while let Some(current) = pending.pop() {
            if !into.insert(current) {
                continue;
            }
            for arc in &self.states[current].arcs {
                if arc.label.is_none() {
                    pending.push(arc.target);
                }
            }
        }
    }

    /// Human readable listing of the states reachable from `fragment.start`
    #[must_use]
    pub fn dump(&self, name: &str, fragment: Fragment) -> String {
        use std::fmt::Write;

        let mut out = format!("Dump of NFA for {name}\n");
        let mut order = vec![fragment.start];
        let mut index = 0;
        while index < order.len() {
            let state = order[index];
            let marker = if state == fragment.accept { "(final)" } else { "" };
            let _ = writeln!(out, "  State {index} {marker}");
            for arc in &self.states[state].arcs {
                let target = match order.iter().position(|&s| s == arc.target) {
                    Some(position) => position,
                    None => {
                        order.push(arc.target);
                        order.len() - 1
                    }
                };
                match &arc.label {
                    Some(label) => {
                        let _ = writeln!(out, "    {label} -> {target}");
                    }
                    None => {
                        let _ = writeln!(out, "    -> {target}");
                    }
                }
            }
            index += 1;
        }
        out
    }
}
