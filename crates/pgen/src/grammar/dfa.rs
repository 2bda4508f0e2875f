//! Subset construction and state merging
//!
//! Each rule's NFA becomes a DFA whose states are sets of NFA states.
//! Transitions still carry symbolic [`RawLabel`]s here; interning happens
//! once every rule has been minimized, so merge equality compares names.

use crate::grammar::nfa::{Fragment, Nfa, RawLabel};
use crate::syntax::LineCol;
use compact_str::CompactString;
use hashbrown::HashMap;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    /// NFA states this state stands for
    pub nfa_set: BTreeSet<usize>,
    pub is_final: bool,
    pub arcs: BTreeMap<RawLabel, usize>,
}

/// The deterministic automaton of one rule; state 0 is the start state
#[derive(Debug, Clone)]
pub struct RuleDfa {
    pub name: CompactString,
    pub position: LineCol,
    pub states: Vec<DfaState>,
}

impl RuleDfa {
    /// Whether the automaton accepts exactly this label sequence
    #[must_use]
    pub fn accepts(&self, input: &[RawLabel]) -> bool {
        let mut state = 0;
        for label in input {
            match self.states[state].arcs.get(label) {
                Some(&next) => state = next,
                None => return false,
            }
        }
        self.states[state].is_final
    }

    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = format!("Dump of DFA for {}\n", self.name);
        for (index, state) in self.states.iter().enumerate() {
            let marker = if state.is_final { "(final)" } else { "" };
            let _ = writeln!(out, "  State {index} {marker}");
            for (label, target) in &state.arcs {
                let _ = writeln!(out, "    {label} -> {target}");
            }
        }
        out
    }
}

pub struct AutomatonBuilder;

impl AutomatonBuilder {
    /// Subset construction from `fragment.start`.
    ///
    /// A state is final iff `fragment.accept` is in its NFA set.
    #[must_use]
    pub fn build(nfa: &Nfa, fragment: Fragment) -> Vec<DfaState> {
        let closure = |state: usize, into: &mut BTreeSet<usize>| nfa.epsilon_closure(state, into);

        let mut initial = BTreeSet::new();
        closure(fragment.start, &mut initial);

        let mut states = vec![Self::new_state(initial, fragment.accept)];
        let mut by_set: HashMap<BTreeSet<usize>, usize> = HashMap::new();
        by_set.insert(states[0].nfa_set.clone(), 0);

        let mut next = 0;
        while next < states.len() {
            let mut moves: BTreeMap<RawLabel, BTreeSet<usize>> = BTreeMap::new();
            for &member in &states[next].nfa_set {
                for arc in &nfa.state(member).arcs {
                    if let Some(label) = &arc.label {
                        closure(arc.target, moves.entry(label.clone()).or_default());
                    }
                }
            }

            for (label, set) in moves {
                let target = match by_set.get(&set) {
                    Some(&existing) => existing,
                    None => {
                        states.push(Self::new_state(set.clone(), fragment.accept));
                        by_set.insert(set, states.len() - 1);
                        states.len() - 1
                    }
                };
                states[next].arcs.insert(label, target);
            }
            next += 1;
        }
        states
    }

    fn new_state(nfa_set: BTreeSet<usize>, accept: usize) -> DfaState {
        DfaState {
            is_final: nfa_set.contains(&accept),
            nfa_set,
            arcs: BTreeMap::new(),
        }
    }

    /// Merge states with equal finality and equal transitions until none remain.
    ///
    /// Each pass groups states by signature and keeps the lowest index of
    /// every group, so the start state stays at index 0.
    pub fn minimize(states: &mut Vec<DfaState>) {
        let before = states.len();
        loop {
            let replace: Vec<usize> = {
                let mut representative: HashMap<(bool, &BTreeMap<RawLabel, usize>), usize> =
                    HashMap::new();
                states
                    .iter()
                    .enumerate()
                    .map(|(index, state)| {
                        *representative
                            .entry((state.is_final, &state.arcs))
                            .or_insert(index)
                    })
                    .collect()
            };
            if replace.iter().enumerate().all(|(i, &r)| i == r) {
                break;
            }

            let mut renumber = vec![usize::MAX; states.len()];
            let mut kept = 0;
            for (index, &keep) in replace.iter().enumerate() {
                if keep == index {
                    renumber[index] = kept;
                    kept += 1;
                }
            }

            let old = std::mem::take(states);
            for (index, mut state) in old.into_iter().enumerate() {
                if replace[index] != index {
                    continue;
                }
                for target in state.arcs.values_mut() {
                    *target = renumber[replace[*target]];
                }
                states.push(state);
            }
        }
        trace!(before, after = states.len(), "minimized DFA");
    }
}
