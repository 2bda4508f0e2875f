//! FIRST set computation with left recursion and ambiguity checks

use crate::error::GrammarError;
use crate::grammar::dfa::{DfaState, RuleDfa};
use crate::grammar::nfa::RawLabel;
use hashbrown::HashMap;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
enum Slot {
    InProgress,
    Done(BTreeSet<RawLabel>),
}

/// Computes the terminal labels that can begin each rule.
///
/// Only the arcs leaving a rule's start state are inspected; nonterminal
/// arcs contribute their own FIRST sets recursively.
pub struct FirstSetResolver<'a> {
    dfas: &'a [RuleDfa],
    by_name: HashMap<&'a str, usize>,
    slots: Vec<Option<Slot>>,
}

impl<'a> FirstSetResolver<'a> {
    #[must_use]
    pub fn new(dfas: &'a [RuleDfa]) -> Self {
        let by_name = dfas
            .iter()
            .enumerate()
            .map(|(index, dfa)| (dfa.name.as_str(), index))
            .collect();
        Self {
            dfas,
            by_name,
            slots: vec![None; dfas.len()],
        }
    }

    /// FIRST sets for every rule, in the order the rules were given.
    ///
    /// Fails on the first left-recursive or ambiguous rule found, visiting
    /// rules in name order so the reported rule does not depend on layout.
    pub fn resolve(mut self) -> Result<Vec<BTreeSet<RawLabel>>, GrammarError> {
        let mut order: Vec<usize> = (0..self.dfas.len()).collect();
        order.sort_by(|&a, &b| self.dfas[a].name.cmp(&self.dfas[b].name));

        for &index in &order {
            if self.slots[index].is_none() {
                self.first_set(index)?;
            }
        }

        let firsts: Vec<BTreeSet<RawLabel>> = self
            .slots
            .into_iter()
            .map(|slot| match slot {
                Some(Slot::Done(set)) => set,
                _ => BTreeSet::new(),
            })
            .collect();

        for &index in &order {
            let dfa = &self.dfas[index];
            for state in dfa.states.iter().skip(1) {
                Self::check_overlap(dfa, state, |name| {
                    self.by_name.get(name).map(|&i| &firsts[i])
                })?;
            }
        }
        Ok(firsts)
    }

    /// Depth-first over the rules reachable from `root` through start-state arcs.
    ///
    /// Rules on the work stack are in progress; meeting one again is left recursion.
    fn first_set(&mut self, root: usize) -> Result<(), GrammarError> {
        let dfas = self.dfas;
        self.slots[root] = Some(Slot::InProgress);
        let mut stack = vec![root];

        while let Some(&index) = stack.last() {
            let dfa = &dfas[index];
            let mut pending = None;
            for label in dfa.states[0].arcs.keys() {
                let RawLabel::Name(name) = label else {
                    continue;
                };
                let Some(&child) = self.by_name.get(name.as_str()) else {
                    continue;
                };
                match &self.slots[child] {
                    Some(Slot::InProgress) => {
                        return Err(GrammarError::LeftRecursion {
                            rule: dfa.name.to_string(),
                            position: dfa.position,
                        });
                    }
                    Some(Slot::Done(_)) => {}
                    None => {
                        pending = Some(child);
                        break;
                    }
                }
            }
            if let Some(child) = pending {
                self.slots[child] = Some(Slot::InProgress);
                stack.push(child);
                continue;
            }

            let total = self.finish(dfa)?;
            self.slots[index] = Some(Slot::Done(total));
            stack.pop();
        }
        Ok(())
    }

    /// Union the start-state arcs of a rule whose nested rules are all done
    fn finish(&self, dfa: &RuleDfa) -> Result<BTreeSet<RawLabel>, GrammarError> {
        let done = |name: &str| match self.by_name.get(name).map(|&i| &self.slots[i]) {
            Some(Some(Slot::Done(set))) => Some(set),
            _ => None,
        };
        Self::check_overlap(dfa, &dfa.states[0], done)?;

        let mut total = BTreeSet::new();
        for label in dfa.states[0].arcs.keys() {
            let nested = match label {
                RawLabel::Name(name) => done(name.as_str()),
                RawLabel::Literal(_) => None,
            };
            match nested {
                Some(set) => total.extend(set.iter().cloned()),
                None => {
                    total.insert(label.clone());
                }
            }
        }
        Ok(total)
    }

    /// No terminal may be reachable through two different arcs of one state
    fn check_overlap<'s>(
        dfa: &RuleDfa,
        state: &'s DfaState,
        first_of: impl Fn(&str) -> Option<&'s BTreeSet<RawLabel>>,
    ) -> Result<(), GrammarError> {
        let mut inverse: HashMap<&RawLabel, &RawLabel> = HashMap::new();
        for label in state.arcs.keys() {
            let nested = match label {
                RawLabel::Name(name) => first_of(name.as_str()),
                RawLabel::Literal(_) => None,
            };
            let contributed: Vec<&RawLabel> = match nested {
                Some(set) => set.iter().collect(),
                None => vec![label],
            };
            for terminal in contributed {
                if let Some(previous) = inverse.insert(terminal, label) {
                    return Err(GrammarError::Ambiguity {
                        rule: dfa.name.to_string(),
                        terminal: terminal.to_string(),
                        first: previous.to_string(),
                        second: label.to_string(),
                        position: dfa.position,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::grammar::dfa::AutomatonBuilder;
    use crate::grammar::rule_parser::RuleSyntaxParser;

    fn dfas(source: &str) -> Vec<RuleDfa> {
        RuleSyntaxParser::new(source)
            .unwrap()
            .parse_grammar()
            .unwrap()
            .into_iter()
            .map(|rule| {
                let mut states = AutomatonBuilder::build(&rule.nfa, rule.fragment);
                AutomatonBuilder::minimize(&mut states);
                RuleDfa {
                    name: rule.name,
                    position: rule.position,
                    states,
                }
            })
            .collect()
    }

    fn names(set: &BTreeSet<RawLabel>) -> Vec<String> {
        set.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_first_sets_follow_nonterminals() {
        let dfas = dfas("start: expr end\nexpr: term ('+' term)*\nterm: NUMBER | '(' expr ')'\nend: ';'\n");
        let firsts = FirstSetResolver::new(&dfas).resolve().unwrap();
        assert_eq!(names(&firsts[0]), vec!["NUMBER", "'('"]);
        assert_eq!(names(&firsts[1]), vec!["NUMBER", "'('"]);
    }

    #[test]
    fn test_disjoint_alternatives_compile() {
        let dfas = dfas("r: 'a' | 'b'\n");
        let firsts = FirstSetResolver::new(&dfas).resolve().unwrap();
        assert_eq!(firsts[0].len(), 2);
    }

    #[test]
    fn test_direct_left_recursion() {
        let dfas = dfas("r: r 'x' | 'y'\n");
        let err = FirstSetResolver::new(&dfas).resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LeftRecursion);
        assert!(err.to_string().contains("`r`"));
    }

    #[test]
    fn test_indirect_left_recursion() {
        let dfas = dfas("a: b 'x'\nb: a 'y' | 'z'\n");
        let err = FirstSetResolver::new(&dfas).resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LeftRecursion);
    }

    #[test]
    fn test_ambiguity_between_rules() {
        let dfas = dfas("start: a | b\na: 'x'\nb: 'x'\n");
        let err = FirstSetResolver::new(&dfas).resolve().unwrap_err();
        let GrammarError::Ambiguity {
            rule,
            terminal,
            first,
            second,
            ..
        } = err
        else {
            panic!("expected an ambiguity error");
        };
        assert_eq!(rule, "start");
        assert_eq!(terminal, "'x'");
        assert_eq!((first.as_str(), second.as_str()), ("a", "b"));
    }

    #[test]
    fn test_ambiguity_after_start_state() {
        let dfas = dfas("start: 'k' (a | 'x')\na: 'x' 'y'\n");
        let err = FirstSetResolver::new(&dfas).resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Ambiguity);
    }

    #[test]
    fn test_long_rule_chain_resolves() {
        let length = 5_000;
        let mut source: String = (0..length).map(|i| format!("r{i}: r{}\n", i + 1)).collect();
        source.push_str(&format!("r{length}: NAME\n"));
        let dfas = dfas(&source);
        let firsts = FirstSetResolver::new(&dfas).resolve().unwrap();
        assert!(firsts.iter().all(|set| names(set) == ["NAME"]));
    }

    #[test]
    fn test_long_cycle_is_left_recursion() {
        let length = 5_000;
        let source: String = (0..length)
            .map(|i| format!("r{i}: r{} 'x'\n", (i + 1) % length))
            .collect();
        let err = FirstSetResolver::new(&dfas(&source)).resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LeftRecursion);
    }
}
