//! Grammar visualization utilities
//!
//! Renders compiled grammars in DOT/Graphviz format: either the graph of
//! rule references, or the state machine of a single rule.

use pgen::grammar::Grammar;
use pgen::syntax::SymbolId;
use std::collections::BTreeSet;
use std::fmt::Write;

/// Generate a DOT/Graphviz representation of a grammar
///
/// Rules are ellipses, terminals are filled boxes. A solid edge means one
/// rule's automaton has an arc on another rule; a dashed edge leads to a
/// terminal the rule shifts directly.
///
/// # Example
///
/// ```rust,ignore
/// use pgen_tools::visualize::generate_dot;
///
/// let grammar = pgen::compile("sum: NUMBER ('+' NUMBER)*\n")?;
/// println!("{}", generate_dot(&grammar));
/// ```
#[must_use]
pub fn generate_dot(grammar: &Grammar) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "digraph Grammar {{");
    let _ = writeln!(output, "  rankdir=LR;");
    let _ = writeln!(output, "  node [shape=box];");
    let _ = writeln!(output);

    for name in grammar.rule_names() {
        let name = escape(name);
        let _ = writeln!(output, "  \"{name}\" [label=\"{name}\", shape=ellipse];");
    }

    let mut terminals = BTreeSet::new();
    let mut edges = Vec::new();
    for dfa in grammar.dfas() {
        let from = escape(grammar.symbol_name(dfa.symbol).unwrap_or("?"));
        let mut seen = BTreeSet::new();
        for arc in dfa.states.iter().flat_map(|state| &state.arcs) {
            if arc.label.is_accept() || !seen.insert(arc.label) {
                continue;
            }
            let Some(label) = grammar.label(arc.label) else {
                continue;
            };
            let to = escape(&grammar.label_name(arc.label));
            if label.is_terminal() {
                terminals.insert(to.clone());
                edges.push(format!("  \"{from}\" -> \"{to}\" [style=dashed];"));
            } else {
                edges.push(format!("  \"{from}\" -> \"{to}\";"));
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "  // Terminals");
    for terminal in &terminals {
        let _ = writeln!(
            output,
            "  \"{terminal}\" [label=\"{terminal}\", shape=box, style=filled, fillcolor=lightblue];"
        );
    }
    let _ = writeln!(output);
    for edge in edges {
        let _ = writeln!(output, "{edge}");
    }
    let _ = writeln!(output, "}}");
    output
}

/// Generate DOT for the automaton of one rule, or `None` if `symbol` is not a rule
#[must_use]
pub fn generate_dfa_dot(grammar: &Grammar, symbol: SymbolId) -> Option<String> {
    let dfa = grammar.dfa(symbol)?;
    let name = escape(grammar.symbol_name(symbol)?);

    let mut output = String::new();
    let _ = writeln!(output, "digraph \"{name}\" {{");
    let _ = writeln!(output, "  rankdir=LR;");
    let _ = writeln!(output, "  start [shape=point];");
    for (index, state) in dfa.states.iter().enumerate() {
        let shape = if state.is_accepting() {
            "doublecircle"
        } else {
            "circle"
        };
        let _ = writeln!(output, "  s{index} [label=\"{index}\", shape={shape}];");
    }
    let _ = writeln!(output, "  start -> s0;");
    for (index, state) in dfa.states.iter().enumerate() {
        for arc in state.arcs.iter().filter(|arc| !arc.label.is_accept()) {
            let label = escape(&grammar.label_name(arc.label));
            let _ = writeln!(output, "  s{index} -> s{} [label=\"{label}\"];", arc.target);
        }
    }
    let _ = writeln!(output, "}}");
    Some(output)
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_graph_edges() {
        let grammar = pgen::compile("expr: term ('+' term)*\nterm: NUMBER\n").unwrap();
        let dot = generate_dot(&grammar);
        assert!(dot.starts_with("digraph Grammar {"));
        assert!(dot.contains("\"expr\" -> \"term\";"));
        assert!(dot.contains("\"expr\" -> \"'+'\" [style=dashed];"));
        assert!(dot.contains("\"term\" -> \"NUMBER\" [style=dashed];"));
        assert_eq!(dot.matches("\"expr\" -> \"term\";").count(), 1);
    }

    #[test]
    fn test_rule_automaton() {
        let grammar = pgen::compile("sum: NUMBER ('+' NUMBER)*\n").unwrap();
        let dot = generate_dfa_dot(&grammar, grammar.start()).unwrap();
        assert!(dot.contains("s0 [label=\"0\", shape=circle];"));
        assert!(dot.contains("s0 -> s1 [label=\"NUMBER\"];"));
        assert!(dot.contains("shape=doublecircle"));
        assert!(generate_dfa_dot(&grammar, SymbolId::EMPTY).is_none());
    }

    #[test]
    fn test_quotes_are_escaped() {
        assert_eq!(escape("'\"'"), "'\\\"'");
    }
}
