//! # Tree Printing
//!
//! Renders a concrete syntax tree with symbol names taken from the grammar
//! that produced it:
//!
//! - [`to_sexpr`]: a single-line S-expression, convenient in tests
//! - [`to_tree_string`]: one node per line, indented by depth, with positions

use crate::grammar::Grammar;
use crate::syntax::Node;
use std::fmt::Write;

/// Render a tree as an S-expression.
///
/// Leaves print as `(KIND "text")`, rule nodes as `(rule child...)`.
///
/// ```rust,no_run
/// use pgen::grammar::compile;
/// use pgen::parser::{parse_tokens, ParserConfig};
/// use pgen::syntax::{pretty::to_sexpr, LineCol, Token, TokenKind};
///
/// let grammar = compile("one: NAME\n").unwrap();
/// let tokens = vec![Token::new(TokenKind::Name, "x", LineCol::default())];
/// let root = parse_tokens(&grammar, tokens, &ParserConfig::default()).unwrap();
/// assert_eq!(to_sexpr(&root, &grammar), r#"(one (NAME "x"))"#);
/// ```
#[must_use]
pub fn to_sexpr(node: &Node, grammar: &Grammar) -> String {
    let mut out = String::new();
    write_sexpr(&mut out, node, grammar);
    out
}

fn write_sexpr(out: &mut String, node: &Node, grammar: &Grammar) {
    let name = grammar.name_of(node.kind()).unwrap_or("?");
    if node.is_leaf() {
        let _ = write!(out, "({name} {:?})", node.text().unwrap_or_default());
        return;
    }
    let _ = write!(out, "({name}");
    for child in node.children() {
        out.push(' ');
        write_sexpr(out, child, grammar);
    }
    out.push(')');
}

/// Render a tree one node per line, indenting children by two spaces
#[must_use]
pub fn to_tree_string(node: &Node, grammar: &Grammar) -> String {
    let mut out = String::new();
    write_tree(&mut out, node, grammar, 0);
    out
}

fn write_tree(out: &mut String, node: &Node, grammar: &Grammar, depth: usize) {
    let indent = "  ".repeat(depth);
    let name = grammar.name_of(node.kind()).unwrap_or("?");
    match node.text() {
        Some(text) if node.is_leaf() => {
            let _ = writeln!(out, "{indent}{name} {text:?} @{}", node.position());
        }
        _ => {
            let _ = writeln!(out, "{indent}{name} @{}", node.position());
        }
    }
    for child in node.children() {
        write_tree(out, child, grammar, depth + 1);
    }
}
