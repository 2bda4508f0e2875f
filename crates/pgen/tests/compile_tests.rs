//! Grammar compilation: accepted grammars, rejected grammars, error details

use pgen::error::diagnostics::format_error_with_context;
use pgen::error::{ErrorKind, GrammarError};
use pgen::grammar::{CompileConfig, GrammarCompiler, LabelId, compile};
use pgen::syntax::{LineCol, SymbolId, TokenKind};

#[test]
fn test_disjoint_alternatives_compile() {
    let grammar = compile("r: 'a' | 'b'\n").unwrap();
    let dfa = grammar.dfa(grammar.start()).unwrap();
    assert_eq!(dfa.first.len(), 2);
}

#[test]
fn test_ambiguous_alternatives_rejected() {
    let err = compile("start: a | b\na: 'x'\nb: 'x'\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Ambiguity);
    let GrammarError::Ambiguity {
        rule,
        terminal,
        first,
        second,
        ..
    } = &err
    else {
        panic!("expected an ambiguity error");
    };
    assert_eq!(rule, "start");
    assert_eq!(terminal, "'x'");
    assert_eq!(first, "a");
    assert_eq!(second, "b");
}

#[test]
fn test_terminal_against_rule_ambiguity() {
    let err = compile("start: NAME | call\ncall: NAME '(' ')'\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Ambiguity);
    assert!(err.to_string().contains("NAME"));
}

#[test]
fn test_left_recursion_rejected() {
    let err = compile("r: r 'x' | 'y'\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LeftRecursion);
    let GrammarError::LeftRecursion { rule, position } = err else {
        panic!("expected a left recursion error");
    };
    assert_eq!(rule, "r");
    assert_eq!(position, LineCol::new(1, 0));
}

#[test]
fn test_syntax_error_position() {
    let err = compile("a: NAME\nb: NAME | )\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GrammarSyntaxError);
    assert_eq!(err.position(), Some(LineCol::new(2, 10)));
}

#[test]
fn test_missing_colon() {
    let err = compile("a NAME\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GrammarSyntaxError);
    assert_eq!(err.position(), Some(LineCol::new(1, 2)));
    assert!(err.to_string().contains("expected ':'"));
}

#[test]
fn test_undefined_symbol_rendered_with_context() {
    let source = "expr: term ('+' term)*\nterm: NUMBER | '(' exp ')'\n";
    let err = compile(source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UndefinedSymbol);
    assert_eq!(err.position(), Some(LineCol::new(2, 19)));

    let rendered = format_error_with_context(&err, source);
    assert!(rendered.contains("2 | term: NUMBER | '(' exp ')'"));
    assert!(rendered.contains("did you mean `expr`?"));
}

#[test]
fn test_rules_spanning_lines() {
    let source = "\
# arithmetic
expr: term (
    '+' term
  | '-' term
)*
term: NUMBER
";
    let grammar = compile(source).unwrap();
    assert_eq!(grammar.rule_names().collect::<Vec<_>>(), vec!["expr", "term"]);
}

#[test]
fn test_label_zero_is_accept() {
    let grammar = compile("r: NAME\n").unwrap();
    let accept = grammar.label(LabelId::ACCEPT).unwrap();
    assert_eq!(accept.kind, SymbolId::EMPTY);
    assert_eq!(accept.literal, None);
}

#[test]
fn test_labels_are_interned_once() {
    let grammar = compile("a: NAME b NAME\nb: NAME ','\n").unwrap();
    let labels = grammar.labels();
    for (i, left) in labels.iter().enumerate() {
        for right in &labels[i + 1..] {
            assert_ne!(left, right);
        }
    }
    // accept, NAME, b, ','
    assert_eq!(labels.len(), 4);
}

#[test]
fn test_category_ids_are_fixed() {
    let grammar = compile("r: NAME NUMBER STRING CHAR OP\n").unwrap();
    for kind in [
        TokenKind::Name,
        TokenKind::Number,
        TokenKind::String,
        TokenKind::Char,
        TokenKind::Op,
    ] {
        assert_eq!(grammar.token_id(kind.name()), Some(kind.id()));
        assert!(grammar.token_label(kind).is_some());
    }
    assert!(grammar.token_label(TokenKind::EndMarker).is_none());
}

#[test]
fn test_first_set_is_reachable_in_one_shift() {
    let grammar = compile("stmt: expr ';' | 'pass'\nexpr: NAME | NUMBER\n").unwrap();
    let stmt = grammar.dfa(grammar.start()).unwrap();
    let names: Vec<String> = stmt.first.iter().map(|&l| grammar.label_name(l)).collect();
    assert_eq!(names.len(), 3);
    for expected in ["NAME", "NUMBER", "'pass'"] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }
}

#[test]
fn test_unminimized_grammar_interns_same_labels() {
    let source = "opt: 'a' ['b'] 'c' | 'd' ['b'] 'c'\n";
    let plain = GrammarCompiler::new(CompileConfig::default().with_minimize(false))
        .compile(source)
        .unwrap();
    let minimized = compile(source).unwrap();
    assert!(plain.dfas()[0].states.len() > minimized.dfas()[0].states.len());
    assert_eq!(plain.labels(), minimized.labels());
}
