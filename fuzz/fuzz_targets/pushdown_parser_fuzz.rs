#![no_main]
use libfuzzer_sys::fuzz_target;
use pgen::compile;
use pgen::parser::{ParserConfig, parse_tokens};
use pgen::syntax::{LineCol, Token, TokenKind};

const GRAMMAR: &str = "\
stmt: 'if' expr ':' stmt ['else' ':' stmt] | NAME ['=' expr]
expr: term (('+' | '-') term)*
term: NUMBER | STRING | NAME | '(' expr ')'
";

const OPS: [&str; 8] = ["+", "-", "(", ")", ":", "=", "*", ";"];
const NAMES: [&str; 4] = ["if", "else", "x", "y"];

fuzz_target!(|data: &[u8]| {
    let Ok(grammar) = compile(GRAMMAR) else {
        return;
    };

    // Each byte picks a token kind and text
    let tokens: Vec<Token> = data
        .iter()
        .enumerate()
        .map(|(i, &byte)| {
            let position = LineCol::new(1, u32::try_from(i).unwrap_or(u32::MAX));
            let pick = usize::from(byte >> 3);
            match byte & 7 {
                0 => Token::end_marker(position),
                1 | 2 => Token::new(TokenKind::Name, NAMES[pick % NAMES.len()], position),
                3 => Token::new(TokenKind::Number, pick.to_string(), position),
                4 => Token::new(TokenKind::String, "\"s\"", position),
                _ => Token::new(TokenKind::Op, OPS[pick % OPS.len()], position),
            }
        })
        .collect();

    // Parsing must never panic; a tree always spans a prefix of the input
    if let Ok(root) = parse_tokens(&grammar, tokens.clone(), &ParserConfig::default()) {
        let leaves = root.leaf_texts();
        assert!(leaves.len() <= tokens.len());
        for (leaf, token) in leaves.iter().zip(&tokens) {
            assert_eq!(*leaf, token.text.as_str());
        }
    }
});
