use criterion::{Criterion, criterion_group, criterion_main};
use pgen::grammar::{Grammar, compile};
use pgen::parser::{Driver, ParserConfig, PushdownParser};
use pgen::syntax::{LineCol, Token, TokenKind};
use pgen::testing::{GeneratorConfig, SentenceGenerator};
use std::hint::black_box;

fn setup_grammar() -> Grammar {
    compile(
        "expr: term (('+' | '-') term)*\n\
         term: factor (('*' | '/') factor)*\n\
         factor: NUMBER | '(' expr ')'\n",
    )
    .unwrap()
}

fn create_tokens(expr: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut column = 0;
    for ch in expr.chars() {
        let kind = if ch.is_ascii_digit() {
            TokenKind::Number
        } else {
            TokenKind::Op
        };
        tokens.push(Token::new(kind, ch.to_string(), LineCol::new(1, column)));
        column += 1;
    }
    tokens.push(Token::end_marker(LineCol::new(1, column)));
    tokens
}

fn bench_full_parse(c: &mut Criterion) {
    let grammar = setup_grammar();
    let config = ParserConfig::default();
    let tokens = create_tokens("1+2*3+4*5");

    c.bench_function("full_parse_small", |b| {
        b.iter(|| {
            let driver = Driver::new(&grammar, config.clone());
            black_box(driver.parse(black_box(tokens.clone())))
        });
    });
}

fn bench_nested_parse(c: &mut Criterion) {
    let grammar = setup_grammar();
    let config = ParserConfig::default();
    let expr = format!("{}1{}", "(".repeat(64), ")".repeat(64));
    let tokens = create_tokens(&expr);

    c.bench_function("full_parse_nested_64", |b| {
        b.iter(|| {
            let driver = Driver::new(&grammar, config.clone());
            black_box(driver.parse(black_box(tokens.clone())))
        });
    });
}

fn bench_feed(c: &mut Criterion) {
    let grammar = setup_grammar();
    let generator = SentenceGenerator::new(
        &grammar,
        GeneratorConfig {
            max_depth: 8,
            max_tokens: 512,
            seed: Some(42),
        },
    );
    let tokens = generator.generate();

    c.bench_function("feed_generated_sentence", |b| {
        b.iter(|| {
            let mut parser = PushdownParser::new(&grammar);
            for token in &tokens {
                if black_box(parser.feed(token.clone())).is_err() {
                    break;
                }
            }
        });
    });
}

criterion_group!(benches, bench_full_parse, bench_nested_parse, bench_feed);
criterion_main!(benches);
