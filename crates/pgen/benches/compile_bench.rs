use criterion::{Criterion, criterion_group, criterion_main};
use pgen::grammar::{CompileConfig, GrammarCompiler, compile};
use std::hint::black_box;

const EXPRESSIONS: &str = "\
expr: term (('+' | '-') term)*
term: factor (('*' | '/') factor)*
factor: NUMBER | '(' expr ')' | NAME ['(' [expr (',' expr)*] ')']
";

const STATEMENTS: &str = "\
file: stmt* ENDMARKER
stmt: simple ';' | compound
simple: 'pass' | 'return' [test] | NAME ['=' test]
compound: (
    'if' test ':' suite ('elif' test ':' suite)* ['else' ':' suite]
  | 'while' test ':' suite
)
suite: simple ';' | '{' stmt+ '}'
test: NUMBER | STRING | '(' test ')'
";

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile_expressions", |b| {
        b.iter(|| black_box(compile(black_box(EXPRESSIONS))));
    });

    c.bench_function("compile_statements", |b| {
        b.iter(|| black_box(compile(black_box(STATEMENTS))));
    });
}

fn bench_minimization(c: &mut Criterion) {
    let plain = GrammarCompiler::new(CompileConfig::default().with_minimize(false));
    let minimizing = GrammarCompiler::new(CompileConfig::default());

    c.bench_function("build_automata_unminimized", |b| {
        b.iter(|| black_box(plain.build_automata(black_box(STATEMENTS))));
    });

    c.bench_function("build_automata_minimized", |b| {
        b.iter(|| black_box(minimizing.build_automata(black_box(STATEMENTS))));
    });
}

criterion_group!(benches, bench_compile, bench_minimization);
criterion_main!(benches);
