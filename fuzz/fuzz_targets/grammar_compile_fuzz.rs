#![no_main]
use libfuzzer_sys::fuzz_target;
use pgen::grammar::{CompileConfig, GrammarCompiler};

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    // Compiling arbitrary text must either succeed or return an error
    let minimized = GrammarCompiler::default().compile(source);
    let plain = GrammarCompiler::new(CompileConfig::default().with_minimize(false)).compile(source);

    // Minimization never changes whether a grammar is accepted
    assert_eq!(minimized.is_ok(), plain.is_ok());
    if let Ok(grammar) = minimized {
        assert!(grammar.labels()[0].literal.is_none());
        let _ = grammar.report();
    }
});
