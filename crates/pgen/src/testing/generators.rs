//! # Sentence Generators
//!
//! Random walks over a compiled grammar's DFAs that produce token streams
//! the grammar accepts. Used by the property tests and the parser benches.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pgen::testing::{GeneratorConfig, SentenceGenerator};
//!
//! let generator = SentenceGenerator::new(&grammar, GeneratorConfig::default());
//! for seed in 0..100 {
//!     let tokens = generator.generate_with_seed(seed);
//!     parse_tokens(&grammar, tokens, &ParserConfig::default()).unwrap();
//! }
//! ```
//!
//! Every rule entered below the start rule produces at least one token,
//! since the parser can only enter a rule on a token from its FIRST set.
//! Grammars whose repetitions are followed by a token the repetition could
//! also start with are not LL(1) in that position; sentences generated for
//! them may still be rejected by the parser.

use crate::grammar::{Grammar, LabelId, Transition};
use crate::syntax::{LineCol, SymbolId, Token, TokenKind};
use compact_str::CompactString;

/// Configuration for grammar-based input generation
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Rule nesting depth after which the walk heads for the nearest exit
    pub max_depth: usize,
    /// Token count after which the walk heads for the nearest exit
    pub max_tokens: usize,
    /// Seed for reproducible generation
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_tokens: 64,
            seed: None,
        }
    }
}

const UNREACHABLE: usize = usize::MAX;

/// Generator of token streams accepted by a grammar
pub struct SentenceGenerator<'g> {
    grammar: &'g Grammar,
    config: GeneratorConfig,
    /// Fewest tokens that finish a rule from each of its states
    finish_cost: Vec<Vec<usize>>,
    /// Fewest tokens a rule can derive when at least one is required
    nonempty_cost: Vec<usize>,
}

impl<'g> SentenceGenerator<'g> {
    #[must_use]
    pub fn new(grammar: &'g Grammar, config: GeneratorConfig) -> Self {
        let mut generator = Self {
            grammar,
            config,
            finish_cost: grammar
                .dfas()
                .iter()
                .map(|dfa| vec![UNREACHABLE; dfa.states.len()])
                .collect(),
            nonempty_cost: vec![UNREACHABLE; grammar.dfas().len()],
        };
        generator.compute_costs();
        generator
    }

    /// Iterate cost estimates until they stop shrinking
    fn compute_costs(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            for (rule, dfa) in self.grammar.dfas().iter().enumerate() {
                for (index, state) in dfa.states.iter().enumerate() {
                    let mut best = if state.is_accepting() { 0 } else { UNREACHABLE };
                    for arc in &state.arcs {
                        best = best.min(self.path_cost(rule, arc));
                    }
                    if best < self.finish_cost[rule][index] {
                        self.finish_cost[rule][index] = best;
                        changed = true;
                    }
                }
                let nonempty = dfa.states.first().map_or(UNREACHABLE, |state| {
                    state
                        .arcs
                        .iter()
                        .map(|arc| self.path_cost(rule, arc))
                        .min()
                        .unwrap_or(UNREACHABLE)
                });
                if nonempty < self.nonempty_cost[rule] {
                    self.nonempty_cost[rule] = nonempty;
                    changed = true;
                }
            }
        }
    }

    /// Tokens spent taking `arc` and then finishing the rule
    fn path_cost(&self, rule: usize, arc: &Transition) -> usize {
        if arc.label.is_accept() {
            return UNREACHABLE;
        }
        let arc_cost = match self.grammar.label(arc.label) {
            Some(label) if label.is_terminal() => 1,
            Some(label) => label
                .kind
                .rule_index()
                .map_or(UNREACHABLE, |sub| self.nonempty_cost[sub]),
            None => UNREACHABLE,
        };
        let rest = self.finish_cost[rule][arc.target];
        if arc_cost == UNREACHABLE || rest == UNREACHABLE {
            UNREACHABLE
        } else {
            arc_cost + rest
        }
    }

    /// Generate a token stream using the configured seed
    #[must_use]
    pub fn generate(&self) -> Vec<Token> {
        let rng = self
            .config
            .seed
            .map_or_else(SimpleRng::new, SimpleRng::with_seed);
        self.generate_with(rng)
    }

    #[must_use]
    pub fn generate_with_seed(&self, seed: u64) -> Vec<Token> {
        self.generate_with(SimpleRng::with_seed(seed))
    }

    fn generate_with(&self, mut rng: SimpleRng) -> Vec<Token> {
        let mut walk = Walk {
            tokens: Vec::new(),
            column: 0,
            rng: &mut rng,
        };
        self.walk_rule(self.grammar.start(), 0, &mut walk);

        if self.grammar.token_label(TokenKind::EndMarker).is_none() {
            let end = LineCol::new(1, walk.column);
            walk.tokens.push(Token::end_marker(end));
        }
        walk.tokens
    }

    fn walk_rule(&self, symbol: SymbolId, depth: usize, walk: &mut Walk<'_>) {
        let Some(rule) = symbol.rule_index() else {
            return;
        };
        let Some(dfa) = self.grammar.dfa(symbol) else {
            return;
        };
        let mut state = 0;
        let mut emitted = false;

        loop {
            let arcs = &dfa.states[state].arcs;
            let may_stop = (emitted || depth == 0) && dfa.states[state].is_accepting();
            let moves: Vec<&Transition> = arcs
                .iter()
                .filter(|arc| self.path_cost(rule, arc) != UNREACHABLE)
                .collect();

            let frugal = depth >= self.config.max_depth || walk.tokens.len() >= self.config.max_tokens;
            let chosen = if frugal {
                if may_stop {
                    None
                } else {
                    moves.iter().min_by_key(|arc| self.path_cost(rule, arc)).copied()
                }
            } else {
                let options = moves.len() + usize::from(may_stop);
                if options == 0 {
                    None
                } else {
                    let pick = (walk.rng.next_u64() % options as u64) as usize;
                    moves.get(pick).copied()
                }
            };

            let Some(arc) = chosen else {
                return;
            };
            match self.grammar.label(arc.label) {
                Some(label) if label.is_terminal() => walk.emit(self.token_for(arc.label)),
                Some(label) => self.walk_rule(label.kind, depth + 1, walk),
                None => return,
            }
            emitted = true;
            state = arc.target;
        }
    }

    /// A token the grammar classifies to exactly `label`
    fn token_for(&self, label: LabelId) -> (TokenKind, CompactString) {
        let Some(label) = self.grammar.label(label) else {
            return (TokenKind::EndMarker, CompactString::default());
        };
        if let Some(text) = &label.literal {
            return (TokenKind::of_literal(text), text.clone());
        }
        let kind = TokenKind::from_id(label.kind).unwrap_or(TokenKind::Name);
        let mut text = CompactString::from(match kind {
            TokenKind::EndMarker => return (kind, CompactString::default()),
            TokenKind::Name => "ident",
            TokenKind::Number => "42",
            TokenKind::String => "\"text\"",
            TokenKind::Char => "'c'",
            TokenKind::Op => "@",
        });
        while self.grammar.keyword_label(&text).is_some() {
            let last = text.chars().last().unwrap_or('_');
            text.push(last);
        }
        (kind, text)
    }
}

struct Walk<'r> {
    tokens: Vec<Token>,
    column: u32,
    rng: &'r mut SimpleRng,
}

impl Walk<'_> {
    fn emit(&mut self, (kind, text): (TokenKind, CompactString)) {
        let width = u32::try_from(text.len()).unwrap_or(u32::MAX);
        self.tokens.push(Token::new(kind, text, LineCol::new(1, self.column)));
        self.column = self.column.saturating_add(width + 1);
    }
}

/// Simple RNG for deterministic testing
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: 0x853c_49e6_748f_ea9b,
        }
    }

    /// A zero seed would stay zero forever, so it is replaced by the default state
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        if seed == 0 {
            Self::new()
        } else {
            Self { state: seed }
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        // XorShift algorithm
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::compile;
    use crate::parser::{ParserConfig, parse_tokens};

    #[test]
    fn test_rng_determinism() {
        let mut rng1 = SimpleRng::with_seed(12345);
        let mut rng2 = SimpleRng::with_seed(12345);
        assert_eq!(rng1.next_u64(), rng2.next_u64());
        assert_eq!(rng1.next_u64(), rng2.next_u64());
        assert_ne!(SimpleRng::with_seed(0).next_u64(), 0);
    }

    #[test]
    fn test_generated_sums_parse() {
        let grammar = compile("sum: NUMBER ('+' NUMBER)*\n").unwrap();
        let generator = SentenceGenerator::new(&grammar, GeneratorConfig::default());
        for seed in 1..50 {
            let tokens = generator.generate_with_seed(seed);
            assert!(tokens.last().unwrap().is_end_marker());
            parse_tokens(&grammar, tokens, &ParserConfig::default()).unwrap();
        }
    }

    #[test]
    fn test_token_budget_bounds_recursion() {
        let grammar = compile("expr: term ('+' term)*\nterm: NUMBER | '(' expr ')'\n").unwrap();
        let config = GeneratorConfig {
            max_depth: 4,
            max_tokens: 16,
            seed: Some(7),
        };
        let generator = SentenceGenerator::new(&grammar, config);
        let tokens = generator.generate();
        assert!(tokens.len() < 200);
        parse_tokens(&grammar, tokens, &ParserConfig::default()).unwrap();
    }

    #[test]
    fn test_category_text_avoids_keywords() {
        let grammar = compile("stmt: 'ident' | NAME\n").unwrap();
        let generator = SentenceGenerator::new(&grammar, GeneratorConfig::default());
        let name = grammar.token_label(TokenKind::Name).unwrap();
        let (kind, text) = generator.token_for(name);
        assert_eq!(kind, TokenKind::Name);
        assert_eq!(text, "identt");
    }
}
