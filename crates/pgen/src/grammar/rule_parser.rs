//! Recursive descent over grammar source, building one NFA per rule
//!
//! ```text
//! file  := (rule | NEWLINE)* ENDMARKER
//! rule  := NAME ':' rhs NEWLINE
//! rhs   := alt ('|' alt)*
//! alt   := item+
//! item  := '[' rhs ']' | atom ('+' | '*')?
//! atom  := '(' rhs ')' | NAME | STRING
//! ```

use crate::error::GrammarError;
use crate::grammar::lexer::{MetaKind, MetaToken, tokenize};
use crate::grammar::nfa::{Fragment, Nfa, RawLabel};
use crate::syntax::LineCol;
use compact_str::CompactString;
use hashbrown::HashSet;

/// One parsed rule: its NFA and the names its body mentions
#[derive(Debug, Clone)]
pub struct RuleSource {
    pub name: CompactString,
    pub position: LineCol,
    pub nfa: Nfa,
    pub fragment: Fragment,
    /// Every bare name used in the body, with where it was used
    pub references: Vec<(CompactString, LineCol)>,
}

pub struct RuleSyntaxParser {
    tokens: Vec<MetaToken>,
    pos: usize,
}

impl RuleSyntaxParser {
    pub fn new(source: &str) -> Result<Self, GrammarError> {
        Ok(Self {
            tokens: tokenize(source)?,
            pos: 0,
        })
    }

    /// Parse every rule in declaration order
    pub fn parse_grammar(mut self) -> Result<Vec<RuleSource>, GrammarError> {
        let mut rules = Vec::new();
        let mut seen = HashSet::new();
        while self.current().kind != MetaKind::EndMarker {
            if self.current().kind == MetaKind::Newline {
                self.advance();
                continue;
            }
            let rule = self.parse_rule()?;
            if !seen.insert(rule.name.clone()) {
                return Err(GrammarError::syntax(
                    format!("rule `{}` is defined more than once", rule.name),
                    rule.position,
                ));
            }
            rules.push(rule);
        }
        Ok(rules)
    }

    fn parse_rule(&mut self) -> Result<RuleSource, GrammarError> {
        let head = self.expect(MetaKind::Name, None)?;
        self.expect(MetaKind::Op, Some(":"))?;

        let mut builder = RuleBuilder::default();
        let fragment = builder.rhs(self)?;
        self.expect(MetaKind::Newline, None)?;

        Ok(RuleSource {
            name: head.text,
            position: head.position,
            nfa: builder.nfa,
            fragment,
            references: builder.references,
        })
    }

    fn current(&self) -> &MetaToken {
        // tokenize always ends with ENDMARKER and we never advance past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> MetaToken {
        let token = self.current().clone();
        if token.kind != MetaKind::EndMarker {
            self.pos += 1;
        }
        token
    }

    fn at_op(&self, op: &str) -> bool {
        self.current().is_op(op)
    }

    fn expect(&mut self, kind: MetaKind, text: Option<&str>) -> Result<MetaToken, GrammarError> {
        let token = self.current();
        let matches = token.kind == kind && text.is_none_or(|t| token.text == t);
        if !matches {
            let wanted = match text {
                Some(t) => format!("'{t}'"),
                None => kind.to_string(),
            };
            let found = match token.kind {
                MetaKind::Newline | MetaKind::EndMarker => token.kind.to_string(),
                _ => format!("{:?}", token.text.as_str()),
            };
            return Err(GrammarError::syntax(
                format!("expected {wanted}, found {found}"),
                token.position,
            ));
        }
        Ok(self.advance())
    }
}

/// Deepest `(...)`/`[...]` nesting accepted in one rule
pub const MAX_NESTING: usize = 200;

#[derive(Default)]
struct RuleBuilder {
    nfa: Nfa,
    references: Vec<(CompactString, LineCol)>,
    depth: usize,
}

impl RuleBuilder {
    fn rhs(&mut self, p: &mut RuleSyntaxParser) -> Result<Fragment, GrammarError> {
        if self.depth == MAX_NESTING {
            return Err(GrammarError::syntax(
                format!("groups nested more than {MAX_NESTING} deep"),
                p.current().position,
            ));
        }
        self.depth += 1;
        let fragment = self.alternatives(p);
        self.depth -= 1;
        fragment
    }

    fn alternatives(&mut self, p: &mut RuleSyntaxParser) -> Result<Fragment, GrammarError> {
        let first = self.alt(p)?;
        if !p.at_op("|") {
            return Ok(first);
        }
        let start = self.nfa.add_state();
        let accept = self.nfa.add_state();
        self.join(start, accept, first);
        while p.at_op("|") {
            p.advance();
            let next = self.alt(p)?;
            self.join(start, accept, next);
        }
        Ok(Fragment { start, accept })
    }

    fn join(&mut self, start: usize, accept: usize, branch: Fragment) {
        self.nfa.add_arc(start, branch.start, None);
        self.nfa.add_arc(branch.accept, accept, None);
    }

    fn alt(&mut self, p: &mut RuleSyntaxParser) -> Result<Fragment, GrammarError> {
        let mut fragment = self.item(p)?;
        while Self::starts_item(p.current()) {
            let next = self.item(p)?;
            self.nfa.add_arc(fragment.accept, next.start, None);
            fragment.accept = next.accept;
        }
        Ok(fragment)
    }

    fn starts_item(token: &MetaToken) -> bool {
        matches!(token.kind, MetaKind::Name | MetaKind::String)
            || token.is_op("(")
            || token.is_op("[")
    }

    fn item(&mut self, p: &mut RuleSyntaxParser) -> Result<Fragment, GrammarError> {
        if p.at_op("[") {
            p.advance();
            let body = self.rhs(p)?;
            p.expect(MetaKind::Op, Some("]"))?;
            self.nfa.add_arc(body.start, body.accept, None);
            return Ok(body);
        }

        let atom = self.atom(p)?;
        if p.at_op("+") {
            p.advance();
            self.nfa.add_arc(atom.accept, atom.start, None);
            Ok(atom)
        } else if p.at_op("*") {
            p.advance();
            self.nfa.add_arc(atom.accept, atom.start, None);
            Ok(Fragment {
                start: atom.start,
                accept: atom.start,
            })
        } else {
            Ok(atom)
        }
    }

    fn atom(&mut self, p: &mut RuleSyntaxParser) -> Result<Fragment, GrammarError> {
        let token = p.current().clone();
        let label = match token.kind {
            MetaKind::Op if token.text == "(" => {
                p.advance();
                let body = self.rhs(p)?;
                p.expect(MetaKind::Op, Some(")"))?;
                return Ok(body);
            }
            MetaKind::Name => {
                self.references.push((token.text.clone(), token.position));
                RawLabel::Name(token.text)
            }
            MetaKind::String => RawLabel::Literal(token.text),
            _ => {
                return Err(GrammarError::syntax(
                    format!("expected '(', NAME or STRING, found {:?}", token.text.as_str()),
                    token.position,
                ));
            }
        };
        p.advance();
        let start = self.nfa.add_state();
        let accept = self.nfa.add_state();
        self.nfa.add_arc(start, accept, Some(label));
        Ok(Fragment { start, accept })
    }
}
