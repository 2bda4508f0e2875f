//! Subcommand implementations
//!
//! Each command is split into a pure function over source text, which the
//! tests drive directly, and the file handling in [`run`].

use crate::cli::{Commands, TableFormat, TreeFormat};
use crate::visualize::{generate_dfa_dot, generate_dot};
use pgen::error::diagnostics::format_error_with_context;
use pgen::error::{GrammarError, ParseError};
use pgen::grammar::{CompileConfig, Grammar, GrammarCompiler};
use pgen::parser::{Driver, ParserConfig};
use pgen::syntax::Token;
use pgen::syntax::pretty::{to_sexpr, to_tree_string};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A grammar error already rendered against its source
    #[error("{0}")]
    Grammar(String),

    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no rule named `{0}`")]
    UnknownRule(String),
}

impl ToolError {
    fn grammar(error: &GrammarError, source: &str) -> Self {
        Self::Grammar(format_error_with_context(error, source))
    }
}

/// Run one subcommand, writing its result to the requested destination
pub fn run(command: Commands) -> Result<(), ToolError> {
    match command {
        Commands::Compile {
            grammar,
            output,
            format,
            no_minimize,
            start,
        } => {
            let source = read(&grammar)?;
            let mut config = CompileConfig::default().with_minimize(!no_minimize);
            if let Some(start) = start {
                config = config.with_start(start);
            }
            let content = compile_tables(&source, &config, format)?;
            emit(output.as_deref(), &content)
        }
        Commands::Parse {
            grammar,
            tokens,
            format,
            start,
        } => {
            let source = read(&grammar)?;
            let stream = read(&tokens)?;
            let config = start.map(ParserConfig::with_start).unwrap_or_default();
            let content = parse_stream(&source, &stream, &config, format)?;
            emit(None, &content)
        }
        Commands::Viz {
            grammar,
            output,
            rule,
        } => {
            let source = read(&grammar)?;
            let content = render_graph(&source, rule.as_deref())?;
            emit(output.as_deref(), &content)
        }
    }
}

/// Compile `source` and render its tables in `format`
pub fn compile_tables(
    source: &str,
    config: &CompileConfig,
    format: TableFormat,
) -> Result<String, ToolError> {
    let compiler = GrammarCompiler::new(config.clone());
    if format == TableFormat::Dump {
        return compiler
            .dump(source)
            .map_err(|err| ToolError::grammar(&err, source));
    }
    let grammar = compiler
        .compile(source)
        .map_err(|err| ToolError::grammar(&err, source))?;
    match format {
        TableFormat::Json => Ok(serde_json::to_string_pretty(&grammar)?),
        _ => Ok(grammar.report()),
    }
}

/// Parse a JSON token array against a grammar given as source or compiled tables
pub fn parse_stream(
    source: &str,
    tokens: &str,
    config: &ParserConfig,
    format: TreeFormat,
) -> Result<String, ToolError> {
    let grammar = load(source)?;
    let tokens: Vec<Token> = serde_json::from_str(tokens)?;
    debug!(count = tokens.len(), "read token stream");

    let output = Driver::new(&grammar, config.clone()).parse(tokens)?;
    info!(
        shifts = output.stats.shifts,
        pushes = output.stats.pushes,
        max_depth = output.stats.max_depth,
        "parse complete"
    );
    match format {
        TreeFormat::Sexpr => Ok(format!("{}\n", to_sexpr(&output.root, &grammar))),
        TreeFormat::Tree => Ok(to_tree_string(&output.root, &grammar)),
        TreeFormat::Json => Ok(serde_json::to_string_pretty(&output.root)?),
    }
}

/// DOT for the rule graph, or for one rule's state machine
pub fn render_graph(source: &str, rule: Option<&str>) -> Result<String, ToolError> {
    let grammar = load(source)?;
    match rule {
        None => Ok(generate_dot(&grammar)),
        Some(name) => {
            let symbol = grammar
                .symbol_id(name)
                .ok_or_else(|| ToolError::UnknownRule(name.to_string()))?;
            generate_dfa_dot(&grammar, symbol).ok_or_else(|| ToolError::UnknownRule(name.to_string()))
        }
    }
}

/// Grammar from either source text or the JSON tables `compile --format json` writes
pub fn load(text: &str) -> Result<Grammar, ToolError> {
    if text.trim_start().starts_with('{') {
        let grammar: Grammar = serde_json::from_str(text)?;
        debug!(rules = grammar.dfas().len(), "loaded compiled grammar");
        return Ok(grammar);
    }
    pgen::compile(text).map_err(|err| ToolError::grammar(&err, text))
}

fn read(path: &Path) -> Result<String, ToolError> {
    fs::read_to_string(path).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn emit(output: Option<&Path>, content: &str) -> Result<(), ToolError> {
    match output {
        Some(path) => {
            fs::write(path, content).map_err(|source| ToolError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            info!(path = %path.display(), "wrote output");
        }
        None => print!("{content}"),
    }
    Ok(())
}
