//! CLI interface for pgen tools

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pgen")]
#[command(about = "Compile EBNF-style grammars and run the pushdown parser")]
#[command(version)]
pub struct Cli {
    /// Log compiler and parser steps at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a grammar and print its tables
    Compile {
        /// Grammar source file
        #[arg(short, long)]
        grammar: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: report, dump or json
        #[arg(short, long, default_value = "report")]
        format: TableFormat,

        /// Keep the unminimized rule automata
        #[arg(long)]
        no_minimize: bool,

        /// Start rule (default: the first rule in the file)
        #[arg(long)]
        start: Option<String>,
    },

    /// Parse a JSON token stream and print the tree
    Parse {
        /// Grammar source file, or the JSON tables written by `compile --format json`
        #[arg(short, long)]
        grammar: PathBuf,

        /// JSON array of tokens: `{"kind": "Name", "text": "x", "position": {"line": 1, "column": 0}}`
        #[arg(short, long)]
        tokens: PathBuf,

        /// Output format: sexpr, tree or json
        #[arg(short, long, default_value = "sexpr")]
        format: TreeFormat,

        /// Rule to parse (default: the grammar's start rule)
        #[arg(long)]
        start: Option<String>,
    },

    /// Render a grammar as a graph
    Viz {
        /// Grammar source file, or the JSON tables written by `compile --format json`
        #[arg(short, long)]
        grammar: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Draw the state machine of one rule instead of the rule graph
        #[arg(short, long)]
        rule: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableFormat {
    Report,
    Dump,
    Json,
}

impl std::str::FromStr for TableFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "report" | "tables" => Ok(Self::Report),
            "dump" | "automata" => Ok(Self::Dump),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {s}. Supported: report, dump, json")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeFormat {
    Sexpr,
    Tree,
    Json,
}

impl std::str::FromStr for TreeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sexpr" | "sexp" => Ok(Self::Sexpr),
            "tree" => Ok(Self::Tree),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {s}. Supported: sexpr, tree, json")),
        }
    }
}
