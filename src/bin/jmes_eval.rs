//! Command-line evaluator for expression trees
//!
//! Loads a tagged JSON expression tree and evaluates it against a JSON
//! document read from a file or stdin.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use jmes_eval::{ExpressionNode, QueryEngine};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "jmes-eval")]
#[command(about = "Evaluate JMESPath expression trees against JSON documents")]
#[command(version)]
struct Cli {
    /// File containing the expression tree as tagged JSON
    #[arg(short, long, conflicts_with = "tree_json")]
    tree: Option<PathBuf>,

    /// Expression tree given inline as tagged JSON
    #[arg(long)]
    tree_json: Option<String>,

    /// JSON document to evaluate against (reads from stdin if not provided)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pretty: bool,

    /// List the available functions and exit
    #[arg(long)]
    list_functions: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let engine = QueryEngine::new();

    if cli.list_functions {
        let registry = engine.interpreter().function_registry();
        for name in registry.function_names() {
            if let Some(function) = registry.get(name) {
                println!("{}", function.signature());
            }
        }
        return Ok(());
    }

    let tree = load_tree(&cli)?;
    log::debug!("loaded tree with {} nodes", tree.node_count());

    let document = read_document(cli.input.as_ref())?;
    let result = engine
        .evaluate(&tree, &document)
        .context("evaluation failed")?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{output}");
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_tree(cli: &Cli) -> Result<ExpressionNode> {
    let text = match (&cli.tree, &cli.tree_json) {
        (Some(path), _) => fs::read_to_string(path)
            .with_context(|| format!("reading tree file '{}'", path.display()))?,
        (None, Some(inline)) => inline.clone(),
        (None, None) => bail!("an expression tree is required (--tree or --tree-json)"),
    };
    ExpressionNode::from_json_str(&text).context("invalid expression tree")
}

fn read_document(path: Option<&PathBuf>) -> Result<Value> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading input file '{}'", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading document from stdin")?;
            buffer
        }
    };
    serde_json::from_str(&text).context("parsing input document")
}
