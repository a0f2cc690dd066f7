//! # Corpus Cite CLI (`cite`)
//!
//! Builds the corpus index once, runs a single read-only command against
//! it, and exits.
//!
//! ## Usage
//!
//! ```bash
//! cite [--config ./config/cite.toml] [--root ./corpus] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cite search "<query>"` | Scored, windowed search |
//! | `cite get <path>` | Print a file by relative path |
//! | `cite example <name>` | Print an example by base name |
//! | `cite keyword <term>` | List files using a vocabulary keyword |
//! | `cite cite <path> <start> <end>` | Produce a verified citation |
//! | `cite stats` | Index counts |
//! | `cite tools list` | List the JSON tool surface |
//! | `cite tools call <name>` | Invoke a tool with JSON parameters |

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use corpus_cite::config::{self, Config};
use corpus_cite::index::CorpusIndex;
use corpus_cite::search::{Scope, SearchOptions};
use corpus_cite::tools::{ToolContext, ToolRegistry};
use corpus_cite::{citation, get, search, stats};

const DEFAULT_CONFIG: &str = "./config/cite.toml";

/// Corpus Cite: search a reference corpus and cite exact line ranges.
#[derive(Parser)]
#[command(name = "cite", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/cite.toml` when present; otherwise built-in
    /// defaults are used.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Corpus root directory. Overrides `[corpus].root`.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` wins.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the corpus.
    Search {
        /// The search query string.
        query: String,

        /// `docs`, `examples`, `docs_and_examples`, or `all`.
        #[arg(long, default_value = "all")]
        scope: Scope,

        /// Maximum number of results (1-25).
        #[arg(long)]
        limit: Option<usize>,

        /// Restrict to relative paths matching a glob. Repeatable.
        #[arg(long = "glob")]
        globs: Vec<String>,
    },

    /// Print a file by its path relative to the corpus root.
    Get {
        path: String,
    },

    /// Print an example file by base name (no extension).
    Example {
        name: String,
    },

    /// List files that use a vocabulary keyword.
    Keyword {
        keyword: String,
    },

    /// Produce a verified citation for a line range.
    Cite {
        path: String,
        line_start: usize,
        line_end: usize,

        /// Why this excerpt supports the claim.
        #[arg(long)]
        reason: Option<String>,
    },

    /// Show index statistics.
    Stats,

    /// Inspect and call the JSON tool surface.
    Tools {
        #[command(subcommand)]
        action: ToolsAction,
    },
}

#[derive(Subcommand)]
enum ToolsAction {
    /// List registered tools with their parameter schemas.
    List,
    /// Call a tool and print its JSON result.
    Call {
        name: String,

        /// Tool parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG);
            if default_path.exists() {
                config::load_config(&default_path)?
            } else {
                Config::default()
            }
        }
    };
    if let Some(root) = &cli.root {
        cfg.corpus.root = root.clone();
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = resolve_config(&cli)?;

    if let Commands::Tools {
        action: ToolsAction::List,
    } = &cli.command
    {
        let tools = ToolRegistry::with_builtins();
        println!("{}", serde_json::to_string_pretty(&tools.list())?);
        return Ok(());
    }

    // Refuse to answer anything from a missing corpus.
    let index = CorpusIndex::initialize(&cfg)
        .with_context(|| format!("Failed to build index for {}", cfg.corpus.root.display()))?;

    match cli.command {
        Commands::Search {
            query,
            scope,
            limit,
            globs,
        } => {
            let opts = SearchOptions {
                max_results: limit.unwrap_or(cfg.search.default_limit),
                scope,
                file_globs: globs,
            };
            search::run_search(&index, &query, &opts)?;
        }
        Commands::Get { path } => {
            get::run_get(&index, &path)?;
        }
        Commands::Example { name } => {
            get::run_example(&index, &name)?;
        }
        Commands::Keyword { keyword } => {
            get::run_keyword(&index, &keyword)?;
        }
        Commands::Cite {
            path,
            line_start,
            line_end,
            reason,
        } => {
            citation::run_cite(&index, &path, line_start, line_end, reason.as_deref())?;
        }
        Commands::Stats => {
            stats::run_stats(&index)?;
        }
        Commands::Tools { action } => match action {
            ToolsAction::Call { name, params } => {
                let params: serde_json::Value = serde_json::from_str(&params)
                    .with_context(|| "--params must be a JSON object")?;
                let ctx = ToolContext::new(Arc::new(index), cfg.search.default_limit);
                let result = ToolRegistry::with_builtins().call(&name, params, &ctx)?;
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            ToolsAction::List => {
                // Handled above (before index build)
                unreachable!()
            }
        },
    }

    Ok(())
}
