//! Command line argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use crate::suggest::MetricKind;

/// Build and query n-gram fuzzy suggestion indexes
#[derive(Parser, Debug, Clone)]
#[command(name = "ngram-suggest")]
#[command(about = "Build and query n-gram fuzzy suggestion indexes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SuggestArgs {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SuggestArgs {
    /// Log level implied by `--verbose` and `--quiet`.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }

        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build every index described in a config file
    Index(IndexArgs),

    /// Search a built index
    Search(SearchArgs),
}

/// Arguments for building indexes
#[derive(Parser, Debug, Clone)]
pub struct IndexArgs {
    /// Index configuration file (JSON array)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "NGRAM_SUGGEST_CONFIG")]
    pub config: PathBuf,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Index configuration file (JSON array)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "NGRAM_SUGGEST_CONFIG")]
    pub config: PathBuf,

    /// Name of the index to search
    #[arg(short, long)]
    pub name: String,

    /// Query string
    #[arg(long)]
    pub query: String,

    /// Maximum number of results to return
    #[arg(short = 'k', long, default_value = "5")]
    pub top_k: usize,

    /// Minimum similarity of a result
    #[arg(short, long, default_value = "0.5")]
    pub similarity: f64,

    /// Similarity metric (jaccard, dice, cosine)
    #[arg(short, long, default_value = "jaccard")]
    pub metric: MetricKind,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `word<TAB>similarity` line per result
    Human,
    /// JSON array of results
    Json,
}
