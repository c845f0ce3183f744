//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Docent - quality gates and bounded-retry generation for Chinese narration
#[derive(Parser, Debug)]
#[command(name = "docent")]
#[command(about = "Quality gates and bounded-retry generation for Chinese narration", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Threshold configuration file (defaults to bundled + user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recover a JSON object from raw model output
    Extract {
        /// File holding the raw output (`-` for stdin)
        file: PathBuf,
    },

    /// Measure Chinese ratio, length and template phrasing of a text
    Analyze {
        /// File holding the narration (`-` for stdin)
        file: PathBuf,

        /// Second narration to compare against
        #[arg(long)]
        against: Option<PathBuf>,
    },

    /// Run batch QA over `{ "scripts": [...], "slides": [...] }`
    Report {
        /// Path to the batch JSON file
        batch: PathBuf,
    },

    /// Generate a section script through the retry loop
    Generate(GenerateArgs),

    /// Print the effective threshold configuration as TOML
    Config,
}

/// Section context and policy for `docent generate`
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Section title
    #[arg(long)]
    pub title: String,

    /// Section summary
    #[arg(long, default_value = "")]
    pub summary: String,

    /// Comma-separated section keywords
    #[arg(long, value_delimiter = ',')]
    pub keywords: Vec<String>,

    /// Paper title
    #[arg(long, default_value = "")]
    pub paper_title: String,

    /// Paper abstract
    #[arg(long = "abstract", default_value = "")]
    pub paper_abstract: String,

    /// File with retrieved context for the section
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Skip providers and produce heuristic content
    #[arg(long)]
    pub offline: bool,

    /// Return heuristic content instead of failing when providers are exhausted
    #[arg(long, conflicts_with = "offline")]
    pub allow_fallback: bool,

    /// Override the configured number of outer attempts
    #[arg(long)]
    pub max_attempts: Option<usize>,
}
