//! Docent CLI binary.
//!
//! This binary provides command-line access to Docent's quality gates:
//! - Recover JSON objects from raw model output
//! - Measure narration quality
//! - Run batch QA over generated scripts and slides
//! - Generate section scripts through the bounded retry loop
//! - Show the effective threshold configuration

use clap::Parser;
use docent::{NarrationConfig, init_logging};
use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, analyze_text, extract_object, generate_script, report_batch};

    // Provider keys may live in a .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs)?;

    let config = match &cli.config {
        Some(path) => NarrationConfig::from_file(path)?,
        None => NarrationConfig::load()?,
    };

    let passed = match cli.command {
        Commands::Extract { file } => extract_object(&file)?,
        Commands::Analyze { file, against } => analyze_text(&file, against.as_deref())?,
        Commands::Report { batch } => report_batch(&batch, &config)?,
        Commands::Generate(args) => generate_script(args, config).await?,
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            true
        }
    };

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
