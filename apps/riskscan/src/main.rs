//! riskscan
//!
//! Command-line front end for the contract risk engine:
//!
//! - `analyze`: scan PDF, DOCX and plain-text contracts for risky clauses
//! - `quality`: check whether a document's extracted text is usable
//! - `catalog`: list the built-in clause rules
//!
//! Reports go to stdout as JSON, one object per file; logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;
#[cfg(test)]
mod tests;

use commands::{run_analyze, run_catalog, run_quality};

/// Command-line arguments for riskscan
#[derive(Parser, Debug)]
#[command(name = "riskscan")]
#[command(about = "Scan contracts for risky clauses")]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one or more documents
    Analyze(AnalyzeArgs),
    /// Report text quality for a document
    Quality(QualityArgs),
    /// Print the built-in rule catalog
    Catalog,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Documents to analyze
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// MIME type for every input, instead of guessing from the extension
    #[arg(long)]
    pub media_type: Option<String>,

    /// Analyze text that fails the quality gate instead of rejecting it
    #[arg(long)]
    pub allow_low_quality: bool,

    /// Keep paragraph breaks when normalizing
    #[arg(long)]
    pub paragraphs: bool,

    /// Extraction timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Maximum documents analyzed at once
    #[arg(long, default_value = "4")]
    pub concurrency: usize,

    /// JSON file with an analysis config; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug, Clone)]
pub struct QualityArgs {
    /// Document to check
    pub file: PathBuf,

    /// MIME type, instead of guessing from the extension
    #[arg(long)]
    pub media_type: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let succeeded = match cli.command {
        Command::Analyze(args) => run_analyze(args).await?,
        Command::Quality(args) => run_quality(args).await?,
        Command::Catalog => run_catalog()?,
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
