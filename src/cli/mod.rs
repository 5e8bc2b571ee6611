//! CLI module for the RAG ingestion tool.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::models::OutputFormat;

/// PDF ingestion and model-loading CLI for a local RAG vector index.
#[derive(Debug, Parser)]
#[command(name = "ragkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(long, short = 'f', global = true, help = "Output format: text or json")]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Ingest PDFs from a directory into the vector index
    Ingest(commands::IngestArgs),

    /// Search the vector index
    Search(commands::SearchArgs),

    /// Show credential, provider, and index status
    Status,
}

// FromStr for OutputFormat is implemented in models::search
