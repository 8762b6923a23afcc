//! CLI argument definitions using clap
//!
//! Commands:
//! - aeropage page --config <path> --data <file.json> [--schema <file.json>]
//! - aeropage explain --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// aeropage - Bidirectional keyset pagination over document collections
#[derive(Parser, Debug)]
#[command(name = "aeropage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch one page of a JSON data file; the request is read from stdin
    Page {
        /// Path to configuration file
        #[arg(long, default_value = "./aeropage.json")]
        config: PathBuf,

        /// JSON array of records to page through
        #[arg(long)]
        data: PathBuf,

        /// Schema every record is cast through before loading
        #[arg(long)]
        schema: Option<PathBuf>,
    },

    /// Describe how a request would be paged; the request is read from stdin
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./aeropage.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
