//! Tradebook CLI
//!
//! Command-line tools for the local document slot.
//!
//! # Commands
//!
//! - `inspect` - Display a summary of the stored document
//! - `verify` - Check the slot for structural problems
//! - `export` - Write the document JSON to stdout or a file

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Tradebook command-line slot tools.
#[derive(Parser)]
#[command(name = "tradebook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the local slot file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display a summary of the stored document
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check the slot for structural problems
    Verify,

    /// Write the document JSON to stdout or a file
    Export {
        /// Destination file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Inspect { format } => {
            let path = cli.path.ok_or("Slot path required for inspect")?;
            commands::inspect::run(&path, &format)?;
        }
        Commands::Verify => {
            let path = cli.path.ok_or("Slot path required for verify")?;
            commands::verify::run(&path)?;
        }
        Commands::Export { output } => {
            let path = cli.path.ok_or("Slot path required for export")?;
            commands::export::run(&path, output.as_deref())?;
        }
        Commands::Version => {
            println!("Tradebook CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
