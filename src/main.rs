//! Binary entry point for boardcsv.
//!
//! Exports board views to CSV and imports CSV files as cards, working on a
//! JSON board document.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use boardcsv::config::BoardCsvConfig;
use boardcsv::observability;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Boardcsv - CSV export and import for board cards.
#[derive(Parser)]
#[command(name = "boardcsv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "BOARDCSV_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Export a view of a board to a CSV file.
    Export {
        /// Board document (JSON).
        #[arg(short, long)]
        document: PathBuf,

        /// Id of the view to export.
        #[arg(long)]
        view: String,

        /// Directory to write the CSV file to.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Also print the `data:` URI of the export.
        #[arg(long)]
        data_uri: bool,
    },

    /// Import a CSV file as new cards on the board.
    Import {
        /// Board document (JSON); updated in place.
        #[arg(short, long)]
        document: PathBuf,

        /// CSV file to import.
        #[arg(short, long)]
        file: PathBuf,
    },
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
async fn run_command(command: Commands, config: &BoardCsvConfig) -> anyhow::Result<()> {
    match command {
        Commands::Export {
            document,
            view,
            output_dir,
            data_uri,
        } => commands::cmd_export(config, &document, &view, output_dir, data_uri).await,
        Commands::Import { document, file } => {
            commands::cmd_import(config, &document, &file).await
        },
    }
}

/// Loads configuration from an explicit path or the default locations.
fn load_config(path: Option<&Path>) -> boardcsv::Result<BoardCsvConfig> {
    match path {
        Some(config_path) => BoardCsvConfig::load_from_file(config_path),
        None => Ok(BoardCsvConfig::load_default()),
    }
}
