//! Folio CLI - site content editor.
//!
//! Provides commands for:
//! - `serve`: Start the content server
//! - `show`: Print a page's content document
//! - `draft`: Fold an edit surface into a page's working content (not persisted)
//! - `publish`: Publish an edit surface

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{DraftArgs, PublishArgs, ServeArgs, ShowArgs};
use error::CliError;
use output::Output;

/// Folio - site content editor.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the content server.
    Serve(ServeArgs),
    /// Print a page's content document.
    Show(ShowArgs),
    /// Merge an edit surface into a page's working content without persisting.
    Draft(DraftArgs),
    /// Publish an edit surface.
    Publish(PublishArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Check if verbose flag is set for serve command
    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute())),
        Commands::Show(args) => args.execute(),
        Commands::Draft(args) => args.execute(),
        Commands::Publish(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
