//! PLaTOn CLI
//!
//! Opens, synchronizes and previews PLaTOn resources, and serves the `.ple`
//! language features to editors that can run a process.

mod browser;
mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::Context;
use error::{CliError, Result};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("Failed to initialize logging: {e}")))?;
    tracing::debug!(command = ?cli.command, "Starting");

    let Some(command) = cli.command else {
        println!("{} PLaTOn resources CLI", "platon".green().bold());
        println!();
        println!("Run {} for available commands.", "platon --help".cyan());
        return Ok(());
    };

    // Completion needs neither settings nor credentials
    if let Commands::Complete { json } = command {
        return commands::run_complete(json);
    }

    let ctx = Context::load(cli.config_dir)?;
    execute_command(&ctx, command).await
}

async fn execute_command(ctx: &Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Connect { no_browser } => commands::run_connect(ctx, no_browser),
        Commands::Callback { uri } => commands::run_callback(ctx, &uri).await,
        Commands::Open { id } => commands::run_open(ctx, &id).await,
        Commands::Sync { path, json } => commands::run_sync(ctx, path.as_deref(), json).await,
        Commands::Preview { path, open } => {
            let path = resolve_path(path)?;
            commands::run_preview(ctx, &path, open).await
        }
        Commands::Links { file, json } => commands::run_links(ctx, &file, json),
        Commands::Hover {
            file,
            line,
            column,
            json,
        } => commands::run_hover(ctx, &file, line, column, json),
        Commands::Complete { json } => commands::run_complete(json),
        Commands::Folders { json } => commands::run_folders(ctx, json),
    }
}

/// Explicit path, or the current directory.
fn resolve_path(path: Option<std::path::PathBuf>) -> Result<std::path::PathBuf> {
    match path {
        Some(p) => Ok(p),
        None => Ok(std::env::current_dir()?),
    }
}
