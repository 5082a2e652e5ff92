//! gitpane CLI - a git status panel driven by editor events.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod terminal;

use commands::{Cli, Commands};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "GITPANE_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Session { no_persist: false });
    if let Commands::Completions { shell } = command {
        return commands::completions::run(shell);
    }

    let workspace = commands::utils::load_workspace(cli.root.as_deref(), cli.config.as_deref())?;
    match command {
        Commands::Session { no_persist } => {
            commands::session::run(&workspace, no_persist).await
        }
        Commands::Status { json } => commands::status::run(&workspace, json).await,
        Commands::Commit { message, files } => {
            commands::commit::run(&workspace, &message, &files).await
        }
        Commands::Reset => commands::reset::run(&workspace).await,
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging();
    output::set_quiet(cli.quiet);

    if let Err(e) = run(cli).await {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
