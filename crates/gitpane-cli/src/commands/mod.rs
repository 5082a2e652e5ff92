//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

pub mod commit;
pub mod completions;
pub mod reset;
pub mod session;
pub mod status;
pub mod utils;

/// gitpane - a git status panel driven by editor events.
#[derive(Debug, Parser)]
#[command(name = "gitpane", version, about, long_about = None)]
pub struct Cli {
    /// Project root (defaults to the current directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Config file (defaults to `.gitpane.toml` in the project root).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress informational output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run an interactive panel session fed by commands on stdin.
    Session {
        /// Keep panel visibility in memory instead of the preferences file.
        #[arg(long)]
        no_persist: bool,
    },

    /// Show git version, branch and changed files.
    Status {
        /// Print machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Stage the given files and commit them.
    Commit {
        /// Commit message.
        #[arg(short, long)]
        message: String,

        /// Files to commit, as listed by `gitpane status`.
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Unstage everything.
    Reset,

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
