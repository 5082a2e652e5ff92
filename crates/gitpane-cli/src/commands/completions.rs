//! `gitpane completions` - print a completion script for a shell.

use std::io::{self, Write};

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};

use super::Cli;

fn write_completions(shell: Shell, out: &mut impl Write) {
    generate(shell, &mut Cli::command(), "gitpane", out);
}

/// Run the completions command.
#[allow(clippy::unnecessary_wraps)]
pub fn run(shell: Shell) -> Result<()> {
    write_completions(shell, &mut io::stdout().lock());
    Ok(())
}
