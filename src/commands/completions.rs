// src/commands/completions.rs
//! Shell completion generation.

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;

pub fn cmd_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "aptsweep", &mut std::io::stdout());
    Ok(())
}
