// src/apt/selections.rs

//! Applying hold decisions through `dpkg --set-selections` and removals
//! through a batched `apt-get purge`.
//!
//! `--set-selections` takes `<package> <selection>` lines on standard input.
//! Holds are written before releases, so a partially applied batch never
//! leaves a pinned package unprotected.

use crate::error::Result;
use crate::exec::{CommandRunner, ToolCommand};
use tracing::{debug, info};

/// Set dpkg selections: `hold` for every hold, `install` for every release.
pub fn apply_selections(
    runner: &dyn CommandRunner,
    holds: &[String],
    unholds: &[String],
) -> Result<()> {
    if holds.is_empty() && unholds.is_empty() {
        debug!("No selection changes to apply");
        return Ok(());
    }

    let mut payload = String::new();
    for name in holds {
        payload.push_str(name);
        payload.push_str(" hold\n");
    }
    for name in unholds {
        payload.push_str(name);
        payload.push_str(" install\n");
    }

    info!(
        "Applying selections: {} hold(s), {} release(s)",
        holds.len(),
        unholds.len()
    );
    runner.run(&ToolCommand::new("dpkg", ["--set-selections"]).with_stdin(payload))?;
    Ok(())
}

/// Purge the named packages in one batched apt-get invocation.
pub fn purge_packages(runner: &dyn CommandRunner, names: &[String]) -> Result<()> {
    if names.is_empty() {
        debug!("No packages to purge");
        return Ok(());
    }

    info!("Purging {} package(s): {}", names.len(), names.join(", "));
    let mut args = vec!["-y".to_string(), "-q".to_string(), "purge".to_string()];
    args.extend(names.iter().cloned());
    runner.run(&ToolCommand::new("apt-get", args))?;
    Ok(())
}
