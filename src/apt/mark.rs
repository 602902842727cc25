// src/apt/mark.rs

//! Batched apt-mark manual/auto transitions.
//!
//! Names are piped to `xargs apt-mark ...` on standard input, one per line,
//! so a whole partition is rewritten in a single invocation however large it
//! is. An empty list issues nothing: `apt-mark` with no package arguments is
//! never what the caller wants.

use crate::error::Result;
use crate::exec::{CommandRunner, ToolCommand};
use tracing::debug;

/// Record every named package as manually installed.
pub fn mark_manual(runner: &dyn CommandRunner, names: &[String]) -> Result<()> {
    mark(runner, "manual", names)
}

/// Record every named package as automatically installed.
pub fn mark_auto(runner: &dyn CommandRunner, names: &[String]) -> Result<()> {
    mark(runner, "auto", names)
}

fn mark(runner: &dyn CommandRunner, flag: &str, names: &[String]) -> Result<()> {
    if names.is_empty() {
        debug!("No packages to apt-mark {}", flag);
        return Ok(());
    }

    debug!("Marking {} package(s) as {}", names.len(), flag);
    let mut payload = String::new();
    for name in names {
        payload.push_str(name);
        payload.push('\n');
    }
    runner.run(&ToolCommand::new("xargs", ["apt-mark", flag]).with_stdin(payload))?;
    Ok(())
}
