// src/apt/autoremove.rs

//! Dry-run autoremoval simulation.
//!
//! `apt-get -s autoremove` is the one place dependency reachability gets
//! decided, and apt decides it; this module only collects the names apt says
//! it would purge. A simulation that prints `Remv` lines but never `Purg`
//! usually means `APT::Get::Purge` is disabled in apt.conf, which silently
//! empties the candidate set, so that case is called out in the log.

use crate::error::Result;
use crate::exec::{CommandRunner, ToolCommand};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use tracing::{debug, warn};

fn purge_line_regex() -> &'static Regex {
    static PURGE_LINE: OnceLock<Regex> = OnceLock::new();
    PURGE_LINE.get_or_init(|| Regex::new(r"^Purg (\S+)").unwrap())
}

/// The set of packages apt's autoremover would purge right now.
pub fn simulate_autoremove(runner: &dyn CommandRunner) -> Result<BTreeSet<String>> {
    let output = runner.run(&ToolCommand::new("apt-get", ["-s", "autoremove"]))?;

    let mut candidates = BTreeSet::new();
    let mut saw_remv = false;

    for line in output.stdout.lines() {
        if let Some(captures) = purge_line_regex().captures(line) {
            candidates.insert(captures[1].to_string());
        } else if line.starts_with("Remv ") {
            saw_remv = true;
        }
    }

    if candidates.is_empty() && saw_remv {
        warn!(
            "autoremove simulation reported removals but no purges; \
             is APT::Get::Purge enabled in apt.conf?"
        );
    }

    debug!(
        "Autoremove simulation would purge {} package(s)",
        candidates.len()
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ToolOutput;

    struct CannedRunner(String);

    impl CommandRunner for CannedRunner {
        fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
            assert_eq!(command.display(), "apt-get -s autoremove");
            Ok(ToolOutput {
                stdout: self.0.clone(),
                stderr: String::new(),
            })
        }
    }

    #[test]
    fn test_collects_purg_lines_only() {
        let runner = CannedRunner(
            "Reading package lists...\n\
             Building dependency tree...\n\
             The following packages will be REMOVED:\n\
             \x20 dict-jargon dictd\n\
             Purg dict-jargon [2.0-1]\n\
             Purg dictd [1.12.1+dfsg-4]\n\
             Purg dict-jargon [2.0-1]\n"
                .to_string(),
        );
        let candidates = simulate_autoremove(&runner).unwrap();
        assert_eq!(candidates.len(), 2);
        assert!(candidates.contains("dict-jargon"));
        assert!(candidates.contains("dictd"));
    }

    #[test]
    fn test_remv_without_purg_yields_empty_set() {
        let runner = CannedRunner(
            "Remv dict-jargon [2.0-1]\nRemv dictd [1.12.1+dfsg-4]\n".to_string(),
        );
        let candidates = simulate_autoremove(&runner).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_nothing_to_remove() {
        let runner = CannedRunner(
            "Reading package lists...\n0 upgraded, 0 newly installed, 0 to remove\n".to_string(),
        );
        assert!(simulate_autoremove(&runner).unwrap().is_empty());
    }
}
