// tests/common/mod.rs

//! Shared test utilities: a scripted command runner and snapshot fixtures.

use aptsweep::exec::{CommandRunner, ToolCommand, ToolOutput};
use aptsweep::{Error, Result};
use std::cell::RefCell;
use std::collections::HashMap;

/// Display form of the selection/status read.
pub const STATUS_QUERY: &str = "dpkg-query -W --showformat '${Status} ${Package}\\n'";
/// Display form of the version read.
pub const VERSION_QUERY: &str = "dpkg-query -W -f '${Package}|${Version}\\n'";
/// Display form of the auto-flag read.
pub const SHOWAUTO_QUERY: &str = "apt-mark showauto";
/// Display form of the autoremove dry run.
pub const AUTOREMOVE_SIM: &str = "apt-get -s autoremove";

/// One recorded invocation: the display form plus any stdin payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub command: String,
    pub stdin: Option<String>,
}

/// A command runner that replays scripted output and records every call.
///
/// Commands are keyed by their display form. An unscripted command succeeds
/// with empty output, which is what the mutating apt/dpkg commands produce
/// anyway.
#[derive(Default)]
pub struct ScriptedRunner {
    outputs: RefCell<HashMap<String, String>>,
    failures: RefCell<HashMap<String, String>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script stdout for a command.
    pub fn script(&self, command: &str, stdout: &str) {
        self.outputs
            .borrow_mut()
            .insert(command.to_string(), stdout.to_string());
    }

    /// Script a non-zero exit for a command.
    pub fn fail(&self, command: &str, stderr: &str) {
        self.failures
            .borrow_mut()
            .insert(command.to_string(), stderr.to_string());
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Calls whose display form starts with the given prefix.
    pub fn calls_matching(&self, prefix: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.command.starts_with(prefix))
            .collect()
    }

    /// Calls that would mutate system state: anything beyond the read-only
    /// queries and the dry-run simulation.
    pub fn mutating_calls(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| {
                call.command.starts_with("xargs apt-mark")
                    || call.command.starts_with("dpkg --set-selections")
                    || call.command.starts_with("apt-get -y")
            })
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        let display = command.display();
        self.calls.borrow_mut().push(RecordedCall {
            command: display.clone(),
            stdin: command.stdin().map(str::to_string),
        });

        if let Some(stderr) = self.failures.borrow().get(&display) {
            return Err(Error::CommandFailed {
                command: display,
                status: "exit code 1".to_string(),
                stderr: stderr.clone(),
            });
        }

        let stdout = self
            .outputs
            .borrow()
            .get(&display)
            .cloned()
            .unwrap_or_default();
        Ok(ToolOutput {
            stdout,
            stderr: String::new(),
        })
    }
}

/// One package row for scripting the three snapshot reads.
#[derive(Debug, Clone)]
pub struct FixturePackage {
    pub name: String,
    pub selection: &'static str,
    pub status: &'static str,
    pub version: String,
    pub auto: bool,
}

impl FixturePackage {
    /// A plainly installed package, manual flag, version 1.0-1.
    pub fn installed(name: &str) -> Self {
        Self {
            name: name.to_string(),
            selection: "install",
            status: "installed",
            version: "1.0-1".to_string(),
            auto: false,
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn held(mut self) -> Self {
        self.selection = "hold";
        self
    }

    pub fn auto(mut self) -> Self {
        self.auto = true;
        self
    }
}

/// Script the selection, version and auto-flag reads from a package table.
pub fn script_snapshot(runner: &ScriptedRunner, packages: &[FixturePackage]) {
    let status_lines: String = packages
        .iter()
        .map(|p| format!("{} ok {} {}\n", p.selection, p.status, p.name))
        .collect();
    let version_lines: String = packages
        .iter()
        .map(|p| format!("{}|{}\n", p.name, p.version))
        .collect();
    let auto_lines: String = packages
        .iter()
        .filter(|p| p.auto)
        .map(|p| format!("{}\n", p.name))
        .collect();

    runner.script(STATUS_QUERY, &status_lines);
    runner.script(VERSION_QUERY, &version_lines);
    runner.script(SHOWAUTO_QUERY, &auto_lines);
}
