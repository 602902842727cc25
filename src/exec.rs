// src/exec.rs

//! Typed external command execution.
//!
//! Every tool this crate drives (dpkg-query, apt-mark, apt-get, dpkg) is
//! modeled as a [`ToolCommand`]: an argument list plus an optional payload
//! for standard input. Commands are issued through the [`CommandRunner`]
//! trait, so the reconciliation logic can be exercised in tests with a
//! scripted fake that records invocations and returns canned output.
//!
//! The production implementation, [`SystemRunner`], shells out synchronously
//! and waits for completion. A non-zero exit becomes
//! [`Error::CommandFailed`]; failing to start the tool at all becomes
//! [`Error::Spawn`]. Tool stdout is replayed into the log at debug level and
//! stderr at warn level, which is where the diagnostic transcript of a pass
//! ends up.

use crate::error::{Error, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// An external tool invocation: argv plus an optional stdin payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    stdin: Option<String>,
}

impl ToolCommand {
    /// Create a command from a program name and its arguments.
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            stdin: None,
        }
    }

    /// Attach a standard-input payload.
    pub fn with_stdin(mut self, payload: String) -> Self {
        self.stdin = Some(payload);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn stdin(&self) -> Option<&str> {
        self.stdin.as_deref()
    }

    /// The full command line for log and error messages. Arguments with
    /// whitespace are quoted and newlines rendered as `\n` so the result
    /// stays on one line.
    pub fn display(&self) -> String {
        let mut rendered = self.program.clone();
        for arg in &self.args {
            rendered.push(' ');
            if arg.chars().any(char::is_whitespace) {
                rendered.push('\'');
                rendered.push_str(&arg.replace('\n', "\\n"));
                rendered.push('\'');
            } else {
                rendered.push_str(arg);
            }
        }
        rendered
    }
}

/// Captured output of a completed, successful command.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// The seam between the reconciliation logic and the outside world.
///
/// `run` returns `Ok` only when the tool exited zero. Implementations must
/// wait for completion before returning; every decision downstream of a
/// command assumes its effect is durable.
pub trait CommandRunner {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput>;
}

/// Production runner: spawns the tool and waits for it synchronously.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        debug!("Running `{}`", command.display());

        let mut child = Command::new(command.program())
            .args(command.args())
            .stdin(if command.stdin().is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Spawn {
                command: command.display(),
                source: e,
            })?;

        if let Some(payload) = command.stdin() {
            let mut pipe = child.stdin.take().ok_or_else(|| Error::Spawn {
                command: command.display(),
                source: std::io::Error::other("stdin pipe was not captured"),
            })?;
            pipe.write_all(payload.as_bytes())
                .map_err(|e| Error::Spawn {
                    command: command.display(),
                    source: e,
                })?;
            // Dropping the handle closes the pipe so the child sees EOF.
        }

        let output = child.wait_with_output().map_err(|e| Error::Spawn {
            command: command.display(),
            source: e,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        for line in stdout.lines() {
            debug!("[{}] {}", command.program(), line);
        }
        for line in stderr.lines() {
            warn!("[{}] {}", command.program(), line);
        }

        if !output.status.success() {
            let status = match output.status.code() {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            };
            return Err(Error::CommandFailed {
                command: command.display(),
                status,
                stderr: stderr.trim_end().to_string(),
            });
        }

        Ok(ToolOutput { stdout, stderr })
    }
}
