// src/apt/status.rs

//! Point-in-time snapshot of the dpkg package database.
//!
//! Three reads build the snapshot: the selection/status listing
//! (`dpkg-query -W --showformat '${Status} ${Package}\n'`, the classic
//! four-field status line), a version listing, and `apt-mark showauto` for
//! the auto/manual install flag. A line that fails to parse is logged and
//! skipped; only a failing tool aborts the pass.

use crate::error::Result;
use crate::exec::{CommandRunner, ToolCommand};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// dpkg's desired-selection states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Install,
    Hold,
    Deinstall,
    Purge,
    Unknown,
}

impl Selection {
    /// Parse dpkg's selection vocabulary; anything unrecognized is
    /// `Unknown` rather than an error.
    pub fn parse(s: &str) -> Self {
        match s {
            "install" => Self::Install,
            "hold" => Self::Hold,
            "deinstall" => Self::Deinstall,
            "purge" => Self::Purge,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Hold => "hold",
            Self::Deinstall => "deinstall",
            Self::Purge => "purge",
            Self::Unknown => "unknown",
        }
    }
}

/// dpkg's package status states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    Installed,
    NotInstalled,
    ConfigFiles,
    HalfInstalled,
    Unpacked,
    HalfConfigured,
    TriggersAwaited,
    TriggersPending,
}

impl InstallStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "installed" => Some(Self::Installed),
            "not-installed" => Some(Self::NotInstalled),
            "config-files" => Some(Self::ConfigFiles),
            "half-installed" => Some(Self::HalfInstalled),
            "unpacked" => Some(Self::Unpacked),
            "half-configured" => Some(Self::HalfConfigured),
            "triggers-awaited" => Some(Self::TriggersAwaited),
            "triggers-pending" => Some(Self::TriggersPending),
            _ => None,
        }
    }

    /// Whether the package counts as installed for desired-state purposes.
    /// Pending trigger processing is transient; the package's files are
    /// already on disk.
    pub fn is_installed(&self) -> bool {
        matches!(
            self,
            Self::Installed | Self::TriggersAwaited | Self::TriggersPending
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Installed => "installed",
            Self::NotInstalled => "not-installed",
            Self::ConfigFiles => "config-files",
            Self::HalfInstalled => "half-installed",
            Self::Unpacked => "unpacked",
            Self::HalfConfigured => "half-configured",
            Self::TriggersAwaited => "triggers-awaited",
            Self::TriggersPending => "triggers-pending",
        }
    }
}

/// apt's auto/manual install bookkeeping flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoFlag {
    Manual,
    Auto,
    Unknown,
}

impl AutoFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Auto => "auto",
            Self::Unknown => "-",
        }
    }
}

/// Live state of one package as read from the package database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageState {
    pub name: String,
    pub selection: Selection,
    pub status: InstallStatus,
    pub version: Option<String>,
    pub auto: AutoFlag,
}

impl PackageState {
    /// The installed version, when the package actually is installed.
    /// Residual entries (config-files and friends) report no version.
    pub fn installed_version(&self) -> Option<&str> {
        if self.status.is_installed() {
            self.version.as_deref()
        } else {
            None
        }
    }

    /// True when dpkg currently has the package on hold.
    pub fn is_held(&self) -> bool {
        self.selection == Selection::Hold
    }
}

/// Immutable point-in-time read of every package dpkg knows about.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    packages: BTreeMap<String, PackageState>,
}

impl SystemSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a package state, replacing any previous entry of the same name.
    pub fn insert(&mut self, state: PackageState) {
        self.packages.insert(state.name.clone(), state);
    }

    pub fn get(&self, name: &str) -> Option<&PackageState> {
        self.packages.get(name)
    }

    /// All package states, in name order.
    pub fn packages(&self) -> impl Iterator<Item = &PackageState> {
        self.packages.values()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

fn status_line_regex() -> &'static Regex {
    static STATUS_LINE: OnceLock<Regex> = OnceLock::new();
    STATUS_LINE.get_or_init(|| Regex::new(r"^(\S+) +(\S+) +(\S+) (\S+)$").unwrap())
}

/// Parse one `<selection> <error> <status> <name>` status line.
///
/// Returns `None` for lines that do not match the four-field shape or carry
/// an unrecognized status; a skipped line never fails the pass.
pub fn parse_status_line(line: &str) -> Option<(String, Selection, InstallStatus)> {
    let captures = match status_line_regex().captures(line) {
        Some(captures) => captures,
        None => {
            debug!("Failed to match dpkg-query line {:?}", line);
            return None;
        }
    };

    // The second field is dpkg's error flag; it does not affect
    // reconciliation.
    let selection = Selection::parse(&captures[1]);
    let status = match InstallStatus::parse(&captures[3]) {
        Some(status) => status,
        None => {
            debug!("Skipping dpkg-query line with unknown status {:?}", line);
            return None;
        }
    };

    Some((captures[4].to_string(), selection, status))
}

/// Read the full snapshot: selections, versions and auto flags.
pub fn read_snapshot(runner: &dyn CommandRunner) -> Result<SystemSnapshot> {
    debug!("Reading dpkg selection states");
    let output = runner.run(&ToolCommand::new(
        "dpkg-query",
        ["-W", "--showformat", "${Status} ${Package}\n"],
    ))?;

    let mut snapshot = SystemSnapshot::new();
    for line in output.stdout.lines() {
        if let Some((name, selection, status)) = parse_status_line(line) {
            snapshot.insert(PackageState {
                name,
                selection,
                status,
                version: None,
                auto: AutoFlag::Unknown,
            });
        }
    }

    debug!("Reading installed versions");
    let output = runner.run(&ToolCommand::new(
        "dpkg-query",
        ["-W", "-f", "${Package}|${Version}\n"],
    ))?;

    for line in output.stdout.lines() {
        let mut fields = line.splitn(2, '|');
        match (fields.next(), fields.next()) {
            (Some(name), Some(version)) => {
                if let Some(state) = snapshot.packages.get_mut(name) {
                    if !version.is_empty() {
                        state.version = Some(version.to_string());
                    }
                }
            }
            _ => warn!("Skipping malformed dpkg-query version line: {}", line),
        }
    }

    debug!("Reading apt auto-install flags");
    let output = runner.run(&ToolCommand::new("apt-mark", ["showauto"]))?;
    let auto: BTreeSet<&str> = output
        .stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    for state in snapshot.packages.values_mut() {
        state.auto = if auto.contains(state.name.as_str()) {
            AutoFlag::Auto
        } else if state.status.is_installed() {
            AutoFlag::Manual
        } else {
            AutoFlag::Unknown
        };
    }

    debug!("Snapshot holds {} package(s)", snapshot.len());
    Ok(snapshot)
}
