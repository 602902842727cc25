// src/error.rs

//! Error types for the reconciliation library.
//!
//! Everything that can abort a pass is represented here. The two user-facing
//! failure classes carry distinct messages: `NotConverged` means the host has
//! not yet reached its declared package state and the operator should re-run
//! after it does, while `CommandFailed` means an external tool itself broke.
//! Parse problems on individual output lines are never errors; the offending
//! line is skipped and logged where it is read.

use thiserror::Error;

/// Fatal conditions that abort a reconciliation pass.
#[derive(Debug, Error)]
pub enum Error {
    /// The managed set is not converged; mutating package state now could
    /// mark the wrong packages or purge a dependency the next apply needs.
    #[error(
        "refusing to reconcile: {} managed package(s) not at their declared state ({}); \
         re-run once the system has converged",
        packages.len(),
        packages.join(", ")
    )]
    NotConverged { packages: Vec<String> },

    /// An external tool exited non-zero. Nothing issued earlier in the pass
    /// is rolled back; the pass stops here.
    #[error("external command `{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// An external tool could not be started or fed its input.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_converged_names_packages() {
        let err = Error::NotConverged {
            packages: vec!["nginx".to_string(), "redis".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 managed package(s)"));
        assert!(msg.contains("nginx, redis"));
        assert!(msg.contains("re-run"));
    }

    #[test]
    fn test_command_failed_names_command() {
        let err = Error::CommandFailed {
            command: "apt-get -s autoremove".to_string(),
            status: "exit code 100".to_string(),
            stderr: "E: Unable to lock".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("apt-get -s autoremove"));
        assert!(msg.contains("exit code 100"));
    }
}
