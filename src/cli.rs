// src/cli.rs
//! CLI definitions for aptsweep
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use aptsweep::DEFAULT_MANIFEST_PATH;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "aptsweep")]
#[command(author, version)]
#[command(
    about = "Reconcile manifest-managed packages against what a Debian host actually runs",
    long_about = None
)]
pub struct Cli {
    /// Route the external tool transcript and parse diagnostics to the log
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the action plan without changing anything
    ///
    /// Runs the full pipeline in no-op mode: snapshot, partition,
    /// convergence gate and autoremove simulation all happen, but no mark,
    /// hold or purge command is issued. Because the auto/manual marks are
    /// not rewritten first, purge candidates reflect the flags currently on
    /// the system.
    Diff {
        /// Path to the package manifest
        #[arg(short, long, default_value = DEFAULT_MANIFEST_PATH)]
        manifest: String,

        /// Enable the mark/purge pipeline even if the manifest does not
        #[arg(long)]
        purge: bool,

        /// Enable hold management even if the manifest does not
        #[arg(long)]
        hold: bool,

        /// Restrict purges to these packages (replaces the manifest whitelist)
        #[arg(long, value_name = "PACKAGE")]
        whitelist: Vec<String>,
    },

    /// Reconcile the system: apply marks, holds, releases and purges
    Apply {
        /// Path to the package manifest
        #[arg(short, long, default_value = DEFAULT_MANIFEST_PATH)]
        manifest: String,

        /// Compute and report the plan but issue no mutating command
        #[arg(long)]
        noop: bool,

        /// Enable the mark/purge pipeline even if the manifest does not
        #[arg(long)]
        purge: bool,

        /// Enable hold management even if the manifest does not
        #[arg(long)]
        hold: bool,

        /// Restrict purges to these packages (replaces the manifest whitelist)
        #[arg(long, value_name = "PACKAGE")]
        whitelist: Vec<String>,
    },

    /// Check whether every managed package is at its declared state
    ///
    /// Exits 0 when the system matches the manifest and 1 when it has
    /// drifted. Never issues a mutating command.
    Check {
        /// Path to the package manifest
        #[arg(short, long, default_value = DEFAULT_MANIFEST_PATH)]
        manifest: String,

        /// List each drifted package with its declared and live state
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the managed/unmanaged partition and per-package state
    Status {
        /// Path to the package manifest
        #[arg(short, long, default_value = DEFAULT_MANIFEST_PATH)]
        manifest: String,

        /// Only show managed packages
        #[arg(long)]
        managed_only: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
