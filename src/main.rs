// src/main.rs

use anyhow::Result;
use aptsweep::ManifestCatalog;
use clap::Parser;
use std::path::Path;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.debug || manifest_requests_debug(&cli));

    match cli.command {
        Some(Commands::Diff {
            manifest,
            purge,
            hold,
            whitelist,
        }) => commands::cmd_diff(&manifest, purge, hold, &whitelist),
        Some(Commands::Apply {
            manifest,
            noop,
            purge,
            hold,
            whitelist,
        }) => commands::cmd_apply(&manifest, purge, hold, noop, &whitelist),
        Some(Commands::Check { manifest, verbose }) => commands::cmd_check(&manifest, verbose),
        Some(Commands::Status {
            manifest,
            managed_only,
        }) => commands::cmd_status(&manifest, managed_only),
        Some(Commands::Completions { shell }) => commands::cmd_completions(shell),
        None => {
            println!("aptsweep v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'aptsweep --help' for usage information");
            Ok(())
        }
    }
}

/// The manifest's `[sweep] debug` flag routes the transcript to the log
/// just like `--debug`, so a host can opt in without changing how the
/// command is invoked. Load errors are ignored here; the command handler
/// reports them properly.
fn manifest_requests_debug(cli: &Cli) -> bool {
    let manifest = match &cli.command {
        Some(Commands::Diff { manifest, .. })
        | Some(Commands::Apply { manifest, .. })
        | Some(Commands::Check { manifest, .. })
        | Some(Commands::Status { manifest, .. }) => manifest,
        _ => return false,
    };
    ManifestCatalog::load(Path::new(manifest))
        .map(|catalog| catalog.options().debug)
        .unwrap_or(false)
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}
