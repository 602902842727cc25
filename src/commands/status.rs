// src/commands/status.rs
//! Read-only report of the managed/unmanaged partition.

use anyhow::{Context, Result};
use aptsweep::apt::status;
use aptsweep::reconcile::{classify, sync};
use aptsweep::{Catalog, ManifestCatalog, SystemRunner};
use std::path::Path;

pub fn cmd_status(manifest_path: &str, managed_only: bool) -> Result<()> {
    let path = Path::new(manifest_path);
    let catalog = ManifestCatalog::load(path)
        .with_context(|| format!("Failed to load manifest {}", path.display()))?;

    let runner = SystemRunner::new();
    let snapshot = status::read_snapshot(&runner)?;
    let (managed, unmanaged) = classify::partition(&snapshot, &catalog);

    println!("Managed packages ({}):", managed.len());
    for package in &managed {
        let state = &package.state;
        let converged = if sync::in_sync(&package.desired, Some(state)) {
            "synced"
        } else {
            "NOT SYNCED"
        };
        println!(
            "  {:<32} {:<20} {:<10} {:<7} ensure={} [{}]",
            state.name,
            state.version.as_deref().unwrap_or("-"),
            state.selection.as_str(),
            state.auto.as_str(),
            package.desired,
            converged
        );
    }

    // Declared packages dpkg has no record of would not appear in any
    // partition; report them separately.
    let missing: Vec<_> = catalog
        .entries()
        .iter()
        .filter(|entry| snapshot.get(entry.package_name()).is_none())
        .collect();
    if !missing.is_empty() {
        println!();
        println!("Declared but unknown to dpkg ({}):", missing.len());
        for entry in missing {
            println!("  {:<32} ensure={}", entry.package_name(), entry.ensure);
        }
    }

    if !managed_only {
        println!();
        println!("Unmanaged packages ({}):", unmanaged.len());
        for state in &unmanaged {
            println!(
                "  {:<32} {:<20} {:<10} {:<7}",
                state.name,
                state.version.as_deref().unwrap_or("-"),
                state.selection.as_str(),
                state.auto.as_str()
            );
        }
    }

    Ok(())
}
