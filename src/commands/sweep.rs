// src/commands/sweep.rs
//! The diff, apply and check command handlers.

use anyhow::{Context, Result, anyhow};
use aptsweep::apt::status;
use aptsweep::reconcile::{ActionPlan, Reconciler, apply_plan, sync};
use aptsweep::{Catalog, ManifestCatalog, SweepOptions, SystemRunner};
use std::path::Path;

/// Fold command-line overrides into the manifest's options. Flags can only
/// enable behavior; the manifest remains the place to turn things off.
fn merge_options(
    catalog: &ManifestCatalog,
    purge: bool,
    hold: bool,
    noop: bool,
    whitelist: &[String],
) -> SweepOptions {
    let mut options = catalog.options().clone();
    options.purge |= purge;
    options.hold |= hold;
    options.noop |= noop;
    if !whitelist.is_empty() {
        options.whitelist = Some(whitelist.iter().cloned().collect());
    }
    options
}

fn load_catalog(manifest_path: &str) -> Result<ManifestCatalog> {
    let path = Path::new(manifest_path);
    if !path.exists() {
        return Err(anyhow!(
            "Manifest not found: {} (write one or pass --manifest)",
            path.display()
        ));
    }
    ManifestCatalog::load(path)
        .with_context(|| format!("Failed to load manifest {}", path.display()))
}

fn print_plan(plan: &ActionPlan) {
    if !plan.marks.is_empty() {
        let manual = plan
            .marks
            .iter()
            .filter(|mark| matches!(mark, aptsweep::Action::MarkManual(_)))
            .count();
        println!(
            "Marked {} package(s) manual, {} auto",
            manual,
            plan.marks.len() - manual
        );
    }

    let holds = plan.holds();
    let unholds = plan.unholds();
    let purges = plan.purges();

    if !holds.is_empty() {
        println!("To hold ({}):", holds.len());
        for name in &holds {
            println!("  + {}", name);
        }
    }

    if !unholds.is_empty() {
        println!("To release ({}):", unholds.len());
        for name in &unholds {
            println!("  * {}", name);
        }
    }

    if !purges.is_empty() {
        println!("To purge ({}):", purges.len());
        for name in &purges {
            println!("  - {}", name);
        }
    }

    if plan.is_empty() {
        println!("Nothing to do: system matches the manifest");
    }

    for warning in &plan.warnings {
        println!("  ! {}", warning);
    }
}

pub fn cmd_diff(manifest_path: &str, purge: bool, hold: bool, whitelist: &[String]) -> Result<()> {
    let catalog = load_catalog(manifest_path)?;
    let mut options = merge_options(&catalog, purge, hold, false, whitelist);
    // diff never mutates, whatever the manifest says
    options.noop = true;

    let runner = SystemRunner::new();
    let plan = Reconciler::new(&runner, &catalog, options).run()?;
    print_plan(&plan);
    Ok(())
}

pub fn cmd_apply(
    manifest_path: &str,
    purge: bool,
    hold: bool,
    noop: bool,
    whitelist: &[String],
) -> Result<()> {
    let catalog = load_catalog(manifest_path)?;
    let options = merge_options(&catalog, purge, hold, noop, whitelist);

    let runner = SystemRunner::new();
    let plan = Reconciler::new(&runner, &catalog, options).run()?;
    print_plan(&plan);

    if plan.noop {
        println!();
        println!("[noop: no changes made]");
    }

    apply_plan(&runner, &plan)?;

    if !plan.noop && !plan.is_empty() {
        println!();
        println!("Applied {} action(s)", plan.actions.len());
    }
    Ok(())
}

pub fn cmd_check(manifest_path: &str, verbose: bool) -> Result<()> {
    let catalog = load_catalog(manifest_path)?;
    let runner = SystemRunner::new();
    let snapshot = status::read_snapshot(&runner)?;

    let unsynced = sync::unsynced_packages(&catalog, &snapshot);
    if unsynced.is_empty() {
        println!(
            "OK: all {} managed package(s) at their declared state",
            catalog.entries().len()
        );
        return Ok(());
    }

    println!(
        "DRIFT: {} managed package(s) not at their declared state",
        unsynced.len()
    );
    if verbose {
        println!();
        for name in &unsynced {
            let declared = catalog
                .desired_state(name)
                .map(|state| state.to_string())
                .unwrap_or_else(|| "?".to_string());
            let live = snapshot
                .get(name)
                .and_then(|state| state.installed_version())
                .unwrap_or("not installed");
            println!("  {} (declared {}, found {})", name, declared, live);
        }
    } else {
        println!("Run with --verbose for details");
    }

    std::process::exit(1);
}
