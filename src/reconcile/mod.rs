// src/reconcile/mod.rs

//! The reconciliation pipeline.
//!
//! One pass runs these stages in order:
//!
//! 1. snapshot read (selections, versions, auto flags)
//! 2. managed/unmanaged partition against the catalog
//! 3. convergence gate: abort before any mutation if a managed package is
//!    not at its declared state
//! 4. auto/manual marking (managed manual, unmanaged auto)
//! 5. `apt-get -s autoremove` simulation
//! 6. purge selection: unmanaged packages intersected with the simulation
//! 7. hold and release resolution
//! 8. plan assembly
//!
//! The order is load-bearing. Every read a decision depends on happens
//! before any mutation that could invalidate it, and the simulation runs
//! only after the marking step is durable because its output is a function
//! of the just-written flags.
//!
//! A pass either returns a complete [`ActionPlan`] or fails with a single
//! fatal error. Failures never roll back marks already written; re-running
//! the pass once the underlying problem is fixed is the recovery path.

pub mod classify;
pub mod hold;
pub mod purge;
pub mod sync;

pub use classify::{ManagedPackage, partition};

use crate::apt::{autoremove, mark, selections, status};
use crate::catalog::{Catalog, SweepOptions};
use crate::error::Result;
use crate::exec::CommandRunner;
use tracing::{debug, info};

/// One externally visible mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Record the package as manually installed in apt's bookkeeping.
    MarkManual(String),
    /// Record the package as automatically installed.
    MarkAuto(String),
    /// Place a dpkg hold on the package.
    Hold(String),
    /// Release the dpkg hold on the package.
    Unhold(String),
    /// Purge the package.
    Purge(String),
}

impl Action {
    /// The package this action affects.
    pub fn package(&self) -> &str {
        match self {
            Action::MarkManual(name)
            | Action::MarkAuto(name)
            | Action::Hold(name)
            | Action::Unhold(name)
            | Action::Purge(name) => name,
        }
    }

    /// Human-readable description for reports.
    pub fn description(&self) -> String {
        match self {
            Action::MarkManual(name) => format!("mark {} as manually installed", name),
            Action::MarkAuto(name) => format!("mark {} as automatically installed", name),
            Action::Hold(name) => format!("hold {}", name),
            Action::Unhold(name) => format!("release hold on {}", name),
            Action::Purge(name) => format!("purge {}", name),
        }
    }
}

/// The outcome of a reconciliation pass.
///
/// `actions` carries holds, then releases, then purges: the order a
/// sequential consumer must replay them in, with removals last so they
/// supersede anything else said about the same package. Marks are not part
/// of the replayable plan; they were already applied mid-pass (or withheld
/// under noop) and appear here for the transcript.
#[derive(Debug, Clone, Default)]
pub struct ActionPlan {
    /// Holds, releases and purges, in replay order.
    pub actions: Vec<Action>,
    /// Auto/manual marks issued during the pass.
    pub marks: Vec<Action>,
    /// Propagated no-op flag: a consumer must not execute `actions` when
    /// set.
    pub noop: bool,
    /// Human-readable caveats for the report.
    pub warnings: Vec<String>,
}

impl ActionPlan {
    /// True when the pass found nothing to change.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn holds(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter_map(|action| match action {
                Action::Hold(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn unholds(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter_map(|action| match action {
                Action::Unhold(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn purges(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter_map(|action| match action {
                Action::Purge(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Drives one reconciliation pass against a catalog and a command runner.
pub struct Reconciler<'a> {
    runner: &'a dyn CommandRunner,
    catalog: &'a dyn Catalog,
    options: SweepOptions,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        catalog: &'a dyn Catalog,
        options: SweepOptions,
    ) -> Self {
        Self {
            runner,
            catalog,
            options,
        }
    }

    /// Take a fresh snapshot and run the full pass.
    pub fn run(&self) -> Result<ActionPlan> {
        let snapshot = status::read_snapshot(self.runner)?;
        self.run_with_snapshot(&snapshot)
    }

    /// Run the pass against an already-taken snapshot.
    pub fn run_with_snapshot(&self, snapshot: &status::SystemSnapshot) -> Result<ActionPlan> {
        let (managed, unmanaged) = classify::partition(snapshot, self.catalog);
        debug!(
            "Partitioned {} package(s): {} managed, {} unmanaged",
            snapshot.len(),
            managed.len(),
            unmanaged.len()
        );

        // Nothing below this line may run while the managed set is in flux.
        sync::ensure_converged(self.catalog, snapshot)?;

        let mut plan = ActionPlan {
            noop: self.options.noop,
            ..ActionPlan::default()
        };

        let purges = if self.options.purge {
            let managed_names: Vec<String> =
                managed.iter().map(|p| p.name().to_string()).collect();
            let unmanaged_names: Vec<String> =
                unmanaged.iter().map(|s| s.name.clone()).collect();

            if self.options.noop {
                plan.warnings.push(
                    "noop: auto/manual marks were not written; purge candidates reflect \
                     the flags currently on the system"
                        .to_string(),
                );
            } else {
                // Managed packages must be manual before the simulation
                // runs: an unmanaged dependency survives the autoremover
                // only if something manual still needs it.
                mark::mark_manual(self.runner, &managed_names)?;
                mark::mark_auto(self.runner, &unmanaged_names)?;
                plan.marks
                    .extend(managed_names.into_iter().map(Action::MarkManual));
                plan.marks
                    .extend(unmanaged_names.into_iter().map(Action::MarkAuto));
            }

            let candidates = autoremove::simulate_autoremove(self.runner)?;
            purge::resolve_purges(&unmanaged, &candidates, self.options.whitelist.as_ref())
        } else {
            Vec::new()
        };

        let (holds, unholds) = if self.options.hold {
            (
                hold::resolve_holds(&managed),
                hold::resolve_unholds(&managed, &unmanaged, &purges),
            )
        } else {
            (Vec::new(), Vec::new())
        };

        plan.actions.extend(holds.into_iter().map(Action::Hold));
        plan.actions.extend(unholds.into_iter().map(Action::Unhold));
        plan.actions.extend(purges.into_iter().map(Action::Purge));

        info!(
            "Pass complete: {} action(s), {} mark(s)",
            plan.actions.len(),
            plan.marks.len()
        );
        Ok(plan)
    }
}

/// Execute a plan: selection changes first (holds before releases), then
/// removals last. In no-op mode every action is reported and nothing is
/// issued.
pub fn apply_plan(runner: &dyn CommandRunner, plan: &ActionPlan) -> Result<()> {
    if plan.noop {
        for action in &plan.actions {
            info!("[noop] would {}", action.description());
        }
        info!("[noop] {} action(s) not applied", plan.actions.len());
        return Ok(());
    }

    let holds: Vec<String> = plan.holds().iter().map(|s| s.to_string()).collect();
    let unholds: Vec<String> = plan.unholds().iter().map(|s| s.to_string()).collect();
    let purges: Vec<String> = plan.purges().iter().map(|s| s.to_string()).collect();

    selections::apply_selections(runner, &holds, &unholds)?;
    selections::purge_packages(runner, &purges)?;

    Ok(())
}
