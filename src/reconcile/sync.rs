// src/reconcile/sync.rs

//! The safety gate: no mutation while the managed set is unconverged.
//!
//! Auto/manual flags and the autoremove simulation are only meaningful
//! against a settled dependency graph. If a managed package is missing or at
//! the wrong version, the next catalog apply will change that graph, and
//! anything computed now could mark the wrong packages or purge a dependency
//! the apply still needs. The pass must stop before its first mutation.
//!
//! The check walks the catalog rather than the snapshot's managed partition:
//! a declared package dpkg has never heard of would not appear in any
//! partition, and it is exactly the case that must block the pass.

use crate::apt::status::{PackageState, SystemSnapshot};
use crate::catalog::{Catalog, DesiredState};
use crate::error::{Error, Result};
use tracing::warn;

/// Does the live state satisfy the declaration? A package dpkg has no
/// record of satisfies only `absent`.
pub fn in_sync(desired: &DesiredState, state: Option<&PackageState>) -> bool {
    desired.matches_installed(state.and_then(PackageState::installed_version))
}

/// Names of catalog entries whose live state does not match, in catalog
/// order.
pub fn unsynced_packages(catalog: &dyn Catalog, snapshot: &SystemSnapshot) -> Vec<String> {
    catalog
        .entries()
        .iter()
        .filter(|entry| !in_sync(&entry.ensure, snapshot.get(entry.package_name())))
        .map(|entry| entry.package_name().to_string())
        .collect()
}

/// Abort the pass when any managed package is unconverged.
pub fn ensure_converged(catalog: &dyn Catalog, snapshot: &SystemSnapshot) -> Result<()> {
    let unsynced = unsynced_packages(catalog, snapshot);
    if unsynced.is_empty() {
        return Ok(());
    }

    warn!(
        "It isn't safe to sweep packages right now: {} managed package(s) \
         are not at their declared state ({})",
        unsynced.len(),
        unsynced.join(", ")
    );
    Err(Error::NotConverged { packages: unsynced })
}
