// src/reconcile/hold.rs

//! Hold and release decisions for version-pinned packages.
//!
//! A managed package pinned to an exact version gets a dpkg hold so routine
//! upgrades cannot move it. A hold is released when the package stops being
//! pinned, either because its declaration moved to a generic state or
//! because it left the catalog, but never for a package this pass is about
//! to purge: the removal supersedes the release. All selection checks read
//! the pre-mutation snapshot, so a hold placed by this same pass cannot
//! influence its own decisions.

use super::classify::ManagedPackage;
use crate::apt::status::PackageState;
use std::collections::BTreeSet;

/// Managed packages to place on hold: explicitly pinned and not already
/// held. Skipping live holds keeps a converged system's plan empty.
pub fn resolve_holds(managed: &[ManagedPackage]) -> Vec<String> {
    managed
        .iter()
        .filter(|package| package.desired.is_pinned() && !package.state.is_held())
        .map(|package| package.name().to_string())
        .collect()
}

/// Packages whose hold must be released: live holds that are either managed
/// without a version pin, or unmanaged and not slated for purge.
pub fn resolve_unholds(
    managed: &[ManagedPackage],
    unmanaged: &[PackageState],
    purges: &[String],
) -> Vec<String> {
    let purging: BTreeSet<&str> = purges.iter().map(String::as_str).collect();

    let mut unholds: Vec<String> = managed
        .iter()
        .filter(|package| package.state.is_held() && !package.desired.is_pinned())
        .map(|package| package.name().to_string())
        .collect();

    unholds.extend(
        unmanaged
            .iter()
            .filter(|state| state.is_held() && !purging.contains(state.name.as_str()))
            .map(|state| state.name.clone()),
    );

    unholds.sort();
    unholds
}
