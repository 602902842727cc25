// src/reconcile/classify.rs

//! Partitioning the snapshot into managed and unmanaged packages.

use crate::apt::status::{PackageState, SystemSnapshot};
use crate::catalog::{Catalog, DesiredState};

/// A snapshot package together with the catalog's declaration for it.
#[derive(Debug, Clone)]
pub struct ManagedPackage {
    pub state: PackageState,
    pub desired: DesiredState,
}

impl ManagedPackage {
    pub fn name(&self) -> &str {
        &self.state.name
    }
}

/// Divide the snapshot into catalog-managed packages and everything else.
///
/// The partition is total: every snapshot package lands in exactly one of
/// the two lists, in name order. Membership is alias-aware, so an entry
/// declared under a title that differs from the dpkg package name still
/// claims its package. A name with no catalog entry is not an error; it is
/// simply unmanaged.
pub fn partition(
    snapshot: &SystemSnapshot,
    catalog: &dyn Catalog,
) -> (Vec<ManagedPackage>, Vec<PackageState>) {
    let mut managed = Vec::new();
    let mut unmanaged = Vec::new();

    for state in snapshot.packages() {
        match catalog.resolve(&state.name) {
            Some(entry) => managed.push(ManagedPackage {
                state: state.clone(),
                desired: entry.ensure.clone(),
            }),
            None => unmanaged.push(state.clone()),
        }
    }

    (managed, unmanaged)
}
