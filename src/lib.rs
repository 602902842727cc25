// src/lib.rs

//! aptsweep: safe reconciliation of managed and unmanaged packages on
//! Debian-family hosts.
//!
//! aptsweep compares the packages a host actually has against a declared
//! manifest of managed packages and produces a minimal action plan: which
//! packages to hold at a pinned version, which holds to release, and which
//! unmanaged packages can be purged without breaking anything that is
//! managed.
//!
//! # How purging stays safe
//!
//! aptsweep never decides for itself whether a package is still needed.
//! It marks every managed package as manually installed and every unmanaged
//! package as automatically installed, then asks apt's own autoremover (in
//! simulation) what it would purge. Only unmanaged packages on that list
//! become removal candidates: if an unmanaged package is a dependency of
//! something managed, apt keeps it, and so does aptsweep.
//!
//! A pass refuses to run at all while any managed package is missing or at
//! the wrong version. Reconciling against a dependency graph that is still
//! in flux could mark the wrong packages or purge a dependency the next
//! apply needs.
//!
//! # Architecture
//!
//! - [`catalog`]: the declared side, a TOML manifest or in-memory entries
//! - [`apt`]: the live side, snapshot reads and mutations through the
//!   dpkg/apt tools
//! - [`reconcile`]: the pipeline that turns both into an [`ActionPlan`]
//! - [`exec`]: the command-runner seam the whole crate is tested through

pub mod apt;
pub mod catalog;
mod error;
pub mod exec;
pub mod reconcile;

pub use apt::status::{
    AutoFlag, InstallStatus, PackageState, Selection, SystemSnapshot, read_snapshot,
};
pub use catalog::{
    Catalog, CatalogEntry, DEFAULT_MANIFEST_PATH, DesiredState, ManifestCatalog, ManifestError,
    MemoryCatalog, Provider, SweepOptions,
};
pub use error::{Error, Result};
pub use exec::{CommandRunner, SystemRunner, ToolCommand, ToolOutput};
pub use reconcile::{Action, ActionPlan, ManagedPackage, Reconciler, apply_plan};
