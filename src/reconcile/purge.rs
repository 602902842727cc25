// src/reconcile/purge.rs

//! Final purge selection.
//!
//! The crux of the pipeline: the unmanaged partition intersected with the
//! set apt itself would autoremove. Reachability is never computed here. A
//! package appears in the result only because apt, with every managed
//! package marked manual, proved nothing still needs it.

use crate::apt::status::PackageState;
use std::collections::BTreeSet;

/// Intersect unmanaged packages with apt's purge candidates, restricted to
/// the whitelist when one is configured. Order follows the snapshot.
pub fn resolve_purges(
    unmanaged: &[PackageState],
    candidates: &BTreeSet<String>,
    whitelist: Option<&BTreeSet<String>>,
) -> Vec<String> {
    unmanaged
        .iter()
        .filter(|state| candidates.contains(&state.name))
        .filter(|state| whitelist.is_none_or(|list| list.contains(&state.name)))
        .map(|state| state.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apt::status::{AutoFlag, InstallStatus, Selection};

    fn installed(name: &str) -> PackageState {
        PackageState {
            name: name.to_string(),
            selection: Selection::Install,
            status: InstallStatus::Installed,
            version: Some("1.0-1".to_string()),
            auto: AutoFlag::Auto,
        }
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_purge_is_intersection() {
        let unmanaged = [installed("a"), installed("b"), installed("c")];
        let candidates = set(&["b", "c", "managed-dep"]);
        assert_eq!(resolve_purges(&unmanaged, &candidates, None), ["b", "c"]);
    }

    #[test]
    fn test_candidate_outside_unmanaged_is_ignored() {
        // apt can nominate a package the catalog manages; it must not be
        // purged on apt's say-so alone.
        let unmanaged = [installed("a")];
        let candidates = set(&["managed-pkg"]);
        assert!(resolve_purges(&unmanaged, &candidates, None).is_empty());
    }

    #[test]
    fn test_whitelist_narrows_the_result() {
        let unmanaged = [installed("x"), installed("y")];
        let candidates = set(&["x", "y"]);
        let whitelist = set(&["x"]);
        assert_eq!(
            resolve_purges(&unmanaged, &candidates, Some(&whitelist)),
            ["x"]
        );
    }

    #[test]
    fn test_empty_candidates_purge_nothing() {
        let unmanaged = [installed("a")];
        assert!(resolve_purges(&unmanaged, &BTreeSet::new(), None).is_empty());
    }
}
