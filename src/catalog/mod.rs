// src/catalog/mod.rs

//! The declared package catalog: what this host should look like.
//!
//! The reconciliation core is written against the read-only [`Catalog`]
//! trait. An entry carries a desired state and, optionally, a dpkg package
//! name that differs from the entry's own title; lookups resolve such
//! aliases, so membership is always decided by the real package name.
//!
//! Two implementations are provided: [`ManifestCatalog`], which loads the
//! production TOML manifest, and [`MemoryCatalog`] for embedding and tests.

pub mod manifest;

pub use manifest::{ManifestCatalog, ManifestError, ManifestResult, MANIFEST_VERSION};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Default path of the package manifest file
pub const DEFAULT_MANIFEST_PATH: &str = "/etc/aptsweep/manifest.toml";

/// Desired state of a managed package, as declared by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesiredState {
    /// The package must not be installed.
    Absent,
    /// Any installed version satisfies the declaration.
    Present,
    /// Track the newest available version; any installed version satisfies
    /// the equality check, upgrades are the package manager's business.
    Latest,
    /// Pinned to one exact version.
    Pinned(String),
}

impl DesiredState {
    /// Parse the manifest's `ensure` vocabulary. `absent`/`purged` and
    /// `present`/`installed` are synonyms; anything that is not a keyword
    /// is an exact version pin.
    pub fn parse(s: &str) -> Self {
        match s {
            "absent" | "purged" => Self::Absent,
            "present" | "installed" => Self::Present,
            "latest" => Self::Latest,
            version => Self::Pinned(version.to_string()),
        }
    }

    /// True when the declaration pins one exact version.
    pub fn is_pinned(&self) -> bool {
        matches!(self, Self::Pinned(_))
    }

    /// Does an installed version (or the absence of one) satisfy this
    /// declaration?
    pub fn matches_installed(&self, installed: Option<&str>) -> bool {
        match self {
            Self::Absent => installed.is_none(),
            Self::Present | Self::Latest => installed.is_some(),
            Self::Pinned(version) => installed == Some(version.as_str()),
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::Present => write!(f, "present"),
            Self::Latest => write!(f, "latest"),
            Self::Pinned(version) => write!(f, "{}", version),
        }
    }
}

/// Package providers that belong to the dpkg family.
///
/// Catalog entries handled by a provider outside this family describe some
/// other package universe and never contribute to the managed set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Apt,
    Aptitude,
    Dpkg,
}

impl Provider {
    /// Parse a provider name; `None` for providers outside the dpkg family.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "apt" => Some(Self::Apt),
            "aptitude" => Some(Self::Aptitude),
            "dpkg" => Some(Self::Dpkg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Aptitude => "aptitude",
            Self::Dpkg => "dpkg",
        }
    }
}

/// One catalog declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Title of the declaration, how the catalog names it.
    pub name: String,
    /// Underlying dpkg package name, when it differs from the title.
    pub package: Option<String>,
    /// Declared desired state.
    pub ensure: DesiredState,
    /// Managing provider.
    pub provider: Provider,
}

impl CatalogEntry {
    pub fn new(name: &str, ensure: DesiredState) -> Self {
        Self {
            name: name.to_string(),
            package: None,
            ensure,
            provider: Provider::default(),
        }
    }

    /// Declare an entry whose title differs from the dpkg package name.
    pub fn with_package(mut self, package: &str) -> Self {
        self.package = Some(package.to_string());
        self
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    /// The dpkg package name this entry manages.
    pub fn package_name(&self) -> &str {
        self.package.as_deref().unwrap_or(&self.name)
    }
}

/// Read-only query interface the reconciliation core is written against.
pub trait Catalog {
    /// Look up the entry managing a dpkg package name. Aliases resolve: an
    /// entry whose declared package name matches counts even when its title
    /// does not.
    fn resolve(&self, name: &str) -> Option<&CatalogEntry>;

    /// Every entry in the catalog.
    fn entries(&self) -> &[CatalogEntry];

    /// Declared desired state for a package name, if managed.
    fn desired_state(&self, name: &str) -> Option<&DesiredState> {
        self.resolve(name).map(|entry| &entry.ensure)
    }

    /// True when the package appears in the catalog, directly or via alias.
    fn is_managed(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

/// In-memory catalog for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    entries: Vec<CatalogEntry>,
    index: BTreeMap<String, usize>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. A later entry replaces an earlier one declaring the
    /// same package name.
    pub fn insert(&mut self, entry: CatalogEntry) {
        match self.index.get(entry.package_name()) {
            Some(&position) => self.entries[position] = entry,
            None => {
                self.index
                    .insert(entry.package_name().to_string(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }
}

impl Catalog for MemoryCatalog {
    fn resolve(&self, name: &str) -> Option<&CatalogEntry> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

/// Reconciliation options, merged from the manifest's `[sweep]` table and
/// command-line flags.
#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    /// Enable the mark/purge pipeline.
    pub purge: bool,
    /// Enable hold management for pinned packages.
    pub hold: bool,
    /// Compute and report the plan but issue no mutating command.
    pub noop: bool,
    /// Route the external tool transcript to the visible log.
    pub debug: bool,
    /// Rewrite `present` declarations to `latest` at load time.
    pub prefer_latest: bool,
    /// When set, only these packages may be purged.
    pub whitelist: Option<BTreeSet<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_desired_state_keywords() {
        assert_eq!(DesiredState::parse("absent"), DesiredState::Absent);
        assert_eq!(DesiredState::parse("purged"), DesiredState::Absent);
        assert_eq!(DesiredState::parse("present"), DesiredState::Present);
        assert_eq!(DesiredState::parse("installed"), DesiredState::Present);
        assert_eq!(DesiredState::parse("latest"), DesiredState::Latest);
    }

    #[test]
    fn test_parse_desired_state_version_pin() {
        assert_eq!(
            DesiredState::parse("2.10-1"),
            DesiredState::Pinned("2.10-1".to_string())
        );
        assert!(DesiredState::parse("2.10-1").is_pinned());
        assert!(!DesiredState::parse("latest").is_pinned());
    }

    #[test]
    fn test_matches_installed() {
        assert!(DesiredState::Absent.matches_installed(None));
        assert!(!DesiredState::Absent.matches_installed(Some("1.0")));

        assert!(DesiredState::Present.matches_installed(Some("1.0")));
        assert!(!DesiredState::Present.matches_installed(None));

        assert!(DesiredState::Latest.matches_installed(Some("0.9")));
        assert!(!DesiredState::Latest.matches_installed(None));

        let pinned = DesiredState::Pinned("2.10-1".to_string());
        assert!(pinned.matches_installed(Some("2.10-1")));
        assert!(!pinned.matches_installed(Some("2.10-2")));
        assert!(!pinned.matches_installed(None));
    }

    #[test]
    fn test_provider_family() {
        assert_eq!(Provider::parse("apt"), Some(Provider::Apt));
        assert_eq!(Provider::parse("aptitude"), Some(Provider::Aptitude));
        assert_eq!(Provider::parse("dpkg"), Some(Provider::Dpkg));
        assert_eq!(Provider::parse("yum"), None);
        assert_eq!(Provider::parse("gem"), None);
    }

    #[test]
    fn test_entry_package_name_prefers_alias() {
        let plain = CatalogEntry::new("nginx", DesiredState::Latest);
        assert_eq!(plain.package_name(), "nginx");

        let aliased =
            CatalogEntry::new("fortunespkg", DesiredState::Present).with_package("fortunes");
        assert_eq!(aliased.package_name(), "fortunes");
    }

    #[test]
    fn test_memory_catalog_resolves_by_package_name() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert(CatalogEntry::new("nginx", DesiredState::Latest));
        catalog
            .insert(CatalogEntry::new("fortunespkg", DesiredState::Present).with_package("fortunes"));

        assert!(catalog.is_managed("nginx"));
        assert!(catalog.is_managed("fortunes"));
        // The alias title is not itself a package name.
        assert!(!catalog.is_managed("fortunespkg"));
        assert!(!catalog.is_managed("redis"));

        assert_eq!(
            catalog.desired_state("nginx"),
            Some(&DesiredState::Latest)
        );
        assert_eq!(catalog.entries().len(), 2);
    }

    #[test]
    fn test_memory_catalog_replaces_duplicate_package() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert(CatalogEntry::new("nginx", DesiredState::Present));
        catalog.insert(CatalogEntry::new("nginx", DesiredState::Latest));

        assert_eq!(catalog.entries().len(), 1);
        assert_eq!(catalog.desired_state("nginx"), Some(&DesiredState::Latest));
    }
}
