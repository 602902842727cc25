// src/catalog/manifest.rs

//! TOML manifest catalog.
//!
//! The manifest is the declarative side of reconciliation: a `[sweep]` table
//! of options and one `[[package]]` table per managed package.
//!
//! ```toml
//! [sweep]
//! version = 1
//! purge = true
//! hold = true
//! whitelist = ["dict-jargon", "dictd"]
//!
//! [[package]]
//! name = "nginx"
//! ensure = "latest"
//!
//! # The catalog title and the dpkg package name may differ
//! [[package]]
//! name = "fortunespkg"
//! package = "fortunes"
//! ensure = "2.10-1"
//! ```
//!
//! `ensure` accepts `absent`/`purged`, `present`/`installed`, `latest`, or an
//! exact version string. Entries with a provider outside the dpkg family are
//! skipped at load time; two entries declaring the same package are rejected.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::{Catalog, CatalogEntry, DesiredState, Provider, SweepOptions};

/// Current manifest file version
pub const MANIFEST_VERSION: u32 = 1;

/// Errors that can occur when loading a package manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse manifest file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid manifest version: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Conflicting manifest entries: {0}")]
    ConflictingEntry(String),

    #[error("Invalid ensure value for '{name}': {reason}")]
    InvalidEnsure { name: String, reason: String },
}

/// Result type for manifest operations
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Raw file shape, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    sweep: SweepSection,
    #[serde(default, rename = "package")]
    packages: Vec<PackageSection>,
}

#[derive(Debug, Clone, Deserialize)]
struct SweepSection {
    #[serde(default = "default_manifest_version")]
    version: u32,
    #[serde(default)]
    purge: bool,
    #[serde(default)]
    hold: bool,
    #[serde(default)]
    noop: bool,
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    prefer_latest: bool,
    #[serde(default)]
    whitelist: Option<Vec<String>>,
}

impl Default for SweepSection {
    fn default() -> Self {
        Self {
            version: MANIFEST_VERSION,
            purge: false,
            hold: false,
            noop: false,
            debug: false,
            prefer_latest: false,
            whitelist: None,
        }
    }
}

fn default_manifest_version() -> u32 {
    MANIFEST_VERSION
}

#[derive(Debug, Clone, Deserialize)]
struct PackageSection {
    name: String,
    #[serde(default)]
    package: Option<String>,
    #[serde(default = "default_ensure")]
    ensure: String,
    #[serde(default)]
    provider: Option<String>,
}

fn default_ensure() -> String {
    "present".to_string()
}

/// The production catalog: entries and options loaded from a TOML manifest.
#[derive(Debug, Clone)]
pub struct ManifestCatalog {
    options: SweepOptions,
    entries: Vec<CatalogEntry>,
    index: BTreeMap<String, usize>,
}

impl ManifestCatalog {
    /// Load and validate a manifest file.
    pub fn load(path: &Path) -> ManifestResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate manifest content.
    pub fn parse(content: &str) -> ManifestResult<Self> {
        let file: ManifestFile = toml::from_str(content)?;

        if file.sweep.version != MANIFEST_VERSION {
            return Err(ManifestError::VersionMismatch {
                expected: MANIFEST_VERSION,
                found: file.sweep.version,
            });
        }

        let options = SweepOptions {
            purge: file.sweep.purge,
            hold: file.sweep.hold,
            noop: file.sweep.noop,
            debug: file.sweep.debug,
            prefer_latest: file.sweep.prefer_latest,
            whitelist: file
                .sweep
                .whitelist
                .map(|names| names.into_iter().collect()),
        };

        let mut entries: Vec<CatalogEntry> = Vec::new();
        let mut index: BTreeMap<String, usize> = BTreeMap::new();

        for section in file.packages {
            if section.name.trim().is_empty() {
                return Err(ManifestError::ConflictingEntry(
                    "package entry with an empty name".to_string(),
                ));
            }

            let provider = match section.provider.as_deref() {
                None => Provider::default(),
                Some(value) => match Provider::parse(value) {
                    Some(provider) => provider,
                    None => {
                        debug!(
                            "Ignoring manifest entry '{}': provider '{}' is not in the dpkg family",
                            section.name, value
                        );
                        continue;
                    }
                },
            };

            if section.ensure.trim().is_empty() {
                return Err(ManifestError::InvalidEnsure {
                    name: section.name,
                    reason: "ensure must not be empty".to_string(),
                });
            }

            let mut ensure = DesiredState::parse(&section.ensure);
            if options.prefer_latest && ensure == DesiredState::Present {
                ensure = DesiredState::Latest;
            }

            let entry = CatalogEntry {
                name: section.name,
                package: section.package,
                ensure,
                provider,
            };

            if let Some(&existing) = index.get(entry.package_name()) {
                let other = &entries[existing];
                return Err(ManifestError::ConflictingEntry(format!(
                    "'{}' and '{}' both manage package '{}'",
                    other.name,
                    entry.name,
                    entry.package_name()
                )));
            }

            index.insert(entry.package_name().to_string(), entries.len());
            entries.push(entry);
        }

        Ok(Self {
            options,
            entries,
            index,
        })
    }

    /// Options from the manifest's `[sweep]` table.
    pub fn options(&self) -> &SweepOptions {
        &self.options
    }
}

impl Catalog for ManifestCatalog {
    fn resolve(&self, name: &str) -> Option<&CatalogEntry> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}
