//! The owned patch catalog and its compatibility filtering operations.
//!
//! The catalog is loaded once at process start, handed by reference to every
//! component that needs it and replaced only by an explicit [Catalog::refresh]
//! call. It is never mutated in place.

use log::warn;

use crate::models::{CatalogEntry, PatchRecord};
use crate::remote::{self, CatalogError};

/// The set of patches declared by the remote manifest.
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

/// The compatible versions collected for a package.
///
/// `Any` is the degraded answer when at least one version string is not
/// dot-separated integers: a partial ordering would be misleading, so no
/// ordering is claimed at all.
#[derive(Clone, Debug, PartialEq)]
pub enum VersionList {
    /// Unique versions, ascending by numeric dot-segment comparison.
    Ordered(Vec<String>),
    Any,
}

impl VersionList {
    /// The newest version, if one can be named.
    pub fn latest(&self) -> Option<&str> {
        match self {
            Self::Ordered(versions) => versions.last().map(String::as_str),
            Self::Any => None,
        }
    }
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Fetches the pinned manifest, degrading to the empty catalog when the
    /// fetch fails. Downstream filtering then behaves as "no patches
    /// available" rather than crashing.
    pub fn fetch_or_empty(agent: &ureq::Agent) -> Self {
        match remote::fetch_catalog(agent) {
            Ok(entries) => Self::new(entries),
            Err(err) => {
                warn!("Failed to load patch catalog, no patches will be available: {err}");
                Self::empty()
            }
        }
    }

    /// As [Catalog::fetch_or_empty], from an arbitrary manifest URL.
    pub fn fetch_or_empty_from(agent: &ureq::Agent, url: &str) -> Self {
        match remote::fetch_catalog_from(agent, url) {
            Ok(entries) => Self::new(entries),
            Err(err) => {
                warn!("Failed to load patch catalog, no patches will be available: {err}");
                Self::empty()
            }
        }
    }

    /// Re-fetches the manifest, returning a replacement catalog. The current
    /// value is untouched; the owner swaps it in explicitly.
    pub fn refresh(agent: &ureq::Agent) -> Result<Self, CatalogError> {
        remote::fetch_catalog(agent).map(Self::new)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The patches applicable to the given package and version, in catalog
    /// order, as a lazy sequence recomputed on every call.
    ///
    /// An entry with no compatible-package restrictions is always yielded, as
    /// is every entry when the caller supplies neither a name nor a version.
    /// Otherwise the entry is yielded when some restriction names the given
    /// package and either carries no version list or lists the given version.
    /// Each entry is yielded at most once, even if several restrictions match.
    pub fn compatible_patches<'a>(
        &'a self,
        package_name: Option<&'a str>,
        package_version: Option<&'a str>,
    ) -> impl Iterator<Item = PatchRecord> + 'a {
        self.entries
            .iter()
            .filter(move |entry| {
                if entry.compatible_packages.is_empty()
                    || (package_name.is_none() && package_version.is_none())
                {
                    return true;
                }

                entry.compatible_packages.iter().any(|package| {
                    package_name == Some(package.name.as_str())
                        && (package.versions.is_empty()
                            || package_version
                                .is_some_and(|version| package.versions.iter().any(|v| v == version)))
                })
            })
            .map(PatchRecord::from_entry)
    }

    /// Collects the unique versions supported for `package_name` across the
    /// whole catalog, ascending by numeric dot-segment comparison.
    pub fn all_compatible_versions(&self, package_name: &str) -> VersionList {
        let mut versions: Vec<String> = Vec::new();
        for entry in &self.entries {
            for package in &entry.compatible_packages {
                if package.name == package_name {
                    for version in &package.versions {
                        if !versions.contains(version) {
                            versions.push(version.clone());
                        }
                    }
                }
            }
        }

        let mut keyed: Vec<(Vec<u64>, String)> = Vec::with_capacity(versions.len());
        for version in versions {
            match numeric_key(&version) {
                Some(key) => keyed.push((key, version)),
                None => return VersionList::Any,
            }
        }

        keyed.sort();
        VersionList::Ordered(keyed.into_iter().map(|(_, version)| version).collect())
    }

    /// Whether the patch selected by `token` is excluded by default.
    ///
    /// Scans the unfiltered patch sequence; the last record with a matching
    /// token wins, and an unknown token counts as not excluded.
    pub fn is_excluded_by_default(&self, token: &str) -> bool {
        self.compatible_patches(None, None)
            .filter(|patch| patch.token == token)
            .last()
            .map(|patch| patch.excluded_by_default)
            .unwrap_or(false)
    }
}

// "1.10.0" -> [1, 10, 0]. None when any segment is not an integer.
fn numeric_key(version: &str) -> Option<Vec<u64>> {
    version.split('.').map(|segment| segment.parse().ok()).collect()
}
