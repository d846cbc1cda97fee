//! Data models for the remote patch manifest and the simplified records
//! derived from it.
//! [serde_json] is used for JSON serialization/deserialization of these models.

use serde::{Deserialize, Deserializer, Serialize};

/// One patch as declared in the remote manifest. Treated read-only once
/// deserialized.
#[derive(Deserialize, Clone, Debug)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    #[serde(default)]
    pub excluded: bool,
    /// Empty means the patch applies to any package (a "global" patch).
    #[serde(
        rename = "compatiblePackages",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub compatible_packages: Vec<CompatiblePackage>,
}

/// A package (and optionally the versions of it) that a patch supports.
#[derive(Deserialize, Clone, Debug)]
pub struct CompatiblePackage {
    pub name: String,
    /// Empty means every version of the package is supported.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub versions: Vec<String>,
}

// The manifest serializes "no restriction" as either a missing key, an empty
// list or an explicit null, so all three must deserialize to the empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The trimmed view of a catalog entry that is sent to the consumer and used
/// for include/exclude selection.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PatchRecord {
    pub name: String,
    /// Derived from `name`; see [patch_token].
    pub token: String,
    pub description: String,
    /// The patch bundle version the entry originates from.
    pub origin_version: String,
    /// Whether the patch must be explicitly included to be applied.
    pub excluded_by_default: bool,
}

impl PatchRecord {
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            name: entry.name.clone(),
            token: patch_token(&entry.name),
            description: entry.description.clone(),
            origin_version: entry.version.clone(),
            excluded_by_default: entry.excluded,
        }
    }
}

/// The normalized identifier used to select a patch: the display name,
/// lowercased, with spaces replaced by hyphens.
///
/// Tokens are not guaranteed unique by the manifest; lookups by token are
/// last-match-wins.
pub fn patch_token(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_lowercased_and_hyphenated() {
        assert_eq!(patch_token("Remove ads"), "remove-ads");
        assert_eq!(patch_token("HDR auto brightness"), "hdr-auto-brightness");
        assert_eq!(patch_token("already-a-token"), "already-a-token");
    }

    #[test]
    fn entry_tolerates_null_package_and_version_lists() {
        let entry: CatalogEntry = serde_json::from_str(
            r#"{
                "name": "Some patch",
                "description": "Does something",
                "version": "1.0.0",
                "excluded": false,
                "compatiblePackages": null
            }"#,
        )
        .expect("entry should deserialize");
        assert!(entry.compatible_packages.is_empty());

        let entry: CatalogEntry = serde_json::from_str(
            r#"{
                "name": "Other patch",
                "version": "1.0.0",
                "compatiblePackages": [{ "name": "com.example.app", "versions": null }]
            }"#,
        )
        .expect("entry should deserialize");
        assert!(entry.compatible_packages[0].versions.is_empty());
    }

    #[test]
    fn record_is_a_pure_mapping_of_the_entry() {
        let entry: CatalogEntry = serde_json::from_str(
            r#"{
                "name": "Remove ads",
                "description": "Removes ads",
                "version": "2.0.1",
                "excluded": true,
                "compatiblePackages": []
            }"#,
        )
        .expect("entry should deserialize");

        let record = PatchRecord::from_entry(&entry);
        assert_eq!(record.name, "Remove ads");
        assert_eq!(record.token, "remove-ads");
        assert_eq!(record.description, "Removes ads");
        assert_eq!(record.origin_version, "2.0.1");
        assert!(record.excluded_by_default);
    }
}
