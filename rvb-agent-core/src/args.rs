//! Computes the extra patcher CLI flags for a patch selection.

use rvb_catalog::catalog::Catalog;
use serde::Deserialize;

/// The include/exclude choices made by the user for one patch run. Tokens
/// are normalized patch names (see [rvb_catalog::models::patch_token]).
#[derive(Deserialize, Clone, Debug, Default)]
pub struct PatchSelection {
    #[serde(default)]
    pub included_patches: Vec<String>,
    #[serde(default)]
    pub excluded_patches: Vec<String>,
}

/// The flags needed to override only the selections that differ from the
/// catalog default: `-i` switches on a patch that is excluded by default,
/// `-e` switches off one that is not. A selection that matches the default
/// produces no flag. Included patches come first; input order is preserved
/// within each group.
pub fn selection_args(catalog: &Catalog, selection: &PatchSelection) -> Vec<String> {
    let mut args = Vec::new();

    for token in &selection.included_patches {
        if catalog.is_excluded_by_default(token) {
            args.push("-i".to_owned());
            args.push(token.clone());
        }
    }
    for token in &selection.excluded_patches {
        if !catalog.is_excluded_by_default(token) {
            args.push("-e".to_owned());
            args.push(token.clone());
        }
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use rvb_catalog::models::CatalogEntry;

    fn entry(name: &str, excluded: bool) -> CatalogEntry {
        CatalogEntry {
            name: name.to_owned(),
            description: String::new(),
            version: "1.0.0".to_owned(),
            excluded,
            compatible_packages: Vec::new(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![entry("Foo", true), entry("Bar", false)])
    }

    #[test]
    fn including_a_default_excluded_patch_emits_an_include_flag() {
        let selection = PatchSelection {
            included_patches: vec!["foo".to_owned()],
            excluded_patches: Vec::new(),
        };

        assert_eq!(selection_args(&catalog(), &selection), vec!["-i", "foo"]);
    }

    #[test]
    fn including_a_default_included_patch_emits_nothing() {
        let selection = PatchSelection {
            included_patches: vec!["bar".to_owned()],
            excluded_patches: Vec::new(),
        };

        assert!(selection_args(&catalog(), &selection).is_empty());
    }

    #[test]
    fn excluding_a_default_included_patch_emits_an_exclude_flag() {
        let selection = PatchSelection {
            included_patches: Vec::new(),
            excluded_patches: vec!["bar".to_owned()],
        };

        assert_eq!(selection_args(&catalog(), &selection), vec!["-e", "bar"]);
    }

    #[test]
    fn excluding_a_default_excluded_patch_emits_nothing() {
        let selection = PatchSelection {
            included_patches: Vec::new(),
            excluded_patches: vec!["foo".to_owned()],
        };

        assert!(selection_args(&catalog(), &selection).is_empty());
    }

    #[test]
    fn includes_come_before_excludes_in_input_order() {
        let catalog = Catalog::new(vec![
            entry("A", true),
            entry("B", true),
            entry("C", false),
            entry("D", false),
        ]);
        let selection = PatchSelection {
            included_patches: vec!["b".to_owned(), "a".to_owned()],
            excluded_patches: vec!["d".to_owned(), "c".to_owned()],
        };

        assert_eq!(
            selection_args(&catalog, &selection),
            vec!["-i", "b", "-i", "a", "-e", "d", "-e", "c"]
        );
    }
}
