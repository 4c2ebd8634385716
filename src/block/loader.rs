//! Catalog loader for block definitions stored as RON files.
//!
//! Each file in the catalog directory declares one namespace, its block
//! types with their traits, and the populators it contributes.
//!
//! # Example
//! ```
//! use blockswap::block::loader::load_catalog_from_dir;
//! use blockswap::block::registry::BlockTypeRegistry;
//!
//! let catalog = load_catalog_from_dir("data/catalog");
//! if let Some(log) = catalog.block_type("minecraft:log") {
//!     println!("log declares {} traits", log.traits().len());
//! }
//! ```

use super::registry::{Catalog, CatalogFile};
use crate::error::LoadReport;
use crate::ron_loader::load_ron_files;
use bevy::prelude::info;
use std::path::Path;

/// Load every catalog file from `path` into a fresh `Catalog`.
///
/// Files that fail to parse are skipped; invalid block definitions inside
/// a parsed file are skipped individually.
#[must_use]
pub fn load_catalog_from_dir(path: impl AsRef<Path>) -> Catalog {
    let (catalog, report) = load_catalog_with_report(path.as_ref());
    info!(
        blocks = catalog.block_count(),
        populators = catalog.populator_count(),
        skipped = report.issues.len(),
        "catalog loaded"
    );
    catalog
}

/// Like [`load_catalog_from_dir`], also returning what was skipped.
#[must_use]
pub fn load_catalog_with_report(path: &Path) -> (Catalog, LoadReport) {
    let mut catalog = Catalog::default();
    let mut report = LoadReport::default();
    let files: Vec<CatalogFile> = load_ron_files(path);
    for file in files {
        report.merge(catalog.register_file(file));
    }
    (catalog, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::registry::{BlockTypeRegistry, NamespaceRegistry, PopulatorRegistry};

    #[test]
    fn loads_every_namespace_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("minecraft.ron"),
            r#"(namespace: "minecraft", blocks: [(name: "stone"), (name: "log", traits: [(name: "axis", values: ["x", "y", "z"], default: Some("y"))])], populators: ["ore"])"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("modb.ron"),
            r#"(namespace: "modb", blocks: [(name: "bad", traits: [(name: "a", values: [])])], populators: ["ore_gen"])"#,
        )
        .unwrap();

        let (catalog, report) = load_catalog_with_report(dir.path());

        assert_eq!(report.loaded, 2);
        assert_eq!(report.issues.len(), 1);
        assert!(catalog.namespace("modb").is_some());
        assert!(catalog.populator_type("modb:ore_gen").is_some());
        assert!(catalog.populator_type("ore").is_some());
        let log = catalog.block_type("log").unwrap();
        assert_eq!(log.default_state().value("axis"), Some("y"));
    }

    #[test]
    fn bundled_catalog_covers_default_mappings() {
        let catalog = load_catalog_from_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalog"));
        for id in ["minecraft:log", "minecraft:water", "minecraft:gravel", "minecraft:dirt"] {
            assert!(catalog.block_type(id).is_some(), "{id} missing");
        }
        assert!(catalog.populator_type("minecraft:ore").is_some());
    }
}
