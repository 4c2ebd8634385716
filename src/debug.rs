//! Debug utilities: a trait dump listing every known block type with the
//! legal values of each of its traits, written to `dump.ron` in the config
//! directory.
//!
//! The dump mirrors the shape of `blockstates.ron`
//! (`namespace -> block -> trait -> values`), which makes it a convenient
//! starting point when authoring aliases.
use crate::block::registry::{BlockTypeRegistry, Catalog};
use crate::error::SwapError;
use crate::ron_loader::write_ron_file;
use crate::settings::SwapSettings;
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// namespace -> block -> trait -> legal values
pub type TraitDump = BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<String>>>>;

/// Ask for a trait dump. `path` overrides the configured dump file.
#[derive(Event, Debug, Clone, Default)]
pub struct DumpRequest {
    pub path: Option<PathBuf>,
}

/// Build the dump for every block type in `registry`. Blocks without
/// traits are listed with an empty map.
#[must_use]
pub fn dump_traits<R: BlockTypeRegistry + ?Sized>(registry: &R) -> TraitDump {
    let mut dump = TraitDump::new();
    for block_type in registry.block_types() {
        let traits = block_type
            .traits()
            .iter()
            .map(|t| (t.name().to_string(), t.values().to_vec()))
            .collect();
        dump.entry(block_type.namespace().id().to_string())
            .or_default()
            .insert(block_type.name().to_string(), traits);
    }
    dump
}

/// Write `dump` to `path`, replacing any previous dump.
///
/// # Errors
/// Returns `SwapError` if the file cannot be serialized or written.
pub fn write_dump(dump: &TraitDump, path: &Path) -> Result<(), SwapError> {
    let dt: DateTime<Utc> = DateTime::from(SystemTime::now());
    let block_count: usize = dump.values().map(BTreeMap::len).sum();
    let header = vec![
        format!("Trait dump: {block_count} blocks in {} namespaces", dump.len()),
        format!("Generated: {}", dt.format("%Y-%m-%d %H:%M:%S UTC")),
    ];
    write_ron_file(path, dump, &header)
}

/// Write the dump for every `DumpRequest` received this update.
#[allow(clippy::needless_pass_by_value)]
pub fn handle_dump_requests(mut requests: EventReader<DumpRequest>, catalog: Res<Catalog>, settings: Res<SwapSettings>) {
    for request in requests.read() {
        let path = request.path.clone().unwrap_or_else(|| settings.paths.dump_path());
        let dump = dump_traits(&*catalog);
        match write_dump(&dump, &path) {
            Ok(()) => info!("wrote trait dump: {}", path.display()),
            Err(e) => error!("trait dump failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockTrait, BlockType, Namespace};
    use crate::ron_loader::load_ron_file;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        let axis = BlockTrait::new("axis", ["x", "y", "z"], "y").unwrap();
        catalog.register_block(BlockType::new(Namespace::new("minecraft"), "log", vec![axis]));
        catalog.register_block(BlockType::new(Namespace::new("minecraft"), "stone", Vec::new()));
        catalog.register_block(BlockType::new(Namespace::new("modb"), "marble", Vec::new()));
        catalog
    }

    #[test]
    fn dump_groups_by_namespace_and_block() {
        let dump = dump_traits(&catalog());
        assert_eq!(dump.len(), 2);
        assert_eq!(dump["minecraft"]["log"]["axis"], vec!["x", "y", "z"]);
        assert!(dump["minecraft"]["stone"].is_empty());
        assert!(dump["modb"].contains_key("marble"));
    }

    #[test]
    fn written_dump_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.ron");
        std::fs::write(&path, "stale").unwrap();

        let dump = dump_traits(&catalog());
        write_dump(&dump, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("// Trait dump: 3 blocks in 2 namespaces"));
        let back: TraitDump = load_ron_file(&path).unwrap();
        assert_eq!(back, dump);
    }

    #[test]
    fn dump_request_event_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requested.ron");

        let mut app = App::new();
        app.add_event::<DumpRequest>();
        app.insert_resource(catalog());
        app.insert_resource(SwapSettings::default());
        app.add_systems(Update, handle_dump_requests);
        app.world_mut().send_event(DumpRequest { path: Some(path.clone()) });
        app.update();

        assert!(path.exists());
    }
}
