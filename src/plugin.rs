//! `SwapPlugin` wires the resolvers into a bevy `App`: it inserts the
//! settings, catalog, resolvers and population queue as resources, loads
//! the mappings at startup and registers the swap, hot-reload and dump
//! systems.
use crate::alias::AliasResolver;
use crate::block::registry::Catalog;
use crate::debug::{handle_dump_requests, DumpRequest};
use crate::mapping::loader::{
    check_mapping_changes, ensure_default_files, load_mappings, setup_mappings_watcher, MappingsWatcher,
};
use crate::populator::hook::{swap_populated_blocks, PendingPopulation};
use crate::populator::ReplacementResolver;
use crate::settings::SwapSettings;
use bevy::prelude::*;

pub struct SwapPlugin {
    pub settings: SwapSettings,
    pub catalog: Catalog,
}

impl SwapPlugin {
    #[must_use]
    pub fn new(settings: SwapSettings, catalog: Catalog) -> Self {
        Self { settings, catalog }
    }
}

impl Plugin for SwapPlugin {
    fn build(&self, app: &mut App) {
        let settings = self.settings.clone();
        let mut catalog = self.catalog.clone();
        catalog.set_implicit_namespace(&settings.resolution.implicit_namespace);

        // The watcher needs the config dir to exist before it can register.
        if let Err(e) = ensure_default_files(&settings.paths) {
            error!("could not write default mapping files: {e}");
        }

        let watcher = if settings.resolution.hot_reload {
            setup_mappings_watcher(&settings.paths).unwrap_or_else(|e| {
                warn!("hot reload disabled: {e}");
                MappingsWatcher::stub()
            })
        } else {
            MappingsWatcher::stub()
        };

        app.insert_resource(ReplacementResolver::with_implicit_namespace(
            &settings.resolution.implicit_namespace,
        ))
        .insert_resource(AliasResolver::default())
        .insert_resource(catalog)
        .insert_resource(PendingPopulation::default())
        .insert_resource(watcher)
        .insert_resource(settings)
        .add_event::<DumpRequest>()
        .add_systems(Startup, load_mappings)
        .add_systems(
            Update,
            (check_mapping_changes, swap_populated_blocks, handle_dump_requests).chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::registry::{BlockTypeRegistry, PopulatorRegistry};
    use crate::block::{BlockType, Namespace};
    use crate::populator::hook::{BlockTransaction, PopulatedChunk};

    #[test]
    fn plugin_loads_mappings_and_swaps_queued_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = SwapSettings::default();
        settings.paths.config_dir = dir.path().to_path_buf();
        settings.resolution.hot_reload = false;
        std::fs::write(settings.paths.blockstates_path(), "(mappings: {})").unwrap();
        std::fs::write(
            settings.paths.populators_path(),
            r#"(all: { "minecraft:water": "minecraft:dirt" }, populators: { "minecraft": { "ore": { "stone": "gravel" } } })"#,
        )
        .unwrap();

        let mut catalog = Catalog::default();
        let minecraft = Namespace::new("minecraft");
        for name in ["stone", "gravel", "water", "dirt", "air"] {
            catalog.register_block(BlockType::new(minecraft.clone(), name, Vec::new()));
        }
        let ore = catalog.register_populator("minecraft", "ore");
        let state = |id: &str| catalog.block_type(id).unwrap().default_state();

        let mut chunk = PopulatedChunk::default();
        chunk.transactions.insert(
            ore.clone(),
            vec![
                BlockTransaction::new((1, 2, 3), state("air"), state("stone")),
                BlockTransaction::new((1, 3, 3), state("air"), state("water")),
            ],
        );
        let expected = [state("gravel"), state("dirt")];
        assert!(catalog.populator_type("ore").is_some());

        let mut app = App::new();
        app.add_plugins(SwapPlugin::new(settings, catalog));
        app.world_mut().resource_mut::<PendingPopulation>().queued.push(chunk);
        app.update();

        let pending = app.world().resource::<PendingPopulation>();
        assert_eq!(pending.swapped.len(), 1);
        let results: Vec<_> = pending.swapped[0].transactions[&ore]
            .iter()
            .map(|t| t.resulting_state().clone())
            .collect();
        assert_eq!(results, expected);
    }

    #[test]
    fn catalog_follows_the_configured_implicit_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = SwapSettings::default();
        settings.paths.config_dir = dir.path().to_path_buf();
        settings.resolution.hot_reload = false;
        settings.resolution.implicit_namespace = "vanilla".to_string();

        let mut catalog = Catalog::default();
        catalog.register_block(BlockType::new(Namespace::new("vanilla"), "stone", Vec::new()));

        let mut app = App::new();
        app.add_plugins(SwapPlugin::new(settings, catalog));

        let catalog = app.world().resource::<Catalog>();
        assert_eq!(catalog.implicit_namespace(), "vanilla");
        assert!(catalog.block_type("stone").is_some());
        assert_eq!(app.world().resource::<ReplacementResolver>().implicit_namespace(), "vanilla");
    }
}
