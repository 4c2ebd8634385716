//! Mapping loader and watcher: reads `blockstates.ron` and `populators.ron`,
//! rebuilds both resolvers and reloads them when the files change.
//!
//! Missing mapping files are created from the bundled defaults on first
//! start. A file that fails to parse leaves the resolvers untouched, so a
//! typo made while the host is running never wipes the live tables.
//!
//! # Example
//! ```no_run
//! use blockswap::alias::AliasResolver;
//! use blockswap::block::loader::load_catalog_from_dir;
//! use blockswap::mapping::loader::reload_from_disk;
//! use blockswap::populator::ReplacementResolver;
//! use blockswap::settings::SwapSettings;
//!
//! let settings = SwapSettings::default();
//! let catalog = load_catalog_from_dir("data/catalog");
//! let mut aliases = AliasResolver::default();
//! let mut replacements = ReplacementResolver::default();
//! let summary = reload_from_disk(&settings, &catalog, &mut aliases, &mut replacements).unwrap();
//! println!("{} aliases, {} issues", summary.aliases.loaded, summary.issue_count());
//! ```

use super::{BlockStateMappings, MappingFiles, PopulatorMappings};
use crate::alias::AliasResolver;
use crate::block::registry::{BlockTypeRegistry, Catalog, NamespaceRegistry, PopulatorRegistry};
use crate::error::{LoadReport, SwapError};
use crate::populator::ReplacementResolver;
use crate::ron_loader::{ensure_default_file, load_ron_file, setup_ron_watcher, RonWatcher};
use crate::settings::{PathSettings, SwapSettings};
use bevy::prelude::{error, info, Res, ResMut, Resource};
use std::path::PathBuf;

/// Bundled `blockstates.ron` written when none exists.
pub const DEFAULT_BLOCKSTATES: &str = include_str!("../../data/defaults/blockstates.ron");
/// Bundled `populators.ron` written when none exists.
pub const DEFAULT_POPULATORS: &str = include_str!("../../data/defaults/populators.ron");

#[derive(Resource)]
pub struct MappingsWatcher(pub RonWatcher);

impl MappingsWatcher {
    /// Create a stub `MappingsWatcher` that does not have an active OS watcher.
    #[must_use]
    pub fn stub() -> Self {
        MappingsWatcher(RonWatcher::stub())
    }
}

/// What a reload produced for each resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    pub aliases: LoadReport,
    pub replacements: LoadReport,
}

impl ReloadSummary {
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.aliases.issues.len() + self.replacements.issues.len()
    }
}

/// Write the bundled mapping files into the config dir where missing.
///
/// # Errors
/// Returns `SwapError::Io` if a file cannot be created.
pub fn ensure_default_files(paths: &PathSettings) -> Result<(), SwapError> {
    for (path, contents) in [
        (paths.blockstates_path(), DEFAULT_BLOCKSTATES),
        (paths.populators_path(), DEFAULT_POPULATORS),
    ] {
        if ensure_default_file(&path, contents)? {
            info!(path = %path.display(), "wrote default mapping file");
        }
    }
    Ok(())
}

/// Read both mapping documents, creating them from defaults first if needed.
///
/// # Errors
/// Returns the first I/O or parse error encountered.
pub fn load_mapping_files(paths: &PathSettings) -> Result<MappingFiles, SwapError> {
    ensure_default_files(paths)?;
    let blockstates: BlockStateMappings = load_ron_file(&paths.blockstates_path())?;
    let populators: PopulatorMappings = load_ron_file(&paths.populators_path())?;
    Ok(MappingFiles { blockstates, populators })
}

/// Rebuild both resolvers from already-parsed documents. Aliases load
/// first because replacement tokens may refer to them.
pub fn apply_mappings<R>(
    files: &MappingFiles,
    registry: &R,
    aliases: &mut AliasResolver,
    replacements: &mut ReplacementResolver,
) -> ReloadSummary
where
    R: NamespaceRegistry + BlockTypeRegistry + PopulatorRegistry + ?Sized,
{
    let alias_report = aliases.load(&files.blockstates, registry);
    let replacement_report = replacements.load(&files.populators, registry, aliases);
    ReloadSummary {
        aliases: alias_report,
        replacements: replacement_report,
    }
}

/// Read the mapping files named by `settings` and rebuild both resolvers.
/// On error neither resolver is modified.
///
/// # Errors
/// Returns the I/O or parse error that prevented the files from loading.
pub fn reload_from_disk<R>(
    settings: &SwapSettings,
    registry: &R,
    aliases: &mut AliasResolver,
    replacements: &mut ReplacementResolver,
) -> Result<ReloadSummary, SwapError>
where
    R: NamespaceRegistry + BlockTypeRegistry + PopulatorRegistry + ?Sized,
{
    let files = load_mapping_files(&settings.paths)?;
    let summary = apply_mappings(&files, registry, aliases, replacements);
    aliases.log_summary();
    info!(
        aliases = summary.aliases.loaded,
        replacements = summary.replacements.loaded,
        issues = summary.issue_count(),
        "mappings loaded"
    );
    Ok(summary)
}

/// Watch the config dir for changes to the two mapping files. Anything
/// else written there, such as the trait dump, does not trigger a reload.
///
/// # Errors
/// Returns `SwapError::Watch` if the watcher cannot be created.
pub fn setup_mappings_watcher(paths: &PathSettings) -> Result<MappingsWatcher, SwapError> {
    setup_ron_watcher(&paths.config_dir, &mapping_paths(paths)).map(MappingsWatcher)
}

/// The files whose changes trigger a reload.
#[must_use]
pub fn mapping_paths(paths: &PathSettings) -> [PathBuf; 2] {
    [paths.blockstates_path(), paths.populators_path()]
}

/// Startup system: initial load of both resolvers.
#[allow(clippy::needless_pass_by_value)]
pub fn load_mappings(
    settings: Res<SwapSettings>,
    catalog: Res<Catalog>,
    mut aliases: ResMut<AliasResolver>,
    mut replacements: ResMut<ReplacementResolver>,
) {
    if let Err(e) = reload_from_disk(&settings, &*catalog, &mut aliases, &mut replacements) {
        error!("failed to load mappings: {e}");
    }
}

/// Checks for changes in the mapping files and reloads both resolvers if
/// changes are detected.
#[allow(clippy::needless_pass_by_value)]
pub fn check_mapping_changes(
    watcher: Res<MappingsWatcher>,
    settings: Res<SwapSettings>,
    catalog: Res<Catalog>,
    mut aliases: ResMut<AliasResolver>,
    mut replacements: ResMut<ReplacementResolver>,
) {
    if !watcher.0.take_changed() {
        return;
    }

    info!("mappings changed, reloading...");
    if let Err(e) = reload_from_disk(&settings, &*catalog, &mut aliases, &mut replacements) {
        error!("failed to reload mappings, keeping previous tables: {e}");
    }
}
