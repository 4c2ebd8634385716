//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/`. They decide
//! where the mapping files live, which namespace unqualified tokens
//! belong to, and whether the mapping directory is watched for changes.
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where mapping files are read from and where the trait dump is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    #[serde(default = "PathSettings::default_config_dir")]
    pub config_dir: PathBuf, // Directory holding the mapping files.
    #[serde(default = "PathSettings::default_blockstates_file")]
    pub blockstates_file: String, // Alias mappings, relative to `config_dir`.
    #[serde(default = "PathSettings::default_populators_file")]
    pub populators_file: String, // Replacement mappings, relative to `config_dir`.
    #[serde(default = "PathSettings::default_dump_file")]
    pub dump_file: String, // Trait dump output, relative to `config_dir`.
}

impl PathSettings {
    fn default_config_dir() -> PathBuf { PathBuf::from("data/swap") }
    fn default_blockstates_file() -> String { "blockstates.ron".to_string() }
    fn default_populators_file() -> String { "populators.ron".to_string() }
    fn default_dump_file() -> String { "dump.ron".to_string() }

    #[must_use]
    pub fn blockstates_path(&self) -> PathBuf {
        self.config_dir.join(&self.blockstates_file)
    }

    #[must_use]
    pub fn populators_path(&self) -> PathBuf {
        self.config_dir.join(&self.populators_file)
    }

    #[must_use]
    pub fn dump_path(&self) -> PathBuf {
        self.config_dir.join(&self.dump_file)
    }
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            config_dir: Self::default_config_dir(),
            blockstates_file: Self::default_blockstates_file(),
            populators_file: Self::default_populators_file(),
            dump_file: Self::default_dump_file(),
        }
    }
}

/// Token resolution and runtime behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionSettings {
    #[serde(default = "ResolutionSettings::default_implicit_namespace")]
    pub implicit_namespace: String, // Namespace assumed for tokens without a `namespace:` prefix.
    #[serde(default = "ResolutionSettings::default_hot_reload")]
    pub hot_reload: bool, // Watch `config_dir` and reload mappings on change.
    #[serde(default)]
    pub log_swaps: bool, // Log a line per populated chunk with the number of swapped blocks.
}

impl ResolutionSettings {
    fn default_implicit_namespace() -> String { crate::block::IMPLICIT_NAMESPACE.to_string() }
    fn default_hot_reload() -> bool { true }
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            implicit_namespace: Self::default_implicit_namespace(),
            hot_reload: Self::default_hot_reload(),
            log_swaps: false,
        }
    }
}

/// Top-level settings
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct SwapSettings {
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub resolution: ResolutionSettings,
}

impl SwapSettings {
    #[must_use]
    pub fn defaults() -> Self { SwapSettings::default() }
}

pub mod loader;
