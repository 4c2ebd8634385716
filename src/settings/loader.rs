//! Settings loading.
//!
//! Settings are loaded from RON files in the `data/settings` directory. If multiple
//! RON files are present, the first successfully parsed `SwapSettings` will be used.
//! If no RON files are found or if no parsing succeeds, default settings will be used.
use crate::ron_loader::load_ron_files;
use crate::settings::SwapSettings;
use bevy::prelude::info;
use std::path::Path;

/// Load settings from `path` (directory). If multiple `.ron` files are present
/// the first parsed `SwapSettings` will be used. If none exist the `Default` is used.
///
/// # Example
/// ```
/// let settings = blockswap::settings::loader::load_settings_from_dir("data/settings");
/// assert!(!settings.paths.blockstates_file.is_empty());
/// ```
#[must_use]
pub fn load_settings_from_dir(path: impl AsRef<Path>) -> SwapSettings {
    let items: Vec<SwapSettings> = load_ron_files(path.as_ref());
    if let Some(first) = items.into_iter().next() {
        first
    } else {
        info!(dir = %path.as_ref().display(), "no settings found, using defaults");
        SwapSettings::defaults()
    }
}
