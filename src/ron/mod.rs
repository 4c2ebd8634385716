//! Utilities for reading and writing RON files and watching directories
//! for changes.
//!
//! This module provides helpers for reading RON documents from disk,
//! writing bundled defaults when a file is missing, and a filesystem
//! watcher resource that sets a shared flag when files change. The watcher
//! drives hot-reloading of the mapping files.

use crate::error::SwapError;
use bevy::prelude::{warn, Resource};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// File-watcher resource for RON hot-reload.
#[derive(Resource)]
pub struct RonWatcher {
    pub changed: Arc<Mutex<bool>>, // Set to `true` when watched files change.
    _watcher: Option<notify::RecommendedWatcher>, // kept alive for the lifetime of the resource
}

impl RonWatcher {
    /// Create a stub `RonWatcher` that does not have an active OS watcher.
    ///
    /// Useful as a fallback when watcher creation fails or hot reload is
    /// disabled; `take_changed` will always return `false`.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher {
            changed: Arc::new(Mutex::new(false)),
            _watcher: None,
        }
    }

    /// Return whether a change was observed since the last call, and reset
    /// the flag. A poisoned flag is recovered rather than propagated.
    pub fn take_changed(&self) -> bool {
        let mut flag = match self.changed.lock() {
            Ok(flag) => flag,
            Err(poisoned) => {
                warn!("ron watcher mutex poisoned, recovering");
                poisoned.into_inner()
            }
        };
        std::mem::take(&mut *flag)
    }
}

/// Read and deserialize a single RON file.
///
/// # Errors
/// Returns `SwapError::Io` if the file cannot be read and
/// `SwapError::Parse` if its content is not a valid `T`.
pub fn load_ron_file<T: DeserializeOwned>(path: &Path) -> Result<T, SwapError> {
    let content = std::fs::read_to_string(path).map_err(|e| SwapError::io(path, e))?;
    ron::from_str::<T>(&content).map_err(|source| SwapError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load all `.ron` files from a directory and deserialize them into `T`.
///
/// Files that fail to parse are skipped with a warning. Entries are
/// visited in file-name order so repeated loads see the same sequence.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let mut items = Vec::new();

    let Ok(entries) = std::fs::read_dir(path) else {
        warn!(dir = %path.display(), "cannot read directory");
        return items;
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    files.sort();

    for file in files {
        match load_ron_file::<T>(&file) {
            Ok(item) => items.push(item),
            Err(e) => warn!("{e}"),
        }
    }

    items
}

/// Serialize `value` as pretty RON and write it to `path`, replacing any
/// existing file. `header` lines are emitted as `//` comments first.
///
/// # Errors
/// Returns `SwapError::Serialize` or `SwapError::Io`.
pub fn write_ron_file<T: Serialize>(path: &Path, value: &T, header: &[String]) -> Result<(), SwapError> {
    let body = ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::new()).map_err(|source| {
        SwapError::Serialize {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let mut out = String::new();
    for line in header {
        out.push_str("// ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&body);
    out.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SwapError::io(parent, e))?;
    }
    std::fs::write(path, out).map_err(|e| SwapError::io(path, e))
}

/// Write `contents` to `path` if no file exists there yet.
///
/// Returns `true` when the file was created.
///
/// # Errors
/// Returns `SwapError::Io` if the directory or file cannot be created.
pub fn ensure_default_file(path: &Path, contents: &str) -> Result<bool, SwapError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SwapError::io(parent, e))?;
    }
    std::fs::write(path, contents).map_err(|e| SwapError::io(path, e))?;
    Ok(true)
}

/// Whether an event on `path` concerns the watch: one of `files` if any are
/// given, otherwise anything under `dir`. Paths are expected canonical.
fn is_relevant(path: &Path, dir: &Path, files: &[PathBuf]) -> bool {
    let canon = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if files.is_empty() {
        canon.starts_with(dir)
    } else {
        files.iter().any(|f| *f == canon)
    }
}

/// Create a `RonWatcher` that watches a directory for modifications.
///
/// The returned watcher's `changed` flag will be set to `true` when a
/// create or modify event for one of `files` is observed, or for any file
/// in the directory when `files` is empty. Other files written into the
/// same directory (a trait dump, editor backups) are ignored.
///
/// # Errors
/// Returns `SwapError::Watch` if the underlying file-watcher cannot be
/// created or registered for `path`.
pub fn setup_ron_watcher(path: &Path, files: &[PathBuf]) -> Result<RonWatcher, SwapError> {
    let changed = Arc::new(Mutex::new(false));
    let changed_clone = changed.clone();
    // Canonical forms so event paths can be compared against them
    let watched_path: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let watched_files: Vec<PathBuf> = files
        .iter()
        .map(|f| std::fs::canonicalize(f).unwrap_or_else(|_| f.clone()))
        .collect();
    let watch_err = |source| SwapError::Watch {
        path: path.to_path_buf(),
        source,
    };

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, notify::EventKind::Modify(_) | notify::EventKind::Create(_)) {
                    let relevant = event
                        .paths
                        .iter()
                        .any(|p| is_relevant(p, &watched_path, &watched_files));
                    if relevant {
                        match changed_clone.lock() {
                            Ok(mut flag) => *flag = true,
                            Err(poisoned) => *poisoned.into_inner() = true,
                        }
                    }
                }
            }
            Err(e) => warn!("watch error: {e:?}"),
        },
        Config::default(),
    )
    .map_err(watch_err)?;

    watcher.watch(path, RecursiveMode::NonRecursive).map_err(watch_err)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}
