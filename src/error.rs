//! Error types for configuration I/O and load diagnostics.
//!
//! `SwapError` covers the fatal class (a mapping file could not be read,
//! parsed or written). Everything that goes wrong *inside* a parsed
//! mapping document, including a node of the wrong shape, is a `LoadIssue`: it is logged, recorded in the
//! `LoadReport` and the offending entry is skipped.

use bevy::prelude::warn;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while reading or writing configuration files.
#[derive(Debug, Error)]
pub enum SwapError {
    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A RON document could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    /// A value could not be serialized to RON.
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: ron::Error,
    },

    /// The filesystem watcher could not be created.
    #[error("failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

impl SwapError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SwapError::Io { path: path.into(), source }
    }
}

/// A recoverable problem found while loading mappings or the block catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadIssue {
    #[error("namespace [{namespace}] is not loaded (did you forget it in /mods ?)")]
    UnknownNamespace { namespace: String },

    #[error("block [{block_type}] for namespace [{namespace}] is not a valid block")]
    UnknownBlockType { namespace: String, block_type: String },

    #[error("trait [{block_trait}] in [{alias}] is not valid for block [{block_type}] in namespace [{namespace}]")]
    UnknownTrait {
        namespace: String,
        block_type: String,
        alias: String,
        block_trait: String,
    },

    #[error(
        "value [{value}] for trait [{block_trait}] in [{alias}] is not valid for block [{block_type}] in namespace [{namespace}]"
    )]
    IllegalTraitValue {
        namespace: String,
        block_type: String,
        alias: String,
        block_trait: String,
        value: String,
    },

    #[error("populator [{populator}] for namespace [{namespace}] is not a valid populator")]
    UnknownPopulator { namespace: String, populator: String },

    #[error("original block state [{token}] for [{scope}] is not a registered block nor a mapping")]
    UnresolvedOriginal { scope: String, token: String },

    #[error("replacement block state [{token}] for [{scope}] is not a registered block nor a mapping")]
    UnresolvedReplacement { scope: String, token: String },

    #[error("block definition [{block_type}] is invalid: {reason}")]
    InvalidBlockDef { block_type: String, reason: String },

    #[error("entry [{entry}] has the wrong shape, found {found}")]
    Malformed { entry: String, found: String },
}

impl LoadIssue {
    /// Short machine-friendly tag used as a structured log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            LoadIssue::UnknownNamespace { .. } => "unknown_namespace",
            LoadIssue::UnknownBlockType { .. } => "unknown_block_type",
            LoadIssue::UnknownTrait { .. } => "unknown_trait",
            LoadIssue::IllegalTraitValue { .. } => "illegal_trait_value",
            LoadIssue::UnknownPopulator { .. } => "unknown_populator",
            LoadIssue::UnresolvedOriginal { .. } => "unresolved_original",
            LoadIssue::UnresolvedReplacement { .. } => "unresolved_replacement",
            LoadIssue::InvalidBlockDef { .. } => "invalid_block_def",
            LoadIssue::Malformed { .. } => "malformed",
        }
    }
}

/// Outcome of a load pass: how many entries made it in, and what was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub issues: Vec<LoadIssue>,
}

impl LoadReport {
    /// Log `issue` at warn level and keep it for the caller.
    pub(crate) fn skip(&mut self, issue: LoadIssue) {
        warn!(kind = issue.kind(), "{issue}");
        self.issues.push(issue);
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: LoadReport) {
        self.loaded += other.loaded;
        self.issues.extend(other.issues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_message_names_the_offending_value() {
        let issue = LoadIssue::IllegalTraitValue {
            namespace: "minecraft".into(),
            block_type: "log".into(),
            alias: "custom_log".into(),
            block_trait: "axis".into(),
            value: "q".into(),
        };
        let text = issue.to_string();
        assert!(text.contains("[q]"));
        assert!(text.contains("[axis]"));
        assert!(text.contains("[custom_log]"));
        assert_eq!(issue.kind(), "illegal_trait_value");
    }

    #[test]
    fn merge_accumulates_counts_and_issues() {
        let mut a = LoadReport { loaded: 2, issues: Vec::new() };
        let mut b = LoadReport::default();
        b.loaded = 3;
        b.skip(LoadIssue::UnknownNamespace { namespace: "ghost".into() });
        a.merge(b);
        assert_eq!(a.loaded, 5);
        assert_eq!(a.issues.len(), 1);
        assert!(!a.is_clean());
    }
}
