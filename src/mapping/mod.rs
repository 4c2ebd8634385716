//! Mapping documents: the on-disk shape of the alias and replacement
//! configuration.
//!
//! Two RON files drive the resolvers:
//!
//! ```ron
//! // blockstates.ron
//! (
//!     mappings: {
//!         "minecraft": {
//!             "log": {
//!                 "custom_log": { "axis": "y" },
//!             },
//!         },
//!     },
//! )
//! ```
//!
//! ```ron
//! // populators.ron
//! (
//!     all: { "stone_alias": "water_alias" },
//!     populators: {
//!         "modb": { "ore_gen": { "stone": "diamond_block" } },
//!     },
//! )
//! ```
//!
//! All maps are ordered so a load pass visits entries deterministically.
//! Every level is read leniently: a node of the wrong shape (a list where
//! a trait value belongs, a scalar where an alias table belongs) is kept as
//! a [`Node::Malformed`] value and skipped by the loaders, so the rest of
//! the file still loads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod loader;

/// A configuration node that either has the expected shape or is kept
/// verbatim for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node<T> {
    Valid(T),
    Malformed(ron::Value),
}

impl<T> Node<T> {
    /// The node's content if it has the expected shape.
    #[must_use]
    pub fn valid(&self) -> Option<&T> {
        match self {
            Node::Valid(value) => Some(value),
            Node::Malformed(_) => None,
        }
    }

    /// Replace a malformed node with the default value, then give mutable
    /// access to the content.
    pub fn reset_malformed(&mut self) -> Option<&mut T>
    where
        T: Default,
    {
        if let Node::Malformed(_) = self {
            *self = Node::Valid(T::default());
        }
        match self {
            Node::Valid(value) => Some(value),
            Node::Malformed(_) => None,
        }
    }
}

impl<T: Default> Default for Node<T> {
    fn default() -> Self {
        Node::Valid(T::default())
    }
}

impl<T> From<T> for Node<T> {
    fn from(value: T) -> Self {
        Node::Valid(value)
    }
}

impl From<&str> for Node<String> {
    fn from(value: &str) -> Self {
        Node::Valid(value.to_string())
    }
}

/// Render a raw RON value the way it was (roughly) written.
#[must_use]
pub fn describe(value: &ron::Value) -> String {
    ron::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}

/// A raw trait value as authored. Only its string form is ever validated;
/// lists, maps and other shapes land in `Other` and never match a trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraitValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Other(ron::Value),
}

impl TraitValue {
    /// The string form compared against a trait's legal values, `None` for
    /// values that are not scalars.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            TraitValue::Other(_) => None,
            scalar => Some(scalar.to_string()),
        }
    }
}

impl fmt::Display for TraitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraitValue::Bool(b) => write!(f, "{b}"),
            TraitValue::Int(i) => write!(f, "{i}"),
            TraitValue::Float(x) => write!(f, "{x}"),
            TraitValue::Text(s) => f.write_str(s),
            TraitValue::Other(v) => f.write_str(&describe(v)),
        }
    }
}

impl From<&str> for TraitValue {
    fn from(s: &str) -> Self {
        TraitValue::Text(s.to_string())
    }
}

/// trait name -> value
pub type TraitOverrides = BTreeMap<String, TraitValue>;
/// alias -> overrides
pub type AliasTable = BTreeMap<String, Node<TraitOverrides>>;
/// block type -> aliases
pub type TypeTable = BTreeMap<String, Node<AliasTable>>;
/// original token -> replacement token
pub type TokenPairs = BTreeMap<String, Node<String>>;
/// populator -> pairs
pub type PopulatorTable = BTreeMap<String, Node<TokenPairs>>;

/// Content of `blockstates.ron`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockStateMappings {
    /// namespace -> block type -> alias -> trait overrides
    #[serde(default)]
    pub mappings: BTreeMap<String, Node<TypeTable>>,
}

impl BlockStateMappings {
    /// Add one alias definition, creating intermediate levels as needed.
    pub fn insert(&mut self, namespace: &str, block_type: &str, alias: &str, overrides: TraitOverrides) {
        let aliases = self
            .mappings
            .entry(namespace.to_string())
            .or_default()
            .reset_malformed()
            .and_then(|types| types.entry(block_type.to_string()).or_default().reset_malformed());
        if let Some(aliases) = aliases {
            aliases.insert(alias.to_string(), Node::Valid(overrides));
        }
    }

    /// The overrides configured for an alias, if that path is well formed.
    #[must_use]
    pub fn overrides(&self, namespace: &str, block_type: &str, alias: &str) -> Option<&TraitOverrides> {
        self.mappings
            .get(namespace)?
            .valid()?
            .get(block_type)?
            .valid()?
            .get(alias)?
            .valid()
    }
}

/// Content of `populators.ron`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulatorMappings {
    /// Replacements applied regardless of populator.
    #[serde(default)]
    pub all: TokenPairs,
    /// namespace -> populator -> original -> replacement
    #[serde(default)]
    pub populators: BTreeMap<String, Node<PopulatorTable>>,
}

impl PopulatorMappings {
    pub fn insert(&mut self, namespace: &str, populator: &str, original: &str, replacement: &str) {
        let pairs = self
            .populators
            .entry(namespace.to_string())
            .or_default()
            .reset_malformed()
            .and_then(|table| table.entry(populator.to_string()).or_default().reset_malformed());
        if let Some(pairs) = pairs {
            pairs.insert(original.to_string(), replacement.into());
        }
    }

    /// The replacement token configured for `original` under a populator.
    #[must_use]
    pub fn replacement(&self, namespace: &str, populator: &str, original: &str) -> Option<&str> {
        self.populators
            .get(namespace)?
            .valid()?
            .get(populator)?
            .valid()?
            .get(original)?
            .valid()
            .map(String::as_str)
    }
}

/// Both mapping documents, as read together on every (re)load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingFiles {
    pub blockstates: BlockStateMappings,
    pub populators: PopulatorMappings,
}
