//! This module contains the core block model shared by both resolvers.
//! It exposes namespaces (`Namespace`), declared block types
//! (`BlockType`) with their enumerable traits (`BlockTrait`), concrete
//! block states (`BlockState`) and populator keys (`PopulatorType`).
//!
//! The registry traits that hand these out live in [`registry`], together
//! with the RON-backed `Catalog` implementation; [`loader`] reads catalog
//! files from disk.
//!
//! Example:
//!
//! ```rust
//! use blockswap::block::{BlockTrait, BlockType, Namespace};
//!
//! let axis = BlockTrait::new("axis", ["x", "y", "z"], "y").unwrap();
//! let log = BlockType::new(Namespace::new("minecraft"), "log", vec![axis]);
//! let state = log.default_state();
//! let tilted = state.with_trait(&log.traits()[0], "x").unwrap();
//! assert_eq!(tilted.value("axis"), Some("x"));
//! assert_eq!(state.value("axis"), Some("y"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Loader for catalog RON files.
pub mod loader;

/// Registry traits and the catalog implementation.
pub mod registry;

pub use registry::{BlockTypeRegistry, Catalog, NamespaceRegistry, PopulatorRegistry};

/// Namespace assumed for identifiers that carry no `namespace:` prefix.
pub const IMPLICIT_NAMESPACE: &str = "minecraft";

/// Qualify `id` with `namespace` unless it already carries a prefix.
#[must_use]
pub fn qualify(namespace: &str, id: &str) -> String {
    if id.contains(':') {
        id.to_string()
    } else {
        format!("{namespace}:{id}")
    }
}

/// Identity of a configuration owner (a mod or plugin id).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Namespace(Arc<str>);

impl Namespace {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Namespace(Arc::from(id))
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of a world-generation populator (ore veins, lakes, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PopulatorType(Arc<str>);

impl PopulatorType {
    /// `id` is the fully qualified `namespace:name` identifier.
    #[must_use]
    pub fn new(id: &str) -> Self {
        PopulatorType(Arc::from(id))
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PopulatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named block property with a finite set of legal values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTrait {
    name: String,
    values: Vec<String>,
    default: String,
}

impl BlockTrait {
    /// Build a trait. Returns `None` when `values` is empty or does not
    /// contain `default`.
    #[must_use]
    pub fn new<I, S>(name: &str, values: I, default: &str) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if !values.iter().any(|v| v == default) {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            values,
            default: default.to_string(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Legal values in declaration order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    #[must_use]
    pub fn default_value(&self) -> &str {
        &self.default
    }

    #[must_use]
    pub fn is_legal(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// A declared block type. Two types are equal when their qualified ids are.
#[derive(Debug)]
pub struct BlockType {
    id: String,
    namespace: Namespace,
    name: String,
    traits: Vec<BlockTrait>,
}

impl BlockType {
    #[must_use]
    pub fn new(namespace: Namespace, name: &str, traits: Vec<BlockTrait>) -> Arc<Self> {
        Arc::new(Self {
            id: format!("{namespace}:{name}"),
            namespace,
            name: name.to_string(),
            traits,
        })
    }

    /// Fully qualified `namespace:name` id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared traits, in declaration order.
    #[must_use]
    pub fn traits(&self) -> &[BlockTrait] {
        &self.traits
    }

    #[must_use]
    pub fn find_trait(&self, name: &str) -> Option<&BlockTrait> {
        self.traits.iter().find(|t| t.name == name)
    }

    /// The state with no overrides applied.
    #[must_use]
    pub fn default_state(self: &Arc<Self>) -> BlockState {
        BlockState {
            block_type: Arc::clone(self),
            overrides: BTreeMap::new(),
        }
    }
}

impl PartialEq for BlockType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BlockType {}

impl std::hash::Hash for BlockType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A block type plus validated trait overrides. Immutable; `with_trait`
/// returns a new state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockState {
    block_type: Arc<BlockType>,
    overrides: BTreeMap<String, String>,
}

impl BlockState {
    #[must_use]
    pub fn block_type(&self) -> &Arc<BlockType> {
        &self.block_type
    }

    /// Trait overrides that differ from the bare default state.
    #[must_use]
    pub fn overrides(&self) -> &BTreeMap<String, String> {
        &self.overrides
    }

    /// Current value of trait `name`: the override if one was applied,
    /// otherwise the trait's default.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.overrides
            .get(name)
            .map(String::as_str)
            .or_else(|| self.block_type.find_trait(name).map(BlockTrait::default_value))
    }

    /// Apply `value` to `block_trait`. Returns `None` if the trait is not
    /// declared on this state's type or the value is not legal for it.
    #[must_use]
    pub fn with_trait(&self, block_trait: &BlockTrait, value: &str) -> Option<BlockState> {
        let declared = self.block_type.find_trait(block_trait.name())?;
        if declared != block_trait || !declared.is_legal(value) {
            return None;
        }
        let mut next = self.clone();
        next.overrides.insert(block_trait.name().to_string(), value.to_string());
        Some(next)
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.block_type.id())?;
        if !self.overrides.is_empty() {
            let pairs: Vec<String> = self.overrides.iter().map(|(k, v)| format!("{k}={v}")).collect();
            write!(f, "[{}]", pairs.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_type() -> Arc<BlockType> {
        let axis = BlockTrait::new("axis", ["x", "y", "z"], "y").unwrap();
        BlockType::new(Namespace::new("minecraft"), "log", vec![axis])
    }

    #[test]
    fn trait_rejects_default_outside_values() {
        assert!(BlockTrait::new("axis", ["x", "y"], "z").is_none());
        assert!(BlockTrait::new::<[&str; 0], &str>("axis", [], "x").is_none());
    }

    #[test]
    fn with_trait_applies_legal_value() {
        let log = log_type();
        let axis = log.find_trait("axis").unwrap();
        let state = log.default_state().with_trait(axis, "x").unwrap();
        assert_eq!(state.value("axis"), Some("x"));
        assert_eq!(state.overrides().len(), 1);
        assert_eq!(state.to_string(), "minecraft:log[axis=x]");
    }

    #[test]
    fn with_trait_rejects_illegal_value() {
        let log = log_type();
        let axis = log.find_trait("axis").unwrap();
        assert!(log.default_state().with_trait(axis, "q").is_none());
        assert!(log.default_state().with_trait(axis, "X").is_none());
    }

    #[test]
    fn with_trait_rejects_foreign_trait() {
        let log = log_type();
        let color = BlockTrait::new("color", ["red"], "red").unwrap();
        assert!(log.default_state().with_trait(&color, "red").is_none());
    }

    #[test]
    fn states_compare_type_and_overrides() {
        let log = log_type();
        let again = BlockType::new(Namespace::new("minecraft"), "log", Vec::new());
        assert_eq!(log.default_state(), again.default_state());

        let axis = log.find_trait("axis").unwrap();
        let tilted = log.default_state().with_trait(axis, "x").unwrap();
        assert_ne!(tilted, log.default_state());
    }

    #[test]
    fn qualify_keeps_existing_prefix() {
        assert_eq!(qualify("minecraft", "stone"), "minecraft:stone");
        assert_eq!(qualify("minecraft", "modb:ore"), "modb:ore");
    }
}
