//! Registry interfaces consumed by the resolvers, and `Catalog`, the
//! in-memory implementation backed by catalog RON files.
//!
//! The resolvers only ever talk to the three traits below, so a host that
//! already owns a block registry can implement them directly instead of
//! going through `Catalog`.
//!
//! Example:
//! ```rust
//! use blockswap::block::registry::{BlockTypeRegistry, Catalog, NamespaceRegistry};
//! use blockswap::block::{BlockType, Namespace};
//!
//! let mut catalog = Catalog::default();
//! catalog.register_block(BlockType::new(Namespace::new("minecraft"), "stone", Vec::new()));
//!
//! assert!(catalog.namespace("minecraft").is_some());
//! // unqualified ids fall back to the implicit namespace
//! assert_eq!(catalog.block_type("stone").unwrap().id(), "minecraft:stone");
//! ```
use super::{qualify, BlockTrait, BlockType, Namespace, PopulatorType, IMPLICIT_NAMESPACE};
use crate::error::{LoadIssue, LoadReport};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves namespace ids to loaded namespaces.
pub trait NamespaceRegistry {
    fn namespace(&self, id: &str) -> Option<Namespace>;
}

/// Resolves qualified block ids to declared block types.
pub trait BlockTypeRegistry {
    fn block_type(&self, id: &str) -> Option<Arc<BlockType>>;

    /// Every declared block type, in no particular order.
    fn block_types(&self) -> Vec<Arc<BlockType>>;
}

/// Resolves qualified populator ids.
pub trait PopulatorRegistry {
    fn populator_type(&self, id: &str) -> Option<PopulatorType>;
}

/// Serialized trait declaration inside a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitDef {
    pub name: String,
    pub values: Vec<String>,
    /// Falls back to the first entry of `values` when omitted.
    #[serde(default)]
    pub default: Option<String>,
}

/// Serialized block declaration inside a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub traits: Vec<TraitDef>,
}

/// One catalog file: everything a single namespace declares.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub namespace: String,
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
    #[serde(default)]
    pub populators: Vec<String>,
}

#[derive(Resource, Clone)]
pub struct Catalog {
    namespaces: HashMap<String, Namespace>,
    blocks: HashMap<String, Arc<BlockType>>,
    populators: HashMap<String, PopulatorType>,
    /// Namespace assumed for unqualified block and populator ids.
    implicit_namespace: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            namespaces: HashMap::new(),
            blocks: HashMap::new(),
            populators: HashMap::new(),
            implicit_namespace: IMPLICIT_NAMESPACE.to_string(),
        }
    }
}

impl Catalog {
    /// Change the namespace unqualified ids are looked up in.
    pub fn set_implicit_namespace(&mut self, namespace: &str) {
        self.implicit_namespace = namespace.to_string();
    }

    #[must_use]
    pub fn implicit_namespace(&self) -> &str {
        &self.implicit_namespace
    }

    /// Register a namespace, returning the existing handle if already known.
    pub fn register_namespace(&mut self, id: &str) -> Namespace {
        self.namespaces
            .entry(id.to_string())
            .or_insert_with(|| Namespace::new(id))
            .clone()
    }

    /// Register a block type (and its namespace). Replaces any block with
    /// the same qualified id.
    pub fn register_block(&mut self, block: Arc<BlockType>) {
        self.register_namespace(block.namespace().id());
        self.blocks.insert(block.id().to_string(), block);
    }

    /// Register a populator `name` under `namespace`.
    pub fn register_populator(&mut self, namespace: &str, name: &str) -> PopulatorType {
        self.register_namespace(namespace);
        let id = qualify(namespace, name);
        self.populators
            .entry(id.clone())
            .or_insert_with(|| PopulatorType::new(&id))
            .clone()
    }

    /// Register the contents of one catalog file. Invalid block
    /// definitions are skipped and reported.
    pub fn register_file(&mut self, file: CatalogFile) -> LoadReport {
        let mut report = LoadReport::default();
        let namespace = self.register_namespace(&file.namespace);

        for def in file.blocks {
            match build_traits(&def) {
                Ok(traits) => {
                    self.register_block(BlockType::new(namespace.clone(), &def.name, traits));
                    report.loaded += 1;
                }
                Err(reason) => report.skip(LoadIssue::InvalidBlockDef {
                    block_type: qualify(namespace.id(), &def.name),
                    reason,
                }),
            }
        }

        for populator in &file.populators {
            self.register_populator(namespace.id(), populator);
        }

        report
    }

    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn populator_count(&self) -> usize {
        self.populators.len()
    }
}

fn build_traits(def: &BlockDef) -> Result<Vec<BlockTrait>, String> {
    let mut traits: Vec<BlockTrait> = Vec::with_capacity(def.traits.len());
    for t in &def.traits {
        if traits.iter().any(|existing| existing.name() == t.name) {
            return Err(format!("trait [{}] is declared twice", t.name));
        }
        let default = match t.default.as_deref().or_else(|| t.values.first().map(String::as_str)) {
            Some(d) => d,
            None => return Err(format!("trait [{}] declares no values", t.name)),
        };
        let built = BlockTrait::new(&t.name, t.values.iter().cloned(), default)
            .ok_or_else(|| format!("default [{default}] of trait [{}] is not one of its values", t.name))?;
        traits.push(built);
    }
    Ok(traits)
}

impl NamespaceRegistry for Catalog {
    fn namespace(&self, id: &str) -> Option<Namespace> {
        self.namespaces.get(id).cloned()
    }
}

impl BlockTypeRegistry for Catalog {
    fn block_type(&self, id: &str) -> Option<Arc<BlockType>> {
        self.blocks.get(&qualify(&self.implicit_namespace, id)).cloned()
    }

    fn block_types(&self) -> Vec<Arc<BlockType>> {
        self.blocks.values().cloned().collect()
    }
}

impl PopulatorRegistry for Catalog {
    fn populator_type(&self, id: &str) -> Option<PopulatorType> {
        self.populators.get(&qualify(&self.implicit_namespace, id)).cloned()
    }
}
