//! Alias resolution: author-chosen names bound to concrete block states.
//!
//! `AliasResolver` owns a `namespace -> alias -> BlockState` table built
//! from the `mappings` section of `blockstates.ron`. Each alias starts
//! from its block type's default state; every trait override is validated
//! against the type's declared traits and skipped individually if it does
//! not fit, so one bad line never drops the whole alias.
//!
//! # Example
//! ```rust
//! use blockswap::alias::AliasResolver;
//! use blockswap::block::{BlockTrait, BlockType, Catalog};
//! use blockswap::mapping::{BlockStateMappings, TraitOverrides, TraitValue};
//!
//! let mut catalog = Catalog::default();
//! let axis = BlockTrait::new("axis", ["x", "y", "z"], "y").unwrap();
//! let minecraft = catalog.register_namespace("minecraft");
//! catalog.register_block(BlockType::new(minecraft.clone(), "log", vec![axis]));
//!
//! let mut config = BlockStateMappings::default();
//! let mut overrides = TraitOverrides::new();
//! overrides.insert("axis".to_string(), TraitValue::from("x"));
//! config.insert("minecraft", "log", "sideways_log", overrides);
//!
//! let mut aliases = AliasResolver::default();
//! let report = aliases.load(&config, &catalog);
//! assert!(report.is_clean());
//! let state = aliases.get(&minecraft, "sideways_log").unwrap();
//! assert_eq!(state.value("axis"), Some("x"));
//! ```

use crate::block::registry::{BlockTypeRegistry, NamespaceRegistry};
use crate::block::{BlockState, BlockType, Namespace};
use crate::error::{LoadIssue, LoadReport};
use crate::mapping::{describe, AliasTable, BlockStateMappings, Node, TraitOverrides};
use bevy::prelude::{debug, info, Resource};
use std::collections::HashMap;
use std::sync::Arc;

/// Owned copy of the alias table as returned by [`AliasResolver::get_all`].
pub type AliasSnapshot = HashMap<Namespace, HashMap<String, BlockState>>;

#[derive(Resource, Default, Debug, Clone)]
pub struct AliasResolver {
    aliases: HashMap<Namespace, HashMap<String, BlockState>>,
}

impl AliasResolver {
    /// Bind `alias` to `state` under `namespace`, returning the previous
    /// binding if there was one. No validation happens here.
    pub fn put(&mut self, namespace: &Namespace, alias: &str, state: BlockState) -> Option<BlockState> {
        self.aliases
            .entry(namespace.clone())
            .or_default()
            .insert(alias.to_string(), state)
    }

    #[must_use]
    pub fn get(&self, namespace: &Namespace, alias: &str) -> Option<&BlockState> {
        self.aliases.get(namespace).and_then(|by_alias| by_alias.get(alias))
    }

    /// Copy of the whole table at the time of the call.
    #[must_use]
    pub fn get_all(&self) -> AliasSnapshot {
        self.aliases.clone()
    }

    /// Total number of aliases across all namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.aliases.clear();
    }

    /// Rebuild the table from `config`. The previous content is discarded
    /// first; unresolvable namespaces, block types and trait assignments are
    /// reported and skipped at the narrowest scope.
    pub fn load<R>(&mut self, config: &BlockStateMappings, registry: &R) -> LoadReport
    where
        R: NamespaceRegistry + BlockTypeRegistry + ?Sized,
    {
        self.clear();
        let mut report = LoadReport::default();

        for (namespace_id, types) in &config.mappings {
            let types = match types {
                Node::Valid(types) => types,
                Node::Malformed(found) => {
                    report.skip(malformed(namespace_id, found));
                    continue;
                }
            };
            let Some(namespace) = registry.namespace(namespace_id) else {
                report.skip(LoadIssue::UnknownNamespace {
                    namespace: namespace_id.clone(),
                });
                continue;
            };

            for (type_id, aliases) in types {
                let aliases = match aliases {
                    Node::Valid(aliases) => aliases,
                    Node::Malformed(found) => {
                        report.skip(malformed(&format!("{namespace_id}:{type_id}"), found));
                        continue;
                    }
                };
                let Some(block_type) = registry.block_type(&format!("{namespace_id}:{type_id}")) else {
                    report.skip(LoadIssue::UnknownBlockType {
                        namespace: namespace_id.clone(),
                        block_type: type_id.clone(),
                    });
                    continue;
                };
                self.load_aliases(&namespace, &block_type, aliases, &mut report);
            }
        }

        report
    }

    fn load_aliases(&mut self, namespace: &Namespace, block_type: &Arc<BlockType>, aliases: &AliasTable, report: &mut LoadReport) {
        for (alias, overrides) in aliases {
            let overrides = match overrides {
                Node::Valid(overrides) => overrides,
                Node::Malformed(found) => {
                    report.skip(malformed(&format!("{}:{alias}", namespace.id()), found));
                    continue;
                }
            };
            let state = resolve_overrides(namespace, block_type, alias, overrides, report);
            if let Some(previous) = self.put(namespace, alias, state) {
                debug!(namespace = %namespace, alias = %alias, previous = %previous, "alias rebound");
            }
            report.loaded += 1;
        }
    }

    /// Log one line per namespace listing what it mapped.
    pub fn log_summary(&self) {
        let mut namespaces: Vec<&Namespace> = self.aliases.keys().collect();
        namespaces.sort();
        for namespace in namespaces {
            let mut mapped: Vec<String> = self.aliases[namespace]
                .iter()
                .map(|(alias, state)| format!("{alias}={state}"))
                .collect();
            mapped.sort();
            info!("namespace [{namespace}] mapped [{}]", mapped.join(", "));
        }
    }
}

/// Fold every legal override into the type's default state.
fn resolve_overrides(
    namespace: &Namespace,
    block_type: &Arc<BlockType>,
    alias: &str,
    overrides: &TraitOverrides,
    report: &mut LoadReport,
) -> BlockState {
    let mut state = block_type.default_state();

    for (trait_name, raw) in overrides {
        let Some(block_trait) = block_type.find_trait(trait_name) else {
            report.skip(LoadIssue::UnknownTrait {
                namespace: namespace.id().to_string(),
                block_type: block_type.name().to_string(),
                alias: alias.to_string(),
                block_trait: trait_name.clone(),
            });
            continue;
        };

        let next = raw.as_text().and_then(|value| state.with_trait(block_trait, &value));
        match next {
            Some(next) => state = next,
            None => report.skip(LoadIssue::IllegalTraitValue {
                namespace: namespace.id().to_string(),
                block_type: block_type.name().to_string(),
                alias: alias.to_string(),
                block_trait: trait_name.clone(),
                value: raw.to_string(),
            }),
        }
    }

    state
}

fn malformed(entry: &str, found: &ron::Value) -> LoadIssue {
    LoadIssue::Malformed {
        entry: entry.to_string(),
        found: describe(found),
    }
}
