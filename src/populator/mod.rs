//! Replacement resolution: which block state a populator's output should be
//! swapped for.
//!
//! `ReplacementResolver` holds two tables built from `populators.ron`:
//!
//! * a populator-scoped table, `namespace -> populator -> entries`;
//! * a global table consulted when the caller makes its explicit second
//!   attempt after a scoped miss.
//!
//! Entries are keyed by the *type* of their original state, so a query
//! matches regardless of the queried state's trait values.
//!
//! Tokens in the configuration are resolved by [`ReplacementResolver::lookup_token`]:
//! a registered block id wins, otherwise the token names an alias known to the
//! [`AliasResolver`].

use crate::alias::AliasResolver;
use crate::block::registry::{BlockTypeRegistry, NamespaceRegistry, PopulatorRegistry};
use crate::block::{BlockState, Namespace, PopulatorType, IMPLICIT_NAMESPACE};
use crate::error::{LoadIssue, LoadReport};
use crate::mapping::{describe, Node, PopulatorMappings, TokenPairs};
use bevy::prelude::{debug, Resource};
use std::collections::{BTreeMap, HashMap};

pub mod hook;

/// An original state and the state it is replaced with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementEntry {
    pub original: BlockState,
    pub replacement: BlockState,
}

impl ReplacementEntry {
    #[must_use]
    pub fn new(original: BlockState, replacement: BlockState) -> Self {
        Self { original, replacement }
    }

    /// Whether `state` has the same block type as this entry's original.
    #[must_use]
    pub fn matches(&self, state: &BlockState) -> bool {
        self.original.block_type() == state.block_type()
    }
}

/// Replacement entries of one scope, keyed by original block type id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementSet {
    entries: HashMap<String, ReplacementEntry>,
}

impl ReplacementSet {
    /// Insert `entry`, replacing (and returning) any entry for the same
    /// original block type.
    pub fn insert(&mut self, entry: ReplacementEntry) -> Option<ReplacementEntry> {
        self.entries.insert(entry.original.block_type().id().to_string(), entry)
    }

    #[must_use]
    pub fn find(&self, state: &BlockState) -> Option<&ReplacementEntry> {
        self.entries.get(state.block_type().id()).filter(|e| e.matches(state))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReplacementEntry> {
        self.entries.values()
    }
}

#[derive(Resource, Debug, Clone)]
pub struct ReplacementResolver {
    // Ordered so that scoped lookups visit namespaces deterministically.
    populators: BTreeMap<Namespace, HashMap<PopulatorType, ReplacementSet>>,
    global: ReplacementSet,
    implicit_namespace: String,
}

impl Default for ReplacementResolver {
    fn default() -> Self {
        Self::with_implicit_namespace(IMPLICIT_NAMESPACE)
    }
}

impl ReplacementResolver {
    /// Create a resolver that treats unprefixed alias tokens as belonging
    /// to `namespace`.
    #[must_use]
    pub fn with_implicit_namespace(namespace: &str) -> Self {
        Self {
            populators: BTreeMap::new(),
            global: ReplacementSet::default(),
            implicit_namespace: namespace.to_string(),
        }
    }

    #[must_use]
    pub fn implicit_namespace(&self) -> &str {
        &self.implicit_namespace
    }

    /// Find the entry registered for `populator` whose original has the
    /// type of `state`.
    ///
    /// Namespaces are visited in ascending id order and the first one that
    /// registered `populator` decides the outcome: if it has no entry for
    /// the type, the result is `None` even if a later namespace has one.
    /// The global table is never consulted here.
    #[must_use]
    pub fn get_entry(&self, populator: &PopulatorType, state: &BlockState) -> Option<&ReplacementEntry> {
        self.populators
            .values()
            .find_map(|by_populator| by_populator.get(populator))
            .and_then(|set| set.find(state))
    }

    /// Find the global entry whose original has the type of `state`.
    #[must_use]
    pub fn get_global_entry(&self, state: &BlockState) -> Option<&ReplacementEntry> {
        self.global.find(state)
    }

    /// The replacement for `state` produced by `populator`: the scoped
    /// entry if there is one, the global entry otherwise.
    #[must_use]
    pub fn resolve(&self, populator: &PopulatorType, state: &BlockState) -> Option<&BlockState> {
        self.get_entry(populator, state)
            .or_else(|| self.get_global_entry(state))
            .map(|entry| &entry.replacement)
    }

    /// Register a non-empty set for (`namespace`, `populator`), replacing
    /// whatever was registered there.
    pub fn register(&mut self, namespace: &Namespace, populator: &PopulatorType, set: ReplacementSet) {
        if set.is_empty() {
            return;
        }
        self.populators
            .entry(namespace.clone())
            .or_default()
            .insert(populator.clone(), set);
    }

    pub fn insert_global(&mut self, entry: ReplacementEntry) -> Option<ReplacementEntry> {
        self.global.insert(entry)
    }

    #[must_use]
    pub fn global(&self) -> &ReplacementSet {
        &self.global
    }

    /// Number of scoped entries across all namespaces and populators.
    #[must_use]
    pub fn scoped_len(&self) -> usize {
        self.populators
            .values()
            .flat_map(HashMap::values)
            .map(ReplacementSet::len)
            .sum()
    }

    pub fn clear(&mut self) {
        self.populators.clear();
        self.global = ReplacementSet::default();
    }

    /// Rebuild both tables from `config`, resolving tokens through
    /// `registry` and `aliases`. `aliases` must already be loaded.
    pub fn load<R>(&mut self, config: &PopulatorMappings, registry: &R, aliases: &AliasResolver) -> LoadReport
    where
        R: NamespaceRegistry + BlockTypeRegistry + PopulatorRegistry + ?Sized,
    {
        self.clear();
        let mut report = LoadReport::default();

        let global = self.resolve_pairs("all", &config.all, registry, aliases, &mut report);
        report.loaded += global.len();
        self.global = global;

        for (namespace_id, by_populator) in &config.populators {
            let by_populator = match by_populator {
                Node::Valid(by_populator) => by_populator,
                Node::Malformed(found) => {
                    report.skip(LoadIssue::Malformed {
                        entry: format!("populators.{namespace_id}"),
                        found: describe(found),
                    });
                    continue;
                }
            };
            let Some(namespace) = registry.namespace(namespace_id) else {
                report.skip(LoadIssue::UnknownNamespace {
                    namespace: namespace_id.clone(),
                });
                continue;
            };

            for (populator_id, pairs) in by_populator {
                let pairs = match pairs {
                    Node::Valid(pairs) => pairs,
                    Node::Malformed(found) => {
                        report.skip(LoadIssue::Malformed {
                            entry: format!("populators.{namespace_id}.{populator_id}"),
                            found: describe(found),
                        });
                        continue;
                    }
                };
                let Some(populator) = registry.populator_type(&format!("{namespace_id}:{populator_id}")) else {
                    report.skip(LoadIssue::UnknownPopulator {
                        namespace: namespace_id.clone(),
                        populator: populator_id.clone(),
                    });
                    continue;
                };

                let scope = format!("populator {populator} in namespace {namespace}");
                let set = self.resolve_pairs(&scope, pairs, registry, aliases, &mut report);
                report.loaded += set.len();
                self.register(&namespace, &populator, set);
            }
        }

        report
    }

    fn resolve_pairs<R>(
        &self,
        scope: &str,
        pairs: &TokenPairs,
        registry: &R,
        aliases: &AliasResolver,
        report: &mut LoadReport,
    ) -> ReplacementSet
    where
        R: NamespaceRegistry + BlockTypeRegistry + ?Sized,
    {
        let mut set = ReplacementSet::default();

        for (original_token, replacement_token) in pairs {
            let Some(original) = self.lookup_token(original_token, registry, aliases) else {
                report.skip(LoadIssue::UnresolvedOriginal {
                    scope: scope.to_string(),
                    token: original_token.clone(),
                });
                continue;
            };
            let replacement = match replacement_token {
                Node::Valid(token) => self.lookup_token(token, registry, aliases).ok_or_else(|| token.clone()),
                Node::Malformed(found) => Err(describe(found)),
            };
            let replacement = match replacement {
                Ok(replacement) => replacement,
                Err(token) => {
                    report.skip(LoadIssue::UnresolvedReplacement {
                        scope: scope.to_string(),
                        token,
                    });
                    continue;
                }
            };

            if let Some(previous) = set.insert(ReplacementEntry::new(original, replacement)) {
                debug!(scope, original = %previous.original, token = %original_token, "replacement overridden");
            }
        }

        set
    }

    /// Resolve a configuration token to a block state.
    ///
    /// A registered block id yields that block's default state. Otherwise
    /// the token is read as `namespace:alias` (or a bare `alias` in the
    /// implicit namespace) and looked up in `aliases`; an unknown namespace
    /// prefix fails the lookup.
    #[must_use]
    pub fn lookup_token<R>(&self, raw: &str, registry: &R, aliases: &AliasResolver) -> Option<BlockState>
    where
        R: NamespaceRegistry + BlockTypeRegistry + ?Sized,
    {
        if let Some(block_type) = registry.block_type(raw) {
            return Some(block_type.default_state());
        }

        let (namespace_id, alias) = raw.split_once(':').unwrap_or((self.implicit_namespace.as_str(), raw));
        let namespace = registry.namespace(namespace_id)?;
        aliases.get(&namespace, alias).cloned()
    }
}
