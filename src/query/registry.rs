//! query key and alias registry
//!
//! keys and aliases share one case-insensitive namespace. an alias maps to
//! exactly one registered key and must be added after that key.

use std::collections::HashMap;

use strsim::levenshtein;
use tracing::trace;

use super::error::RegistryError;
use super::types::Resolver;

/// default edit distance for `Registry::suggest`
pub const DEFAULT_SUGGESTION_DISTANCE: usize = 2;

struct QueryEntry {
    /// key as registered (trimmed)
    key: String,
    resolver: Resolver,
}

struct AliasEntry {
    alias: String,
    /// canonical key the alias points to
    key: String,
}

/// mappings from query key to resolver and from alias to query key
#[derive(Default)]
pub struct Registry {
    queries: HashMap<String, QueryEntry>,
    aliases: HashMap<String, AliasEntry>,
}

pub(super) fn normalize(key: &str) -> String {
    key.trim().to_uppercase()
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// register a resolver for a query key
    pub fn register(&mut self, key: &str, resolver: Resolver) -> Result<(), RegistryError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(RegistryError::BlankKey);
        }

        let normalized = normalize(key);
        if self.queries.contains_key(&normalized) {
            return Err(RegistryError::DuplicateKey(key.to_string()));
        }
        if let Some(alias) = self.aliases.get(&normalized) {
            return Err(RegistryError::KeyIsAlias(key.to_string(), alias.key.clone()));
        }

        trace!(key, "registered query");
        self.queries.insert(
            normalized,
            QueryEntry {
                key: key.to_string(),
                resolver,
            },
        );
        Ok(())
    }

    /// register an alternate name for an already registered query key
    pub fn register_alias(&mut self, alias: &str, key: &str) -> Result<(), RegistryError> {
        let alias = alias.trim();
        if alias.is_empty() {
            return Err(RegistryError::BlankAlias);
        }

        let normalized_alias = normalize(alias);
        if self.queries.contains_key(&normalized_alias) {
            return Err(RegistryError::AliasIsKey(alias.to_string()));
        }
        if let Some(existing) = self.aliases.get(&normalized_alias) {
            return Err(RegistryError::DuplicateAlias(
                alias.to_string(),
                existing.key.clone(),
            ));
        }

        let key = key.trim();
        if key.is_empty() {
            return Err(RegistryError::BlankAliasTarget(alias.to_string()));
        }
        let Some(target) = self.queries.get(&normalize(key)) else {
            return Err(RegistryError::UnknownAliasTarget(
                alias.to_string(),
                key.to_string(),
            ));
        };

        trace!(alias, key = %target.key, "registered query alias");
        let canonical = target.key.clone();
        self.aliases.insert(
            normalized_alias,
            AliasEntry {
                alias: alias.to_string(),
                key: canonical,
            },
        );
        Ok(())
    }

    /// whether `key` is a registered query key or alias
    pub fn exists(&self, key: &str) -> bool {
        let normalized = normalize(key);
        self.queries.contains_key(&normalized) || self.aliases.contains_key(&normalized)
    }

    /// the canonical key for an alias, if `key` is one
    pub fn resolve_alias(&self, key: &str) -> Option<&str> {
        self.aliases
            .get(&normalize(key))
            .map(|entry| entry.key.as_str())
    }

    /// resolve a key or alias to its canonical key and resolver
    pub fn resolve(&self, key: &str) -> Option<(&str, &Resolver)> {
        let canonical = self.resolve_alias(key).unwrap_or(key);
        self.queries
            .get(&normalize(canonical))
            .map(|entry| (entry.key.as_str(), &entry.resolver))
    }

    /// registered query keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.queries.values().map(|e| e.key.as_str()).collect();
        keys.sort_unstable();
        keys
    }

    /// registered `(alias, key)` pairs, sorted by alias
    pub fn aliases(&self) -> Vec<(&str, &str)> {
        let mut aliases: Vec<(&str, &str)> = self
            .aliases
            .values()
            .map(|e| (e.alias.as_str(), e.key.as_str()))
            .collect();
        aliases.sort_unstable();
        aliases
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// keys and aliases within `max_distance` edits of `key`, closest first
    pub fn suggest(&self, key: &str, max_distance: usize) -> Vec<String> {
        let wanted = normalize(key);

        let mut matches: Vec<(&str, usize)> = self
            .queries
            .iter()
            .map(|(normalized, entry)| (entry.key.as_str(), levenshtein(&wanted, normalized)))
            .chain(
                self.aliases
                    .iter()
                    .map(|(normalized, entry)| (entry.alias.as_str(), levenshtein(&wanted, normalized))),
            )
            .filter(|(_, distance)| *distance <= max_distance)
            .collect();

        matches.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        matches.into_iter().map(|(name, _)| name.to_string()).collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("keys", &self.keys())
            .field("aliases", &self.aliases())
            .finish()
    }
}
