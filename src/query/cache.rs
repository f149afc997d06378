//! parse cache with periodic all-or-nothing eviction
//!
//! parsed queries are memoized by their exact raw string. the host calls
//! `tick` once per game tick; every `eviction_interval_ticks` the whole cache
//! is dropped if it holds more than `min_entries_to_evict` entries, which
//! bounds growth from one-off, dynamically built query strings.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::ParsedQuery;

pub const DEFAULT_EVICTION_INTERVAL_TICKS: u64 = 3600;
pub const DEFAULT_MIN_ENTRIES_TO_EVICT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// ticks between eviction checks
    #[serde(default = "default_eviction_interval_ticks")]
    pub eviction_interval_ticks: u64,
    /// the cache is only cleared when it holds more entries than this
    #[serde(default = "default_min_entries_to_evict")]
    pub min_entries_to_evict: usize,
}

fn default_eviction_interval_ticks() -> u64 {
    DEFAULT_EVICTION_INTERVAL_TICKS
}

fn default_min_entries_to_evict() -> usize {
    DEFAULT_MIN_ENTRIES_TO_EVICT
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            eviction_interval_ticks: DEFAULT_EVICTION_INTERVAL_TICKS,
            min_entries_to_evict: DEFAULT_MIN_ENTRIES_TO_EVICT,
        }
    }
}

/// raw query string -> parsed query
///
/// entries are never mutated after insertion, only replaced or evicted
#[derive(Debug)]
pub struct ParseCache {
    entries: HashMap<String, Arc<ParsedQuery>>,
    settings: CacheSettings,
    tick: u64,
    next_check_tick: u64,
}

impl ParseCache {
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            entries: HashMap::new(),
            settings,
            tick: 0,
            next_check_tick: settings.eviction_interval_ticks,
        }
    }

    pub fn settings(&self) -> CacheSettings {
        self.settings
    }

    pub fn get(&self, raw: &str) -> Option<Arc<ParsedQuery>> {
        self.entries.get(raw).cloned()
    }

    pub fn insert(&mut self, raw: &str, parsed: Arc<ParsedQuery>) {
        self.entries.insert(raw.to_string(), parsed);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// ticks counted so far
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// the tick at which the next eviction check happens
    pub fn next_check_tick(&self) -> u64 {
        self.next_check_tick
    }

    /// advance one tick; returns true if the cache was cleared
    pub fn tick(&mut self) -> bool {
        self.tick = self.tick.saturating_add(1);
        if self.tick < self.next_check_tick {
            return false;
        }

        let evict = self.entries.len() > self.settings.min_entries_to_evict;
        if evict {
            debug!(
                entries = self.entries.len(),
                tick = self.tick,
                "clearing query parse cache"
            );
            self.entries.clear();
        }
        self.next_check_tick = self
            .tick
            .saturating_add(self.settings.eviction_interval_ticks);

        evict
    }
}
