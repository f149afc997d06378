//! evaluation context handed to every resolver

use std::cell::RefCell;
use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::Rng;

use super::registry::normalize;
use crate::state::{Item, Location, Player, WorldState};

/// which context item a resolver should inspect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSlot {
    /// the item being checked (e.g. a fish being caught)
    Target,
    /// the item being consumed or placed (e.g. bait, machine input)
    Input,
}

impl ItemSlot {
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("target") {
            Some(ItemSlot::Target)
        } else if s.eq_ignore_ascii_case("input") {
            Some(ItemSlot::Input)
        } else {
            None
        }
    }
}

/// query keys whose clauses are skipped during evaluation
///
/// keys are stored trimmed and uppercased, so lookups are case-insensitive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoredKeys {
    keys: HashSet<String>,
}

impl IgnoredKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// add a key; returns false if it was already present
    pub fn insert(&mut self, key: &str) -> bool {
        self.keys.insert(normalize(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(normalize(key).as_str())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// the normalized keys, sorted
    pub fn sorted(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys.iter().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl<S: AsRef<str>> Extend<S> for IgnoredKeys {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for IgnoredKeys {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut keys = Self::new();
        keys.extend(iter);
        keys
    }
}

/// situational inputs for one evaluation
///
/// built per call and dropped afterwards; nothing here is mutated by the
/// engine except the random source
#[derive(Debug, Clone, Copy)]
pub struct QueryContext<'a> {
    pub world: &'a WorldState,
    /// location to check, if any
    pub location: Option<&'a Location>,
    /// acting player, if any
    pub player: Option<&'a Player>,
    pub target_item: Option<&'a Item>,
    pub input_item: Option<&'a Item>,
    /// caller-supplied random source; a thread-local RNG is used when absent
    pub random: Option<&'a RefCell<StdRng>>,
    /// query keys whose clauses are skipped entirely
    pub ignore_query_keys: Option<&'a IgnoredKeys>,
}

impl<'a> QueryContext<'a> {
    /// create a new context for the given world
    pub fn new(world: &'a WorldState) -> Self {
        Self {
            world,
            location: None,
            player: None,
            target_item: None,
            input_item: None,
            random: None,
            ignore_query_keys: None,
        }
    }

    pub fn with_location(mut self, location: Option<&'a Location>) -> Self {
        self.location = location;
        self
    }

    pub fn with_player(mut self, player: Option<&'a Player>) -> Self {
        self.player = player;
        self
    }

    pub fn with_target_item(mut self, item: Option<&'a Item>) -> Self {
        self.target_item = item;
        self
    }

    pub fn with_input_item(mut self, item: Option<&'a Item>) -> Self {
        self.input_item = item;
        self
    }

    pub fn with_random(mut self, random: &'a RefCell<StdRng>) -> Self {
        self.random = Some(random);
        self
    }

    pub fn with_ignored_keys(mut self, keys: &'a IgnoredKeys) -> Self {
        self.ignore_query_keys = Some(keys);
        self
    }

    pub fn item(&self, slot: ItemSlot) -> Option<&'a Item> {
        match slot {
            ItemSlot::Target => self.target_item,
            ItemSlot::Input => self.input_item,
        }
    }

    /// whether clauses for `key` should be skipped
    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignore_query_keys
            .map(|keys| keys.contains(key))
            .unwrap_or(false)
    }

    /// draw a uniform value in [0, 1) from the context's random source
    pub fn random_f64(&self) -> f64 {
        match self.random {
            Some(rng) => rng.borrow_mut().gen::<f64>(),
            None => rand::thread_rng().gen::<f64>(),
        }
    }
}
