//! built-in resolvers and their registration tables
//!
//! every resolver is a plain function listed in `DEFAULT_RESOLVERS`; aliases
//! live in `DEFAULT_ALIASES` and are registered after all keys so their
//! targets exist.

mod item;
mod location;
mod meta;
mod player;
mod world;

use crate::query::{
    Engine, IgnoredKeys, QueryArgs, QueryContext, RegistryError, ResolverError, ResolverResult,
};

/// signature shared by every built-in resolver
pub type ResolverFn = fn(&QueryArgs<'_>, &QueryContext<'_>) -> ResolverResult;

/// built-in query keys, in registration order
pub const DEFAULT_RESOLVERS: &[(&str, ResolverFn)] = &[
    ("TRUE", meta::always_true),
    ("FALSE", meta::always_false),
    ("ANY", meta::any),
    ("RANDOM", meta::random),
    ("SEASON", world::season),
    ("DAY_OF_MONTH", world::day_of_month),
    ("DAY_OF_WEEK", world::day_of_week),
    ("TIME", world::time),
    ("YEAR", world::year),
    ("WEATHER", world::weather),
    ("LOCATION_SEASON", location::location_season),
    ("LOCATION_NAME", location::location_name),
    ("LOCATION_IS_OUTDOORS", location::location_is_outdoors),
    ("PLAYER_HAS_ITEM", player::has_item),
    ("PLAYER_CURRENT_MONEY", player::current_money),
    ("PLAYER_HAS_MAIL", player::has_mail),
    ("ITEM_ID", item::item_id),
    ("ITEM_QUALITY", item::item_quality),
    ("ITEM_STACK", item::item_stack),
    ("ITEM_CONTEXT_TAG", item::item_context_tag),
];

/// `(alias, key)` pairs registered after `DEFAULT_RESOLVERS`
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("WEEKDAY", "DAY_OF_WEEK"),
    ("CURRENT_TIME", "TIME"),
    ("PLAYER_MONEY", "PLAYER_CURRENT_MONEY"),
    ("LOCATION", "LOCATION_NAME"),
];

/// keys that check the season, for callers that ignore seasonal gating
pub const SEASON_QUERY_KEYS: &[&str] = &["SEASON", "LOCATION_SEASON"];

/// keys that check the calendar or clock, for callers that ignore time gating
pub const TIME_QUERY_KEYS: &[&str] = &["TIME", "DAY_OF_WEEK", "DAY_OF_MONTH"];

/// register all built-in resolvers and aliases
pub fn register_defaults(engine: &mut Engine) -> Result<(), RegistryError> {
    for (key, resolver) in DEFAULT_RESOLVERS {
        engine.register_fn(key, *resolver)?;
    }
    for (alias, key) in DEFAULT_ALIASES {
        engine.register_alias(alias, key)?;
    }
    Ok(())
}

/// build an ignore set for `QueryContext::with_ignored_keys`
pub fn ignore_set<'k>(groups: impl IntoIterator<Item = &'k [&'k str]>) -> IgnoredKeys {
    groups
        .into_iter()
        .flat_map(|keys| keys.iter().copied())
        .collect()
}

/// read `<min> [max]` starting at `index`; max defaults to unbounded
pub(crate) fn read_range(
    args: &QueryArgs<'_>,
    index: usize,
) -> Result<(i64, i64), ResolverError> {
    let min = args.required_int(index, "int min")?;
    let max = args.optional_int(index + 1, "int max", i64::MAX)?;
    Ok((min, max))
}

pub(crate) fn in_range(value: i64, (min, max): (i64, i64)) -> bool {
    value >= min && value <= max
}

/// whether `value` case-insensitively matches any of `candidates`
pub(crate) fn matches_any(value: &str, candidates: &[String]) -> bool {
    candidates.iter().any(|c| c.eq_ignore_ascii_case(value))
}
