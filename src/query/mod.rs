//! game state query engine
//!
//! evaluates comma-separated condition strings such as
//! `SEASON spring summer, !WEATHER Rain, PLAYER_HAS_ITEM "(O)128" 3`
//! against a `QueryContext`:
//! - clauses are ANDed and evaluation stops at the first failing clause
//! - a leading `!` negates a single clause
//! - double-quoted arguments may contain spaces and commas
//! - keys and aliases are case-insensitive
//!
//! parsed queries are cached per raw string; call `Engine::update` once per
//! tick to let the cache shed one-off entries.

mod args;
mod cache;
mod context;
mod error;
mod eval;
mod parser;
mod registry;
mod tokenize;
mod types;

pub use args::QueryArgs;
pub use cache::{
    CacheSettings, ParseCache, DEFAULT_EVICTION_INTERVAL_TICKS, DEFAULT_MIN_ENTRIES_TO_EVICT,
};
pub use context::{IgnoredKeys, ItemSlot, QueryContext};
pub use error::{RegistryError, ResolverError};
pub use eval::{install_panic_hook, Engine, FALSE_QUERY, TRUE_QUERY};
pub use parser::{parse_query, NEGATION_PREFIX};
pub use registry::{Registry, DEFAULT_SUGGESTION_DISTANCE};
pub use tokenize::{quote, split_clauses, split_tokens};
pub use types::{resolver, ClauseBinding, ParsedClause, ParsedQuery, Resolver, ResolverResult};
