//! query evaluator
//!
//! evaluates query strings against a `QueryContext`: clauses are ANDed left
//! to right and evaluation stops at the first clause that fails. every error
//! (unknown key, bad arguments, a panicking resolver) is logged and turns the
//! whole query into `false`; nothing escapes `check_conditions`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe, Location};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::error;

use super::args::QueryArgs;
use super::cache::{CacheSettings, ParseCache};
use super::context::QueryContext;
use super::error::RegistryError;
use super::parser::parse_query;
use super::registry::Registry;
use super::types::{resolver, ParsedClause, ParsedQuery, Resolver, ResolverResult};

/// query string that is always true without parsing
pub const TRUE_QUERY: &str = "TRUE";
/// query string that is always false without parsing
pub const FALSE_QUERY: &str = "FALSE";

/// the query engine: registry, parse cache and evaluator
///
/// build it once at startup, register every resolver and alias, then share
/// it by reference. registration needs `&mut self`, so it is closed as soon
/// as the engine is shared.
pub struct Engine {
    registry: Registry,
    cache: Mutex<ParseCache>,
}

impl Engine {
    /// an engine with an empty registry
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            registry: Registry::new(),
            cache: Mutex::new(ParseCache::new(settings)),
        }
    }

    /// an engine with the built-in resolvers and aliases registered
    pub fn with_defaults(settings: CacheSettings) -> Result<Self, RegistryError> {
        let mut engine = Self::new(settings);
        crate::resolvers::register_defaults(&mut engine)?;
        Ok(engine)
    }

    pub fn register(&mut self, key: &str, resolver: Resolver) -> Result<(), RegistryError> {
        self.registry.register(key, resolver)
    }

    /// register a plain function or closure as a resolver
    pub fn register_fn<F>(&mut self, key: &str, f: F) -> Result<(), RegistryError>
    where
        F: Fn(&QueryArgs<'_>, &QueryContext<'_>) -> ResolverResult + Send + Sync + 'static,
    {
        self.registry.register(key, resolver(f))
    }

    pub fn register_alias(&mut self, alias: &str, key: &str) -> Result<(), RegistryError> {
        self.registry.register_alias(alias, key)
    }

    /// whether `key` is a registered query key or alias; `None` is never registered
    pub fn exists<'q>(&self, key: impl Into<Option<&'q str>>) -> bool {
        key.into().map(|k| self.registry.exists(k)).unwrap_or(false)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// parse a query string, using the cache
    ///
    /// the returned value is shared with the cache and must be treated as
    /// read-only
    pub fn parse(&self, raw: &str) -> Arc<ParsedQuery> {
        if let Some(parsed) = self.lock_cache().get(raw) {
            return parsed;
        }

        // parse without holding the lock
        let parsed = Arc::new(parse_query(raw, &self.registry));
        self.lock_cache().insert(raw, parsed.clone());
        parsed
    }

    /// evaluate a query string against the given context
    ///
    /// `None`, `""` and `"TRUE"` are always true, `"FALSE"` is always false.
    /// a panicking resolver is caught and logged, but the process panic hook
    /// still reports it first; see [`install_panic_hook`].
    pub fn check_conditions<'q>(
        &self,
        query: impl Into<Option<&'q str>>,
        ctx: &QueryContext<'_>,
    ) -> bool {
        let Some(raw) = query.into() else {
            return true;
        };
        if raw.is_empty() || raw == TRUE_QUERY {
            return true;
        }
        if raw == FALSE_QUERY {
            return false;
        }

        let parsed = self.parse(raw);
        if let Some(message) = parsed.error() {
            error!("Failed parsing condition '{}': {}.", raw, message);
            return false;
        }

        for clause in parsed.iter() {
            if ctx.is_ignored(clause.key()) {
                continue;
            }
            if !self.check_clause(raw, clause, ctx) {
                return false;
            }
        }

        true
    }

    /// evaluate one clause, applying its negation
    fn check_clause(&self, raw: &str, clause: &ParsedClause, ctx: &QueryContext<'_>) -> bool {
        let Some(resolver) = clause.resolver() else {
            return false;
        };

        let args = QueryArgs::new(&clause.tokens, self);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (**resolver)(&args, ctx)));

        match outcome {
            Ok(Ok(result)) => result != clause.negated,
            Ok(Err(e)) => {
                error!("Failed parsing condition '{}': {}.", args.raw(), e);
                false
            }
            Err(payload) => {
                error!(
                    "Failed evaluating condition '{}': unhandled exception in clause '{}': {}",
                    raw,
                    clause,
                    panic_message(payload.as_ref())
                );
                false
            }
        }
    }

    /// whether the query is true regardless of context
    ///
    /// true for `None`, `""`, `"TRUE"`, or when every clause is a bare `TRUE`
    /// or `!FALSE`. a query that fails to parse is never immutably true.
    pub fn is_immutably_true<'q>(&self, query: impl Into<Option<&'q str>>) -> bool {
        let Some(raw) = query.into() else {
            return true;
        };
        if raw.is_empty() || raw == TRUE_QUERY {
            return true;
        }
        if raw == FALSE_QUERY {
            return false;
        }

        let parsed = self.parse(raw);
        parsed.is_valid()
            && parsed.iter().all(|clause| {
                let constant = if clause.negated { FALSE_QUERY } else { TRUE_QUERY };
                clause.is_bare(constant)
            })
    }

    /// whether the query is false regardless of context
    ///
    /// true for `"FALSE"`, or when any clause is a bare `FALSE` or `!TRUE`.
    /// a query that fails to parse is never immutably false.
    pub fn is_immutably_false<'q>(&self, query: impl Into<Option<&'q str>>) -> bool {
        let Some(raw) = query.into() else {
            return false;
        };
        if raw == FALSE_QUERY {
            return true;
        }
        if raw.is_empty() || raw == TRUE_QUERY {
            return false;
        }

        let parsed = self.parse(raw);
        parsed.is_valid()
            && parsed.iter().any(|clause| {
                let constant = if clause.negated { TRUE_QUERY } else { FALSE_QUERY };
                clause.is_bare(constant)
            })
    }

    /// advance the cache clock by one tick; call once per game tick
    ///
    /// returns true if the parse cache was cleared
    pub fn update(&self) -> bool {
        self.lock_cache().tick()
    }

    pub fn cache_len(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    pub fn current_tick(&self) -> u64 {
        self.lock_cache().current_tick()
    }

    fn lock_cache(&self) -> MutexGuard<'_, ParseCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("cached", &self.cache_len())
            .finish()
    }
}

/// route panic reports through `tracing` instead of printing them to stderr
///
/// call once after the subscriber is set up, so a panicking resolver shows up
/// in the same log stream as the evaluation error that follows it
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        error!("{}", panic_report(info.payload(), info.location()));
    }));
}

fn panic_report(payload: &(dyn Any + Send), location: Option<&Location<'_>>) -> String {
    match location {
        Some(location) => format!("panicked at {}: {}", location, panic_message(payload)),
        None => format!("panicked: {}", panic_message(payload)),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
