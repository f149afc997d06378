//! game state queries: parse, cache and evaluate comma-separated condition strings
//!
//! ```
//! use gsq::query::{CacheSettings, Engine, QueryContext};
//! use gsq::state::{Season, WorldState};
//!
//! let engine = Engine::with_defaults(CacheSettings::default()).unwrap();
//! let world = WorldState { season: Season::Summer, ..WorldState::default() };
//! let ctx = QueryContext::new(&world);
//!
//! assert!(engine.check_conditions("SEASON spring summer, !WEATHER Rain", &ctx));
//! assert!(engine.is_immutably_false("TRUE, FALSE"));
//! ```

pub mod cli;
pub mod config;
pub mod query;
pub mod resolvers;
pub mod state;
