//! error types for the query engine
//!
//! registration problems are returned to the caller; resolver failures are
//! data that the evaluator logs and turns into `false`.

use thiserror::Error;

/// invalid registry configuration, raised by `register` / `register_alias`
///
/// a failed registration leaves the registry unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("can't register a query with a blank key")]
    BlankKey,

    #[error("the query key '{0}' is already registered")]
    DuplicateKey(String),

    #[error("can't register query '{0}' because that name is already an alias of '{1}'")]
    KeyIsAlias(String, String),

    #[error("can't register a blank alias")]
    BlankAlias,

    #[error("can't register alias '{0}' because that name is already a query key")]
    AliasIsKey(String),

    #[error("the alias '{0}' is already registered for '{1}'")]
    DuplicateAlias(String, String),

    #[error("can't register alias '{0}' for a blank query key")]
    BlankAliasTarget(String),

    #[error("can't register alias '{0}' for unknown query key '{1}'")]
    UnknownAliasTarget(String, String),
}

/// an expected failure reported by a resolver
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolverError {
    #[error("required index {index} ({name}) not found")]
    MissingArgument { index: usize, name: &'static str },

    #[error("required index {index} ({name}) has value '{value}', which {reason}")]
    InvalidArgument {
        index: usize,
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("no {0} is available in this context")]
    MissingContext(&'static str),

    #[error("{0}")]
    Failed(String),
}

impl ResolverError {
    pub fn invalid(
        index: usize,
        name: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            index,
            name,
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
