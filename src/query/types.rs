//! core types for parsed query strings

use std::fmt;
use std::sync::Arc;

use super::args::QueryArgs;
use super::context::QueryContext;
use super::error::ResolverError;
use super::tokenize;

/// what a resolver returns: the clause result, or an expected failure
pub type ResolverResult = Result<bool, ResolverError>;

/// a function bound to a query key
///
/// `args.tokens()[0]` is the canonical key, the rest are its arguments
pub type Resolver =
    Arc<dyn Fn(&QueryArgs<'_>, &QueryContext<'_>) -> ResolverResult + Send + Sync>;

/// wrap a function or closure as a [`Resolver`]
pub fn resolver<F>(f: F) -> Resolver
where
    F: Fn(&QueryArgs<'_>, &QueryContext<'_>) -> ResolverResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// how a clause was bound during parsing
#[derive(Clone)]
pub enum ClauseBinding {
    /// the key resolved to a registered resolver
    Resolved(Resolver),
    /// the key couldn't be resolved; holds the error message
    Invalid(String),
}

impl fmt::Debug for ClauseBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseBinding::Resolved(_) => write!(f, "Resolved(<function>)"),
            ClauseBinding::Invalid(message) => f.debug_tuple("Invalid").field(message).finish(),
        }
    }
}

impl PartialEq for ClauseBinding {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ClauseBinding::Resolved(a), ClauseBinding::Resolved(b)) => Arc::ptr_eq(a, b),
            (ClauseBinding::Invalid(a), ClauseBinding::Invalid(b)) => a == b,
            _ => false,
        }
    }
}

/// one `[!]KEY arg...` unit of a query string
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedClause {
    /// whether the clause had a leading `!`
    pub negated: bool,
    /// the key (alias-resolved, `!` stripped) followed by its arguments
    pub tokens: Vec<String>,
    pub binding: ClauseBinding,
}

impl ParsedClause {
    pub fn resolved(negated: bool, tokens: Vec<String>, resolver: Resolver) -> Self {
        Self {
            negated,
            tokens,
            binding: ClauseBinding::Resolved(resolver),
        }
    }

    pub fn invalid(negated: bool, tokens: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            negated,
            tokens,
            binding: ClauseBinding::Invalid(message.into()),
        }
    }

    /// the clause key, or an empty string for a clause without tokens
    pub fn key(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or("")
    }

    /// arguments after the key
    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    pub fn resolver(&self) -> Option<&Resolver> {
        match &self.binding {
            ClauseBinding::Resolved(resolver) => Some(resolver),
            ClauseBinding::Invalid(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.binding {
            ClauseBinding::Resolved(_) => None,
            ClauseBinding::Invalid(message) => Some(message),
        }
    }

    /// true if this clause is exactly `key` with no arguments
    pub fn is_bare(&self, key: &str) -> bool {
        self.tokens.len() == 1 && self.key().eq_ignore_ascii_case(key)
    }
}

impl fmt::Display for ParsedClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "!")?;
        }
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if needs_quotes(token) {
                write!(f, "{}", tokenize::quote(token))?;
            } else {
                write!(f, "{}", token)?;
            }
        }
        Ok(())
    }
}

fn needs_quotes(token: &str) -> bool {
    token.is_empty()
        || token
            .chars()
            .any(|c| c.is_whitespace() || c == ',' || c == '"')
}

/// the parsed form of a raw query string
///
/// when any clause fails to resolve, the whole query collapses to that single
/// invalid clause
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedQuery {
    clauses: Vec<ParsedClause>,
}

impl ParsedQuery {
    pub fn new(clauses: Vec<ParsedClause>) -> Self {
        Self { clauses }
    }

    /// a query that failed to parse
    pub fn invalid(clause: ParsedClause) -> Self {
        Self {
            clauses: vec![clause],
        }
    }

    pub fn clauses(&self) -> &[ParsedClause] {
        &self.clauses
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParsedClause> {
        self.clauses.iter()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// the parse error, if this query failed to parse
    pub fn error(&self) -> Option<&str> {
        self.clauses.first().and_then(ParsedClause::error)
    }

    pub fn is_valid(&self) -> bool {
        self.error().is_none()
    }
}

impl<'a> IntoIterator for &'a ParsedQuery {
    type Item = &'a ParsedClause;
    type IntoIter = std::slice::Iter<'a, ParsedClause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}
