//! query string parser - converts a raw query string into bound clauses
//!
//! supports:
//! - comma-separated clauses (implicit AND)
//! - `!` prefix on the key to negate a clause
//! - double-quoted arguments containing spaces or commas
//! - aliases, rewritten to their canonical key
//!
//! the first clause with an unknown key replaces the whole result, so a
//! partially valid query never evaluates.

use super::registry::Registry;
use super::tokenize::{split_clauses, split_tokens};
use super::types::{ParsedClause, ParsedQuery};

/// prefix that negates a clause
pub const NEGATION_PREFIX: char = '!';

/// parse a raw query string against the registry, without caching
pub fn parse_query(raw: &str, registry: &Registry) -> ParsedQuery {
    let mut clauses = Vec::new();

    for clause in split_clauses(raw) {
        let mut tokens = split_tokens(&clause);
        if tokens.is_empty() {
            continue;
        }

        let negated = match tokens[0].strip_prefix(NEGATION_PREFIX) {
            Some(key) => {
                tokens[0] = key.to_string();
                true
            }
            None => false,
        };

        if let Some(canonical) = registry.resolve_alias(&tokens[0]) {
            tokens[0] = canonical.to_string();
        }

        match registry.resolve(&tokens[0]) {
            Some((_, resolver)) => {
                let resolver = resolver.clone();
                clauses.push(ParsedClause::resolved(negated, tokens, resolver));
            }
            None => {
                let message = unknown_key_message(&tokens[0]);
                return ParsedQuery::invalid(ParsedClause::invalid(negated, tokens, message));
            }
        }
    }

    ParsedQuery::new(clauses)
}

fn unknown_key_message(key: &str) -> String {
    format!("'{}' isn't a known query or alias", key)
}
