//! quote-aware splitting for query strings
//!
//! two passes:
//! - `split_clauses` splits on top-level commas and keeps quotes and escapes
//!   intact, so each clause can be tokenized (or re-parsed by `ANY`) later
//! - `split_tokens` splits a clause on whitespace, strips the quotes and
//!   resolves `\"` / `\\` escapes
//!
//! a backslash only escapes inside quotes, and only before `"` or `\`;
//! anywhere else it is a literal character. an unterminated quote runs to
//! the end of the input.

use std::iter::Peekable;
use std::str::Chars;

const QUOTE: char = '"';
const ESCAPE: char = '\\';

/// the escaped character if `chars` continues an escape sequence
fn take_escaped(chars: &mut Peekable<Chars<'_>>) -> Option<char> {
    chars.next_if(|next| *next == QUOTE || *next == ESCAPE)
}

/// split a raw query string into trimmed, non-empty clauses
pub fn split_clauses(raw: &str) -> Vec<String> {
    let mut clauses = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE if in_quotes => {
                current.push(c);
                if let Some(escaped) = take_escaped(&mut chars) {
                    current.push(escaped);
                }
            }
            QUOTE => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => {
                push_trimmed(&mut clauses, &current);
                current.clear();
            }
            _ => current.push(c),
        }
    }
    push_trimmed(&mut clauses, &current);

    clauses
}

fn push_trimmed(clauses: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        clauses.push(trimmed.to_string());
    }
}

/// split one clause into tokens on whitespace outside quotes
///
/// a quoted token may contain spaces and commas; `""` yields an empty token
pub fn split_tokens(clause: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // tracks whether a token has begun, so `""` still produces a token
    let mut started = false;
    let mut in_quotes = false;
    let mut chars = clause.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE if in_quotes => {
                current.push(take_escaped(&mut chars).unwrap_or(c));
            }
            QUOTE => {
                started = true;
                in_quotes = !in_quotes;
            }
            c if c.is_whitespace() && !in_quotes => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            _ => {
                started = true;
                current.push(c);
            }
        }
    }
    if started {
        tokens.push(current);
    }

    tokens
}

/// quote a value so it survives `split_tokens` as a single token
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push(QUOTE);
    for c in value.chars() {
        if c == QUOTE || c == ESCAPE {
            quoted.push(ESCAPE);
        }
        quoted.push(c);
    }
    quoted.push(QUOTE);
    quoted
}
