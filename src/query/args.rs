//! argument access for resolvers
//!
//! resolvers read their tokens through `QueryArgs`, which turns missing or
//! malformed arguments into `ResolverError`s the evaluator can log.

use super::error::ResolverError;
use super::eval::Engine;

/// the tokens of one clause plus the engine evaluating it
#[derive(Clone, Copy)]
pub struct QueryArgs<'q> {
    tokens: &'q [String],
    engine: &'q Engine,
}

impl<'q> QueryArgs<'q> {
    pub fn new(tokens: &'q [String], engine: &'q Engine) -> Self {
        Self { tokens, engine }
    }

    /// all tokens, key first
    pub fn tokens(&self) -> &'q [String] {
        self.tokens
    }

    /// the canonical query key
    pub fn key(&self) -> &'q str {
        self.get(0).unwrap_or("")
    }

    /// number of tokens, including the key
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// true if the clause has no arguments after its key
    pub fn is_empty(&self) -> bool {
        self.tokens.len() <= 1
    }

    /// the engine evaluating this clause, for resolvers that evaluate sub-queries
    pub fn engine(&self) -> &'q Engine {
        self.engine
    }

    pub fn get(&self, index: usize) -> Option<&'q str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// tokens from `index` to the end
    pub fn rest(&self, index: usize) -> &'q [String] {
        self.tokens.get(index..).unwrap_or(&[])
    }

    pub fn required(&self, index: usize, name: &'static str) -> Result<&'q str, ResolverError> {
        self.get(index)
            .ok_or(ResolverError::MissingArgument { index, name })
    }

    pub fn optional(&self, index: usize) -> Option<&'q str> {
        self.get(index)
    }

    pub fn required_int(&self, index: usize, name: &'static str) -> Result<i64, ResolverError> {
        let value = self.required(index, name)?;
        parse_int(index, name, value)
    }

    /// an integer argument that falls back to `default` when absent
    ///
    /// a present but malformed value is still an error
    pub fn optional_int(
        &self,
        index: usize,
        name: &'static str,
        default: i64,
    ) -> Result<i64, ResolverError> {
        match self.get(index) {
            Some(value) => parse_int(index, name, value),
            None => Ok(default),
        }
    }

    pub fn required_float(&self, index: usize, name: &'static str) -> Result<f64, ResolverError> {
        let value = self.required(index, name)?;
        value
            .parse::<f64>()
            .map_err(|_| ResolverError::invalid(index, name, value, "can't be parsed as a number"))
    }

    /// all tokens from `index` on, requiring at least one
    pub fn required_list(
        &self,
        index: usize,
        name: &'static str,
    ) -> Result<&'q [String], ResolverError> {
        self.required(index, name)?;
        Ok(self.rest(index))
    }

    /// the clause as written, for diagnostics
    pub fn raw(&self) -> String {
        self.tokens.join(" ")
    }
}

fn parse_int(index: usize, name: &'static str, value: &str) -> Result<i64, ResolverError> {
    value
        .parse::<i64>()
        .map_err(|_| ResolverError::invalid(index, name, value, "can't be parsed as an integer"))
}

impl std::fmt::Debug for QueryArgs<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryArgs")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
