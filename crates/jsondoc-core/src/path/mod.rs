//! JsonPath query subset.
//!
//! Supports:
//! - `$.store.book`: member access
//! - `$['store']`: bracketed member access
//! - `$.book[0]`, `$.book[-1]`: array index (negative counts from the end)
//! - `$.store.*`, `$.book[*]`: wildcard
//! - `$..price`, `$..`: recursive descent
//! - `$.book[?(@.price < 10)]`: single-comparison filter
//!
//! Missing members, out-of-range indices and unmatched filters contribute
//! nothing to the result; only malformed expressions are errors.

pub mod cache;
pub mod evaluator;
mod filter;
pub mod parser;
pub mod token;

pub use cache::{CacheConfig, CacheStats, PathCache};
pub use evaluator::{CancellationToken, Cancellable, Query};
pub use parser::compile;
pub use token::{CompareOp, CompiledPath, FilterLiteral, FilterPredicate, PathToken};

use crate::error::PathSyntaxError;
use crate::value::Value;

/// Lazily select every value `expression` matches in `root`.
///
/// The expression is compiled through `cache`, so repeated queries with the
/// same text parse once.
///
/// # Errors
///
/// Returns [`PathSyntaxError`] for a malformed expression.
///
/// # Examples
///
/// ```
/// use jsondoc_core::{query, PathCache, Value};
///
/// let cache = PathCache::new();
/// let doc: Value = r#"{"a":1,"b":2}"#.parse().unwrap();
/// let values: Vec<String> = query(&doc, "$.*", &cache)
///     .unwrap()
///     .map(|v| v.to_string())
///     .collect();
/// assert_eq!(values, ["1", "2"]);
/// ```
pub fn query<'a>(
    root: &'a Value,
    expression: &str,
    cache: &PathCache,
) -> Result<Query<'a>, PathSyntaxError> {
    let compiled = cache.get_or_compile(expression)?;
    Ok(compiled.evaluate(root))
}

/// The first value `expression` matches, without evaluating the rest.
///
/// # Errors
///
/// Returns [`PathSyntaxError`] for a malformed expression.
pub fn query_first<'a>(
    root: &'a Value,
    expression: &str,
    cache: &PathCache,
) -> Result<Option<&'a Value>, PathSyntaxError> {
    Ok(query(root, expression, cache)?.next())
}
