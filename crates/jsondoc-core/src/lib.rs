//! # jsondoc-core
//!
//! A path-addressed JSON document engine over an immutable, structurally
//! shared value tree.
//!
//! - **Query**: a JsonPath subset (`$.a.b`, `[0]`, `[-1]`, `*`, `..`,
//!   `[?(@.age >= 18)]`) evaluated lazily, with an explicit, caller-owned
//!   parse cache.
//! - **Patch**: RFC 6902 operations (add, remove, replace, move, copy,
//!   test) addressed by RFC 6901 JSON Pointers, applied all-or-nothing.
//!
//! ## Quick start
//!
//! ```rust
//! use jsondoc_core::{apply_patch, parse_patch_str, query, PathCache, Value};
//!
//! let doc: Value = r#"{"items":[{"age":17},{"age":21}]}"#.parse().unwrap();
//!
//! let cache = PathCache::new();
//! let adults: Vec<&Value> = query(&doc, "$.items[?(@.age>=18)]", &cache)
//!     .unwrap()
//!     .collect();
//! assert_eq!(adults.len(), 1);
//!
//! let patch = parse_patch_str(r#"[{"op":"add","path":"/items/-","value":{"age":30}}]"#).unwrap();
//! let patched = apply_patch(&doc, &patch).unwrap();
//! assert_eq!(patched.try_get_property("items").unwrap().array_length(), Some(3));
//! assert_eq!(doc.try_get_property("items").unwrap().array_length(), Some(2));
//! ```
//!
//! ## Modules
//!
//! - [`value`]: the `Value` tree and JSON text I/O
//! - [`number`]: exact-preserving JSON numbers
//! - [`equality`]: structural equality (`semantic_equals`)
//! - [`path`]: path parser, lazy evaluator and parse cache
//! - [`pointer`]: JSON Pointer parsing and lookup
//! - [`patch`]: patch operations and the patch engine
//! - [`error`]: error types

pub mod equality;
pub mod error;
pub mod number;
pub mod patch;
pub mod path;
pub mod pointer;
pub mod value;

pub use equality::semantic_equals;
pub use error::{JsonDocError, PatchError, PathSyntaxError, PointerSyntaxError, Result};
pub use number::Number;
pub use patch::{apply_patch, parse_patch, parse_patch_str, PatchOperation};
pub use path::{
    compile, query, query_first, CacheConfig, CacheStats, CancellationToken, CompiledPath,
    PathCache, PathToken, Query,
};
pub use pointer::{JsonPointer, LookupError};
pub use value::{Map, Value, ValueKind};
