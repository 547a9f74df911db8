//! WASM bindings for jsondoc-core.
//!
//! Exposes a `QueryEngine` class plus `applyPatch` and `semanticEquals` to
//! JavaScript via `wasm-bindgen`. Documents, results and patches cross the
//! boundary as JSON strings; every error becomes a thrown JS exception.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p jsondoc-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/jsondoc-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/jsondoc_wasm.wasm
//! ```

use jsondoc_core::{CacheConfig, PathCache, Value};
use wasm_bindgen::prelude::*;

fn js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn parse_json(json: &str) -> Result<Value, JsValue> {
    json.parse::<Value>().map_err(js_error)
}

/// Evaluates path expressions against JSON text, reusing one compiled-path
/// cache across calls.
#[wasm_bindgen]
pub struct QueryEngine {
    cache: PathCache,
}

#[wasm_bindgen]
impl QueryEngine {
    /// Create an engine. `maxEntries` bounds the path cache; omit it for an
    /// unbounded cache.
    #[wasm_bindgen(constructor)]
    pub fn new(max_entries: Option<u32>) -> QueryEngine {
        let config = match max_entries {
            Some(max) => CacheConfig::bounded(max as usize),
            None => CacheConfig::unbounded(),
        };
        QueryEngine {
            cache: PathCache::with_config(config),
        }
    }

    /// Every value `expression` selects in `json`, as a JSON array string.
    pub fn query(&self, json: &str, expression: &str) -> Result<String, JsValue> {
        let doc = parse_json(json)?;
        let results = jsondoc_core::query(&doc, expression, &self.cache).map_err(js_error)?;
        Ok(Value::array(results.cloned()).to_json_string())
    }

    /// The first value `expression` selects, as JSON text, or `undefined`.
    #[wasm_bindgen(js_name = queryFirst)]
    pub fn query_first(&self, json: &str, expression: &str) -> Result<Option<String>, JsValue> {
        let doc = parse_json(json)?;
        let first =
            jsondoc_core::query_first(&doc, expression, &self.cache).map_err(js_error)?;
        Ok(first.map(Value::to_json_string))
    }

    /// Number of compiled expressions currently cached.
    #[wasm_bindgen(js_name = cacheSize)]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    #[wasm_bindgen(js_name = clearCache)]
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Apply an RFC 6902 patch document to `json`, returning the patched JSON.
///
/// Throws with the failing operation index and pointer if any operation
/// fails; nothing is partially applied.
#[wasm_bindgen(js_name = applyPatch)]
pub fn apply_patch(json: &str, patch: &str) -> Result<String, JsValue> {
    let doc = parse_json(json)?;
    let ops = jsondoc_core::parse_patch_str(patch).map_err(js_error)?;
    let patched = jsondoc_core::apply_patch(&doc, &ops).map_err(js_error)?;
    Ok(patched.to_json_string())
}

/// Structural equality of two JSON texts. Object key order is always ignored;
/// array order only when `orderedArrays` is false.
#[wasm_bindgen(js_name = semanticEquals)]
pub fn semantic_equals(a: &str, b: &str, ordered_arrays: bool) -> Result<bool, JsValue> {
    let left = parse_json(a)?;
    let right = parse_json(b)?;
    Ok(jsondoc_core::semantic_equals(&left, &right, ordered_arrays))
}
