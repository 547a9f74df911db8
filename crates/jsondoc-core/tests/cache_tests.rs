use jsondoc_core::{query, CacheConfig, CacheStats, PathCache, Value};

// ============================================================================
// Get-or-compile
// ============================================================================

#[test]
fn first_lookup_compiles_then_hits() {
    let cache = PathCache::new();
    assert!(cache.is_empty());

    let first = cache.get_or_compile("$.a.b").unwrap();
    let second = cache.get_or_compile("$.a.b").unwrap();
    assert_eq!(first, second);
    assert!(cache.contains("$.a.b"));
    assert_eq!(
        cache.stats(),
        CacheStats {
            hits: 1,
            misses: 1,
            entries: 1
        }
    );
}

#[test]
fn keys_are_exact_expression_text() {
    let cache = PathCache::new();
    cache.get_or_compile("$.a").unwrap();
    cache.get_or_compile("$['a']").unwrap();
    assert_eq!(cache.len(), 2);
}

#[test]
fn syntax_errors_are_not_cached() {
    let cache = PathCache::new();
    assert!(cache.get_or_compile("$[").is_err());
    assert!(cache.get_or_compile("$[").is_err());
    assert!(cache.is_empty());
    assert_eq!(cache.stats().misses, 2);
}

#[test]
fn bounded_cache_stops_retaining_when_full() {
    let cache = PathCache::with_config(CacheConfig::bounded(2));
    assert_eq!(cache.config().max_entries, Some(2));

    for expression in ["$.a", "$.b", "$.c"] {
        assert!(cache.get_or_compile(expression).is_ok());
    }
    assert_eq!(cache.len(), 2);
    assert!(!cache.contains("$.c"));

    let doc: Value = r#"{"c":3}"#.parse().unwrap();
    let found: Vec<String> = query(&doc, "$.c", &cache)
        .unwrap()
        .map(Value::to_string)
        .collect();
    assert_eq!(found, ["3"]);
}

#[test]
fn clear_drops_entries_but_keeps_counters() {
    let cache = PathCache::new();
    cache.get_or_compile("$.x").unwrap();
    cache.get_or_compile("$.x").unwrap();
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.stats().hits, 1);

    cache.get_or_compile("$.x").unwrap();
    assert_eq!(cache.stats().misses, 2);
}

#[test]
fn independent_caches_do_not_share_entries() {
    let left = PathCache::new();
    let right = PathCache::with_config(CacheConfig::unbounded());
    left.get_or_compile("$.only_left").unwrap();
    assert!(left.contains("$.only_left"));
    assert!(!right.contains("$.only_left"));
}

#[test]
fn cache_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PathCache>();
}
