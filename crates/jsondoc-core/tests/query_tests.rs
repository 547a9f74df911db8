use jsondoc_core::{compile, query, query_first, CancellationToken, PathCache, Value};

fn v(text: &str) -> Value {
    text.parse().expect("test JSON must parse")
}

/// Helper: run a query and render every result as compact JSON.
fn run(doc: &str, expression: &str) -> Vec<String> {
    let cache = PathCache::new();
    let doc = v(doc);
    query(&doc, expression, &cache)
        .expect("expression should compile")
        .map(Value::to_string)
        .collect()
}

const STORE: &str = r#"{
    "store": {
        "book": [
            {"title": "Sayings", "price": 8.95, "meta": {"isbn": "a"}},
            {"title": "Sword", "price": 12.99},
            {"title": "Moby", "price": 8.99, "meta": {"isbn": "b"}}
        ],
        "bicycle": {"color": "red", "price": 19.95}
    }
}"#;

// ============================================================================
// Members, indices, wildcards
// ============================================================================

#[test]
fn root_selects_document() {
    assert_eq!(run(r#"{"a":1}"#, "$"), [r#"{"a":1}"#]);
}

#[test]
fn member_chain() {
    assert_eq!(run(STORE, "$.store.bicycle.color"), [r#""red""#]);
    assert_eq!(run(STORE, "$['store']['bicycle']['price']"), ["19.95"]);
}

#[test]
fn missing_member_yields_nothing() {
    assert!(run(STORE, "$.store.car").is_empty());
    assert!(run(STORE, "$.store.bicycle.color.shade").is_empty());
    assert!(run("[1,2]", "$.a").is_empty());
}

#[test]
fn wildcard_over_object_values_in_order() {
    assert_eq!(run(r#"{"a":1,"b":2}"#, "$.*"), ["1", "2"]);
    assert_eq!(run("[3,4]", "$[*]"), ["3", "4"]);
    assert!(run("7", "$.*").is_empty());
}

#[test]
fn positive_and_negative_indices() {
    let doc = "[10,20,30]";
    assert_eq!(run(doc, "$[0]"), ["10"]);
    assert_eq!(run(doc, "$[2]"), ["30"]);
    assert_eq!(run(doc, "$[-1]"), ["30"]);
    assert_eq!(run(doc, "$[-3]"), ["10"]);
}

#[test]
fn out_of_range_indices_yield_nothing() {
    let doc = "[10,20,30]";
    assert!(run(doc, "$[3]").is_empty());
    assert!(run(doc, "$[-4]").is_empty());
    assert!(run(doc, "$[-5]").is_empty());
    assert!(run(r#"{"0":1}"#, "$[0]").is_empty());
}

#[test]
fn indices_past_integer_range_yield_nothing() {
    let doc = "[10,20,30]";
    assert!(run(doc, "$[99999999999999999999]").is_empty());
    assert!(run(doc, "$[-99999999999999999999]").is_empty());
    assert!(run(r#"{"a":[1]}"#, "$..[123456789012345678901234567890]").is_empty());
}

#[test]
fn wildcard_then_member() {
    assert_eq!(
        run(STORE, "$.store.book[*].title"),
        [r#""Sayings""#, r#""Sword""#, r#""Moby""#]
    );
}

// ============================================================================
// Recursive descent
// ============================================================================

#[test]
fn trailing_descent_selects_all_descendants_in_preorder() {
    assert_eq!(run(r#"{"a":{"b":1}}"#, "$.."), [r#"{"b":1}"#, "1"]);
    assert_eq!(run("[[1],2]", "$.."), ["[1]", "1", "2"]);
    assert!(run("5", "$..").is_empty());
}

#[test]
fn descent_then_member_includes_the_start_node() {
    assert_eq!(run(r#"{"a":{"b":1},"b":2}"#, "$..b"), ["2", "1"]);
}

#[test]
fn descent_collects_every_price() {
    assert_eq!(
        run(STORE, "$..price"),
        ["8.95", "12.99", "8.99", "19.95"]
    );
    assert_eq!(run(STORE, "$.store..isbn"), [r#""a""#, r#""b""#]);
}

#[test]
fn descent_then_index() {
    assert_eq!(run(r#"{"x":[1,2],"y":{"z":[3]}}"#, "$..[0]"), ["1", "3"]);
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn filter_numeric_comparison() {
    let doc = r#"{"items":[{"age":17},{"age":21}]}"#;
    assert_eq!(run(doc, "$.items[?(@.age>=18)]"), [r#"{"age":21}"#]);
    assert_eq!(run(doc, "$.items[?(@.age < 18)]"), [r#"{"age":17}"#]);
    assert_eq!(run(doc, "$.items[?(@.age == 17.0)]"), [r#"{"age":17}"#]);
    assert_eq!(run(doc, "$.items[?(@.age != 17)]"), [r#"{"age":21}"#]);
}

#[test]
fn filter_equality_agrees_with_ordering_for_huge_numbers() {
    let doc = r#"[{"x":2e400},{"x":1e400}]"#;
    assert_eq!(run(doc, "$[?(@.x > 1e400)]"), [r#"{"x":2e+400}"#]);
    assert_eq!(run(doc, "$[?(@.x == 1e400)]"), [r#"{"x":1e+400}"#]);
    assert_eq!(run(doc, "$[?(@.x != 1e400)]"), [r#"{"x":2e+400}"#]);
}

#[test]
fn filter_then_member() {
    assert_eq!(
        run(STORE, "$.store.book[?(@.price < 10)].title"),
        [r#""Sayings""#, r#""Moby""#]
    );
}

#[test]
fn filter_string_comparison_is_ordinal() {
    let doc = r#"[{"n":"apple"},{"n":"Banana"},{"n":"cherry"}]"#;
    assert_eq!(run(doc, "$[?(@.n == 'apple')]"), [r#"{"n":"apple"}"#]);
    assert_eq!(
        run(doc, "$[?(@.n > 'apple')]"),
        [r#"{"n":"cherry"}"#]
    );
}

#[test]
fn filter_skips_missing_fields_and_kind_mismatches() {
    let doc = r#"[{"age":"old"},{"name":"x"},{"age":30},5,null]"#;
    assert_eq!(run(doc, "$[?(@.age > 18)]"), [r#"{"age":30}"#]);
    assert_eq!(run(doc, "$[?(@.age != 18)]"), [r#"{"age":30}"#]);
}

#[test]
fn filter_booleans_and_null_support_equality_only() {
    let doc = r#"[{"ok":true},{"ok":false},{"ok":null}]"#;
    assert_eq!(run(doc, "$[?(@.ok == true)]"), [r#"{"ok":true}"#]);
    assert_eq!(run(doc, "$[?(@.ok != true)]"), [r#"{"ok":false}"#]);
    assert_eq!(run(doc, "$[?(@.ok == null)]"), [r#"{"ok":null}"#]);
    assert!(run(doc, "$[?(@.ok > false)]").is_empty());
}

#[test]
fn filter_nested_field() {
    assert_eq!(
        run(STORE, "$.store.book[?(@.meta.isbn == 'b')].title"),
        [r#""Moby""#]
    );
}

#[test]
fn filter_on_non_array_yields_nothing() {
    assert!(run(r#"{"age":30}"#, "$[?(@.age > 1)]").is_empty());
}

// ============================================================================
// Laziness and reuse
// ============================================================================

#[test]
fn query_first_returns_first_match() {
    let cache = PathCache::new();
    let doc = v(STORE);
    let first = query_first(&doc, "$..price", &cache).unwrap();
    assert_eq!(first.map(Value::to_string).as_deref(), Some("8.95"));
    assert_eq!(query_first(&doc, "$.nope", &cache).unwrap(), None);
}

#[test]
fn syntax_error_surfaces_before_evaluation() {
    let cache = PathCache::new();
    let doc = v("{}");
    assert!(query(&doc, "$[", &cache).is_err());
    assert!(query_first(&doc, "nope", &cache).is_err());
}

#[test]
fn compiled_path_evaluates_against_many_documents() {
    let path = compile("$.a").unwrap();
    let first = v(r#"{"a":1}"#);
    let second = v(r#"{"a":2}"#);
    assert_eq!(path.evaluate(&first).next().map(Value::to_string).as_deref(), Some("1"));
    assert_eq!(path.evaluate(&second).next().map(Value::to_string).as_deref(), Some("2"));
}

#[test]
fn cloned_query_resumes_independently() {
    let doc = v("[1,2,3]");
    let path = compile("$[*]").unwrap();
    let mut query = path.evaluate(&doc);
    assert_eq!(query.next().map(Value::to_string).as_deref(), Some("1"));

    let rest: Vec<String> = query.clone().map(Value::to_string).collect();
    assert_eq!(rest, ["2", "3"]);
    assert_eq!(query.next().map(Value::to_string).as_deref(), Some("2"));
}

#[test]
fn cancelled_query_stops_yielding() {
    let doc = v("[1,2,3,4]");
    let path = compile("$[*]").unwrap();
    let token = CancellationToken::new();
    let mut results = path.evaluate(&doc).cancellable(&token);

    assert!(results.next().is_some());
    token.cancel();
    assert!(token.is_cancelled());
    assert!(results.next().is_none());
}

#[test]
fn concurrent_queries_share_one_cache() {
    let cache = PathCache::new();
    let doc = v(STORE);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..50 {
                    let prices: Vec<&Value> = query(&doc, "$..price", &cache).unwrap().collect();
                    assert_eq!(prices.len(), 4);
                }
            });
        }
    });

    assert_eq!(cache.len(), 1);
    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, 400);
}
