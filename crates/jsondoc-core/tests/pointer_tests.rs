use jsondoc_core::pointer::{escape_token, unescape_token};
use jsondoc_core::{JsonPointer, LookupError, Value, ValueKind};

fn v(text: &str) -> Value {
    text.parse().expect("test JSON must parse")
}

/// RFC 6901 section 5 example document.
const RFC_DOC: &str = r#"{
    "foo": ["bar", "baz"],
    "": 0,
    "a/b": 1,
    "c%d": 2,
    "e^f": 3,
    "g|h": 4,
    "i\\j": 5,
    "k\"l": 6,
    " ": 7,
    "m~n": 8
}"#;

fn lookup(doc: &Value, pointer: &str) -> Result<String, LookupError> {
    JsonPointer::parse(pointer)
        .expect("pointer should parse")
        .get(doc)
        .map(Value::to_string)
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn empty_pointer_is_root() {
    let ptr = JsonPointer::parse("").unwrap();
    assert!(ptr.is_root());
    assert!(ptr.tokens().is_empty());
    assert_eq!(ptr, JsonPointer::root());
    assert_eq!(ptr.parent(), None);
}

#[test]
fn tokens_are_unescaped() {
    let ptr = JsonPointer::parse("/a~1b/m~0n/").unwrap();
    assert_eq!(ptr.tokens(), ["a/b", "m~n", ""]);
    assert_eq!(ptr.as_str(), "/a~1b/m~0n/");
    assert_eq!(ptr.last(), Some(""));
}

#[test]
fn unescape_is_a_single_pass() {
    assert_eq!(unescape_token("~01").unwrap(), "~1");
    assert_eq!(unescape_token("~10").unwrap(), "/0");
    assert_eq!(unescape_token("plain").unwrap(), "plain");
}

#[test]
fn bad_escapes_are_rejected() {
    let err = JsonPointer::parse("/ok/a~2").unwrap_err();
    assert_eq!(err.pointer, "/ok/a~2");
    assert_eq!(err.position, 5);

    assert!(JsonPointer::parse("/trailing~").is_err());
    assert!(unescape_token("~").is_err());
}

#[test]
fn pointer_must_start_with_slash() {
    let err = JsonPointer::parse("foo").unwrap_err();
    assert_eq!(err.position, 0);
    assert!("foo".parse::<JsonPointer>().is_err());
}

#[test]
fn from_tokens_escapes_and_parent_strips_last() {
    let ptr = JsonPointer::from_tokens(["a/b", "c~d", "0"]);
    assert_eq!(ptr.as_str(), "/a~1b/c~0d/0");
    assert_eq!(ptr.parent().unwrap().as_str(), "/a~1b/c~0d");
    assert_eq!(ptr.to_string(), "/a~1b/c~0d/0");
    assert_eq!(escape_token("~/"), "~0~1");
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn rfc_examples_resolve() {
    let doc = v(RFC_DOC);
    let cases = [
        ("", None),
        ("/foo", Some(r#"["bar","baz"]"#)),
        ("/foo/0", Some(r#""bar""#)),
        ("/", Some("0")),
        ("/a~1b", Some("1")),
        ("/c%d", Some("2")),
        ("/e^f", Some("3")),
        ("/g|h", Some("4")),
        ("/i\\j", Some("5")),
        ("/k\"l", Some("6")),
        ("/ ", Some("7")),
        ("/m~0n", Some("8")),
    ];
    for (pointer, expected) in cases {
        let found = lookup(&doc, pointer).unwrap();
        match expected {
            Some(text) => assert_eq!(found, text, "pointer {pointer:?}"),
            None => assert_eq!(v(&found), doc),
        }
    }
}

#[test]
fn missing_member_is_path_not_found() {
    let doc = v(r#"{"a":{"b":1}}"#);
    assert_eq!(lookup(&doc, "/a/c"), Err(LookupError::PathNotFound));
    assert_eq!(lookup(&doc, "/x/y"), Err(LookupError::PathNotFound));
}

#[test]
fn array_index_rules() {
    let doc = v("[10,20]");
    assert_eq!(lookup(&doc, "/1").unwrap(), "20");
    assert_eq!(lookup(&doc, "/2"), Err(LookupError::IndexOutOfRange));
    assert_eq!(lookup(&doc, "/-"), Err(LookupError::IndexOutOfRange));
    assert_eq!(lookup(&doc, "/-1"), Err(LookupError::IndexOutOfRange));
    assert_eq!(lookup(&doc, "/01"), Err(LookupError::PathNotFound));
    assert_eq!(lookup(&doc, "/x"), Err(LookupError::PathNotFound));
}

#[test]
fn descending_into_a_scalar_is_a_type_mismatch() {
    let doc = v(r#"{"a":1}"#);
    assert_eq!(
        lookup(&doc, "/a/b"),
        Err(LookupError::TypeMismatch(ValueKind::Number))
    );
}
