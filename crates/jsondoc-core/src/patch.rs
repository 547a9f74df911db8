//! JSON Patch (RFC 6902) over the persistent value tree.
//!
//! [`apply_patch`] never touches its input. It works on a clone of the root
//! (one reference-count bump) and copies only the containers along each
//! pointer it writes through, so the result shares every untouched subtree
//! with the input. If any operation fails the working tree is dropped and
//! the caller gets the error, never a half-patched document.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::equality::semantic_equals;
use crate::error::{PatchError, Result};
use crate::pointer::{array_token, existing_index, ArrayToken, JsonPointer, LookupError};
use crate::value::Value;

/// A single patch operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    /// Insert or overwrite at `path`. Only the final segment may be new.
    Add { path: String, value: Value },
    /// Delete the existing value at `path`.
    Remove { path: String },
    /// Overwrite the existing value at `path`.
    Replace { path: String, value: Value },
    /// Remove the value at `from` and add it at `path`.
    Move { from: String, path: String },
    /// Add the value at `from` to `path`, sharing it rather than copying.
    Copy { from: String, path: String },
    /// Require the value at `path` to equal `value` (ordered arrays).
    Test { path: String, value: Value },
}

impl PatchOperation {
    /// The lowercase operation name, as written in a patch document.
    pub fn op_name(&self) -> &'static str {
        match self {
            PatchOperation::Add { .. } => "add",
            PatchOperation::Remove { .. } => "remove",
            PatchOperation::Replace { .. } => "replace",
            PatchOperation::Move { .. } => "move",
            PatchOperation::Copy { .. } => "copy",
            PatchOperation::Test { .. } => "test",
        }
    }

    /// The target pointer.
    pub fn path(&self) -> &str {
        match self {
            PatchOperation::Add { path, .. }
            | PatchOperation::Remove { path }
            | PatchOperation::Replace { path, .. }
            | PatchOperation::Move { path, .. }
            | PatchOperation::Copy { path, .. }
            | PatchOperation::Test { path, .. } => path,
        }
    }

    /// The source pointer of a move or copy.
    pub fn from(&self) -> Option<&str> {
        match self {
            PatchOperation::Move { from, .. } | PatchOperation::Copy { from, .. } => Some(from),
            _ => None,
        }
    }
}

/// Apply `operations` in order and return the patched tree.
///
/// # Errors
///
/// Returns the [`PatchError`] of the first failing operation, tagged with its
/// index and pointer. `document` is unchanged either way.
///
/// # Examples
///
/// ```
/// use jsondoc_core::{apply_patch, PatchOperation, Value};
///
/// let doc: Value = r#"{"a":1}"#.parse().unwrap();
/// let patched = apply_patch(
///     &doc,
///     &[PatchOperation::Move { from: "/a".into(), path: "/b".into() }],
/// )
/// .unwrap();
/// assert_eq!(patched.to_string(), r#"{"b":1}"#);
/// assert_eq!(doc.to_string(), r#"{"a":1}"#);
/// ```
pub fn apply_patch(
    document: &Value,
    operations: &[PatchOperation],
) -> std::result::Result<Value, PatchError> {
    let mut working = document.clone();

    for (index, operation) in operations.iter().enumerate() {
        trace!(
            index,
            op = operation.op_name(),
            path = operation.path(),
            "applying patch operation"
        );
        if let Err(failure) = apply_operation(&mut working, operation) {
            let error = failure.into_error(index);
            debug!(index, pointer = error.pointer(), %error, "patch aborted");
            return Err(error);
        }
    }

    Ok(working)
}

/// Read a patch document: an array of `{"op", "path", "value"?, "from"?}`
/// records. `op` is matched case-insensitively.
///
/// # Errors
///
/// `UnknownOperation` for an unrecognised `op`; `MissingField` when a record
/// lacks a member its operation needs; `TypeMismatch` when the document is
/// not an array of objects.
pub fn parse_patch(document: &Value) -> std::result::Result<Vec<PatchOperation>, PatchError> {
    let Some(records) = document.as_array() else {
        return Err(PatchError::TypeMismatch {
            index: 0,
            pointer: String::new(),
            message: format!("patch document must be an array, found {}", document.kind()),
        });
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| parse_operation(index, record))
        .collect()
}

/// Parse patch document text. See [`parse_patch`].
///
/// # Errors
///
/// `JsonDocError::Json` for invalid JSON text, otherwise as [`parse_patch`].
pub fn parse_patch_str(text: &str) -> Result<Vec<PatchOperation>> {
    let document: Value = text.parse()?;
    Ok(parse_patch(&document)?)
}

fn parse_operation(index: usize, record: &Value) -> std::result::Result<PatchOperation, PatchError> {
    if record.as_object().is_none() {
        return Err(PatchError::TypeMismatch {
            index,
            pointer: String::new(),
            message: format!("patch operation must be an object, found {}", record.kind()),
        });
    }

    let path = record
        .try_get_property("path")
        .and_then(Value::as_str)
        .map(str::to_string);
    let pointer = path.clone().unwrap_or_default();
    let missing = |field: &'static str| PatchError::MissingField {
        index,
        pointer: pointer.clone(),
        field,
    };

    let op = record
        .try_get_property("op")
        .and_then(Value::as_str)
        .ok_or_else(|| missing("op"))?;
    let op = op.to_ascii_lowercase();
    if !matches!(
        op.as_str(),
        "add" | "remove" | "replace" | "move" | "copy" | "test"
    ) {
        return Err(PatchError::UnknownOperation {
            index,
            pointer: pointer.clone(),
            op,
        });
    }

    let path = path.ok_or_else(|| missing("path"))?;
    let value = || {
        record
            .try_get_property("value")
            .cloned()
            .ok_or_else(|| missing("value"))
    };
    let from = || {
        record
            .try_get_property("from")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| missing("from"))
    };

    let operation = match op.as_str() {
        "add" => PatchOperation::Add {
            path,
            value: value()?,
        },
        "remove" => PatchOperation::Remove { path },
        "replace" => PatchOperation::Replace {
            path,
            value: value()?,
        },
        "move" => PatchOperation::Move {
            from: from()?,
            path,
        },
        "copy" => PatchOperation::Copy {
            from: from()?,
            path,
        },
        _ => PatchOperation::Test {
            path,
            value: value()?,
        },
    };
    Ok(operation)
}

/// Why one operation failed, before the operation index is attached.
#[derive(Debug)]
enum FailureKind {
    Syntax(String),
    Lookup(LookupError),
    TypeMismatch(String),
    TestFailed,
}

impl From<LookupError> for FailureKind {
    fn from(error: LookupError) -> Self {
        FailureKind::Lookup(error)
    }
}

#[derive(Debug)]
struct Failure {
    pointer: String,
    kind: FailureKind,
}

impl Failure {
    fn into_error(self, index: usize) -> PatchError {
        let pointer = self.pointer;
        match self.kind {
            FailureKind::Syntax(message) => PatchError::InvalidPointerSyntax {
                index,
                pointer,
                message,
            },
            FailureKind::Lookup(LookupError::PathNotFound) => {
                PatchError::PathNotFound { index, pointer }
            }
            FailureKind::Lookup(LookupError::IndexOutOfRange) => {
                PatchError::IndexOutOfRange { index, pointer }
            }
            FailureKind::Lookup(error @ LookupError::TypeMismatch(_)) => PatchError::TypeMismatch {
                index,
                pointer,
                message: error.to_string(),
            },
            FailureKind::TypeMismatch(message) => PatchError::TypeMismatch {
                index,
                pointer,
                message,
            },
            FailureKind::TestFailed => PatchError::TestFailed { index, pointer },
        }
    }
}

/// Attach the pointer text to a failure.
trait At<T> {
    fn at(self, pointer: &str) -> std::result::Result<T, Failure>;
}

impl<T, E: Into<FailureKind>> At<T> for std::result::Result<T, E> {
    fn at(self, pointer: &str) -> std::result::Result<T, Failure> {
        self.map_err(|kind| Failure {
            pointer: pointer.to_string(),
            kind: kind.into(),
        })
    }
}

fn parse_pointer(raw: &str) -> std::result::Result<JsonPointer, Failure> {
    JsonPointer::parse(raw).map_err(|error| Failure {
        pointer: raw.to_string(),
        kind: FailureKind::Syntax(format!("{} (position {})", error.message, error.position)),
    })
}

fn apply_operation(
    doc: &mut Value,
    operation: &PatchOperation,
) -> std::result::Result<(), Failure> {
    match operation {
        PatchOperation::Add { path, value } => {
            let target = parse_pointer(path)?;
            add(doc, &target, value.clone()).at(path)
        }
        PatchOperation::Remove { path } => {
            let target = parse_pointer(path)?;
            remove(doc, &target).map(drop).at(path)
        }
        PatchOperation::Replace { path, value } => {
            let target = parse_pointer(path)?;
            replace(doc, &target, value.clone()).at(path)
        }
        PatchOperation::Move { from, path } => {
            let source = parse_pointer(from)?;
            let target = parse_pointer(path)?;
            let value = remove(doc, &source).at(from)?;
            add(doc, &target, value).at(path)
        }
        PatchOperation::Copy { from, path } => {
            let source = parse_pointer(from)?;
            let target = parse_pointer(path)?;
            let value = source.get(doc).at(from)?.clone();
            add(doc, &target, value).at(path)
        }
        PatchOperation::Test { path, value } => {
            let target = parse_pointer(path)?;
            let actual = target.get(doc).at(path)?;
            if semantic_equals(actual, value, true) {
                Ok(())
            } else {
                Err(Failure {
                    pointer: path.clone(),
                    kind: FailureKind::TestFailed,
                })
            }
        }
    }
}

/// Walk `tokens` from `doc`, unsharing each container on the way down.
fn navigate_mut<'v>(
    doc: &'v mut Value,
    tokens: &[String],
) -> std::result::Result<&'v mut Value, LookupError> {
    let mut current = doc;
    for token in tokens {
        current = match current {
            Value::Object(map) => Arc::make_mut(map)
                .get_mut(token.as_str())
                .ok_or(LookupError::PathNotFound)?,
            Value::Array(items) => {
                let items = Arc::make_mut(items);
                let index = existing_index(token, items.len())?;
                &mut items[index]
            }
            other => return Err(LookupError::TypeMismatch(other.kind())),
        };
    }
    Ok(current)
}

fn add(
    doc: &mut Value,
    target: &JsonPointer,
    value: Value,
) -> std::result::Result<(), FailureKind> {
    let Some((last, parents)) = target.tokens().split_last() else {
        *doc = value;
        return Ok(());
    };

    match navigate_mut(doc, parents)? {
        Value::Object(map) => {
            Arc::make_mut(map).insert(Arc::from(last.as_str()), value);
            Ok(())
        }
        Value::Array(items) => {
            let items = Arc::make_mut(items);
            match array_token(last)? {
                ArrayToken::Append => items.push(value),
                ArrayToken::Index(index) if index <= items.len() => items.insert(index, value),
                ArrayToken::Index(_) => return Err(LookupError::IndexOutOfRange.into()),
            }
            Ok(())
        }
        other => Err(FailureKind::TypeMismatch(format!(
            "cannot add a member to a {}",
            other.kind()
        ))),
    }
}

fn remove(doc: &mut Value, target: &JsonPointer) -> std::result::Result<Value, FailureKind> {
    let Some((last, parents)) = target.tokens().split_last() else {
        return Err(FailureKind::TypeMismatch(
            "the document root cannot be removed".to_string(),
        ));
    };

    match navigate_mut(doc, parents)? {
        Value::Object(map) => {
            if !map.contains_key(last.as_str()) {
                return Err(LookupError::PathNotFound.into());
            }
            Arc::make_mut(map)
                .shift_remove(last.as_str())
                .ok_or_else(|| LookupError::PathNotFound.into())
        }
        Value::Array(items) => {
            let index = existing_index(last, items.len())?;
            Ok(Arc::make_mut(items).remove(index))
        }
        other => Err(FailureKind::TypeMismatch(format!(
            "cannot remove a member from a {}",
            other.kind()
        ))),
    }
}

fn replace(
    doc: &mut Value,
    target: &JsonPointer,
    value: Value,
) -> std::result::Result<(), FailureKind> {
    let Some((last, parents)) = target.tokens().split_last() else {
        *doc = value;
        return Ok(());
    };

    match navigate_mut(doc, parents)? {
        Value::Object(map) => {
            if !map.contains_key(last.as_str()) {
                return Err(LookupError::PathNotFound.into());
            }
            if let Some(slot) = Arc::make_mut(map).get_mut(last.as_str()) {
                *slot = value;
            }
            Ok(())
        }
        Value::Array(items) => {
            let index = existing_index(last, items.len())?;
            Arc::make_mut(items)[index] = value;
            Ok(())
        }
        other => Err(FailureKind::TypeMismatch(format!(
            "cannot replace a member of a {}",
            other.kind()
        ))),
    }
}
