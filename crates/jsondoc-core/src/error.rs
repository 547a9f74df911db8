//! Error types for path compilation, pointer parsing and patch application.

use thiserror::Error;

/// A malformed path expression. Raised at compile time, before any tree is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid path expression '{expression}' at position {position}: {message}")]
pub struct PathSyntaxError {
    pub expression: String,
    /// Byte offset into `expression` where the problem was detected.
    pub position: usize,
    pub message: String,
}

impl PathSyntaxError {
    pub(crate) fn new(expression: &str, position: usize, message: impl Into<String>) -> Self {
        Self {
            expression: expression.to_string(),
            position,
            message: message.into(),
        }
    }
}

/// A malformed JSON Pointer string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid JSON pointer '{pointer}' at position {position}: {message}")]
pub struct PointerSyntaxError {
    pub pointer: String,
    pub position: usize,
    pub message: String,
}

/// Failure while applying a patch.
///
/// Every variant carries the zero-based `index` of the failing operation and
/// the `pointer` it was resolving when it failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("operation {index}: invalid pointer '{pointer}': {message}")]
    InvalidPointerSyntax {
        index: usize,
        pointer: String,
        message: String,
    },

    #[error("operation {index}: path not found: '{pointer}'")]
    PathNotFound { index: usize, pointer: String },

    #[error("operation {index}: index out of range: '{pointer}'")]
    IndexOutOfRange { index: usize, pointer: String },

    #[error("operation {index}: type mismatch at '{pointer}': {message}")]
    TypeMismatch {
        index: usize,
        pointer: String,
        message: String,
    },

    #[error("operation {index}: test failed at '{pointer}'")]
    TestFailed { index: usize, pointer: String },

    #[error("operation {index}: unknown operation '{op}'")]
    UnknownOperation {
        index: usize,
        pointer: String,
        op: String,
    },

    /// A patch document record is missing a required member or has one of the wrong type.
    #[error("operation {index}: missing or invalid field '{field}'")]
    MissingField {
        index: usize,
        pointer: String,
        field: &'static str,
    },
}

impl PatchError {
    /// Zero-based index of the operation that failed.
    pub fn index(&self) -> usize {
        match self {
            PatchError::InvalidPointerSyntax { index, .. }
            | PatchError::PathNotFound { index, .. }
            | PatchError::IndexOutOfRange { index, .. }
            | PatchError::TypeMismatch { index, .. }
            | PatchError::TestFailed { index, .. }
            | PatchError::UnknownOperation { index, .. }
            | PatchError::MissingField { index, .. } => *index,
        }
    }

    /// The pointer string involved in the failure.
    pub fn pointer(&self) -> &str {
        match self {
            PatchError::InvalidPointerSyntax { pointer, .. }
            | PatchError::PathNotFound { pointer, .. }
            | PatchError::IndexOutOfRange { pointer, .. }
            | PatchError::TypeMismatch { pointer, .. }
            | PatchError::TestFailed { pointer, .. }
            | PatchError::UnknownOperation { pointer, .. }
            | PatchError::MissingField { pointer, .. } => pointer,
        }
    }
}

/// Umbrella error for operations that start from JSON text.
#[derive(Error, Debug)]
pub enum JsonDocError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    PathSyntax(#[from] PathSyntaxError),

    #[error(transparent)]
    PointerSyntax(#[from] PointerSyntaxError),

    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error("invalid JSON number: {0}")]
    InvalidNumber(String),
}

/// Convenience alias used throughout jsondoc-core.
pub type Result<T> = std::result::Result<T, JsonDocError>;
