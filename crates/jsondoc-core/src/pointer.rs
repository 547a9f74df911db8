//! JSON Pointer (RFC 6901) parsing and read access.
//!
//! `""` addresses the whole document; `/a/0/b~1c` addresses
//! `doc["a"][0]["b/c"]`. Reference tokens are unescaped in a single scan so
//! `~01` decodes to `~1`, never to `/`.

use std::fmt;

use thiserror::Error;

use crate::error::PointerSyntaxError;
use crate::value::{Value, ValueKind};

/// A parsed pointer: its source text and unescaped reference tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonPointer {
    raw: String,
    tokens: Vec<String>,
}

/// Why a pointer did not resolve against a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("path not found")]
    PathNotFound,

    #[error("array index out of range")]
    IndexOutOfRange,

    #[error("cannot descend into a {0}")]
    TypeMismatch(ValueKind),
}

/// An array reference token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArrayToken {
    Index(usize),
    /// `-`: one past the last element.
    Append,
}

impl JsonPointer {
    /// Parse pointer text.
    ///
    /// # Errors
    ///
    /// Returns [`PointerSyntaxError`] when non-empty text does not start with
    /// `/`, or a `~` is not followed by `0` or `1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsondoc_core::JsonPointer;
    ///
    /// let ptr = JsonPointer::parse("/a~1b/~01").unwrap();
    /// assert_eq!(ptr.tokens(), ["a/b", "~1"]);
    /// assert!(JsonPointer::parse("a").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, PointerSyntaxError> {
        if raw.is_empty() {
            return Ok(Self::root());
        }
        let Some(body) = raw.strip_prefix('/') else {
            return Err(PointerSyntaxError {
                pointer: raw.to_string(),
                position: 0,
                message: "pointer must be empty or start with '/'".to_string(),
            });
        };

        let mut tokens = Vec::new();
        let mut offset = 1;
        for segment in body.split('/') {
            let token = unescape_token(segment).map_err(|(pos, message)| PointerSyntaxError {
                pointer: raw.to_string(),
                position: offset + pos,
                message: message.to_string(),
            })?;
            tokens.push(token);
            offset += segment.len() + 1;
        }

        Ok(Self {
            raw: raw.to_string(),
            tokens,
        })
    }

    /// The pointer to the whole document (`""`).
    pub fn root() -> Self {
        Self {
            raw: String::new(),
            tokens: Vec::new(),
        }
    }

    /// Build a pointer from unescaped tokens, escaping them as needed.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let raw = tokens
            .iter()
            .map(|token| format!("/{}", escape_token(token)))
            .collect();
        Self { raw, tokens }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Unescaped reference tokens.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The final reference token, if any.
    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// Pointer to the containing value; `None` for the root.
    pub fn parent(&self) -> Option<JsonPointer> {
        let (_, parent) = self.tokens.split_last()?;
        Some(Self::from_tokens(parent.iter().cloned()))
    }

    /// Resolve against `root`.
    pub fn get<'a>(&self, root: &'a Value) -> Result<&'a Value, LookupError> {
        self.tokens
            .iter()
            .try_fold(root, |current, token| step(current, token))
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for JsonPointer {
    type Err = PointerSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Descend one reference token.
pub(crate) fn step<'a>(current: &'a Value, token: &str) -> Result<&'a Value, LookupError> {
    match current {
        Value::Object(map) => map.get(token).ok_or(LookupError::PathNotFound),
        Value::Array(items) => {
            let index = existing_index(token, items.len())?;
            Ok(&items[index])
        }
        other => Err(LookupError::TypeMismatch(other.kind())),
    }
}

/// Classify an array reference token.
///
/// `0` and digit strings without a leading zero are indices. `-` and negative
/// integers point past the ends of the array; anything else names no element.
pub(crate) fn array_token(token: &str) -> Result<ArrayToken, LookupError> {
    if token == "-" {
        return Ok(ArrayToken::Append);
    }
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if all_digits(token) {
        if token.len() > 1 && token.starts_with('0') {
            return Err(LookupError::PathNotFound);
        }
        return token
            .parse()
            .map(ArrayToken::Index)
            .map_err(|_| LookupError::IndexOutOfRange);
    }
    if token.strip_prefix('-').is_some_and(all_digits) {
        return Err(LookupError::IndexOutOfRange);
    }
    Err(LookupError::PathNotFound)
}

/// An index that must name an existing element of an array of length `len`.
pub(crate) fn existing_index(token: &str, len: usize) -> Result<usize, LookupError> {
    match array_token(token)? {
        ArrayToken::Index(index) if index < len => Ok(index),
        _ => Err(LookupError::IndexOutOfRange),
    }
}

/// Decode `~1` to `/` and `~0` to `~` in one left-to-right pass.
///
/// On failure returns the byte offset of the bad `~` and a message.
pub fn unescape_token(token: &str) -> Result<String, (usize, &'static str)> {
    if !token.contains('~') {
        return Ok(token.to_string());
    }

    let mut out = String::with_capacity(token.len());
    let mut chars = token.char_indices();
    while let Some((pos, c)) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '0')) => out.push('~'),
            Some((_, '1')) => out.push('/'),
            Some(_) => return Err((pos, "'~' must be followed by '0' or '1'")),
            None => return Err((pos, "dangling '~' at end of reference token")),
        }
    }
    Ok(out)
}

/// Encode `~` as `~0` and `/` as `~1`.
pub fn escape_token(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    for c in token.chars() {
        match c {
            '~' => out.push_str("~0"),
            '/' => out.push_str("~1"),
            other => out.push(other),
        }
    }
    out
}
