//! Parsed path tokens.

use std::fmt;
use std::sync::Arc;

use crate::number::Number;

/// One step of a parsed path expression.
#[derive(Debug, Clone, PartialEq)]
pub enum PathToken {
    /// `.name` or `['name']`
    Property(String),
    /// `[3]`, `[-1]` (negative counts from the end)
    ArrayIndex(i64),
    /// `*`, `.*` or `[*]`
    Wildcard,
    /// `..`
    RecursiveDescent,
    /// `[?(@.field op literal)]`
    Filter(FilterPredicate),
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathToken::Property(name) if is_plain_name(name) => write!(f, ".{}", name),
            PathToken::Property(name) => {
                let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
                write!(f, "['{}']", escaped)
            }
            PathToken::ArrayIndex(i) => write!(f, "[{}]", i),
            PathToken::Wildcard => write!(f, "[*]"),
            PathToken::RecursiveDescent => write!(f, ".."),
            PathToken::Filter(predicate) => write!(f, "[?({})]", predicate),
        }
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '$')
}

/// Comparison operator inside a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
}

impl CompareOp {
    /// Two-character operators come first so `>=` is never read as `>` then `=`.
    pub(crate) const LONGEST_FIRST: [(&'static str, CompareOp); 6] = [
        ("==", CompareOp::Eq),
        ("!=", CompareOp::Ne),
        (">=", CompareOp::Ge),
        ("<=", CompareOp::Le),
        (">", CompareOp::Gt),
        ("<", CompareOp::Lt),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a filter comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterLiteral {
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

impl fmt::Display for FilterLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterLiteral::String(s) => {
                write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
            }
            FilterLiteral::Number(n) => write!(f, "{}", n),
            FilterLiteral::Bool(b) => write!(f, "{}", b),
            FilterLiteral::Null => f.write_str("null"),
        }
    }
}

/// A parsed `@.field op literal` predicate, with the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPredicate {
    /// The text between `?(` and `)`, as written.
    pub raw: String,
    /// Member names walked from the current item (`@.a.b` is `["a", "b"]`).
    pub field: Vec<String>,
    pub op: CompareOp,
    pub literal: FilterLiteral,
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@.{} {} {}", self.field.join("."), self.op, self.literal)
    }
}

/// A compiled path expression: the source text and its token sequence.
///
/// Cloning is cheap; the tokens are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPath {
    expression: Arc<str>,
    tokens: Arc<[PathToken]>,
}

impl CompiledPath {
    pub(crate) fn new(expression: &str, tokens: Vec<PathToken>) -> Self {
        Self {
            expression: expression.into(),
            tokens: tokens.into(),
        }
    }

    /// The expression text this path was compiled from.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn tokens(&self) -> &[PathToken] {
        &self.tokens
    }

    pub(crate) fn shared_tokens(&self) -> Arc<[PathToken]> {
        Arc::clone(&self.tokens)
    }
}

impl fmt::Display for CompiledPath {
    /// Canonical form, e.g. `$.store.book[0]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        let mut after_descent = false;
        for token in self.tokens.iter() {
            match token {
                // `..name`, not `...name`.
                PathToken::Property(name) if after_descent && is_plain_name(name) => {
                    f.write_str(name)?
                }
                _ => write!(f, "{}", token)?,
            }
            after_descent = matches!(token, PathToken::RecursiveDescent);
        }
        Ok(())
    }
}
