//! Path expression parser.
//!
//! Turns `$.store.book[?(@.price < 10)]` into a [`CompiledPath`]. Errors carry
//! the byte offset where parsing stopped.

use std::str::FromStr;

use super::token::{CompareOp, CompiledPath, FilterLiteral, FilterPredicate, PathToken};
use crate::error::PathSyntaxError;
use crate::number::Number;

/// Parse a path expression.
///
/// # Errors
///
/// Returns [`PathSyntaxError`] when the expression is empty, does not start
/// with `$`, has an unclosed `[`, or contains a bracket or filter that does
/// not fit the grammar.
///
/// # Examples
///
/// ```
/// use jsondoc_core::path::{compile, PathToken};
///
/// let path = compile("$.items[-1]").unwrap();
/// assert_eq!(
///     path.tokens(),
///     &[PathToken::Property("items".into()), PathToken::ArrayIndex(-1)]
/// );
/// assert!(compile("items").is_err());
/// ```
pub fn compile(expression: &str) -> Result<CompiledPath, PathSyntaxError> {
    let tokens = Parser::new(expression, 0).parse_path()?;
    Ok(CompiledPath::new(expression, tokens))
}

struct Parser<'a> {
    /// Full expression, for error reporting.
    source: &'a str,
    input: &'a str,
    pos: usize,
    /// Offset of `input` within `source`.
    base: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, base: usize) -> Self {
        Self {
            source,
            input: source,
            pos: 0,
            base,
        }
    }

    fn sub(source: &'a str, input: &'a str, base: usize) -> Self {
        Self {
            source,
            input,
            pos: 0,
            base,
        }
    }

    fn error(&self, pos: usize, message: impl Into<String>) -> PathSyntaxError {
        PathSyntaxError::new(self.source, self.base + pos, message)
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.remaining().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn parse_path(&mut self) -> Result<Vec<PathToken>, PathSyntaxError> {
        match self.peek() {
            None => return Err(self.error(0, "expression is empty")),
            Some('$') => {
                self.bump();
            }
            Some(_) => return Err(self.error(0, "expression must start with '$'")),
        }

        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            match c {
                '.' if self.peek_second() == Some('.') => {
                    self.pos += 2;
                    tokens.push(PathToken::RecursiveDescent);
                    // `$..name` is shorthand for `$...name`.
                    if self.peek().is_some_and(|c| !matches!(c, '.' | '[' | '*')) {
                        let name = self.parse_name()?;
                        tokens.push(PathToken::Property(name));
                    }
                }
                '.' => {
                    self.bump();
                    if self.peek() == Some('*') {
                        self.bump();
                        tokens.push(PathToken::Wildcard);
                    } else {
                        let name = self.parse_name()?;
                        tokens.push(PathToken::Property(name));
                    }
                }
                '[' => tokens.push(self.parse_bracket()?),
                '*' => {
                    self.bump();
                    tokens.push(PathToken::Wildcard);
                }
                other => {
                    return Err(self.error(self.pos, format!("unexpected character '{}'", other)))
                }
            }
        }

        Ok(tokens)
    }

    /// Dotted member name: runs until the next `.` or `[`.
    fn parse_name(&mut self) -> Result<String, PathSyntaxError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            match c {
                '.' | '[' => break,
                ']' | '\'' | '"' => {
                    return Err(self.error(self.pos, format!("unexpected '{}' in member name", c)))
                }
                c if c.is_whitespace() => {
                    return Err(self.error(self.pos, "whitespace in member name"))
                }
                _ => {
                    self.bump();
                }
            }
        }
        if self.pos == start {
            return Err(self.error(start, "expected member name"));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_bracket(&mut self) -> Result<PathToken, PathSyntaxError> {
        let open = self.pos;
        self.bump();
        self.skip_whitespace();

        let token = match self.peek() {
            None => return Err(self.error(open, "unclosed '['")),
            Some('*') => {
                self.bump();
                PathToken::Wildcard
            }
            Some(quote @ ('\'' | '"')) => PathToken::Property(self.parse_quoted(quote)?),
            Some('?') => {
                self.bump();
                PathToken::Filter(self.parse_filter()?)
            }
            Some(c) if c == '-' || c.is_ascii_digit() => PathToken::ArrayIndex(self.parse_index()?),
            Some(_) => {
                return Err(self.error(
                    self.pos,
                    "bracket must hold '*', an integer, a quoted name or a '?(...)' filter",
                ))
            }
        };

        self.skip_whitespace();
        match self.peek() {
            Some(']') => {
                self.bump();
                Ok(token)
            }
            None => Err(self.error(open, "unclosed '['")),
            Some(c) => Err(self.error(self.pos, format!("expected ']', found '{}'", c))),
        }
    }

    fn parse_index(&mut self) -> Result<i64, PathSyntaxError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        let text = &self.input[start..self.pos];
        if !text.ends_with(|c: char| c.is_ascii_digit()) {
            return Err(self.error(start, "invalid array index"));
        }
        // Indices past the i64 range can never select anything; saturate.
        Ok(text.parse().unwrap_or(if text.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }))
    }

    /// Quoted string with `\'`, `\"` and `\\` escapes. The cursor is on the opening quote.
    fn parse_quoted(&mut self, quote: char) -> Result<String, PathSyntaxError> {
        let open = self.pos;
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error(open, "unterminated string")),
                Some('\\') => match self.bump() {
                    Some(escaped) => text.push(escaped),
                    None => return Err(self.error(open, "unterminated string")),
                },
                Some(c) if c == quote => return Ok(text),
                Some(c) => text.push(c),
            }
        }
    }

    /// `?( predicate )`. The cursor is just past the `?`.
    fn parse_filter(&mut self) -> Result<FilterPredicate, PathSyntaxError> {
        self.skip_whitespace();
        let open = self.pos;
        if self.peek() != Some('(') {
            return Err(self.error(open, "expected '(' after '?'"));
        }
        self.bump();

        let body_start = self.pos;
        let body_end = self.find_closing_paren(open)?;
        let raw = &self.input[body_start..body_end];
        let predicate = Parser::sub(self.source, raw, self.base + body_start).parse_predicate()?;
        self.pos = body_end + 1;
        Ok(predicate)
    }

    /// Offset of the `)` matching the `(` at `open`, skipping quoted text.
    fn find_closing_paren(&self, open: usize) -> Result<usize, PathSyntaxError> {
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut escaped = false;

        for (offset, c) in self.remaining().char_indices() {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '\'' | '"' => quote = Some(c),
                '(' => depth += 1,
                ')' if depth == 0 => return Ok(self.pos + offset),
                ')' => depth -= 1,
                _ => {}
            }
        }
        Err(self.error(open, "unclosed '('"))
    }

    /// `@.field[.field...] op literal`, parsed from the filter body alone.
    fn parse_predicate(&mut self) -> Result<FilterPredicate, PathSyntaxError> {
        self.skip_whitespace();
        if !self.remaining().starts_with("@.") {
            return Err(self.error(self.pos, "filter must start with '@.'"));
        }
        self.pos += 1;

        let mut field = Vec::new();
        while self.peek() == Some('.') {
            self.bump();
            let start = self.pos;
            while self
                .peek()
                .is_some_and(|c| !c.is_whitespace() && !matches!(c, '.' | '=' | '!' | '<' | '>'))
            {
                self.bump();
            }
            if self.pos == start {
                return Err(self.error(start, "expected field name after '@.'"));
            }
            field.push(self.input[start..self.pos].to_string());
        }

        self.skip_whitespace();
        let op = self.parse_compare_op()?;
        self.skip_whitespace();
        let literal = self.parse_literal()?;
        self.skip_whitespace();
        if self.pos != self.input.len() {
            return Err(self.error(self.pos, "unexpected text after filter literal"));
        }

        Ok(FilterPredicate {
            raw: self.input.to_string(),
            field,
            op,
            literal,
        })
    }

    fn parse_compare_op(&mut self) -> Result<CompareOp, PathSyntaxError> {
        let rest = self.remaining();
        for (text, op) in CompareOp::LONGEST_FIRST {
            if rest.starts_with(text) {
                self.pos += text.len();
                return Ok(op);
            }
        }
        Err(self.error(self.pos, "expected comparison operator"))
    }

    fn parse_literal(&mut self) -> Result<FilterLiteral, PathSyntaxError> {
        if let Some(quote @ ('\'' | '"')) = self.peek() {
            return self.parse_quoted(quote).map(FilterLiteral::String);
        }

        let start = self.pos;
        while self.peek().is_some_and(|c| !c.is_whitespace()) {
            self.bump();
        }
        let word = &self.input[start..self.pos];
        match word {
            "" => Err(self.error(start, "expected filter literal")),
            "true" => Ok(FilterLiteral::Bool(true)),
            "false" => Ok(FilterLiteral::Bool(false)),
            "null" => Ok(FilterLiteral::Null),
            _ => Number::from_str(word)
                .map(FilterLiteral::Number)
                .map_err(|_| self.error(start, format!("invalid filter literal '{}'", word))),
        }
    }
}
