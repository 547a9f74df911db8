//! Exact-preserving JSON numbers.
//!
//! A [`Number`] keeps the digits it was parsed from, so `1.10`,
//! `12345678901234567890123` and `-0` survive a parse/serialize cycle
//! unchanged. Exponents are the one exception: they are spelled canonically
//! with a lowercase `e` and an explicit sign, so `1E400` is kept as `1e+400`.
//! Comparisons go through increasingly lossy fallbacks: exact 64-bit
//! integers, then exact decimals, then `f64`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::JsonDocError;

/// Largest significand (and scale) a decimal comparison is allowed to rely on.
const DECIMAL_DIGITS: usize = 28;

/// A JSON number holding its exact textual representation.
///
/// Only the exponent is normalised, see the module docs.
#[derive(Clone)]
pub struct Number {
    repr: Arc<str>,
}

impl Number {
    /// Wrap text already known to be a valid JSON number (e.g. produced by serde_json).
    pub(crate) fn from_trusted(repr: &str) -> Self {
        Self {
            repr: canonical_exponent(repr).into(),
        }
    }

    /// Build a number from a finite float. Returns `None` for NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        if value.is_finite() {
            Some(Self::from_trusted(&value.to_string()))
        } else {
            None
        }
    }

    /// The source text, with the exponent in canonical spelling.
    pub fn as_str(&self) -> &str {
        &self.repr
    }

    /// True when the text has no fraction or exponent part.
    pub fn is_integer(&self) -> bool {
        !self.repr.contains(['.', 'e', 'E'])
    }

    pub fn as_i64(&self) -> Option<i64> {
        if self.is_integer() {
            self.repr.parse().ok()
        } else {
            None
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        if self.is_integer() {
            self.repr.parse().ok()
        } else {
            None
        }
    }

    /// Nearest `f64`. Magnitudes beyond the float range become infinite.
    pub fn as_f64(&self) -> Option<f64> {
        self.repr.parse().ok()
    }

    /// Either 64-bit integer reading, widened so signed and unsigned compare directly.
    fn as_wide_integer(&self) -> Option<i128> {
        self.as_i64()
            .map(i128::from)
            .or_else(|| self.as_u64().map(i128::from))
    }

    fn decimal(&self) -> Decimal {
        Decimal::parse(&self.repr)
    }

    /// Exact numeric ordering, independent of how either side is written.
    ///
    /// `1.50` and `15e-1` compare equal; no float conversion is involved.
    pub fn cmp_exact(&self, other: &Number) -> Ordering {
        if let (Some(a), Some(b)) = (self.as_wide_integer(), other.as_wide_integer()) {
            return a.cmp(&b);
        }
        self.decimal().cmp(&other.decimal())
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.as_wide_integer(), other.as_wide_integer()) {
            return a == b;
        }

        let (a, b) = (self.decimal(), other.decimal());
        if a.fits_decimal() && b.fits_decimal() {
            return a == b;
        }

        match (self.as_f64(), other.as_f64()) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => {
                x == y || (x - y).abs() <= f64::EPSILON
            }
            // Past the f64 range every magnitude collapses to infinity.
            _ => a == b,
        }
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Number({})", self.repr)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}

impl FromStr for Number {
    type Err = JsonDocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_json_number(s) {
            Ok(Self::from_trusted(s))
        } else {
            Err(JsonDocError::InvalidNumber(s.to_string()))
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::from_trusted(&value.to_string())
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self::from_trusted(&value.to_string())
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Self::from(u64::from(value))
    }
}

impl From<&serde_json::Number> for Number {
    fn from(value: &serde_json::Number) -> Self {
        Self::from_trusted(&value.to_string())
    }
}

/// Integers whose text is their plain decimal form go out as `i64`/`u64`, so
/// every serde format sees a number. Anything else is handed over as a
/// `serde_json::Number` to keep its digits exact. Only `serde_json` renders
/// that as a number. Other formats receive its internal single-entry map.
impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(i) = self.as_i64().filter(|i| i.to_string() == *self.repr) {
            return serializer.serialize_i64(i);
        }
        if let Some(u) = self.as_u64().filter(|u| u.to_string() == *self.repr) {
            return serializer.serialize_u64(u);
        }
        let number: serde_json::Number =
            serde_json::from_str(&self.repr).map_err(serde::ser::Error::custom)?;
        number.serialize(serializer)
    }
}

/// Lowercase `e` with an explicit exponent sign: `2E5` and `2e5` become `2e+5`.
fn canonical_exponent(text: &str) -> String {
    match text.find(['e', 'E']) {
        Some(pos) => {
            let (mantissa, exponent) = (&text[..pos], &text[pos + 1..]);
            let sign = if exponent.starts_with(['+', '-']) { "" } else { "+" };
            format!("{mantissa}e{sign}{exponent}")
        }
        None => text.to_string(),
    }
}

/// RFC 8259 number grammar: `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
fn is_json_number(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;

    if bytes.get(i) == Some(&b'-') {
        i += 1;
    }
    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
        }
        _ => return false,
    }

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == start {
            return false;
        }
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == start {
            return false;
        }
    }

    i == bytes.len()
}

/// Normalised decimal: `value = ±digits × 10^exponent`.
///
/// `digits` has no leading or trailing zeros; zero is the empty string with
/// exponent 0 and a positive sign, so equal values have equal representations.
#[derive(Debug, PartialEq, Eq)]
struct Decimal {
    negative: bool,
    digits: String,
    exponent: i64,
}

impl Decimal {
    fn parse(text: &str) -> Self {
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let (mantissa, exp_text) = match unsigned.find(['e', 'E']) {
            Some(pos) => (&unsigned[..pos], Some(&unsigned[pos + 1..])),
            None => (unsigned, None),
        };
        let exponent = exp_text.map_or(0, parse_exponent);

        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (mantissa, ""),
        };

        let mut digits = format!("{int_part}{frac_part}");
        let mut exponent = exponent.saturating_sub(frac_part.len() as i64);

        let trailing = digits.len() - digits.trim_end_matches('0').len();
        digits.truncate(digits.len() - trailing);
        exponent = exponent.saturating_add(trailing as i64);
        let digits = digits.trim_start_matches('0').to_string();

        if digits.is_empty() {
            return Self {
                negative: false,
                digits,
                exponent: 0,
            };
        }

        Self {
            negative,
            digits,
            exponent,
        }
    }

    fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// Position of the most significant digit relative to the decimal point.
    fn magnitude(&self) -> i64 {
        self.exponent.saturating_add(self.digits.len() as i64)
    }

    /// Whether the value is representable as a 28-digit scaled decimal.
    fn fits_decimal(&self) -> bool {
        if self.is_zero() {
            return true;
        }
        let limit = DECIMAL_DIGITS as i64;
        self.digits.len() <= DECIMAL_DIGITS && self.exponent >= -limit && self.magnitude() <= limit
    }

    fn cmp_magnitude(&self, other: &Decimal) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }
        // Same magnitude: digit strings compare lexicographically, a shorter prefix is smaller.
        self.magnitude()
            .cmp(&other.magnitude())
            .then_with(|| self.digits.as_str().cmp(other.digits.as_str()))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn parse_exponent(text: &str) -> i64 {
    match text.parse::<i64>() {
        Ok(exp) => exp,
        // Absurd exponents saturate; halving keeps later arithmetic from overflowing.
        Err(_) if text.starts_with('-') => i64::MIN / 2,
        Err(_) => i64::MAX / 2,
    }
}
