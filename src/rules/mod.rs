//! Leaf rule predicates.
//!
//! Every rule is a pure, total check over a single [`Scalar`]: it never panics
//! and never fails abnormally. A value of a type the rule does not apply to
//! (e.g. a string checked against a numeric bound) simply does not satisfy
//! it. Each rule also carries the canonical reason reported when it fails.

mod format;

pub use format::{
    WellKnown, is_address, is_email, is_hostname, is_ip, is_ip_prefix, is_ipv4, is_ipv4_prefix,
    is_ipv6, is_ipv6_prefix, is_uri, is_uri_ref, is_uuid,
};

use crate::schema::{Element, FieldKind, Scalar};
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Reason used when a required value or nested record is unset.
pub const REQUIRED_REASON: &str = "value is required";

/// A numeric bound, comparable across signed, unsigned and floating values.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Floating point.
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Uint(u) => u as f64,
            Number::Float(f) => f,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (*self, *other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (Number::Uint(a), Number::Uint(b)) => Some(a.cmp(&b)),
            (Number::Int(a), Number::Uint(b)) => Some(if a < 0 {
                Ordering::Less
            } else {
                (a as u64).cmp(&b)
            }),
            (Number::Uint(a), Number::Int(b)) => Some(if b < 0 {
                Ordering::Greater
            } else {
                a.cmp(&(b as u64))
            }),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Uint(u) => write!(f, "{}", u),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($ty:ty),+) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

number_from!(Int as i64: i8, i16, i32, i64);
number_from!(Uint as u64: u8, u16, u32, u64);
number_from!(Float as f64: f32, f64);

/// An owned constant used by `Const`, `In` and `NotIn`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Boolean constant.
    Bool(bool),
    /// Numeric constant.
    Number(Number),
    /// String constant.
    Str(String),
    /// Bytes constant.
    Bytes(Vec<u8>),
}

impl Literal {
    /// Whether `value` equals this constant.
    pub fn matches(&self, value: &Scalar<'_>) -> bool {
        match (self, value) {
            (Literal::Bool(a), Scalar::Bool(b)) => a == b,
            (Literal::Str(a), Scalar::Str(b)) => a == b,
            (Literal::Bytes(a), Scalar::Bytes(b)) => a.as_slice() == *b,
            (Literal::Number(a), v) => v.as_number().is_some_and(|n| n == *a),
            _ => false,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Str(s) => f.write_str(s),
            Literal::Bytes(b) => write!(f, "{:?}", b),
        }
    }
}

macro_rules! literal_from_number {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Literal {
                fn from(value: $ty) -> Self {
                    Literal::Number(Number::from(value))
                }
            }
        )+
    };
}

literal_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl From<Number> for Literal {
    fn from(value: Number) -> Self {
        Literal::Number(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Str(value)
    }
}

impl From<Vec<u8>> for Literal {
    fn from(value: Vec<u8>) -> Self {
        Literal::Bytes(value)
    }
}

/// A numeric interval with per-end inclusivity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    low: Number,
    high: Number,
    low_inclusive: bool,
    high_inclusive: bool,
}

impl Range {
    /// Interval with explicit inclusivity for both ends.
    pub fn new(
        low: impl Into<Number>,
        low_inclusive: bool,
        high: impl Into<Number>,
        high_inclusive: bool,
    ) -> Self {
        Self {
            low: low.into(),
            high: high.into(),
            low_inclusive,
            high_inclusive,
        }
    }

    /// `[low, high]`
    pub fn inclusive(low: impl Into<Number>, high: impl Into<Number>) -> Self {
        Self::new(low, true, high, true)
    }

    /// `(low, high)`
    pub fn exclusive(low: impl Into<Number>, high: impl Into<Number>) -> Self {
        Self::new(low, false, high, false)
    }

    /// Whether `n` lies inside the interval. NaN is never inside.
    pub fn contains(&self, n: Number) -> bool {
        let above = match n.partial_cmp(&self.low) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => self.low_inclusive,
            _ => false,
        };
        let below = match n.partial_cmp(&self.high) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.high_inclusive,
            _ => false,
        };
        above && below
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.low_inclusive { '[' } else { '(' },
            self.low,
            self.high,
            if self.high_inclusive { ']' } else { ')' }
        )
    }
}

/// A pluggable leaf predicate.
///
/// Implement this to add semantic checks the built-in catalog does not cover.
/// Implementations must be total and free of side effects visible to other
/// validation calls.
pub trait Predicate: Send + Sync {
    /// Whether `value` satisfies the predicate.
    fn evaluate(&self, value: &Scalar<'_>) -> bool;

    /// Reason reported when the predicate is not satisfied.
    fn reason(&self) -> String;
}

/// A [`Predicate`] built from a closure and a fixed reason.
pub struct FnPredicate<F> {
    reason: String,
    check: F,
}

impl<F> FnPredicate<F>
where
    F: Fn(&Scalar<'_>) -> bool + Send + Sync,
{
    /// Create a predicate from `check`, failing with `reason`.
    pub fn new(reason: impl Into<String>, check: F) -> Self {
        Self {
            reason: reason.into(),
            check,
        }
    }
}

impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&Scalar<'_>) -> bool + Send + Sync,
{
    fn evaluate(&self, value: &Scalar<'_>) -> bool {
        (self.check)(value)
    }

    fn reason(&self) -> String {
        self.reason.clone()
    }
}

/// A compiled regular expression, matched against strings and raw bytes alike.
///
/// Bytes are matched with [`regex::bytes`], so values that are not valid
/// UTF-8 are still searched rather than rejected outright.
#[derive(Debug, Clone)]
pub struct Pattern {
    text: Regex,
    bytes: regex::bytes::Regex,
}

impl Pattern {
    /// Compile `pattern` for both strings and bytes.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error when `pattern` is not a valid expression.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            text: Regex::new(pattern)?,
            bytes: regex::bytes::Regex::new(pattern)?,
        })
    }

    /// The source expression.
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Whether `value` matches. Non-textual values never match.
    pub fn is_match(&self, value: &Scalar<'_>) -> bool {
        match *value {
            Scalar::Str(s) => self.text.is_match(s),
            Scalar::Bytes(b) => self.bytes.is_match(b),
            _ => false,
        }
    }
}

/// A single leaf constraint with its parameters.
#[derive(Clone)]
pub enum Rule {
    /// The value must not be the zero value of its type.
    Required,
    /// The value must equal the constant.
    Const(Literal),
    /// The value must be one of the listed constants.
    In(Vec<Literal>),
    /// The value must not be any of the listed constants.
    NotIn(Vec<Literal>),
    /// Strictly less than.
    Lt(Number),
    /// Less than or equal to.
    Lte(Number),
    /// Strictly greater than.
    Gt(Number),
    /// Greater than or equal to.
    Gte(Number),
    /// Inside the interval.
    Within(Range),
    /// Outside the interval.
    Outside(Range),
    /// Exact length in characters.
    Len(usize),
    /// Minimum length in characters.
    MinLen(usize),
    /// Maximum length in characters.
    MaxLen(usize),
    /// Inclusive length bounds in characters.
    LenBetween(usize, usize),
    /// Exact length in bytes.
    LenBytes(usize),
    /// Minimum length in bytes.
    MinBytes(usize),
    /// Maximum length in bytes.
    MaxBytes(usize),
    /// Inclusive length bounds in bytes.
    BytesBetween(usize, usize),
    /// The value must match the regular expression.
    Pattern(Pattern),
    /// The value must start with the string.
    Prefix(String),
    /// The value must end with the string.
    Suffix(String),
    /// The value must contain the string.
    Contains(String),
    /// The value must not contain the string.
    NotContains(String),
    /// The value must be a well-known string format.
    Format(WellKnown),
    /// A user supplied predicate.
    Custom(Arc<dyn Predicate>),
}

impl Rule {
    /// Compile a regex rule.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error when `pattern` is not a valid expression.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Pattern::new(pattern).map(Rule::Pattern)
    }

    /// Membership rule from any list of constants.
    pub fn one_of<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Literal>,
    {
        Rule::In(values.into_iter().map(Into::into).collect())
    }

    /// Exclusion rule from any list of constants.
    pub fn none_of<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Literal>,
    {
        Rule::NotIn(values.into_iter().map(Into::into).collect())
    }

    /// Wrap a custom predicate.
    pub fn custom(predicate: impl Predicate + 'static) -> Self {
        Rule::Custom(Arc::new(predicate))
    }

    /// Custom predicate from a closure.
    pub fn from_fn<F>(reason: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Scalar<'_>) -> bool + Send + Sync + 'static,
    {
        Rule::custom(FnPredicate::new(reason, check))
    }

    /// Whether `value` satisfies the rule.
    pub fn evaluate(&self, value: &Scalar<'_>) -> bool {
        match self {
            Rule::Required => !value.is_default(),
            Rule::Const(c) => c.matches(value),
            Rule::In(list) => list.iter().any(|c| c.matches(value)),
            Rule::NotIn(list) => !list.iter().any(|c| c.matches(value)),
            Rule::Lt(bound) => compare(value, bound, |o| o == Ordering::Less),
            Rule::Lte(bound) => compare(value, bound, |o| o != Ordering::Greater),
            Rule::Gt(bound) => compare(value, bound, |o| o == Ordering::Greater),
            Rule::Gte(bound) => compare(value, bound, |o| o != Ordering::Less),
            Rule::Within(range) => value.as_number().is_some_and(|n| range.contains(n)),
            Rule::Outside(range) => value
                .as_number()
                .is_some_and(|n| !range.contains(n) && !n.as_f64().is_nan()),
            Rule::Len(n) => char_len(value).is_some_and(|len| len == *n),
            Rule::MinLen(n) => char_len(value).is_some_and(|len| len >= *n),
            Rule::MaxLen(n) => char_len(value).is_some_and(|len| len <= *n),
            Rule::LenBetween(min, max) => {
                char_len(value).is_some_and(|len| (*min..=*max).contains(&len))
            }
            Rule::LenBytes(n) => byte_len(value).is_some_and(|len| len == *n),
            Rule::MinBytes(n) => byte_len(value).is_some_and(|len| len >= *n),
            Rule::MaxBytes(n) => byte_len(value).is_some_and(|len| len <= *n),
            Rule::BytesBetween(min, max) => {
                byte_len(value).is_some_and(|len| (*min..=*max).contains(&len))
            }
            Rule::Pattern(re) => re.is_match(value),
            Rule::Prefix(p) => raw_bytes(value).is_some_and(|b| b.starts_with(p.as_bytes())),
            Rule::Suffix(p) => raw_bytes(value).is_some_and(|b| b.ends_with(p.as_bytes())),
            Rule::Contains(p) => raw_bytes(value).is_some_and(|b| contains(b, p.as_bytes())),
            Rule::NotContains(p) => raw_bytes(value).is_some_and(|b| !contains(b, p.as_bytes())),
            Rule::Format(kind) => value.as_str().is_some_and(|s| kind.check(s)),
            Rule::Custom(predicate) => predicate.evaluate(value),
        }
    }

    /// Canonical reason reported when the rule is not satisfied.
    pub fn reason(&self) -> String {
        match self {
            Rule::Required => REQUIRED_REASON.to_string(),
            Rule::Const(c) => format!("value must equal {}", c),
            Rule::In(list) => format!("value must be in list [{}]", join(list)),
            Rule::NotIn(list) => format!("value must not be in list [{}]", join(list)),
            Rule::Lt(n) => format!("value must be less than {}", n),
            Rule::Lte(n) => format!("value must be less than or equal to {}", n),
            Rule::Gt(n) => format!("value must be greater than {}", n),
            Rule::Gte(n) => format!("value must be greater than or equal to {}", n),
            Rule::Within(range) => format!("value must be inside range {}", range),
            Rule::Outside(range) => format!("value must be outside range {}", range),
            Rule::Len(n) => format!("value length must be {} runes", n),
            Rule::MinLen(n) => format!("value length must be at least {} runes", n),
            Rule::MaxLen(n) => format!("value length must be at most {} runes", n),
            Rule::LenBetween(min, max) => {
                format!("value length must be between {} and {} runes, inclusive", min, max)
            }
            Rule::LenBytes(n) => format!("value length must be {} bytes", n),
            Rule::MinBytes(n) => format!("value length must be at least {} bytes", n),
            Rule::MaxBytes(n) => format!("value length must be at most {} bytes", n),
            Rule::BytesBetween(min, max) => {
                format!("value length must be between {} and {} bytes, inclusive", min, max)
            }
            Rule::Pattern(re) => format!("value does not match regex pattern {:?}", re.as_str()),
            Rule::Prefix(p) => format!("value does not have prefix {:?}", p),
            Rule::Suffix(p) => format!("value does not have suffix {:?}", p),
            Rule::Contains(p) => format!("value does not contain substring {:?}", p),
            Rule::NotContains(p) => format!("value contains substring {:?}", p),
            Rule::Format(kind) => kind.reason().to_string(),
            Rule::Custom(predicate) => predicate.reason(),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Rule").field(&self.reason()).finish()
    }
}

fn compare(value: &Scalar<'_>, bound: &Number, accept: impl Fn(Ordering) -> bool) -> bool {
    value
        .as_number()
        .and_then(|n| n.partial_cmp(bound))
        .is_some_and(accept)
}

fn char_len(value: &Scalar<'_>) -> Option<usize> {
    match value {
        Scalar::Str(s) => Some(s.chars().count()),
        Scalar::Bytes(b) => Some(b.len()),
        _ => None,
    }
}

fn byte_len(value: &Scalar<'_>) -> Option<usize> {
    match value {
        Scalar::Str(s) => Some(s.len()),
        Scalar::Bytes(b) => Some(b.len()),
        _ => None,
    }
}

// Strings compare through their UTF-8 encoding, so one byte-level check serves both.
fn raw_bytes<'v>(value: &Scalar<'v>) -> Option<&'v [u8]> {
    match *value {
        Scalar::Str(s) => Some(s.as_bytes()),
        Scalar::Bytes(b) => Some(b),
        _ => None,
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}

fn join(list: &[Literal]) -> String {
    list.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Hashable identity of a scalar for the uniqueness check.
///
/// Floats are keyed by their bits with `-0.0` folded into `0.0`; NaN has no key
/// and never counts as a duplicate, since it is not equal to itself.
#[derive(PartialEq, Eq, Hash)]
enum UniqueKey<'a> {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(u64),
    Str(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> UniqueKey<'a> {
    fn of(value: &Scalar<'a>) -> Option<Self> {
        Some(match *value {
            Scalar::Bool(b) => UniqueKey::Bool(b),
            Scalar::Int(i) => UniqueKey::Int(i),
            Scalar::Uint(u) => UniqueKey::Uint(u),
            Scalar::Float(f) if f.is_nan() => return None,
            Scalar::Float(f) if f == 0.0 => UniqueKey::Float(0),
            Scalar::Float(f) => UniqueKey::Float(f.to_bits()),
            Scalar::Str(s) => UniqueKey::Str(s),
            Scalar::Bytes(b) => UniqueKey::Bytes(b),
        })
    }
}

/// A constraint on the size or contents of a repeated or keyed collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsRule {
    /// At least this many items (or map pairs).
    MinItems(usize),
    /// At most this many items (or map pairs).
    MaxItems(usize),
    /// No two scalar items may be equal. Ignored for maps, whose keys are unique.
    Unique,
}

impl ItemsRule {
    /// Whether a repeated field's elements satisfy the rule.
    pub fn evaluate_repeated(&self, items: &[Element<'_>]) -> bool {
        match self {
            ItemsRule::Unique => {
                let mut seen = HashSet::with_capacity(items.len());
                items.iter().all(|item| match item {
                    Element::Scalar(value) => {
                        UniqueKey::of(value).is_none_or(|key| seen.insert(key))
                    }
                    _ => true,
                })
            }
            _ => self.evaluate_len(items.len()),
        }
    }

    /// Whether a collection of `len` entries satisfies the rule.
    pub fn evaluate_len(&self, len: usize) -> bool {
        match self {
            ItemsRule::MinItems(n) => len >= *n,
            ItemsRule::MaxItems(n) => len <= *n,
            ItemsRule::Unique => true,
        }
    }

    /// Canonical reason for a collection of the given kind.
    pub fn reason(&self, kind: FieldKind) -> String {
        let unit = if kind == FieldKind::Map { "pair(s)" } else { "item(s)" };
        match self {
            ItemsRule::MinItems(n) => format!("value must contain at least {} {}", n, unit),
            ItemsRule::MaxItems(n) => format!("value must contain no more than {} {}", n, unit),
            ItemsRule::Unique => "repeated value must contain unique items".to_string(),
        }
    }
}
