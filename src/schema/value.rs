//! Runtime field values handed to the dispatcher by a [`Record`](super::Record).

use crate::core::Validate;
use crate::rules::Number;
use std::cmp::Ordering;
use std::fmt;

/// A borrowed leaf value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    /// Boolean value.
    Bool(bool),
    /// Signed integer (any width up to 64 bits).
    Int(i64),
    /// Unsigned integer (any width up to 64 bits).
    Uint(u64),
    /// Floating point value.
    Float(f64),
    /// UTF-8 string.
    Str(&'a str),
    /// Raw bytes.
    Bytes(&'a [u8]),
}

impl<'a> Scalar<'a> {
    /// Whether the value equals the zero value of its type.
    pub fn is_default(&self) -> bool {
        match *self {
            Scalar::Bool(b) => !b,
            Scalar::Int(i) => i == 0,
            Scalar::Uint(u) => u == 0,
            Scalar::Float(f) => f == 0.0,
            Scalar::Str(s) => s.is_empty(),
            Scalar::Bytes(b) => b.is_empty(),
        }
    }

    /// The value as a number, if it is numeric.
    pub fn as_number(&self) -> Option<Number> {
        match *self {
            Scalar::Int(i) => Some(Number::Int(i)),
            Scalar::Uint(u) => Some(Number::Uint(u)),
            Scalar::Float(f) => Some(Number::Float(f)),
            _ => None,
        }
    }

    /// The value as a string slice. Bytes are accepted when they are valid UTF-8.
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Scalar::Str(s) => Some(s),
            Scalar::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Total order used to visit map entries deterministically.
    ///
    /// Values of the same type compare naturally (floats with `total_cmp`);
    /// values of different types order by variant.
    pub fn cmp_key(&self, other: &Scalar<'_>) -> Ordering {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a.cmp(b),
            (Scalar::Int(a), Scalar::Int(b)) => a.cmp(b),
            (Scalar::Uint(a), Scalar::Uint(b)) => a.cmp(b),
            (Scalar::Float(a), Scalar::Float(b)) => a.total_cmp(b),
            (Scalar::Str(a), Scalar::Str(b)) => a.cmp(b),
            (Scalar::Bytes(a), Scalar::Bytes(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Scalar::Bool(_) => 0,
            Scalar::Int(_) => 1,
            Scalar::Uint(_) => 2,
            Scalar::Float(_) => 3,
            Scalar::Str(_) => 4,
            Scalar::Bytes(_) => 5,
        }
    }
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Uint(u) => write!(f, "{}", u),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(s) => f.write_str(s),
            Scalar::Bytes(b) => write!(f, "{:?}", b),
        }
    }
}

macro_rules! scalar_from {
    ($variant:ident as $target:ty: $($ty:ty),+) => {
        $(
            impl From<$ty> for Scalar<'_> {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

scalar_from!(Int as i64: i8, i16, i32, i64);
scalar_from!(Uint as u64: u8, u16, u32, u64);
scalar_from!(Float as f64: f32, f64);

impl From<bool> for Scalar<'_> {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl<'a> From<&'a str> for Scalar<'a> {
    fn from(value: &'a str) -> Self {
        Scalar::Str(value)
    }
}

impl<'a> From<&'a String> for Scalar<'a> {
    fn from(value: &'a String) -> Self {
        Scalar::Str(value.as_str())
    }
}

impl<'a> From<&'a [u8]> for Scalar<'a> {
    fn from(value: &'a [u8]) -> Self {
        Scalar::Bytes(value)
    }
}

impl<'a> From<&'a Vec<u8>> for Scalar<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        Scalar::Bytes(value.as_slice())
    }
}

/// One element of a repeated field, or the value half of a map entry.
#[derive(Clone, Copy)]
pub enum Element<'a> {
    /// A leaf value.
    Scalar(Scalar<'a>),
    /// A nested record that can validate itself.
    Message(&'a dyn Validate),
    /// A nested value with no validation capability. Never inspected.
    Opaque,
}

impl<'a> Element<'a> {
    /// Wrap a nested record.
    pub fn message<T: Validate>(value: &'a T) -> Self {
        Element::Message(value)
    }
}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            Element::Message(_) => f.write_str("Message(..)"),
            Element::Opaque => f.write_str("Opaque"),
        }
    }
}

/// The value of one declared field, as exposed by a record's accessor.
pub enum FieldValue<'a> {
    /// A singular leaf value.
    Scalar(Scalar<'a>),
    /// A singular nested record; `None` when unset.
    Message(Option<&'a dyn Validate>),
    /// A singular nested value without validation capability.
    Opaque {
        /// Whether the value is set.
        present: bool,
    },
    /// A repeated field, in sequence order.
    Repeated(Vec<Element<'a>>),
    /// A keyed collection. Entry order does not matter; the dispatcher sorts by key.
    Map(Vec<(Scalar<'a>, Element<'a>)>),
    /// The accessor does not know the field. Treated as unconstrained.
    Missing,
}

impl<'a> FieldValue<'a> {
    /// A singular leaf value.
    pub fn scalar(value: impl Into<Scalar<'a>>) -> Self {
        FieldValue::Scalar(value.into())
    }

    /// A singular, optional nested record.
    pub fn message<T: Validate>(value: Option<&'a T>) -> Self {
        FieldValue::Message(value.map(|v| v as &dyn Validate))
    }

    /// A singular nested value whose type cannot validate itself.
    pub fn opaque<T>(value: Option<&T>) -> Self {
        FieldValue::Opaque {
            present: value.is_some(),
        }
    }

    /// A repeated leaf field.
    pub fn scalars<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Scalar<'a>>,
    {
        FieldValue::Repeated(values.into_iter().map(|v| Element::Scalar(v.into())).collect())
    }

    /// A repeated nested-record field.
    pub fn messages<T: Validate>(values: &'a [T]) -> Self {
        FieldValue::Repeated(values.iter().map(Element::message).collect())
    }

    /// A keyed collection of leaf values.
    pub fn scalar_map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Scalar<'a>>,
        V: Into<Scalar<'a>>,
    {
        FieldValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), Element::Scalar(v.into())))
                .collect(),
        )
    }

    /// A keyed collection of nested records.
    pub fn message_map<I, K, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, &'a T)>,
        K: Into<Scalar<'a>>,
        T: Validate + 'a,
    {
        FieldValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), Element::message(v)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert!(Scalar::from(false).is_default());
        assert!(Scalar::from(0i32).is_default());
        assert!(Scalar::from("").is_default());
        assert!(!Scalar::from(0.5f64).is_default());
        assert!(!Scalar::from(&b"x"[..]).is_default());
    }

    #[test]
    fn test_key_order() {
        let mut keys = vec![Scalar::from("b"), Scalar::from("a"), Scalar::from("c")];
        keys.sort_by(|a, b| a.cmp_key(b));
        assert_eq!(keys, vec![Scalar::from("a"), Scalar::from("b"), Scalar::from("c")]);

        let mut ints = vec![Scalar::from(10i64), Scalar::from(-2i64), Scalar::from(3i64)];
        ints.sort_by(|a, b| a.cmp_key(b));
        assert_eq!(ints, vec![Scalar::Int(-2), Scalar::Int(3), Scalar::Int(10)]);
    }

    #[test]
    fn test_display_keys() {
        assert_eq!(Scalar::from("env").to_string(), "env");
        assert_eq!(Scalar::from(42u32).to_string(), "42");
        assert_eq!(Scalar::from(true).to_string(), "true");
    }
}
