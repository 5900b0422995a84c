//! The simple value domain shared by the codec and the bean mapper.
//!
//! [`Value`] is the restricted, type-erased form every typed object is reduced to
//! before it is written out, and the form every piece of text is parsed into:
//! null, booleans, numbers, strings, ordered lists and string-keyed mappings.
//!
//! [`Number`] keeps track of the numeric width it was produced with (32/64-bit
//! integers, single/double floats). The decoder always picks the narrowest width
//! that holds a literal, so `42` decodes as [`Number::I32`] no matter which width
//! was encoded.
//!
//! ## Examples
//!
//! ```rust
//! use beanson::{Number, Value};
//!
//! let null = Value::Null;
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! assert!(null.is_null());
//! assert_eq!(number, Value::Number(Number::I32(42)));
//! assert_eq!(text.as_str(), Some("hello"));
//! ```

use crate::Map;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A simple value: the tree every text is decoded into and every bean is simplified to.
///
/// A value graph is always a tree; lists and mappings own their children.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Value>),
    Map(Map),
}

/// A number together with the width it was produced with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl Number {
    /// Returns `true` for the integer widths.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::I32(_) | Number::I64(_))
    }

    /// Returns `true` for the floating-point widths.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::F32(_) | Number::F64(_))
    }

    /// Returns `false` for infinite and NaN floats, which have no textual form.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Number::F32(f) => f.is_finite(),
            Number::F64(f) => f.is_finite(),
            _ => true,
        }
    }

    /// Returns the integer value, or `None` for floats.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beanson::Number;
    ///
    /// assert_eq!(Number::I32(42).as_i64(), Some(42));
    /// assert_eq!(Number::F64(42.0).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::I32(i) => Some(i64::from(*i)),
            Number::I64(i) => Some(*i),
            _ => None,
        }
    }

    /// Converts this number to an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::I32(i) => f64::from(*i),
            Number::I64(i) => *i as f64,
            Number::F32(f) => f64::from(*f),
            Number::F64(f) => *f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_finite() {
            f.write_str(&crate::ser::format_number(self))
        } else {
            match self.as_f64() {
                v if v.is_nan() => f.write_str("NaN"),
                v if v > 0.0 => f.write_str("Infinity"),
                _ => f.write_str("-Infinity"),
            }
        }
    }
}

macro_rules! impl_number_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Number {
                fn from(value: $t) -> Self {
                    Number::$variant(value.into())
                }
            }

            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_number_from! {
    i8 => I32,
    i16 => I32,
    i32 => I32,
    u8 => I32,
    u16 => I32,
    i64 => I64,
    u32 => I64,
    f32 => F32,
    f64 => F64,
}

impl Value {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is a list.
    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Returns `true` if the value is a mapping.
    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// A short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// If the value is an integer of either width, returns it as `i64`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beanson::Value;
    ///
    /// assert_eq!(Value::from(42).as_i64(), Some(42));
    /// assert_eq!(Value::from(4.5).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The natural textual form of the value.
    ///
    /// Strings are returned as they are; everything else is rendered the way the
    /// encoder writes it. This is the form used for mapping keys and for
    /// beanifying into `String`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beanson::Value;
    ///
    /// assert_eq!(Value::from("abc").into_text(), "abc");
    /// assert_eq!(Value::from(42.50).into_text(), "42.5");
    /// assert_eq!(Value::Null.into_text(), "null");
    /// ```
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }
}

/// Renders the value as compact text with sorted keys.
///
/// Unlike [`encode`](crate::encode), non-finite floats are written as `NaN` or
/// `Infinity` rather than rejected.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::ser::Encoder::lenient().encode(self, f)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Map(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::I32(i)) => serializer.serialize_i32(*i),
            Value::Number(Number::I64(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::F32(f)) => serializer.serialize_f32(*f),
            Value::Number(Number::F64(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(list) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for element in list {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any simple value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(match i32::try_from(value) {
                    Ok(narrow) => Value::from(narrow),
                    Err(_) => Value::from(value),
                })
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                if let Ok(narrow) = i32::try_from(value) {
                    Ok(Value::from(narrow))
                } else if let Ok(wide) = i64::try_from(value) {
                    Ok(Value::from(wide))
                } else {
                    Ok(Value::from(value as f64))
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::List(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Map::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Map(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
