//! Conversion of simple values into typed values.
//!
//! [`Beanify`] is the inverse of [`Simplify`](crate::Simplify). Scalars follow the
//! numeric conversion rules of `as` casts: a 64-bit integer read into an `i32`
//! keeps its low bits and a double read into an `f32` loses precision, without
//! any range check. Callers that need checked conversions should read the wider
//! type and convert themselves.

use crate::{Error, Map, Number, Result, Value};
use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexMap;
use std::any::type_name;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// Conversion of a [`Value`] into a typed value.
///
/// # Examples
///
/// ```rust
/// use beanson::{decode, Beanify};
///
/// let value = decode("[10, 3000000000, 2.75]").unwrap();
/// let numbers = Vec::<i64>::beanify(value).unwrap();
/// assert_eq!(numbers, vec![10, 3_000_000_000, 2]);
/// ```
pub trait Beanify: Sized {
    /// Converts a non-null value.
    fn beanify(value: Value) -> Result<Self>;

    /// The result of converting a null found inside a larger value.
    ///
    /// Types with no null state reject it; [`Option`] and [`Value`] accept it.
    fn beanify_null() -> Result<Self> {
        Err(Error::beanification("Unexpected null value", type_name::<Self>()))
    }
}

/// Dispatches a value that may be null.
pub(crate) fn beanify_value<T: Beanify>(value: Value) -> Result<T> {
    match value {
        Value::Null => T::beanify_null(),
        value => T::beanify(value),
    }
}

pub(crate) fn incompatible<T>(value: &Value) -> Error {
    Error::beanification(format!("Incompatible value {}", value.kind()), type_name::<T>())
}

impl Beanify for Value {
    fn beanify(value: Value) -> Result<Self> {
        Ok(value)
    }

    fn beanify_null() -> Result<Self> {
        Ok(Value::Null)
    }
}

impl Beanify for Map {
    fn beanify(value: Value) -> Result<Self> {
        match value {
            Value::Map(map) => Ok(map),
            _ => Err(Error::beanification("Expected a map", type_name::<Self>())),
        }
    }
}

impl Beanify for Number {
    fn beanify(value: Value) -> Result<Self> {
        match value {
            Value::Number(n) => Ok(n),
            other => Err(incompatible::<Self>(&other)),
        }
    }
}

impl Beanify for bool {
    fn beanify(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(incompatible::<Self>(&other)),
        }
    }
}

macro_rules! beanify_number {
    ($($t:ty),*) => {
        $(
            impl Beanify for $t {
                fn beanify(value: Value) -> Result<Self> {
                    match value {
                        Value::Number(Number::I32(v)) => Ok(v as $t),
                        Value::Number(Number::I64(v)) => Ok(v as $t),
                        Value::Number(Number::F32(v)) => Ok(v as $t),
                        Value::Number(Number::F64(v)) => Ok(v as $t),
                        other => Err(incompatible::<Self>(&other)),
                    }
                }
            }
        )*
    };
}

beanify_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Any value reads as a string through its natural text.
impl Beanify for String {
    fn beanify(value: Value) -> Result<Self> {
        Ok(value.into_text())
    }
}

impl Beanify for char {
    fn beanify(value: Value) -> Result<Self> {
        let text = value.into_text();
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::beanification(
                format!(
                    "A single-character string expected, got {} chars",
                    text.chars().count()
                ),
                type_name::<Self>(),
            )),
        }
    }
}

/// Numbers read as epoch milliseconds.
impl Beanify for DateTime<Utc> {
    fn beanify(value: Value) -> Result<Self> {
        let millis = match value {
            Value::Number(n) => match n.as_i64() {
                Some(millis) => millis,
                None => n.as_f64() as i64,
            },
            other => return Err(incompatible::<Self>(&other)),
        };
        Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
            Error::beanification(
                format!("Timestamp out of range: {}", millis),
                type_name::<Self>(),
            )
        })
    }
}

impl<T: Beanify> Beanify for Option<T> {
    fn beanify(value: Value) -> Result<Self> {
        T::beanify(value).map(Some)
    }

    fn beanify_null() -> Result<Self> {
        Ok(None)
    }
}

impl<T: Beanify> Beanify for Box<T> {
    fn beanify(value: Value) -> Result<Self> {
        T::beanify(value).map(Box::new)
    }

    fn beanify_null() -> Result<Self> {
        T::beanify_null().map(Box::new)
    }
}

fn beanify_list<T: Beanify, C>(value: Value) -> Result<Vec<T>> {
    match value {
        Value::List(items) => items.into_iter().map(beanify_value).collect(),
        _ => Err(Error::beanification("Expected a collection", type_name::<C>())),
    }
}

impl<T: Beanify> Beanify for Vec<T> {
    fn beanify(value: Value) -> Result<Self> {
        beanify_list::<T, Self>(value)
    }
}

impl<T: Beanify> Beanify for Box<[T]> {
    fn beanify(value: Value) -> Result<Self> {
        beanify_list::<T, Self>(value).map(Vec::into_boxed_slice)
    }
}

impl<T: Beanify, const N: usize> Beanify for [T; N] {
    fn beanify(value: Value) -> Result<Self> {
        let items = beanify_list::<T, Self>(value)?;
        let len = items.len();
        items.try_into().map_err(|_| {
            Error::beanification(
                format!("Expected {} elements, got {}", N, len),
                type_name::<Self>(),
            )
        })
    }
}

fn beanify_entries<K, V, C, M>(value: Value) -> Result<M>
where
    K: Beanify,
    V: Beanify,
    M: FromIterator<(K, V)>,
{
    match value {
        Value::Map(map) => map
            .into_iter()
            .map(|(k, v)| Ok((K::beanify(Value::String(k))?, beanify_value(v)?)))
            .collect(),
        _ => Err(Error::beanification("Expected a map", type_name::<C>())),
    }
}

impl<K, V, S> Beanify for HashMap<K, V, S>
where
    K: Beanify + Eq + Hash,
    V: Beanify,
    S: BuildHasher + Default,
{
    fn beanify(value: Value) -> Result<Self> {
        beanify_entries::<K, V, Self, Self>(value)
    }
}

impl<K: Beanify + Ord, V: Beanify> Beanify for BTreeMap<K, V> {
    fn beanify(value: Value) -> Result<Self> {
        beanify_entries::<K, V, Self, Self>(value)
    }
}

impl<K, V, S> Beanify for IndexMap<K, V, S>
where
    K: Beanify + Eq + Hash,
    V: Beanify,
    S: BuildHasher + Default,
{
    fn beanify(value: Value) -> Result<Self> {
        beanify_entries::<K, V, Self, Self>(value)
    }
}
