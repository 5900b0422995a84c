//! Reduction of typed values to simple values.
//!
//! [`Simplify`] is implemented for scalars, strings, date/times, sequences,
//! sets and maps. Bean types get an implementation through
//! [`bean_mapping!`](crate::bean_mapping), which walks the type's readable
//! properties.
//!
//! Mapping keys are converted to their natural text and mapping values are
//! simplified recursively, like sequence elements.

use crate::{Map, Number, Value};
use chrono::{DateTime, TimeZone};
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// Conversion of a typed value into a [`Value`] tree.
///
/// # Examples
///
/// ```rust
/// use beanson::{encode, Simplify};
/// use std::collections::BTreeMap;
///
/// let mut scores = BTreeMap::new();
/// scores.insert(2, vec!['a', 'b']);
/// scores.insert(1, vec![]);
///
/// assert_eq!(encode(&scores.simplify()), r#"{"1":[],"2":["a","b"]}"#);
/// ```
pub trait Simplify {
    fn simplify(&self) -> Value;
}

impl Simplify for Value {
    fn simplify(&self) -> Value {
        self.clone()
    }
}

impl Simplify for Map {
    fn simplify(&self) -> Value {
        Value::Map(self.clone())
    }
}

impl Simplify for Number {
    fn simplify(&self) -> Value {
        Value::Number(*self)
    }
}

impl Simplify for bool {
    fn simplify(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! simplify_via_from {
    ($($t:ty),*) => {
        $(
            impl Simplify for $t {
                fn simplify(&self) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

simplify_via_from!(i8, i16, i32, i64, u8, u16, u32, f32, f64, char);

macro_rules! simplify_wide_int {
    ($($t:ty),*) => {
        $(
            impl Simplify for $t {
                fn simplify(&self) -> Value {
                    match i64::try_from(*self) {
                        Ok(v) => Value::from(v),
                        Err(_) => Value::from(*self as f64),
                    }
                }
            }
        )*
    };
}

simplify_wide_int!(u64, usize, isize, i128, u128);

impl Simplify for str {
    fn simplify(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl Simplify for String {
    fn simplify(&self) -> Value {
        Value::String(self.clone())
    }
}

impl Simplify for () {
    fn simplify(&self) -> Value {
        Value::Null
    }
}

/// Date/times become their epoch milliseconds.
impl<Tz: TimeZone> Simplify for DateTime<Tz> {
    fn simplify(&self) -> Value {
        Value::from(self.timestamp_millis())
    }
}

impl<T: Simplify + ?Sized> Simplify for &T {
    fn simplify(&self) -> Value {
        (**self).simplify()
    }
}

impl<T: Simplify + ?Sized> Simplify for Box<T> {
    fn simplify(&self) -> Value {
        (**self).simplify()
    }
}

impl<T: Simplify + ?Sized> Simplify for Rc<T> {
    fn simplify(&self) -> Value {
        (**self).simplify()
    }
}

impl<T: Simplify + ?Sized> Simplify for Arc<T> {
    fn simplify(&self) -> Value {
        (**self).simplify()
    }
}

impl<T: Simplify> Simplify for Option<T> {
    fn simplify(&self) -> Value {
        match self {
            Some(value) => value.simplify(),
            None => Value::Null,
        }
    }
}

fn simplify_elements<'a, T, I>(elements: I) -> Value
where
    T: Simplify + 'a,
    I: IntoIterator<Item = &'a T>,
{
    Value::List(elements.into_iter().map(Simplify::simplify).collect())
}

fn simplify_entries<'a, K, V, I>(entries: I) -> Value
where
    K: Simplify + 'a,
    V: Simplify + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (k.simplify().into_text(), v.simplify()))
            .collect(),
    )
}

impl<T: Simplify> Simplify for [T] {
    fn simplify(&self) -> Value {
        simplify_elements(self)
    }
}

impl<T: Simplify, const N: usize> Simplify for [T; N] {
    fn simplify(&self) -> Value {
        simplify_elements(self)
    }
}

impl<T: Simplify> Simplify for Vec<T> {
    fn simplify(&self) -> Value {
        simplify_elements(self)
    }
}

impl<T: Simplify> Simplify for VecDeque<T> {
    fn simplify(&self) -> Value {
        simplify_elements(self)
    }
}

impl<T: Simplify, S> Simplify for HashSet<T, S> {
    fn simplify(&self) -> Value {
        simplify_elements(self)
    }
}

impl<T: Simplify> Simplify for BTreeSet<T> {
    fn simplify(&self) -> Value {
        simplify_elements(self)
    }
}

impl<K: Simplify, V: Simplify, S> Simplify for HashMap<K, V, S> {
    fn simplify(&self) -> Value {
        simplify_entries(self)
    }
}

impl<K: Simplify, V: Simplify> Simplify for BTreeMap<K, V> {
    fn simplify(&self) -> Value {
        simplify_entries(self)
    }
}

impl<K: Simplify, V: Simplify, S> Simplify for IndexMap<K, V, S> {
    fn simplify(&self) -> Value {
        simplify_entries(self)
    }
}
