//! # beanson
//!
//! A lenient JSON codec paired with a mapper between typed objects ("beans") and a
//! small set of simple values.
//!
//! ## Overview
//!
//! Everything goes through one restricted value domain, [`Value`]: null,
//! booleans, numbers, strings, ordered lists and string-keyed mappings.
//!
//! ```text
//! typed object --simplify--> Value --encode--> text
//! text --decode--> Value --beanify--> typed object
//! ```
//!
//! - **Forgiving decoder**: bare words, single quotes, `;` and `=>` separators,
//!   trailing commas, hex and octal literals
//! - **Canonical encoder**: sorted keys, no whitespace, shortest number form
//! - **Explicit bean tables**: a type lists its constructors, getters and setters
//!   once, and the accessor naming conventions do the rest
//!
//! ## Quick Start
//!
//! ```rust
//! use beanson::{decode, encode, Value};
//!
//! let value = decode("{zzz: 12, 'x': 10, \"y\": 11,}").unwrap();
//! assert_eq!(encode(&value), r#"{"x":10,"y":11,"zzz":12}"#);
//!
//! let list = decode("[10,\"Foo\",45.4]").unwrap();
//! assert_eq!(list, Value::List(vec![Value::from(10), Value::from("Foo"), Value::from(45.4)]));
//! ```
//!
//! ### Beans
//!
//! ```rust
//! use beanson::{bean_mapping, from_str, to_string, Bean, BeanClass};
//!
//! struct Pair {
//!     foo: i32,
//!     bar: i32,
//! }
//!
//! impl Bean for Pair {
//!     fn class() -> BeanClass<Self> {
//!         BeanClass::new()
//!             .constructor(["foo", "bar"], |args| Ok(Pair { foo: args.next()?, bar: args.next()? }))
//!             .getter("getFoo", |p: &Pair| p.foo)
//!             .getter("getBar", |p: &Pair| p.bar)
//!     }
//! }
//!
//! bean_mapping!(Pair);
//!
//! let text = to_string(&Pair { foo: 42, bar: 6 });
//! assert_eq!(text, r#"{"bar":6,"foo":42}"#);
//!
//! let pair: Pair = from_str(&text).unwrap().unwrap();
//! assert_eq!((pair.foo, pair.bar), (42, 6));
//!
//! assert!(from_str::<Pair>(r#"{"foo":1}"#).is_err());
//! ```
//!
//! ### Types that already derive `Serialize`
//!
//! ```rust
//! use beanson::{encode, to_value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value = to_value(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(encode(&value), r#"{"x":1,"y":2}"#);
//! ```
//!
//! ## Errors
//!
//! Malformed text yields [`Error::Syntax`] and a value that does not fit its
//! target type yields [`Error::Beanification`]. Encoding a NaN or infinite float
//! panics, as does a bean table whose constructor is only partially annotated.

pub mod bean;
pub mod beanify;
pub mod de;
pub mod error;
mod introspect;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod simplify;
pub mod value;

pub use bean::{Arguments, Bean, BeanClass, InvokeResult, Param};
pub use beanify::Beanify;
pub use de::Tokenizer;
pub use error::{Error, Result};
pub use map::Map;
pub use options::{EncodeOptions, KeyOrder};
pub use ser::{Encoder, ValueSerializer};
pub use simplify::Simplify;
pub use value::{Number, Value};

use log::trace;
use serde::Serialize;
use std::fmt;
use std::io;

/// Encodes a value as canonical text.
///
/// # Examples
///
/// ```rust
/// use beanson::{encode, Value};
///
/// assert_eq!(encode(&Value::from(42.50)), "42.5");
/// assert_eq!(encode(&Value::from(42.0)), "42");
/// ```
///
/// # Panics
///
/// Panics if the value holds an infinite or NaN number.
#[must_use]
pub fn encode(value: &Value) -> String {
    encode_with_options(value, &EncodeOptions::default())
}

/// Encodes a value with custom options.
///
/// # Panics
///
/// Panics if the value holds an infinite or NaN number.
#[must_use]
pub fn encode_with_options(value: &Value, options: &EncodeOptions) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = Encoder::new(options).encode(value, &mut out);
    out
}

/// Appends the encoded value to `out`.
///
/// # Examples
///
/// ```rust
/// use beanson::{encode_to, Value};
///
/// let mut out = String::from("data=");
/// encode_to(&Value::from(vec![Value::Null]), &mut out).unwrap();
/// assert_eq!(out, "data=[null]");
/// ```
///
/// # Errors
///
/// Returns an error if the sink fails.
pub fn encode_to<W: fmt::Write + ?Sized>(value: &Value, out: &mut W) -> fmt::Result {
    Encoder::new(&EncodeOptions::default()).encode(value, out)
}

/// Writes the encoded value to an I/O stream.
///
/// # Errors
///
/// Returns an error if writing to the writer fails.
pub fn to_writer<W: io::Write>(mut writer: W, value: &Value) -> Result<()> {
    writer
        .write_all(encode(value).as_bytes())
        .map_err(|e| Error::io(&e.to_string()))
}

/// Decodes text into a value.
///
/// Only the first value of the input is read.
///
/// # Errors
///
/// Returns [`Error::Syntax`] when the text is empty or malformed.
pub fn decode(text: &str) -> Result<Value> {
    trace!("decoding {} bytes", text.len());
    Tokenizer::from_str(text).next_value()
}

/// Decodes a value from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use beanson::{from_reader, Value};
///
/// let value = from_reader("[true]".as_bytes()).unwrap();
/// assert_eq!(value, Value::List(vec![Value::Bool(true)]));
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the text is malformed.
pub fn from_reader<R: io::Read>(mut reader: R) -> Result<Value> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::io(&e.to_string()))?;
    decode(&text)
}

/// Reduces a typed value to a simple value.
#[must_use]
pub fn simplify<T: Simplify + ?Sized>(value: &T) -> Value {
    value.simplify()
}

/// Converts a simple value into a `T`.
///
/// A null value converts to `None` whatever the target type.
///
/// # Examples
///
/// ```rust
/// use beanson::{beanify, decode};
///
/// assert_eq!(beanify::<i32>(decode("null").unwrap()).unwrap(), None);
/// assert_eq!(beanify::<i32>(decode("7").unwrap()).unwrap(), Some(7));
/// ```
///
/// # Errors
///
/// Returns [`Error::Beanification`] if the value does not fit `T`.
pub fn beanify<T: Beanify>(value: Value) -> Result<Option<T>> {
    match value {
        Value::Null => Ok(None),
        value => T::beanify(value).map(Some),
    }
}

/// Simplifies and encodes a typed value.
///
/// # Panics
///
/// Panics if the value holds an infinite or NaN number.
#[must_use]
pub fn to_string<T: Simplify + ?Sized>(value: &T) -> String {
    encode(&value.simplify())
}

/// Decodes text and converts it into a `T`.
///
/// # Errors
///
/// Returns a syntax error for malformed text and a beanification error if the
/// value does not fit `T`.
pub fn from_str<T: Beanify>(text: &str) -> Result<Option<T>> {
    beanify(decode(text)?)
}

/// Converts any `T: Serialize` into a simple value.
///
/// # Errors
///
/// Returns an error for serde data shapes with no simple form (tuple and
/// struct enum variants).
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_decode_scenario() {
        let value = decode("[10,\"Foo\",45.4]").unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::Number(Number::I32(10)),
                Value::from("Foo"),
                Value::Number(Number::F64(45.4)),
            ])
        );
    }

    #[test]
    fn test_encode_sorted() {
        let value = crate::beanson!({ "zzz": 12, "x": 10, "y": 11 });
        assert_eq!(encode(&value), r#"{"x":10,"y":11,"zzz":12}"#);
    }

    #[test]
    fn test_large_exponent() {
        assert_eq!(decode("42e120").unwrap(), Value::Number(Number::F64(42e120)));
    }

    #[test]
    fn test_to_writer() {
        let mut out = Vec::new();
        to_writer(&mut out, &crate::beanson!(["a", 1])).unwrap();
        assert_eq!(out, br#"["a",1]"#);
    }

    #[test]
    fn test_from_reader_reports_io_errors() {
        let bytes: &[u8] = &[0xff, 0xfe];
        assert!(matches!(from_reader(bytes), Err(Error::Io(_))));
    }

    #[test]
    fn test_simplify_then_encode() {
        let mut source = HashMap::new();
        source.insert("b", vec![1.5, 2.0]);
        source.insert("a", vec![]);
        assert_eq!(to_string(&source), r#"{"a":[],"b":[1.5,2]}"#);
    }

    #[test]
    fn test_from_str_null() {
        assert_eq!(from_str::<Vec<i32>>("null").unwrap(), None);
        assert_eq!(from_str::<Vec<i32>>("[1,2]").unwrap(), Some(vec![1, 2]));
        assert!(from_str::<Vec<i32>>("[1,").unwrap_err().is_syntax());
        assert!(from_str::<Vec<i32>>("{}").unwrap_err().is_beanification());
    }
}
