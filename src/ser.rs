//! Encoding of simple values into canonical text.
//!
//! This module provides the [`Encoder`], which writes a [`Value`] to any
//! [`fmt::Write`] sink, and [`ValueSerializer`], a serde serializer that turns any
//! `T: Serialize` into a [`Value`].
//!
//! ## Canonical form
//!
//! - No whitespace between tokens
//! - Mapping keys sorted in ascending order (configurable, see [`KeyOrder`])
//! - Floats lose a trailing run of decimal zeros: `42.50` is written `42.5`,
//!   `42.0` is written `42`
//! - Strings always use double quotes; control characters, U+0080..U+009F and
//!   U+2000..U+20FF are written as `\uXXXX`
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use beanson::{beanson, encode};
//!
//! let value = beanson!({ "zzz": 12, "x": 10, "y": 11 });
//! assert_eq!(encode(&value), r#"{"x":10,"y":11,"zzz":12}"#);
//! ```

use crate::{EncodeOptions, Error, KeyOrder, Map, Number, Result, Value};
use serde::{ser, Serialize};
use std::fmt::{self, Write};

/// Writes simple values as text.
///
/// Created via [`Encoder::new`]. The encoder holds no state between calls.
pub struct Encoder<'o> {
    options: Option<&'o EncodeOptions>,
    reject_non_finite: bool,
}

const DEFAULT_OPTIONS: EncodeOptions = EncodeOptions {
    key_order: KeyOrder::Sorted,
    escape_script_close: true,
};

impl<'o> Encoder<'o> {
    pub fn new(options: &'o EncodeOptions) -> Self {
        Encoder {
            options: Some(options),
            reject_non_finite: true,
        }
    }

    /// An encoder for diagnostic output that writes non-finite floats instead of
    /// rejecting them.
    pub(crate) fn lenient() -> Encoder<'static> {
        Encoder {
            options: None,
            reject_non_finite: false,
        }
    }

    fn options(&self) -> &EncodeOptions {
        self.options.unwrap_or(&DEFAULT_OPTIONS)
    }

    /// Writes `value` to `out`.
    ///
    /// # Panics
    ///
    /// Panics if the value contains an infinite or NaN float: such numbers have no
    /// textual form, and passing one in is a bug in the caller.
    pub fn encode<W: Write + ?Sized>(&self, value: &Value, out: &mut W) -> fmt::Result {
        match value {
            Value::Null => out.write_str("null"),
            Value::Bool(b) => out.write_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.write_number(n, out),
            Value::String(s) => self.write_string(s, out),
            Value::List(list) => self.write_list(list, out),
            Value::Map(map) => self.write_map(map, out),
        }
    }

    fn write_number<W: Write + ?Sized>(&self, n: &Number, out: &mut W) -> fmt::Result {
        if n.is_finite() {
            return out.write_str(&format_number(n));
        }
        if self.reject_non_finite {
            if n.as_f64().is_nan() {
                panic!("NaN cannot be represented in JSON");
            }
            panic!("Infinite numbers cannot be represented in JSON");
        }
        write!(out, "{}", n)
    }

    fn write_string<W: Write + ?Sized>(&self, s: &str, out: &mut W) -> fmt::Result {
        let escape_slash = self.options().escape_script_close;
        out.write_char('"')?;
        let mut previous = '\0';
        for ch in s.chars() {
            match ch {
                '\\' | '"' => {
                    out.write_char('\\')?;
                    out.write_char(ch)?;
                }
                '/' => {
                    if escape_slash && previous == '<' {
                        out.write_char('\\')?;
                    }
                    out.write_char('/')?;
                }
                '\u{0008}' => out.write_str("\\b")?,
                '\t' => out.write_str("\\t")?,
                '\n' => out.write_str("\\n")?,
                '\u{000C}' => out.write_str("\\f")?,
                '\r' => out.write_str("\\r")?,
                c if needs_unicode_escape(c) => write!(out, "\\u{:04x}", c as u32)?,
                c => out.write_char(c)?,
            }
            previous = ch;
        }
        out.write_char('"')
    }

    fn write_list<W: Write + ?Sized>(&self, list: &[Value], out: &mut W) -> fmt::Result {
        out.write_char('[')?;
        for (i, element) in list.iter().enumerate() {
            if i > 0 {
                out.write_char(',')?;
            }
            self.encode(element, out)?;
        }
        out.write_char(']')
    }

    fn write_map<W: Write + ?Sized>(&self, map: &Map, out: &mut W) -> fmt::Result {
        let entries: Vec<(&String, &Value)> = match self.options().key_order {
            KeyOrder::Sorted => map.sorted_entries(),
            KeyOrder::Insertion => map.iter().collect(),
        };
        out.write_char('{')?;
        for (i, (key, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                out.write_char(',')?;
            }
            self.write_string(key, out)?;
            out.write_char(':')?;
            self.encode(value, out)?;
        }
        out.write_char('}')
    }
}

#[inline]
fn needs_unicode_escape(c: char) -> bool {
    c < ' ' || ('\u{0080}'..'\u{00A0}').contains(&c) || ('\u{2000}'..'\u{2100}').contains(&c)
}

/// Renders a finite number in its shortest natural form, then chops a trailing
/// run of decimal zeros.
pub(crate) fn format_number(n: &Number) -> String {
    match *n {
        Number::I32(v) => v.to_string(),
        Number::I64(v) => v.to_string(),
        Number::F32(v) => {
            let magnitude = f64::from(v.abs());
            if uses_exponent(magnitude) {
                format!("{:e}", v)
            } else {
                chop_trailing_decimal_zeros(v.to_string())
            }
        }
        Number::F64(v) => {
            if uses_exponent(v.abs()) {
                format!("{:e}", v)
            } else {
                chop_trailing_decimal_zeros(v.to_string())
            }
        }
    }
}

#[inline]
fn uses_exponent(magnitude: f64) -> bool {
    magnitude != 0.0 && !(1e-3..1e7).contains(&magnitude)
}

fn chop_trailing_decimal_zeros(mut s: String) -> String {
    let has_point = s.find('.').map_or(false, |i| i > 0);
    if has_point && !s.contains(['e', 'E']) {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

/// A serde serializer producing a [`Value`].
///
/// Structs become mappings keyed by field name, sequences and tuples become
/// lists, unit variants become strings. Mapping keys are converted to their
/// natural text.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeMap {
    map: Map,
    current_key: Option<String>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = ser::Impossible<Value, Error>;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = ser::Impossible<Value, Error>;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        match i64::try_from(v) {
            Ok(v) => Ok(Value::from(v)),
            Err(_) => Ok(Value::from(v as f64)),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::List(v.iter().map(|&b| Value::from(b)).collect()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut map = Map::with_capacity(1);
        map.insert(variant.to_string(), to_value(value)?);
        Ok(Value::Map(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_type("tuple variants"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_type("struct variants"))
    }
}

impl SerializeVec {
    fn with_capacity(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }
}

impl SerializeMap {
    fn new() -> Self {
        SerializeMap {
            map: Map::new(),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::List(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.current_key = Some(to_value(key)?.into_text());
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.map))
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}
