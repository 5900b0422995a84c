//! Decoding of lenient JSON text into simple values.
//!
//! This module provides the [`Tokenizer`], a recursive-descent parser that turns a
//! stream of characters into a [`Value`] tree.
//!
//! ## Overview
//!
//! Strict JSON is accepted, together with a number of forgiving extensions:
//!
//! - **Single-quoted strings** and `\xXX` escapes
//! - **Bare words**: unquoted keys and values such as `{x: 10, name: Alice}`
//! - **Relaxed separators**: `;` next to `,`, `=` and `=>` next to `:`
//! - **Trailing separators**: `[1, 2,]` and `{a: 1;}`
//! - **Empty slots**: `[1,,3]` holds a null in the middle
//! - **Parenthesised arrays**: `(1, 2)`
//! - **Numeric literals**: hexadecimal `0x1F`, octal `017`, leading `+`
//!
//! Errors carry the character offset where the tokenizer gave up.
//!
//! ## Usage
//!
//! Most users should use [`decode`](crate::decode) in the crate root:
//!
//! ```rust
//! use beanson::{decode, Value};
//!
//! let value = decode("{x: 10; y: 0x0B}").unwrap();
//! let map = value.as_map().unwrap();
//! assert_eq!(map.get("x"), Some(&Value::from(10)));
//! assert_eq!(map.get("y"), Some(&Value::from(11)));
//! ```

use crate::{Error, Map, Result, Value};
use std::iter::Fuse;
use std::str::Chars;

/// Characters that end a bare word.
const DELIMITERS: &str = ",:]}/\\\"[{;=#";

/// The lenient JSON tokenizer.
///
/// Reads one character at a time from any `char` iterator and keeps a single
/// character of pushback. Created via [`Tokenizer::new`] or [`Tokenizer::from_str`].
pub struct Tokenizer<I: Iterator<Item = char>> {
    chars: Fuse<I>,
    index: usize,
    last: Option<char>,
    use_last: bool,
    paren_depth: usize,
}

impl<'a> Tokenizer<Chars<'a>> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Tokenizer::new(input.chars())
    }
}

impl<I: Iterator<Item = char>> Tokenizer<I> {
    pub fn new(chars: I) -> Self {
        Tokenizer {
            chars: chars.fuse(),
            index: 0,
            last: None,
            use_last: false,
            paren_depth: 0,
        }
    }

    /// The number of characters consumed so far.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Reads the next value from the input.
    ///
    /// Only one value is read; anything after it is left unconsumed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] if the input is empty or malformed.
    pub fn next_value(&mut self) -> Result<Value> {
        let c = match self.next_clean() {
            Some(c) => c,
            None => return Err(self.error("JSON is empty")),
        };
        match c {
            '"' | '\'' => self.next_string(c).map(Value::String),
            '{' => self.parse_object(),
            '[' => self.parse_array(']'),
            '(' => self.parse_array(')'),
            _ => {
                let word = self.accumulate_word(c);
                if word.is_empty() {
                    return Err(self.error("Missing value"));
                }
                self.parse_word(&word)
            }
        }
    }

    fn error(&self, msg: impl Into<String>) -> Error {
        Error::syntax(msg, self.index)
    }

    fn next(&mut self) -> Option<char> {
        if self.use_last {
            self.use_last = false;
            if self.last.is_some() {
                self.index += 1;
            }
            return self.last;
        }
        self.last = self.chars.next();
        if self.last.is_some() {
            self.index += 1;
        }
        self.last
    }

    /// Pushes the last character back so that the next read returns it again.
    ///
    /// # Panics
    ///
    /// Panics when called twice without a read in between, or before anything
    /// was read.
    fn back(&mut self) {
        if self.use_last || self.index == 0 {
            panic!("Stepping back two steps is not supported");
        }
        if self.last.is_some() {
            self.index -= 1;
        }
        self.use_last = true;
    }

    fn next_n(&mut self, n: usize) -> Result<String> {
        let mut out = String::with_capacity(n);
        for _ in 0..n {
            match self.next() {
                Some(c) => out.push(c),
                None => return Err(self.error("Unexpected end of JSON string")),
            }
        }
        Ok(out)
    }

    /// Reads the next character that is not whitespace.
    fn next_clean(&mut self) -> Option<char> {
        loop {
            match self.next() {
                Some(c) if c <= ' ' => continue,
                other => return other,
            }
        }
    }

    fn next_string(&mut self, quote: char) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.next() {
                None | Some('\n') | Some('\r') => return Err(self.error("Unterminated string")),
                Some('\\') => match self.next() {
                    Some('b') => out.push('\u{0008}'),
                    Some('t') => out.push('\t'),
                    Some('n') => out.push('\n'),
                    Some('f') => out.push('\u{000C}'),
                    Some('r') => out.push('\r'),
                    Some('u') => out.push(self.unicode_escape()?),
                    Some('x') => {
                        let code = self.hex_escape(2)?;
                        out.push(char::from(code as u8));
                    }
                    // \\, \", \' and anything else stand for themselves
                    Some(c) => out.push(c),
                    None => return Err(self.error("Unterminated string")),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, digits: usize) -> Result<u32> {
        let hex = self.next_n(digits)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.error(format!("Invalid escape sequence: {}", hex)));
        }
        u32::from_str_radix(&hex, 16)
            .map_err(|_| self.error(format!("Invalid escape sequence: {}", hex)))
    }

    /// Decodes the digits of a `\uXXXX` escape, joining a surrogate pair.
    fn unicode_escape(&mut self) -> Result<char> {
        let code = self.hex_escape(4)?;
        let code = match code {
            0xD800..=0xDBFF => {
                if self.next() != Some('\\') || self.next() != Some('u') {
                    return Err(self.error("Unpaired surrogate in unicode escape"));
                }
                let low = self.hex_escape(4)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(self.error("Unpaired surrogate in unicode escape"));
                }
                0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(self.error("Unpaired surrogate in unicode escape")),
            _ => code,
        };
        char::from_u32(code).ok_or_else(|| self.error("Invalid unicode code point"))
    }

    /// Parses the rest of an object; the opening `{` is already consumed.
    fn parse_object(&mut self) -> Result<Value> {
        let mut map = Map::new();
        loop {
            let key = match self.next_clean() {
                None => {
                    return Err(
                        self.error("Unexpected end of JSON: unterminated object, '}' expected")
                    )
                }
                Some('}') => return Ok(Value::Map(map)),
                Some(_) => {
                    self.back();
                    self.next_value()?.into_text()
                }
            };

            // The key is followed by ':', '=' or '=>'
            match self.next_clean() {
                Some(':') => {}
                Some('=') => {
                    if self.next() != Some('>') {
                        self.back();
                    }
                }
                _ => return Err(self.error("Expected a ':' after a key")),
            }
            let value = self.next_value()?;
            map.insert(key, value);

            match self.next_clean() {
                Some(',') | Some(';') => {
                    if self.next_clean() == Some('}') {
                        return Ok(Value::Map(map));
                    }
                    self.back();
                }
                Some('}') => return Ok(Value::Map(map)),
                _ => return Err(self.error("Expected a ',' or '}'")),
            }
        }
    }

    /// Parses the rest of an array closed by `close`; the opening bracket is
    /// already consumed.
    fn parse_array(&mut self, close: char) -> Result<Value> {
        let parenthesised = close == ')';
        if parenthesised {
            self.paren_depth += 1;
        }
        let result = self.parse_elements(close);
        if parenthesised {
            self.paren_depth -= 1;
        }
        result
    }

    fn parse_elements(&mut self, close: char) -> Result<Value> {
        let mut list = Vec::new();
        if self.next_clean() == Some(close) {
            return Ok(Value::List(list));
        }
        self.back();
        loop {
            match self.next_clean() {
                Some(',') | Some(';') => {
                    self.back();
                    list.push(Value::Null);
                }
                None => return Err(self.error("Unexpected end of JSON: unterminated array")),
                Some(_) => {
                    self.back();
                    list.push(self.next_value()?);
                }
            }

            match self.next_clean() {
                Some(',') | Some(';') => {
                    if self.next_clean() == Some(close) {
                        return Ok(Value::List(list));
                    }
                    self.back();
                }
                Some(c @ (']' | ')')) => {
                    if c != close {
                        return Err(self.error(format!("Expected a '{}'", close)));
                    }
                    return Ok(Value::List(list));
                }
                None => return Err(self.error("Unexpected end of JSON: unterminated array")),
                _ => return Err(self.error("Expected a ',' or ']'")),
            }
        }
    }

    fn is_word_char(&self, c: char) -> bool {
        c >= ' ' && !DELIMITERS.contains(c) && !(c == ')' && self.paren_depth > 0)
    }

    /// Collects a bare word starting with `first`, trimmed of surrounding whitespace.
    fn accumulate_word(&mut self, first: char) -> String {
        let mut word = String::new();
        let mut current = Some(first);
        while let Some(c) = current {
            if !self.is_word_char(c) {
                break;
            }
            word.push(c);
            current = self.next();
        }
        self.back();
        word.trim_matches(|c: char| c <= ' ').to_string()
    }

    /// Interprets a bare word as a keyword, a number or, failing both, a string.
    fn parse_word(&self, word: &str) -> Result<Value> {
        if word.eq_ignore_ascii_case("true") {
            return Ok(Value::Bool(true));
        }
        if word.eq_ignore_ascii_case("false") {
            return Ok(Value::Bool(false));
        }
        if word.eq_ignore_ascii_case("null") {
            return Ok(Value::Null);
        }

        let numeric = word
            .chars()
            .next()
            .map_or(false, |b| b.is_ascii_digit() || matches!(b, '.' | '-' | '+'));
        if !numeric {
            return Ok(Value::String(word.to_string()));
        }

        if let Some(hex) = word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
            if let Ok(i) = i32::from_str_radix(hex, 16) {
                return Ok(Value::from(i));
            }
            return i64::from_str_radix(hex, 16)
                .map(Value::from)
                .map_err(|_| self.error(format!("Unparsable hex integer: {}", word)));
        }
        if word.len() > 1 && word.starts_with('0') && word.bytes().all(|b| b.is_ascii_digit()) {
            return i32::from_str_radix(word, 8)
                .map(Value::from)
                .map_err(|_| self.error(format!("Unparsable oct integer: {}", word)));
        }

        if let Ok(i) = word.parse::<i32>() {
            return Ok(Value::from(i));
        }
        if let Ok(i) = word.parse::<i64>() {
            return Ok(Value::from(i));
        }
        match word.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Value::from(f)),
            _ => Ok(Value::String(word.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number;

    fn parse(input: &str) -> Result<Value> {
        Tokenizer::from_str(input).next_value()
    }

    fn syntax_message(input: &str) -> String {
        match parse(input) {
            Err(Error::Syntax { msg, .. }) => msg,
            other => panic!("expected a syntax error for {:?}, got {:?}", input, other),
        }
    }

    #[test]
    fn test_pushback_restores_character() {
        let mut tokenizer = Tokenizer::from_str("ab");
        assert_eq!(tokenizer.next(), Some('a'));
        assert_eq!(tokenizer.index(), 1);
        tokenizer.back();
        assert_eq!(tokenizer.index(), 0);
        assert_eq!(tokenizer.next(), Some('a'));
        assert_eq!(tokenizer.next(), Some('b'));
        assert_eq!(tokenizer.next(), None);
        assert_eq!(tokenizer.index(), 2);
    }

    #[test]
    fn test_pushback_at_end_of_input() {
        let mut tokenizer = Tokenizer::from_str("a");
        tokenizer.next();
        assert_eq!(tokenizer.next(), None);
        tokenizer.back();
        assert_eq!(tokenizer.next(), None);
        assert_eq!(tokenizer.index(), 1);
    }

    #[test]
    #[should_panic(expected = "Stepping back two steps is not supported")]
    fn test_double_pushback_panics() {
        let mut tokenizer = Tokenizer::from_str("abc");
        tokenizer.next();
        tokenizer.next();
        tokenizer.back();
        tokenizer.back();
    }

    #[test]
    #[should_panic(expected = "Stepping back two steps is not supported")]
    fn test_pushback_before_reading_panics() {
        Tokenizer::from_str("abc").back();
    }

    #[test]
    fn test_next_n_reports_end() {
        let mut tokenizer = Tokenizer::from_str("ab");
        assert_eq!(tokenizer.next_n(2).unwrap(), "ab");
        let mut tokenizer = Tokenizer::from_str("ab");
        assert!(tokenizer.next_n(3).is_err());
    }

    #[test]
    fn test_word_keywords_ignore_case() {
        assert_eq!(parse("TRUE").unwrap(), Value::Bool(true));
        assert_eq!(parse("False").unwrap(), Value::Bool(false));
        assert_eq!(parse("nuLL").unwrap(), Value::Null);
    }

    #[test]
    fn test_word_numbers() {
        assert_eq!(parse("42").unwrap(), Value::Number(Number::I32(42)));
        assert_eq!(parse("+7").unwrap(), Value::Number(Number::I32(7)));
        assert_eq!(parse("3000000000").unwrap(), Value::Number(Number::I64(3_000_000_000)));
        assert_eq!(parse("-.5").unwrap(), Value::Number(Number::F64(-0.5)));
        assert_eq!(parse("0").unwrap(), Value::Number(Number::I32(0)));
        assert_eq!(parse("0.25").unwrap(), Value::Number(Number::F64(0.25)));
    }

    #[test]
    fn test_word_hex_and_octal() {
        assert_eq!(parse("0x1F").unwrap(), Value::Number(Number::I32(31)));
        assert_eq!(parse("0XfF").unwrap(), Value::Number(Number::I32(255)));
        assert_eq!(parse("0x100000000").unwrap(), Value::Number(Number::I64(1 << 32)));
        assert_eq!(parse("017").unwrap(), Value::Number(Number::I32(15)));
        assert_eq!(syntax_message("0xZZ"), "Unparsable hex integer: 0xZZ");
        assert_eq!(syntax_message("09"), "Unparsable oct integer: 09");
    }

    #[test]
    fn test_word_falls_back_to_string() {
        assert_eq!(parse("hello world").unwrap(), Value::from("hello world"));
        assert_eq!(parse("-").unwrap(), Value::from("-"));
        assert_eq!(parse("1.2.3").unwrap(), Value::from("1.2.3"));
        assert_eq!(parse("-inf").unwrap(), Value::from("-inf"));
        assert_eq!(parse("1e999").unwrap(), Value::from("1e999"));
    }

    #[test]
    fn test_word_is_trimmed() {
        let value = parse("[ a b  , c ]").unwrap();
        assert_eq!(value, Value::List(vec![Value::from("a b"), Value::from("c")]));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            parse(r#""a\"b\\c\/d\te\n""#).unwrap(),
            Value::from("a\"b\\c/d\te\n")
        );
        assert_eq!(parse(r#""\b\f\r""#).unwrap(), Value::from("\u{0008}\u{000C}\r"));
        assert_eq!(parse(r#""A\x42\q""#).unwrap(), Value::from("ABq"));
        assert_eq!(parse("'it\\'s'").unwrap(), Value::from("it's"));
        assert_eq!(parse("'say \"hi\"'").unwrap(), Value::from("say \"hi\""));
    }

    #[test]
    fn test_surrogate_pairs() {
        assert_eq!(parse(r#""\ud83d\ude00""#).unwrap(), Value::from("\u{1F600}"));
        assert_eq!(
            syntax_message(r#""\ud83d!""#),
            "Unpaired surrogate in unicode escape"
        );
        assert_eq!(
            syntax_message(r#""\ude00""#),
            "Unpaired surrogate in unicode escape"
        );
    }

    #[test]
    fn test_bad_escapes() {
        assert_eq!(syntax_message(r#""\u12zz""#), "Invalid escape sequence: 12zz");
        assert_eq!(syntax_message(r#""\u12"#), "Unexpected end of JSON string");
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(syntax_message("\"abc"), "Unterminated string");
        assert_eq!(syntax_message("\"ab\ncd\""), "Unterminated string");
    }

    #[test]
    fn test_object_separators() {
        let expected = parse(r#"{"a":1,"b":2}"#).unwrap();
        assert_eq!(parse("{a=1;b=>2}").unwrap(), expected);
        assert_eq!(parse("{a:1,b:2,}").unwrap(), expected);
        assert_eq!(parse("{ a : 1 ; b : 2 ; }").unwrap(), expected);
    }

    #[test]
    fn test_object_keys_are_text() {
        let value = parse("{1: one, true: yes, null: nothing}").unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.get("1"), Some(&Value::from("one")));
        assert_eq!(map.get("true"), Some(&Value::from("yes")));
        assert_eq!(map.get("null"), Some(&Value::from("nothing")));
    }

    #[test]
    fn test_object_errors() {
        assert_eq!(
            syntax_message("{a:1"),
            "Expected a ',' or '}'"
        );
        assert_eq!(
            syntax_message("{a:1,"),
            "Unexpected end of JSON: unterminated object, '}' expected"
        );
        assert_eq!(syntax_message("{a 1}"), "Expected a ':' after a key");
        assert_eq!(syntax_message("{a:}"), "Missing value");
    }

    #[test]
    fn test_array_forms() {
        let expected = Value::List(vec![Value::from(1), Value::from(2)]);
        assert_eq!(parse("[1,2]").unwrap(), expected);
        assert_eq!(parse("[1;2;]").unwrap(), expected);
        assert_eq!(parse("(1, 2)").unwrap(), expected);
        assert_eq!(parse("(a)").unwrap(), Value::List(vec![Value::from("a")]));
        assert_eq!(parse("[]").unwrap(), Value::List(vec![]));
        assert_eq!(parse("( )").unwrap(), Value::List(vec![]));
    }

    #[test]
    fn test_array_empty_slots() {
        assert_eq!(
            parse("[1,,3]").unwrap(),
            Value::List(vec![Value::from(1), Value::Null, Value::from(3)])
        );
        assert_eq!(
            parse("[,1]").unwrap(),
            Value::List(vec![Value::Null, Value::from(1)])
        );
        assert_eq!(
            parse("[1;;2]").unwrap(),
            Value::List(vec![Value::from(1), Value::Null, Value::from(2)])
        );
    }

    #[test]
    fn test_array_errors() {
        assert_eq!(syntax_message("[1,'2')"), "Expected a ']'");
        assert_eq!(syntax_message("(1,2]"), "Expected a ')'");
        assert_eq!(syntax_message("[1 2}"), "Expected a ',' or ']'");
        assert_eq!(
            syntax_message("[1,2"),
            "Unexpected end of JSON: unterminated array"
        );
        assert_eq!(syntax_message("["), "Unexpected end of JSON: unterminated array");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(syntax_message(""), "JSON is empty");
        assert_eq!(syntax_message(" \n\t"), "JSON is empty");
        assert_eq!(syntax_message("}"), "Missing value");
    }

    #[test]
    fn test_error_offset() {
        let err = parse("[1, 2 }").unwrap_err();
        assert_eq!(err.offset(), Some(7));
    }

    #[test]
    fn test_reads_single_value() {
        let mut tokenizer = Tokenizer::from_str("[1] [2]");
        assert_eq!(tokenizer.next_value().unwrap(), Value::List(vec![Value::from(1)]));
        assert_eq!(tokenizer.next_value().unwrap(), Value::List(vec![Value::from(2)]));
        assert!(tokenizer.next_value().is_err());
    }
}
