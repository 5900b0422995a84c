//! Configuration options for encoding.
//!
//! - [`EncodeOptions`]: main configuration struct
//! - [`KeyOrder`]: how mapping entries are ordered in the output
//!
//! ## Examples
//!
//! ```rust
//! use beanson::{beanson, encode_with_options, EncodeOptions, KeyOrder};
//!
//! let value = beanson!({ "b": 1, "a": 2 });
//!
//! let options = EncodeOptions::new().with_key_order(KeyOrder::Insertion);
//! assert_eq!(encode_with_options(&value, &options), "{\"b\":1,\"a\":2}");
//! ```

/// Ordering of mapping entries in encoded output.
///
/// - **Sorted**: default, keys in ascending order of their UTF-16 code units, the
///   canonical form. Keys outside the basic multilingual plane sort before
///   U+E000..U+FFFF, unlike plain `str` ordering.
/// - **Insertion**: keys in the order the mapping received them
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyOrder {
    #[default]
    Sorted,
    Insertion,
}

/// Configuration options for the encoder.
///
/// # Examples
///
/// ```rust
/// use beanson::{EncodeOptions, KeyOrder};
///
/// let options = EncodeOptions::new();
/// assert_eq!(options.key_order, KeyOrder::Sorted);
/// assert!(options.escape_script_close);
/// ```
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    pub key_order: KeyOrder,
    /// Write `/` as `\/` when it directly follows `<`, so that `</script>` never
    /// appears verbatim inside an encoded string.
    pub escape_script_close: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            key_order: KeyOrder::default(),
            escape_script_close: true,
        }
    }
}

impl EncodeOptions {
    /// Creates the canonical options (sorted keys, `</` escaped).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ordering of mapping entries.
    #[must_use]
    pub fn with_key_order(mut self, key_order: KeyOrder) -> Self {
        self.key_order = key_order;
        self
    }

    /// Enables or disables escaping of `/` after `<`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beanson::{encode_with_options, EncodeOptions, Value};
    ///
    /// let value = Value::from("</b>");
    /// assert_eq!(encode_with_options(&value, &EncodeOptions::new()), r#""<\/b>""#);
    ///
    /// let options = EncodeOptions::new().with_escape_script_close(false);
    /// assert_eq!(encode_with_options(&value, &options), r#""</b>""#);
    /// ```
    #[must_use]
    pub fn with_escape_script_close(mut self, escape: bool) -> Self {
        self.escape_script_close = escape;
        self
    }
}
