//! Insertion-ordered mapping type for [`Value::Map`](crate::Value::Map).
//!
//! [`Map`] wraps an [`IndexMap`] so that a mapping remembers the order its entries
//! were inserted in. The encoder sorts keys by default, but when it is configured
//! with [`KeyOrder::Insertion`](crate::KeyOrder::Insertion) this order is what gets
//! written, so output never depends on hash iteration order.
//!
//! Equality ignores order: two maps are equal when they hold the same entries.
//!
//! ## Examples
//!
//! ```rust
//! use beanson::{Map, Value};
//!
//! let mut map = Map::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;

/// An insertion-ordered map of string keys to values.
#[derive(Debug, Clone, PartialEq)]
pub struct Map(IndexMap<String, crate::Value>);

impl Map {
    /// Creates an empty `Map`.
    #[must_use]
    pub fn new() -> Self {
        Map(IndexMap::new())
    }

    /// Creates an empty `Map` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Map(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned and the
    /// entry keeps its original position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beanson::{Map, Value};
    ///
    /// let mut map = Map::new();
    /// assert!(map.insert("key".to_string(), Value::from(42)).is_none());
    /// assert!(map.insert("key".to_string(), Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.0.get(key)
    }

    /// Returns `true` if the map holds an entry for the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes the entry for the key and returns its value.
    ///
    /// The relative order of the remaining entries is preserved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use beanson::{Map, Value};
    ///
    /// let mut map = Map::new();
    /// map.insert("a".to_string(), Value::from(1));
    /// map.insert("b".to_string(), Value::from(2));
    /// map.insert("c".to_string(), Value::from(3));
    ///
    /// assert_eq!(map.remove("a"), Some(Value::from(1)));
    /// let keys: Vec<_> = map.keys().cloned().collect();
    /// assert_eq!(keys, vec!["b", "c"]);
    /// ```
    pub fn remove(&mut self, key: &str) -> Option<crate::Value> {
        self.0.shift_remove(key)
    }

    /// Returns the number of elements in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, crate::Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::Value> {
        self.0.iter()
    }

    /// Returns the entries sorted by the UTF-16 code units of their keys.
    pub(crate) fn sorted_entries(&self) -> Vec<(&String, &crate::Value)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by(|a, b| a.0.encode_utf16().cmp(b.0.encode_utf16()));
        entries
    }
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

impl From<HashMap<String, crate::Value>> for Map {
    fn from(map: HashMap<String, crate::Value>) -> Self {
        Map(map.into_iter().collect())
    }
}

impl From<Map> for HashMap<String, crate::Value> {
    fn from(map: Map) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for Map {
    type Item = (String, crate::Value);
    type IntoIter = indexmap::map::IntoIter<String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a String, &'a crate::Value);
    type IntoIter = indexmap::map::Iter<'a, String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, crate::Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        Map(IndexMap::from_iter(iter))
    }
}
