//! The attribute map stored on every localized carrier.

use std::collections::{btree_map, BTreeMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix marking a key as private/internal.
pub const PRIVATE_MARKER: &str = "__";

/// Returns `true` if `key` is a private attribute key.
///
/// # Examples
///
/// ```
/// use request_locale::is_private;
///
/// assert!(is_private("__backend"));
/// assert!(!is_private("locale"));
/// assert!(!is_private("_locale"));
/// ```
pub fn is_private(key: impl AsRef<str>) -> bool {
    key.as_ref().starts_with(PRIVATE_MARKER)
}

/// Returns `true` if the key of a `(key, value)` pair is private.
pub fn is_private_entry<K: AsRef<str>, V>(entry: &(K, V)) -> bool {
    is_private(&entry.0)
}

/// Mapping from attribute key to an arbitrary JSON value.
///
/// Keys are unique. Iteration is ordered by key, which keeps `Debug`
/// output and error snapshots deterministic.
///
/// Keys starting with [`PRIVATE_MARKER`] are internal; everything else is
/// visible. [`Attrs::visible`], [`Attrs::internal`] and [`Attrs::split`]
/// expose that boundary without callers having to inspect key strings.
///
/// # Examples
///
/// ```
/// use request_locale::Attrs;
///
/// let attrs: Attrs = [("locale", "fr-CH"), ("__source", "query")].into_iter().collect();
///
/// assert_eq!(attrs.get_str("locale"), Some("fr-CH"));
/// assert_eq!(attrs.visible().count(), 1);
/// assert_eq!(attrs.internal().count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attrs(BTreeMap<String, Value>);

impl Attrs {
    /// Creates an empty attribute map.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the value under `key` if it is a non-empty string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over entries whose keys are not private.
    pub fn visible(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter().filter(|(k, _)| !is_private(k))
    }

    /// Iterates over entries whose keys are private.
    pub fn internal(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter().filter(|(k, _)| is_private(k))
    }

    /// Splits the map into `(internal, visible)` parts.
    pub fn split(self) -> (Attrs, Attrs) {
        let (internal, visible): (BTreeMap<_, _>, BTreeMap<_, _>) =
            self.0.into_iter().partition(|(k, _)| is_private(k));
        (Attrs(internal), Attrs(visible))
    }
}

impl From<BTreeMap<String, Value>> for Attrs {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Attrs> for BTreeMap<String, Value> {
    fn from(attrs: Attrs) -> Self {
        attrs.0
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attrs::new();
        attrs.extend(iter);
        attrs
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Attrs {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for Attrs {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Attrs {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
