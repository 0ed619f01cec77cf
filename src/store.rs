//! Attribute store operations on a carrier's private attribute slot.
//!
//! Readers borrow the carrier; mutators take it by value and return the
//! updated carrier, so a carrier can be threaded through a pipeline without
//! shared mutable state. Every mutator initializes the slot on first use.
//!
//! # Examples
//!
//! ```
//! use request_locale::{store, Conn};
//!
//! let conn = Conn::new("req-1");
//! assert!(store::get(&conn).is_empty());
//!
//! let conn = store::put(conn, "region", "CH");
//! let conn = store::merge(conn, [("locale", "de-CH"), ("language", "de")]);
//!
//! assert_eq!(store::get_key(&conn, "region").and_then(|v| v.as_str()), Some("CH"));
//! assert_eq!(store::get(&conn).len(), 3);
//! ```

use serde_json::Value;

use crate::attrs::Attrs;
use crate::carrier::Carrier;
use crate::error::{Error, MissingAttribute};

static EMPTY: Attrs = Attrs::new();

/// Returns the full attribute map, or an empty map if the carrier has not
/// been localized yet.
pub fn get<C: Carrier>(carrier: &C) -> &Attrs {
    carrier.private().attrs().unwrap_or(&EMPTY)
}

/// Returns the value stored under `key`.
pub fn get_key<'a, C: Carrier>(carrier: &'a C, key: &str) -> Option<&'a Value> {
    get(carrier).get(key)
}

/// Returns the value stored under `key`, or `default` when absent.
///
/// Pass `Value::Null` for the conventional "nil" default.
pub fn get_or<C: Carrier>(carrier: &C, key: &str, default: Value) -> Value {
    get_key(carrier, key).cloned().unwrap_or(default)
}

/// Returns the value stored under `key`, failing if it is absent.
///
/// Use this only where earlier resolution guarantees the key exists; a
/// missing key indicates a pipeline or configuration mistake.
///
/// # Errors
///
/// Returns [`Error::MissingAttribute`] carrying `key` and a snapshot of the
/// current attributes.
///
/// # Examples
///
/// ```
/// use request_locale::{store, Conn, Error};
///
/// let conn = store::put(Conn::new("req-1"), "locale", "fr");
/// assert_eq!(store::fetch(&conn, "locale").unwrap(), "fr");
///
/// let Err(Error::MissingAttribute(err)) = store::fetch(&conn, "region") else {
///     panic!("region should be missing");
/// };
/// assert_eq!(err.key(), "region");
/// assert!(err.attrs().unwrap().contains_key("locale"));
/// ```
pub fn fetch<'a, C: Carrier>(carrier: &'a C, key: &str) -> Result<&'a Value, Error> {
    let attrs = get(carrier);
    attrs
        .get(key)
        .ok_or_else(|| MissingAttribute::new(key, attrs.clone()).into())
}

/// Like [`fetch`], but the error carries `message` instead of a snapshot.
///
/// # Errors
///
/// Returns [`Error::MissingAttribute`] carrying `key` and `message`.
pub fn fetch_with<'a, C: Carrier>(
    carrier: &'a C,
    key: &str,
    message: impl Into<String>,
) -> Result<&'a Value, Error> {
    get(carrier)
        .get(key)
        .ok_or_else(|| MissingAttribute::with_message(key, message).into())
}

/// Replaces the whole attribute map.
pub fn put_all<C: Carrier>(mut carrier: C, attrs: Attrs) -> C {
    carrier.private_mut().replace_attrs(attrs);
    carrier
}

/// Sets a single attribute, preserving the others.
pub fn put<C: Carrier>(mut carrier: C, key: impl Into<String>, value: impl Into<Value>) -> C {
    carrier.private_mut().attrs_mut().insert(key, value);
    carrier
}

/// Puts every pair in order; later pairs win when keys repeat.
///
/// Accepts any iterator of pairs, so a `Vec` of tuples, an [`Attrs`] or a
/// `BTreeMap` produce the same result for the same entries.
pub fn merge<C, I, K, V>(mut carrier: C, pairs: I) -> C
where
    C: Carrier,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    carrier.private_mut().attrs_mut().extend(pairs);
    carrier
}

/// Replaces the whole map with the pairs returned by `f`.
///
/// `f` receives the current map and may return any pair iterator, which
/// makes bulk filtering and transformation straightforward.
///
/// # Examples
///
/// ```
/// use request_locale::{is_private, store, Conn};
///
/// let conn = store::merge(Conn::new("req-1"), [("locale", "en"), ("__probe", "x")]);
/// let conn = store::update_all(conn, |attrs| attrs.into_iter().filter(|(k, _)| !is_private(k)));
///
/// assert_eq!(store::get(&conn).len(), 1);
/// ```
pub fn update_all<C, F, I, K, V>(mut carrier: C, f: F) -> C
where
    C: Carrier,
    F: FnOnce(Attrs) -> I,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let current = carrier.private_mut().attrs_mut().clone();
    let next: Attrs = f(current).into_iter().collect();
    carrier.private_mut().replace_attrs(next);
    carrier
}

/// Replaces the value under `key` with `f(current)`.
///
/// `f` receives `Value::Null` when the key is absent.
pub fn update<C, F, V>(mut carrier: C, key: &str, f: F) -> C
where
    C: Carrier,
    F: FnOnce(Value) -> V,
    V: Into<Value>,
{
    let attrs = carrier.private_mut().attrs_mut();
    let current = attrs.remove(key).unwrap_or(Value::Null);
    attrs.insert(key, f(current));
    carrier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::is_private;
    use crate::conn::Conn;
    use crate::socket::Socket;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn get_on_unlocalized_carrier_is_empty() {
        let conn = Conn::new("req-1");
        assert!(get(&conn).is_empty());
        assert!(conn.private().attrs().is_none());
    }

    #[test]
    fn put_then_get_preserves_other_keys() {
        let conn = put(Conn::new("req-1"), "locale", "de");
        let conn = put(conn, "region", "CH");

        assert_eq!(get_key(&conn, "region"), Some(&json!("CH")));
        assert_eq!(get_key(&conn, "locale"), Some(&json!("de")));
    }

    #[test]
    fn get_or_returns_default_when_absent() {
        let conn = Conn::new("req-1");
        assert_eq!(get_or(&conn, "locale", Value::Null), Value::Null);
        assert_eq!(get_or(&conn, "locale", json!("en")), json!("en"));
    }

    #[test]
    fn put_keeps_private_siblings() {
        let mut conn = Conn::new("req-1");
        conn.private_mut().insert("csrf_token", "t0k3n");

        let conn = put(conn, "locale", "fr");

        assert_eq!(conn.private().get("csrf_token"), Some(&json!("t0k3n")));
    }

    #[test]
    fn put_all_replaces_everything() {
        let conn = merge(Conn::new("req-1"), [("locale", "fr"), ("region", "FR")]);
        let conn = put_all(conn, [("language", "fr")].into_iter().collect());

        assert_eq!(get(&conn).len(), 1);
        assert!(get_key(&conn, "region").is_none());
    }

    #[test]
    fn merge_list_and_map_agree() {
        let pairs = vec![("locale", "it-CH"), ("region", "CH")];
        let map: BTreeMap<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect();

        let from_list = merge(Conn::new("req-1"), pairs);
        let from_map = merge(Conn::new("req-1"), map);

        assert_eq!(get(&from_list), get(&from_map));
    }

    #[test]
    fn merge_later_pairs_win() {
        let conn = merge(Conn::new("req-1"), [("locale", "en"), ("locale", "cy")]);
        assert_eq!(get_key(&conn, "locale"), Some(&json!("cy")));
    }

    #[test]
    fn fetch_reports_missing_key_with_snapshot() {
        let conn = put(Conn::new("req-1"), "locale", "sv");

        let err = fetch(&conn, "region").unwrap_err();
        let Error::MissingAttribute(missing) = err;
        assert_eq!(missing.key(), "region");
        assert_eq!(missing.attrs().and_then(|a| a.get_str("locale")), Some("sv"));
    }

    #[test]
    fn fetch_with_surfaces_custom_message() {
        let conn = Conn::new("req-1");

        let err = fetch_with(&conn, "locale", "locale plug must run first").unwrap_err();
        assert_eq!(err.to_string(), "locale plug must run first");
    }

    #[test]
    fn update_all_can_filter() {
        let conn = merge(
            Conn::new("req-1"),
            [("locale", "en"), ("__internal", "x"), ("region", "GB")],
        );

        let conn = update_all(conn, |attrs| {
            attrs.into_iter().filter(|(k, _)| !is_private(k))
        });

        assert_eq!(get(&conn).len(), 2);
        assert!(get_key(&conn, "__internal").is_none());
    }

    #[test]
    fn update_transforms_a_single_value() {
        let conn = put(Conn::new("req-1"), "region", "ch");
        let conn = update(conn, "region", |v| {
            v.as_str().map(str::to_uppercase).unwrap_or_default()
        });

        assert_eq!(get_key(&conn, "region"), Some(&json!("CH")));
    }

    #[test]
    fn update_sees_null_for_missing_key() {
        let conn = update(Conn::new("req-1"), "counter", |v| {
            v.as_i64().unwrap_or(0) + 1
        });
        assert_eq!(get_key(&conn, "counter"), Some(&json!(1)));
    }

    #[test]
    fn store_works_on_sockets() {
        let socket = Socket::mount("sock-1", Default::default());
        let socket = put(socket, "locale", "ja");
        assert_eq!(fetch(&socket, "locale").unwrap(), &json!("ja"));
    }
}
