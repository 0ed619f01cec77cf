//! The request carrier abstraction.
//!
//! A carrier threads per-request (or per-navigation) state through the
//! pipeline. Two variants exist: [`Conn`](crate::Conn) for plain requests
//! and [`Socket`](crate::Socket) for live-session sockets. Both expose the
//! same minimal surface so the store, extractors and resolver never need to
//! know which one they are working with.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::attrs::Attrs;
use crate::session::SessionMap;

/// Decoded string parameters (path, query, body, cookies).
pub type Params = BTreeMap<String, String>;

/// User-visible values available to downstream handlers and templates.
pub type Assigns = BTreeMap<String, Value>;

/// The carrier's private area.
///
/// Holds arbitrary sibling entries owned by other components, plus the
/// locale attribute slot. The slot starts uninitialized; initializing it is
/// idempotent and never touches sibling entries.
///
/// # Examples
///
/// ```
/// use request_locale::Private;
///
/// let mut private = Private::default();
/// private.insert("csrf_token", "abc");
/// assert!(private.attrs().is_none());
///
/// private.attrs_mut().insert("locale", "fr");
/// private.attrs_mut().insert("region", "CH");
///
/// assert_eq!(private.attrs().map(|a| a.len()), Some(2));
/// assert_eq!(private.get("csrf_token").and_then(|v| v.as_str()), Some("abc"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Private {
    entries: BTreeMap<String, Value>,
    attrs: Option<Attrs>,
}

impl Private {
    /// Returns a sibling entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Sets a sibling entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the attribute slot, if initialized.
    pub fn attrs(&self) -> Option<&Attrs> {
        self.attrs.as_ref()
    }

    /// Returns the attribute slot, initializing it first if needed.
    pub fn attrs_mut(&mut self) -> &mut Attrs {
        self.attrs.get_or_insert_with(Attrs::new)
    }

    /// Replaces the whole attribute slot.
    pub fn replace_attrs(&mut self, attrs: Attrs) {
        self.attrs = Some(attrs);
    }
}

/// A request-scoped carrier of locale state.
///
/// Implementors expose read access to every source the extractors consult
/// and write access to the private area, the assigns and, when the variant
/// supports it, the session.
///
/// Sources a variant cannot provide have default implementations that
/// return nothing, so extractors for them resolve to absent.
///
/// # Examples
///
/// ```
/// use request_locale::{Carrier, Conn};
///
/// let mut conn = Conn::new("req-1");
/// conn.add_header("Accept-Language", "de-CH");
/// conn.add_query_param("locale", "fr");
///
/// assert_eq!(conn.header("accept-language"), Some("de-CH"));
/// assert_eq!(conn.query_params().get("locale").map(String::as_str), Some("fr"));
/// ```
pub trait Carrier: Clone {
    /// Identifier used to correlate log events.
    fn request_id(&self) -> &str;

    /// Parameters captured by routing.
    fn path_params(&self) -> &Params;

    /// Decoded query-string parameters.
    fn query_params(&self) -> &Params;

    /// Decoded body parameters.
    fn body_params(&self) -> Option<&Params> {
        None
    }

    /// Request cookies.
    fn cookies(&self) -> Option<&Params> {
        None
    }

    /// Request headers in arrival order.
    fn headers(&self) -> &[(String, String)] {
        &[]
    }

    /// Request host, without port.
    fn host(&self) -> Option<&str>;

    /// User-visible assigns.
    fn assigns(&self) -> &Assigns;

    /// Mutable access to the user-visible assigns.
    fn assigns_mut(&mut self) -> &mut Assigns;

    /// The private area.
    fn private(&self) -> &Private;

    /// Mutable access to the private area.
    fn private_mut(&mut self) -> &mut Private;

    /// Reads a top-level session value without loading the session for writing.
    fn session_value(&self, key: &str) -> Option<Value>;

    /// Returns the writable session, loading it on demand.
    ///
    /// Variants without a writable session return `None`.
    fn session_mut(&mut self) -> Option<&mut SessionMap> {
        None
    }

    /// Returns the first header named `name`, compared case-insensitively.
    fn header(&self, name: &str) -> Option<&str> {
        self.headers()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
