//! Session storage and the bridge that persists resolved attributes into it.
//!
//! The session holds resolved fields under a single reserved key whose value
//! is an object with up to three string fields:
//!
//! ```text
//! session["locale_attrs"] = { "locale": "fr-CH", "language": "fr", "region": "CH" }
//! ```
//!
//! Absent fields mean "not resolved yet"; they are never written as `null`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::carrier::Carrier;
use crate::logging::ResolutionLog;
use crate::resolver::Resolved;

/// Default top-level session key for persisted attributes.
pub const DEFAULT_SESSION_KEY: &str = "locale_attrs";

/// Decoded session contents.
pub type SessionMap = BTreeMap<String, Value>;

/// Backing storage for sessions, keyed by session id.
///
/// Implementations are supplied by the embedding application (cookie
/// store, database, cache). [`MemorySessionStore`] is provided for tests
/// and demos.
pub trait SessionStore: fmt::Debug + Send + Sync {
    /// Loads the session for `id`, or an empty map if none exists.
    fn load(&self, id: &str) -> SessionMap;

    /// Saves the session for `id`, replacing what was stored.
    fn save(&self, id: &str, data: SessionMap);
}

/// In-memory session store.
///
/// # Examples
///
/// ```
/// use request_locale::{MemorySessionStore, SessionStore, SessionMap};
///
/// let store = MemorySessionStore::new();
/// assert!(store.load("sid-1").is_empty());
///
/// let mut data = SessionMap::new();
/// data.insert("user".to_string(), "alice".into());
/// store.save("sid-1", data);
///
/// assert_eq!(store.load("sid-1").len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, SessionMap>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Returns `true` if no sessions have been saved.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, id: &str) -> SessionMap {
        self.sessions.lock().get(id).cloned().unwrap_or_default()
    }

    fn save(&self, id: &str, data: SessionMap) {
        self.sessions.lock().insert(id.to_string(), data);
    }
}

/// A request's view of its session.
///
/// The session starts unfetched. The first read on an unfetched session
/// loads a snapshot from the store and later reads reuse it;
/// [`Session::fetch`] turns that snapshot (or a fresh load) into the
/// modifiable session, and [`Session::commit`] writes a fetched session back.
/// The store is loaded at most once per request.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    store: Option<Arc<dyn SessionStore>>,
    data: Option<SessionMap>,
    peeked: OnceLock<SessionMap>,
}

impl Session {
    /// Creates an unfetched session backed by `store`.
    pub fn new(id: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            id: id.into(),
            store: Some(store),
            data: None,
            peeked: OnceLock::new(),
        }
    }

    /// Creates an already-fetched session with no backing store.
    pub fn detached(data: SessionMap) -> Self {
        Self {
            id: String::new(),
            store: None,
            data: Some(data),
            peeked: OnceLock::new(),
        }
    }

    /// Returns the session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns `true` once the session has been loaded.
    pub fn is_fetched(&self) -> bool {
        self.data.is_some()
    }

    /// Reads the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        let data = match &self.data {
            Some(data) => data,
            None => {
                let store = self.store.as_ref()?;
                self.peeked.get_or_init(|| store.load(&self.id))
            }
        };
        data.get(key).cloned()
    }

    /// Loads the session if needed and returns its contents for modification.
    pub fn fetch(&mut self) -> &mut SessionMap {
        let (id, store, peeked) = (&self.id, &self.store, &mut self.peeked);
        self.data.get_or_insert_with(|| {
            peeked.take().unwrap_or_else(|| match store {
                Some(store) => store.load(id),
                None => SessionMap::new(),
            })
        })
    }

    /// Writes a fetched session back to its store.
    ///
    /// Unfetched sessions and detached sessions are left alone.
    pub fn commit(&self) {
        if let (Some(data), Some(store)) = (&self.data, &self.store) {
            store.save(&self.id, data.clone());
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::detached(SessionMap::new())
    }
}

/// Persists resolved fields into the carrier's session under `session_key`.
///
/// Fields are merged into whatever object is already stored under the key.
/// When nothing was resolved the session is not touched, and not loaded.
/// Carriers without a writable session are returned unchanged.
///
/// # Examples
///
/// ```
/// use request_locale::{session, Conn, Field, Resolved};
///
/// let mut resolved = Resolved::default();
/// resolved.set(Field::Locale, "nl");
///
/// let conn = session::persist(Conn::new("req-1"), "locale_attrs", &resolved);
/// let stored = conn.session().get("locale_attrs").unwrap();
/// assert_eq!(stored["locale"], "nl");
/// ```
pub fn persist<C: Carrier>(mut carrier: C, session_key: &str, resolved: &Resolved) -> C {
    if resolved.is_empty() {
        return carrier;
    }
    let request_id = carrier.request_id().to_string();
    let log = ResolutionLog::new(&request_id);
    let Some(data) = carrier.session_mut() else {
        log.session_unavailable();
        return carrier;
    };

    let entry = data
        .entry(session_key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    if let Value::Object(fields) = entry {
        for (field, value) in resolved.iter() {
            fields.insert(field.as_str().to_string(), Value::from(value));
        }
    }
    log.session_written(session_key, resolved.len());
    carrier
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::attrs::Attrs;
    use crate::config::{Config, Field, FieldConfig};
    use crate::conn::Conn;
    use crate::resolver::resolve;
    use crate::source::Source;
    use serde_json::json;

    fn resolved(pairs: &[(Field, &str)]) -> Resolved {
        let mut r = Resolved::default();
        for (field, value) in pairs {
            r.set(*field, *value);
        }
        r
    }

    #[derive(Debug, Default)]
    struct CountingStore {
        inner: MemorySessionStore,
        loads: AtomicUsize,
    }

    impl SessionStore for CountingStore {
        fn load(&self, id: &str) -> SessionMap {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.inner.load(id)
        }

        fn save(&self, id: &str, data: SessionMap) {
            self.inner.save(id, data);
        }
    }

    #[test]
    fn unfetched_session_reads_through_to_store() {
        let store = Arc::new(MemorySessionStore::new());
        let mut data = SessionMap::new();
        data.insert("k".to_string(), json!("v"));
        store.save("sid", data);
        assert_eq!(store.len(), 1);

        let session = Session::new("sid", store);
        assert_eq!(session.id(), "sid");
        assert_eq!(session.get("k"), Some(json!("v")));
        assert!(!session.is_fetched());
    }

    #[test]
    fn reads_and_fetch_share_a_single_load() {
        let store = Arc::new(CountingStore::default());
        let mut data = SessionMap::new();
        data.insert(DEFAULT_SESSION_KEY.to_string(), json!({"language": "pl"}));
        store.save("sid", data);

        let config = Config::default()
            .with_field(Field::Locale, FieldConfig::new([Source::Session], ["lng", "locale"]))
            .with_field(Field::Language, FieldConfig::new([Source::Session], ["lang", "language"]))
            .with_field(Field::Region, FieldConfig::new([Source::Session], ["region"]));
        let conn = Conn::new("req-1").with_session(Session::new("sid", store.clone()));

        let resolved = resolve(&conn, &config, &Attrs::new(), &Attrs::new());
        assert_eq!(resolved.get(Field::Language), Some("pl"));
        assert_eq!(store.loads.load(Ordering::SeqCst), 1);
        assert!(!conn.session().is_fetched());

        let conn = persist(conn, DEFAULT_SESSION_KEY, &resolved);
        assert!(conn.session().is_fetched());
        assert_eq!(store.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn untouched_session_is_never_loaded() {
        let store = Arc::new(CountingStore::default());
        let conn = Conn::new("req-1").with_session(Session::new("sid", store.clone()));

        let conn = persist(conn, DEFAULT_SESSION_KEY, &Resolved::default());

        assert!(!conn.session().is_fetched());
        assert_eq!(store.loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn commit_writes_fetched_session_back() {
        let store = Arc::new(MemorySessionStore::new());
        let mut session = Session::new("sid", store.clone());
        session
            .fetch()
            .insert("user".to_string(), json!("alice"));
        session.commit();

        assert_eq!(store.load("sid").get("user"), Some(&json!("alice")));
    }

    #[test]
    fn commit_skips_unfetched_sessions() {
        let store = Arc::new(MemorySessionStore::new());
        Session::new("sid", store.clone()).commit();
        assert!(store.is_empty());
    }

    #[test]
    fn persist_merges_with_existing_fields() {
        let mut data = SessionMap::new();
        data.insert(
            DEFAULT_SESSION_KEY.to_string(),
            json!({"region": "CH", "language": "de"}),
        );
        data.insert("other".to_string(), json!(1));
        let conn = Conn::new("req-1").with_session(Session::detached(data));

        let conn = persist(
            conn,
            DEFAULT_SESSION_KEY,
            &resolved(&[(Field::Locale, "fr-CH"), (Field::Language, "fr")]),
        );

        let stored = conn.session().get(DEFAULT_SESSION_KEY).unwrap();
        assert_eq!(stored, json!({"locale": "fr-CH", "language": "fr", "region": "CH"}));
        assert_eq!(conn.session().get("other"), Some(json!(1)));
    }

    #[test]
    fn persist_replaces_non_object_entry() {
        let mut data = SessionMap::new();
        data.insert(DEFAULT_SESSION_KEY.to_string(), json!("garbage"));
        let conn = Conn::new("req-1").with_session(Session::detached(data));

        let conn = persist(conn, DEFAULT_SESSION_KEY, &resolved(&[(Field::Region, "BE")]));

        assert_eq!(
            conn.session().get(DEFAULT_SESSION_KEY),
            Some(json!({"region": "BE"}))
        );
    }

    #[test]
    fn persist_with_nothing_resolved_does_not_fetch() {
        let store = Arc::new(MemorySessionStore::new());
        let conn = Conn::new("req-1").with_session(Session::new("sid", store));

        let conn = persist(conn, DEFAULT_SESSION_KEY, &Resolved::default());

        assert!(!conn.session().is_fetched());
    }

    #[test]
    fn persist_fetches_on_demand() {
        let store = Arc::new(MemorySessionStore::new());
        let conn = Conn::new("req-1").with_session(Session::new("sid", store));

        let conn = persist(conn, DEFAULT_SESSION_KEY, &resolved(&[(Field::Locale, "nl")]));

        assert!(conn.session().is_fetched());
        assert_eq!(
            conn.session().get(DEFAULT_SESSION_KEY),
            Some(json!({"locale": "nl"}))
        );
    }
}
