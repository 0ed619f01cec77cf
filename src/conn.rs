//! The plain-request carrier.

use serde_json::Value;

use crate::carrier::{Assigns, Carrier, Params, Private};
use crate::session::{Session, SessionMap};

/// A plain HTTP request flowing through the pipeline.
///
/// `Conn` holds simple, owned data so it does not couple to any specific
/// framework's request types. Framework integrations populate it from their
/// own request (decoded query and body parameters, parsed cookies, headers,
/// host) and hand it to the locale hooks.
///
/// Every locale source is available on a `Conn`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use request_locale::{Carrier, Conn, MemorySessionStore, Session};
///
/// let store = Arc::new(MemorySessionStore::new());
///
/// let mut conn = Conn::new("req-12345")
///     .with_host("shop.example.ch")
///     .with_session(Session::new("sid-1", store));
/// conn.add_query_param("locale", "fr-CH");
/// conn.add_cookie("region", "CH");
///
/// assert_eq!(conn.request_id(), "req-12345");
/// assert_eq!(conn.host(), Some("shop.example.ch"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Conn {
    request_id: String,
    host: Option<String>,
    path_params: Params,
    query_params: Params,
    body_params: Params,
    cookies: Params,
    headers: Vec<(String, String)>,
    assigns: Assigns,
    private: Private,
    session: Session,
}

impl Conn {
    /// Creates a request with the given request ID and nothing else.
    ///
    /// The session is detached and empty until replaced with
    /// [`Conn::with_session`].
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Self::default()
        }
    }

    /// Sets the request host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Attaches a session.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Adds a path parameter.
    pub fn add_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.path_params.insert(key.into(), value.into());
    }

    /// Adds a decoded query parameter.
    pub fn add_query_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query_params.insert(key.into(), value.into());
    }

    /// Adds a decoded body parameter.
    pub fn add_body_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.body_params.insert(key.into(), value.into());
    }

    /// Adds a cookie.
    pub fn add_cookie(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(key.into(), value.into());
    }

    /// Appends a header. Repeated names are kept in arrival order.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Sets a user-visible assign.
    pub fn assign(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.assigns.insert(key.into(), value.into());
    }

    /// Returns the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Writes the session back to its store.
    ///
    /// Framework integrations call this when the response is sent.
    pub fn commit_session(&self) {
        self.session.commit();
    }
}

impl Carrier for Conn {
    fn request_id(&self) -> &str {
        &self.request_id
    }

    fn path_params(&self) -> &Params {
        &self.path_params
    }

    fn query_params(&self) -> &Params {
        &self.query_params
    }

    fn body_params(&self) -> Option<&Params> {
        Some(&self.body_params)
    }

    fn cookies(&self) -> Option<&Params> {
        Some(&self.cookies)
    }

    fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    fn assigns(&self) -> &Assigns {
        &self.assigns
    }

    fn assigns_mut(&mut self) -> &mut Assigns {
        &mut self.assigns
    }

    fn private(&self) -> &Private {
        &self.private
    }

    fn private_mut(&mut self) -> &mut Private {
        &mut self.private
    }

    fn session_value(&self, key: &str) -> Option<Value> {
        self.session.get(key)
    }

    fn session_mut(&mut self) -> Option<&mut SessionMap> {
        Some(self.session.fetch())
    }
}
