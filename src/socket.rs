//! The live-session socket carrier.

use serde_json::Value;

use crate::carrier::{Assigns, Carrier, Params, Private};
use crate::session::SessionMap;

/// A live-session socket.
///
/// Sockets outlive a single navigation: they are mounted once with the
/// session captured from the initial request, then receive navigation events
/// carrying path parameters and a URL. They have no request headers, cookies
/// or body, and their session is read-only, so those sources always resolve
/// to absent and the session bridge leaves sockets unchanged.
///
/// # Examples
///
/// ```
/// use request_locale::{Carrier, SessionMap, Socket};
///
/// let socket = Socket::mount("sock-F1", SessionMap::new())
///     .with_host("example.org");
///
/// assert_eq!(socket.request_id(), "sock-F1");
/// assert!(socket.headers().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Socket {
    id: String,
    host: Option<String>,
    path_params: Params,
    query_params: Params,
    assigns: Assigns,
    private: Private,
    session: SessionMap,
}

impl Socket {
    /// Mounts a socket with the session captured from the initial request.
    pub fn mount(id: impl Into<String>, session: SessionMap) -> Self {
        Self {
            id: id.into(),
            session,
            ..Self::default()
        }
    }

    /// Sets the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Replaces the host, clearing it when `None`.
    pub fn set_host(&mut self, host: Option<String>) {
        self.host = host;
    }

    /// Replaces the path parameters.
    pub fn set_path_params(&mut self, params: Params) {
        self.path_params = params;
    }

    /// Replaces the query parameters.
    pub fn set_query_params(&mut self, params: Params) {
        self.query_params = params;
    }

    /// Sets a user-visible assign.
    pub fn assign(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.assigns.insert(key.into(), value.into());
    }

    /// Returns the session captured at mount.
    pub fn session(&self) -> &SessionMap {
        &self.session
    }
}

impl Carrier for Socket {
    fn request_id(&self) -> &str {
        &self.id
    }

    fn path_params(&self) -> &Params {
        &self.path_params
    }

    fn query_params(&self) -> &Params {
        &self.query_params
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
        self.session.get(key).cloned()
    }
}
