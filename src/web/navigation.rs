//! The post-navigation hook for live-session sockets.

use url::Url;

use crate::attrs::Attrs;
use crate::carrier::Params;
use crate::config::Config;
use crate::resolver::resolve;
use crate::socket::Socket;

use super::plug::{localize, Flow};

/// Hook run after every client-side navigation.
///
/// Navigation events carry raw path parameters and the new URL but no
/// request headers, so header-based sources always resolve to absent here.
/// The socket's session is read-only; nothing is persisted.
///
/// # Examples
///
/// ```
/// use request_locale::web::{Flow, NavigationHook};
/// use request_locale::{store, Attrs, Config, Params, SessionMap, Socket};
///
/// let hook = NavigationHook::new(Config::default());
/// let socket = Socket::mount("sock-1", SessionMap::new());
///
/// let flow = hook.handle_params(
///     Params::new(),
///     "https://shop.example/products?locale=it-CH",
///     socket,
///     &Attrs::new(),
/// );
///
/// let Flow::Cont(socket) = flow else { panic!("navigation never halts") };
/// assert_eq!(store::fetch(&socket, "locale").unwrap(), "it-CH");
/// ```
#[derive(Debug, Clone, Default)]
pub struct NavigationHook {
    config: Config,
    attrs: Attrs,
}

impl NavigationHook {
    /// Creates a hook with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            attrs: Attrs::new(),
        }
    }

    /// Sets the precompiled attributes consulted by the `attrs` source.
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Updates the socket from a navigation event and re-resolves its attributes.
    ///
    /// The URL supplies host and query parameters. An unparseable URL clears
    /// both rather than failing. `extra` overrides apply after every
    /// configured source, as with the request hook. Always returns
    /// [`Flow::Cont`].
    pub fn handle_params(
        &self,
        params: Params,
        url: &str,
        mut socket: Socket,
        extra: &Attrs,
    ) -> Flow<Socket> {
        let (host, query) = split_url(url);
        socket.set_path_params(params);
        socket.set_host(host);
        socket.set_query_params(query);

        let resolved = resolve(&socket, &self.config, &self.attrs, extra);
        Flow::Cont(localize(socket, &resolved))
    }
}

/// Recovers host and decoded query parameters; later duplicates win.
fn split_url(raw: &str) -> (Option<String>, Params) {
    match Url::parse(raw) {
        Ok(url) => {
            let host = url.host_str().map(str::to_string);
            let query = url.query_pairs().into_owned().collect();
            (host, query)
        }
        Err(err) => {
            tracing::debug!(url = raw, error = %err, "navigation URL did not parse");
            (None, Params::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::Carrier;
    use crate::config::{Field, FieldConfig};
    use crate::session::{SessionMap, DEFAULT_SESSION_KEY};
    use crate::source::Source;
    use crate::store;
    use serde_json::json;

    fn cont(flow: Flow<Socket>) -> Socket {
        match flow {
            Flow::Cont(socket) => socket,
            Flow::Halt(_) => panic!("navigation hook halted"),
        }
    }

    #[test]
    fn split_url_decodes_query() {
        let (host, query) = split_url("https://example.com:8443/a?locale=fr%2DCH&x=1&x=2");
        assert_eq!(host.as_deref(), Some("example.com"));
        assert_eq!(query.get("locale").map(String::as_str), Some("fr-CH"));
        assert_eq!(query.get("x").map(String::as_str), Some("2"));
    }

    #[test]
    fn malformed_url_degrades_to_absent() {
        let (host, query) = split_url("not a url");
        assert!(host.is_none());
        assert!(query.is_empty());
    }

    #[test]
    fn path_params_and_host_feed_resolution() {
        let mut params = Params::new();
        params.insert("locale".to_string(), "ro".to_string());

        let socket = cont(NavigationHook::new(Config::default()).handle_params(
            params,
            "https://ro.example.org/acasa",
            Socket::mount("sock-1", SessionMap::new()),
            &Attrs::new(),
        ));

        assert_eq!(store::fetch(&socket, "locale").unwrap(), &json!("ro"));
        assert_eq!(socket.host(), Some("ro.example.org"));
        assert_eq!(socket.assigns().get("locale"), Some(&json!("ro")));
    }

    #[test]
    fn session_captured_at_mount_is_a_source() {
        let mut session = SessionMap::new();
        session.insert(DEFAULT_SESSION_KEY.to_string(), json!({"region": "NZ"}));

        let config = Config::default().with_field(
            Field::Region,
            FieldConfig::for_field(Field::Region).with_sources([Source::Query, Source::Session]),
        );

        let socket = cont(NavigationHook::new(config).handle_params(
            Params::new(),
            "https://example.org/",
            Socket::mount("sock-1", session),
            &Attrs::new(),
        ));

        assert_eq!(store::fetch(&socket, Field::Region.as_str()).unwrap(), &json!("NZ"));
    }

    #[test]
    fn extra_overrides_fill_gaps() {
        let extra: Attrs = [("language", "mi")].into_iter().collect();

        let socket = cont(NavigationHook::new(Config::default()).handle_params(
            Params::new(),
            "::",
            Socket::mount("sock-1", SessionMap::new()),
            &extra,
        ));

        assert_eq!(store::fetch(&socket, "language").unwrap(), &json!("mi"));
        assert!(store::get_key(&socket, "locale").is_none());
    }

    #[test]
    fn stale_query_is_replaced_on_navigation() {
        let config = Config::default().with_field(
            Field::Locale,
            FieldConfig::for_field(Field::Locale).with_sources([Source::Query]),
        );
        let hook = NavigationHook::new(config);
        let socket = cont(hook.handle_params(
            Params::new(),
            "https://example.org/?locale=fr",
            Socket::mount("sock-1", SessionMap::new()),
            &Attrs::new(),
        ));
        let socket = cont(hook.handle_params(
            Params::new(),
            "https://example.org/?locale=de",
            socket,
            &Attrs::new(),
        ));

        assert_eq!(store::fetch(&socket, "locale").unwrap(), &json!("de"));
    }

    #[test]
    fn previous_assign_outranks_new_query_in_default_order() {
        let hook = NavigationHook::new(Config::default());
        let socket = cont(hook.handle_params(
            Params::new(),
            "https://example.org/?locale=fr",
            Socket::mount("sock-1", SessionMap::new()),
            &Attrs::new(),
        ));
        let socket = cont(hook.handle_params(
            Params::new(),
            "https://example.org/?locale=de",
            socket,
            &Attrs::new(),
        ));

        assert_eq!(store::fetch(&socket, "locale").unwrap(), &json!("fr"));
    }
}
