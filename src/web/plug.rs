//! The request-lifecycle hook and the middleware chain it plugs into.

use std::fmt;

use serde_json::Value;

use crate::attrs::Attrs;
use crate::carrier::Carrier;
use crate::config::Config;
use crate::resolver::{resolve, Resolved};
use crate::session;
use crate::store;

/// Continuation signal returned by every pipeline step.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Flow<C> {
    /// Proceed with the next step.
    Cont(C),
    /// Stop the chain; later steps are skipped.
    Halt(C),
}

impl<C> Flow<C> {
    /// Returns the carrier regardless of the signal.
    pub fn into_inner(self) -> C {
        match self {
            Flow::Cont(c) | Flow::Halt(c) => c,
        }
    }

    /// Returns `true` for [`Flow::Cont`].
    pub fn is_cont(&self) -> bool {
        matches!(self, Flow::Cont(_))
    }
}

/// A single step in an ordered middleware chain.
///
/// Closures of type `Fn(C) -> Flow<C>` are plugs too.
pub trait Plug<C> {
    /// Processes the carrier and signals whether the chain continues.
    fn call(&self, carrier: C) -> Flow<C>;
}

impl<C, F> Plug<C> for F
where
    F: Fn(C) -> Flow<C>,
{
    fn call(&self, carrier: C) -> Flow<C> {
        self(carrier)
    }
}

/// An ordered chain of plugs.
///
/// # Examples
///
/// ```
/// use request_locale::web::{Flow, LocalePlug, Pipeline};
/// use request_locale::{store, Config, Conn};
///
/// let pipeline = Pipeline::new()
///     .plug(|mut conn: Conn| {
///         conn.add_query_param("locale", "fr-CA");
///         Flow::Cont(conn)
///     })
///     .plug(LocalePlug::new(Config::default()));
///
/// let conn = pipeline.run(Conn::new("req-1")).into_inner();
/// assert_eq!(store::fetch(&conn, "locale").unwrap(), "fr-CA");
/// ```
pub struct Pipeline<C> {
    plugs: Vec<Box<dyn Plug<C> + Send + Sync>>,
}

impl<C> Pipeline<C> {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self { plugs: Vec::new() }
    }

    /// Appends a plug.
    pub fn plug(mut self, plug: impl Plug<C> + Send + Sync + 'static) -> Self {
        self.plugs.push(Box::new(plug));
        self
    }

    /// Number of plugs in the chain.
    pub fn len(&self) -> usize {
        self.plugs.len()
    }

    /// Returns `true` if the chain has no plugs.
    pub fn is_empty(&self) -> bool {
        self.plugs.is_empty()
    }

    /// Threads `carrier` through every plug in order, stopping at the first halt.
    pub fn run(&self, carrier: C) -> Flow<C> {
        let mut carrier = carrier;
        for plug in &self.plugs {
            match plug.call(carrier) {
                Flow::Cont(next) => carrier = next,
                halted @ Flow::Halt(_) => return halted,
            }
        }
        Flow::Cont(carrier)
    }
}

impl<C> Default for Pipeline<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Pipeline<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("plugs", &self.plugs.len())
            .finish()
    }
}

/// Request-lifecycle hook that resolves and stores locale attributes.
///
/// Applying the plug:
/// 1. resolves all fields from the configured sources,
/// 2. merges the resolved fields into the private attribute slot,
/// 3. assigns each resolved field to the user-visible assigns,
/// 4. persists the resolved fields into the session.
///
/// Applying it twice with unchanged request data yields the same attributes.
///
/// # Examples
///
/// ```
/// use request_locale::web::LocalePlug;
/// use request_locale::{store, Carrier, Config, Conn};
///
/// let plug = LocalePlug::new(Config::default())
///     .with_extra([("region", "BE")].into_iter().collect());
///
/// let mut conn = Conn::new("req-1");
/// conn.add_cookie("locale", "nl-BE");
/// let conn = plug.apply(conn);
///
/// assert_eq!(store::fetch(&conn, "locale").unwrap(), "nl-BE");
/// assert_eq!(store::fetch(&conn, "region").unwrap(), "BE");
/// assert_eq!(conn.assigns()["locale"], "nl-BE");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalePlug {
    config: Config,
    attrs: Attrs,
    extra: Attrs,
}

impl LocalePlug {
    /// Creates a plug with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            attrs: Attrs::new(),
            extra: Attrs::new(),
        }
    }

    /// Sets the precompiled attributes consulted by the `attrs` source.
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Sets the extra attributes consulted after every configured source.
    pub fn with_extra(mut self, extra: Attrs) -> Self {
        self.extra = extra;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolves, stores, assigns and persists locale attributes.
    pub fn apply<C: Carrier>(&self, carrier: C) -> C {
        let resolved = resolve(&carrier, &self.config, &self.attrs, &self.extra);
        let carrier = localize(carrier, &resolved);
        session::persist(carrier, self.config.session_key(), &resolved)
    }
}

impl<C: Carrier> Plug<C> for LocalePlug {
    fn call(&self, carrier: C) -> Flow<C> {
        Flow::Cont(self.apply(carrier))
    }
}

/// Merges resolved fields into the attribute store and the assigns.
pub(crate) fn localize<C: Carrier>(carrier: C, resolved: &Resolved) -> C {
    let mut carrier = store::merge(carrier, resolved.to_attrs());
    let assigns = carrier.assigns_mut();
    for (field, value) in resolved.iter() {
        assigns.insert(field.as_str().to_string(), Value::from(value));
    }
    carrier
}
