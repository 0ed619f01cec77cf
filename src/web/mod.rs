//! Request and navigation hooks.
//!
//! This module is where resolution meets the request lifecycle. It provides:
//! - [`LocalePlug`]: runs once per request, resolves every field, stores the
//!   result on the carrier and persists it into the session
//! - [`NavigationHook`]: runs after each client-side navigation on a
//!   live-session [`Socket`](crate::Socket)
//! - [`Pipeline`]: an ordered chain of [`Plug`]s threading a carrier through
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: Hooks operate on the [`Carrier`](crate::Carrier)
//!    trait. Framework-specific code builds a `Conn` or `Socket` and hands it in.
//!
//! 2. **Values In, Values Out**: Every hook takes the carrier by value and returns
//!    it. Nothing is shared or mutated behind the caller's back.
//!
//! 3. **Never Halt**: Locale resolution cannot fail a request. Unresolvable fields
//!    are left absent and the chain continues.
//!
//! 4. **Explicit Configuration**: No global state. The [`Config`](crate::Config)
//!    travels with the hook that uses it.
//!
//! # Example Flow
//!
//! ```
//! use request_locale::web::{Flow, LocalePlug, Pipeline};
//! use request_locale::{store, Carrier, Config, Conn};
//!
//! let pipeline = Pipeline::new()
//!     .plug(|conn: Conn| Flow::Cont(conn))
//!     .plug(LocalePlug::new(Config::default()));
//!
//! let mut conn = Conn::new("req-7").with_host("example.com");
//! conn.add_header("Accept-Language", "pt-BR, pt;q=0.8");
//! conn.add_query_param("region", "BR");
//!
//! let conn = pipeline.run(conn).into_inner();
//!
//! assert_eq!(store::fetch(&conn, "region").unwrap(), "BR");
//! assert_eq!(conn.assigns()["region"], "BR");
//! ```

mod navigation;
mod plug;

pub use navigation::NavigationHook;
pub use plug::{Flow, LocalePlug, Pipeline, Plug};
