//! Per-request locale resolution from prioritized request sources.
//!
//! This crate resolves three attributes for every request or live-session
//! navigation: a full **locale** (`fr-CH`), a **language** (`fr`) and a
//! **region** (`CH`). Each is looked up independently from an ordered list of
//! sources such as query parameters, cookies, the session or the
//! `Accept-Language` header. The first non-empty value wins.
//!
//! # Core Types
//!
//! - [`Carrier`]: the per-request state a hook operates on, implemented by
//!   [`Conn`] for plain requests and [`Socket`] for live sessions
//! - [`Attrs`]: the attribute map stored in a carrier's private slot
//! - [`Source`]: one of nine places a value can be extracted from
//! - [`Config`]: per-field source order and parameter names
//! - [`Resolved`]: the outcome of [`resolve`]
//! - [`web::LocalePlug`] and [`web::NavigationHook`]: lifecycle hooks that
//!   resolve, store and persist attributes
//!
//! # Examples
//!
//! ```
//! use request_locale::web::LocalePlug;
//! use request_locale::{store, Config, Conn, Field, FieldConfig, Source};
//!
//! let config = Config::default().with_field(
//!     Field::Locale,
//!     FieldConfig::for_field(Field::Locale)
//!         .with_sources([Source::Query, Source::Cookie, Source::AcceptLanguage]),
//! );
//!
//! let mut conn = Conn::new("req-123");
//! conn.add_header("Accept-Language", "fr-CH, fr;q=0.9, en;q=0.8");
//!
//! let conn = LocalePlug::new(config).apply(conn);
//!
//! assert_eq!(store::fetch(&conn, "locale").unwrap(), "fr-CH");
//! assert!(store::fetch(&conn, "currency").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attrs;
mod carrier;
mod config;
mod conn;
mod error;
mod logging;
mod resolver;
pub mod session;
mod socket;
pub mod source;
pub mod store;
pub mod web;

pub use attrs::{is_private, is_private_entry, Attrs, PRIVATE_MARKER};
pub use carrier::{Assigns, Carrier, Params, Private};
pub use config::{Config, ConfigError, Field, FieldConfig};
pub use conn::Conn;
pub use error::{Error, MissingAttribute};
pub use resolver::{resolve, Resolved};
pub use session::{MemorySessionStore, Session, SessionMap, SessionStore, DEFAULT_SESSION_KEY};
pub use socket::Socket;
pub use source::{Lookup, Source, UnknownSource};
