//! Source kinds and their value extractors.
//!
//! Each [`Source`] names one place a locale attribute may come from. The
//! extractor for a kind is a pure function of the carrier, the lookup
//! context and a parameter name; dispatch is an exhaustive `match`, so a new
//! kind cannot be added without an extractor.
//!
//! Extractors never fail. A source with no opinion (missing parameter,
//! absent header, a carrier variant that lacks the source) yields `None`.

pub mod accept_language;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attrs::Attrs;
use crate::carrier::{Carrier, Params};

/// Name of the header consulted by [`Source::AcceptLanguage`].
pub const ACCEPT_LANGUAGE: &str = "accept-language";

/// A place a locale attribute value can be extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Caller-supplied precompiled attributes.
    Attrs,
    /// The carrier's user-visible assigns.
    Assigns,
    /// Decoded query-string parameters.
    Query,
    /// Routing path parameters.
    Path,
    /// Decoded body parameters.
    Body,
    /// The request host; the parameter name is ignored.
    Host,
    /// Request cookies.
    Cookie,
    /// The object stored under the reserved session key.
    Session,
    /// The `Accept-Language` header; the parameter name is ignored.
    AcceptLanguage,
}

impl Source {
    /// Every source kind.
    pub const ALL: [Source; 9] = [
        Source::Attrs,
        Source::Assigns,
        Source::Query,
        Source::Path,
        Source::Body,
        Source::Host,
        Source::Cookie,
        Source::Session,
        Source::AcceptLanguage,
    ];

    /// Default priority: explicit request-scoped signals before ambient ones.
    pub const DEFAULT_ORDER: [Source; 8] = [
        Source::Attrs,
        Source::Assigns,
        Source::Query,
        Source::Path,
        Source::Host,
        Source::Cookie,
        Source::Session,
        Source::AcceptLanguage,
    ];

    /// Returns the configuration name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Attrs => "attrs",
            Source::Assigns => "assigns",
            Source::Query => "query",
            Source::Path => "path",
            Source::Body => "body",
            Source::Host => "host",
            Source::Cookie => "cookie",
            Source::Session => "session",
            Source::AcceptLanguage => "accept_language",
        }
    }

    /// Extracts the value for `param` from this source.
    ///
    /// The returned string may be empty; the resolver treats empty values as
    /// absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_locale::{Attrs, Conn, Lookup, Source};
    ///
    /// let mut conn = Conn::new("req-1");
    /// conn.add_query_param("lang", "it");
    ///
    /// let attrs = Attrs::new();
    /// let lookup = Lookup::new(&attrs, "locale_attrs");
    ///
    /// assert_eq!(Source::Query.extract(&conn, &lookup, "lang").as_deref(), Some("it"));
    /// assert_eq!(Source::Cookie.extract(&conn, &lookup, "lang"), None);
    /// ```
    pub fn extract<C: Carrier>(self, carrier: &C, lookup: &Lookup<'_>, param: &str) -> Option<String> {
        match self {
            Source::Attrs => string_value(lookup.attrs.get(param)),
            Source::Assigns => string_value(carrier.assigns().get(param)),
            Source::Query => param_value(Some(carrier.query_params()), param),
            Source::Path => param_value(Some(carrier.path_params()), param),
            Source::Body => param_value(carrier.body_params(), param),
            Source::Host => carrier.host().map(str::to_string),
            Source::Cookie => param_value(carrier.cookies(), param),
            Source::Session => carrier
                .session_value(lookup.session_key)
                .and_then(|stored| string_value(stored.get(param))),
            Source::AcceptLanguage => carrier
                .header(ACCEPT_LANGUAGE)
                .and_then(|header| accept_language::select(header, lookup.accept_language_filter))
                .map(str::to_string),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown source name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown locale source {0:?}")]
pub struct UnknownSource(pub String);

impl FromStr for Source {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}

/// Inputs to extraction that do not live on the carrier.
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'a> {
    /// Precompiled attributes consulted by [`Source::Attrs`].
    pub attrs: &'a Attrs,
    /// Reserved top-level session key consulted by [`Source::Session`].
    pub session_key: &'a str,
    /// Primary language subtag [`Source::AcceptLanguage`] filters on, if any.
    pub accept_language_filter: Option<&'a str>,
}

impl<'a> Lookup<'a> {
    /// Creates a lookup context with no `Accept-Language` filter.
    pub fn new(attrs: &'a Attrs, session_key: &'a str) -> Self {
        Self {
            attrs,
            session_key,
            accept_language_filter: None,
        }
    }

    /// Sets the primary subtag used to filter `Accept-Language` entries.
    pub fn with_accept_language_filter(mut self, filter: Option<&'a str>) -> Self {
        self.accept_language_filter = filter;
        self
    }
}

fn param_value(params: Option<&Params>, param: &str) -> Option<String> {
    params?.get(param).cloned()
}

fn string_value(value: Option<&Value>) -> Option<String> {
    value?.as_str().map(str::to_string)
}
