//! The per-field source-priority resolver.
//!
//! For each field in [`Field::ALL`] order, the resolver walks the field's
//! configured sources and, for each, its candidate parameter names. The
//! first non-empty value wins and no further sources are consulted for that
//! field. If nothing matches, the field's value in the extra attributes is
//! used; failing that, the field is left unresolved.
//!
//! When one source holds values for several candidate names, the
//! first-listed name wins.

use serde::Serialize;

use crate::attrs::Attrs;
use crate::carrier::Carrier;
use crate::config::{Config, Field};
use crate::logging::ResolutionLog;
use crate::source::Lookup;

/// The outcome of resolution: up to three non-empty values.
///
/// # Examples
///
/// ```
/// use request_locale::{Field, Resolved};
///
/// let mut resolved = Resolved::default();
/// resolved.set(Field::Region, "BE");
///
/// assert_eq!(resolved.get(Field::Region), Some("BE"));
/// assert_eq!(resolved.get(Field::Locale), None);
/// assert_eq!(resolved.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolved {
    #[serde(skip_serializing_if = "Option::is_none")]
    locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
}

impl Resolved {
    /// Returns the value for `field`.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Sets `field`. Empty values clear it.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        *self.slot_mut(field) = (!value.is_empty()).then_some(value);
    }

    /// Iterates over resolved fields in [`Field::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|value| (field, value)))
    }

    /// Number of resolved fields.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if no field was resolved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts the resolved fields into attributes keyed by field name.
    pub fn to_attrs(&self) -> Attrs {
        self.iter().map(|(field, value)| (field.as_str(), value)).collect()
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Locale => &self.locale,
            Field::Language => &self.language,
            Field::Region => &self.region,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Locale => &mut self.locale,
            Field::Language => &mut self.language,
            Field::Region => &mut self.region,
        }
    }
}

/// Resolves all three fields for `carrier`.
///
/// `attrs` are the precompiled attributes consulted by the `attrs` source;
/// `extra` are consulted only after every configured source has been tried.
///
/// # Examples
///
/// ```
/// use request_locale::{resolve, Attrs, Config, Conn, Field};
///
/// let mut conn = Conn::new("req-1");
/// conn.add_query_param("locale", "fr");
/// conn.add_header("Accept-Language", "de-DE, en;q=0.5");
///
/// let extra: Attrs = [("region", "BE")].into_iter().collect();
/// let resolved = resolve(&conn, &Config::default(), &Attrs::new(), &extra);
///
/// assert_eq!(resolved.get(Field::Locale), Some("fr"));
/// assert_eq!(resolved.get(Field::Language), Some("de-DE"));
/// assert_eq!(resolved.get(Field::Region), Some("BE"));
/// ```
pub fn resolve<C: Carrier>(carrier: &C, config: &Config, attrs: &Attrs, extra: &Attrs) -> Resolved {
    let log = ResolutionLog::new(carrier.request_id());
    let lookup = Lookup::new(attrs, config.session_key());
    let mut resolved = Resolved::default();

    for field in Field::ALL {
        if let Some(value) = resolve_field(carrier, config, lookup, field, &log) {
            resolved.set(field, value);
        } else if let Some(value) = extra.get_str(field.as_str()) {
            log.fallback(field, value);
            resolved.set(field, value);
        } else {
            log.unresolved(field);
        }
    }

    resolved
}

fn resolve_field<'a, C: Carrier>(
    carrier: &C,
    config: &'a Config,
    lookup: Lookup<'a>,
    field: Field,
    log: &ResolutionLog<'_>,
) -> Option<String> {
    let field_config = config.field(field);
    let lookup = lookup.with_accept_language_filter(field_config.accept_language_filter());
    for &source in field_config.sources() {
        for param in field_config.params() {
            let Some(value) = source.extract(carrier, &lookup, param) else {
                continue;
            };
            if !value.is_empty() {
                log.resolved(field, source, param, &value);
                return Some(value);
            }
        }
    }
    None
}
