//! Resolution configuration.
//!
//! Configuration is an immutable value passed explicitly to the resolver and
//! hooks; nothing is read from process-wide state. Each field defaults
//! independently, and within a field the source list and parameter names
//! default independently too.
//!
//! # Examples
//!
//! ```
//! use request_locale::{Config, Field, Source};
//!
//! let config = Config::from_toml_str(r#"
//!     session_key = "i18n"
//!
//!     [locale]
//!     sources = ["query", "session", "accept_language"]
//!     params = ["locale", "lang"]
//!
//!     [language]
//!     sources = ["accept_language"]
//!     accept_language_filter = "de"
//!
//!     [region]
//!     sources = ["host"]
//! "#).unwrap();
//!
//! assert_eq!(config.session_key(), "i18n");
//! assert_eq!(config.field(Field::Locale).params(), ["locale", "lang"]);
//! assert_eq!(config.field(Field::Region).params(), ["region"]);
//! assert_eq!(config.field(Field::Language).accept_language_filter(), Some("de"));
//! assert_eq!(config.field(Field::Region).sources(), [Source::Host]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::session::DEFAULT_SESSION_KEY;
use crate::source::Source;

/// One of the three resolvable attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Full locale tag, e.g. `fr-CH`.
    Locale,
    /// Language, e.g. `fr`.
    Language,
    /// Region, e.g. `CH`.
    Region,
}

impl Field {
    /// Every field, in resolution order.
    pub const ALL: [Field; 3] = [Field::Locale, Field::Language, Field::Region];

    /// Returns the attribute key for this field.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Locale => "locale",
            Field::Language => "language",
            Field::Region => "region",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sources and parameter names for a single field.
///
/// Sources are tried in order; for each source, parameter names are tried
/// in order. The first non-empty value wins.
///
/// Parameter names are lookup keys only. [`Source::AcceptLanguage`] returns
/// the first listed tag unless an explicit primary-subtag filter is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldConfig {
    sources: Vec<Source>,
    params: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accept_language_filter: Option<String>,
}

impl FieldConfig {
    /// Creates a configuration from explicit lists.
    pub fn new(
        sources: impl IntoIterator<Item = Source>,
        params: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            sources: sources.into_iter().collect(),
            params: params.into_iter().map(Into::into).collect(),
            accept_language_filter: None,
        }
    }

    /// Default configuration for `field`: [`Source::DEFAULT_ORDER`] and the
    /// field's own name as the only parameter.
    pub fn for_field(field: Field) -> Self {
        Self::new(Source::DEFAULT_ORDER, [field.as_str()])
    }

    /// Replaces the source list.
    pub fn with_sources(mut self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources = sources.into_iter().collect();
        self
    }

    /// Replaces the parameter names.
    pub fn with_params(mut self, params: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts [`Source::AcceptLanguage`] to tags whose primary subtag is
    /// `primary`, e.g. `"de"` picks `de-CH` out of `fr-CH, de-CH`.
    pub fn with_accept_language_filter(mut self, primary: impl Into<String>) -> Self {
        self.accept_language_filter = Some(primary.into());
        self
    }

    /// Sources in priority order.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Candidate parameter names in priority order.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Primary subtag filter for [`Source::AcceptLanguage`], if any.
    pub fn accept_language_filter(&self) -> Option<&str> {
        self.accept_language_filter.as_deref()
    }
}

/// Error returned when configuration cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the schema.
    #[error("invalid locale configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for the resolver and hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawConfig")]
pub struct Config {
    locale: FieldConfig,
    language: FieldConfig,
    region: FieldConfig,
    session_key: String,
}

impl Config {
    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed documents and unknown
    /// source names.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(document)?)
    }

    /// Replaces the configuration for one field.
    pub fn with_field(mut self, field: Field, config: FieldConfig) -> Self {
        *self.field_mut(field) = config;
        self
    }

    /// Replaces the reserved session key.
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    /// Returns the configuration for `field`.
    pub fn field(&self, field: Field) -> &FieldConfig {
        match field {
            Field::Locale => &self.locale,
            Field::Language => &self.language,
            Field::Region => &self.region,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut FieldConfig {
        match field {
            Field::Locale => &mut self.locale,
            Field::Language => &mut self.language,
            Field::Region => &mut self.region,
        }
    }

    /// Top-level session key under which resolved fields are persisted.
    pub fn session_key(&self) -> &str {
        &self.session_key
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: FieldConfig::for_field(Field::Locale),
            language: FieldConfig::for_field(Field::Language),
            region: FieldConfig::for_field(Field::Region),
            session_key: DEFAULT_SESSION_KEY.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFieldConfig {
    sources: Option<Vec<Source>>,
    params: Option<Vec<String>>,
    accept_language_filter: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    locale: Option<RawFieldConfig>,
    language: Option<RawFieldConfig>,
    region: Option<RawFieldConfig>,
    session_key: Option<String>,
}

impl RawFieldConfig {
    fn into_config(raw: Option<Self>, field: Field) -> FieldConfig {
        let mut config = FieldConfig::for_field(field);
        if let Some(raw) = raw {
            if let Some(sources) = raw.sources {
                config.sources = sources;
            }
            if let Some(params) = raw.params {
                config.params = params;
            }
            config.accept_language_filter = raw.accept_language_filter;
        }
        config
    }
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            locale: RawFieldConfig::into_config(raw.locale, Field::Locale),
            language: RawFieldConfig::into_config(raw.language, Field::Language),
            region: RawFieldConfig::into_config(raw.region, Field::Region),
            session_key: raw
                .session_key
                .unwrap_or_else(|| DEFAULT_SESSION_KEY.to_string()),
        }
    }
}
