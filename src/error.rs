use std::fmt;

use crate::attrs::Attrs;

/// Errors that can occur in the locale resolution crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// An attribute that was asserted to be present is missing.
    #[error(transparent)]
    MissingAttribute(#[from] MissingAttribute),
}

/// A required attribute was not found on the carrier.
///
/// This signals a programming or configuration error: it is only produced by
/// [`store::fetch`](crate::store::fetch) and
/// [`store::fetch_with`](crate::store::fetch_with), which callers use when a
/// prior resolution step guarantees the key is present.
///
/// # Examples
///
/// ```
/// use request_locale::{Attrs, MissingAttribute};
///
/// let err = MissingAttribute::new("region", Attrs::new());
/// assert_eq!(err.key(), "region");
/// assert!(err.attrs().is_some());
///
/// let err = MissingAttribute::with_message("region", "run the locale plug first");
/// assert_eq!(err.to_string(), "run the locale plug first");
/// assert!(err.attrs().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MissingAttribute {
    key: String,
    detail: Detail,
}

#[derive(Debug, Clone, PartialEq)]
enum Detail {
    Snapshot(Attrs),
    Message(String),
}

impl MissingAttribute {
    /// Creates an error carrying a snapshot of the current attributes.
    pub fn new(key: impl Into<String>, attrs: Attrs) -> Self {
        Self {
            key: key.into(),
            detail: Detail::Snapshot(attrs),
        }
    }

    /// Creates an error carrying a caller-supplied message instead of a snapshot.
    pub fn with_message(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            detail: Detail::Message(message.into()),
        }
    }

    /// Returns the key that was looked up.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the attribute snapshot, unless a custom message was supplied.
    pub fn attrs(&self) -> Option<&Attrs> {
        match &self.detail {
            Detail::Snapshot(attrs) => Some(attrs),
            Detail::Message(_) => None,
        }
    }

    /// Returns the custom message, if one was supplied.
    pub fn message(&self) -> Option<&str> {
        match &self.detail {
            Detail::Snapshot(_) => None,
            Detail::Message(message) => Some(message),
        }
    }
}

impl fmt::Display for MissingAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Detail::Message(message) => f.write_str(message),
            Detail::Snapshot(attrs) => {
                write!(f, "attribute {:?} not found in {{", self.key)?;
                for (i, (k, v)) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl std::error::Error for MissingAttribute {}
