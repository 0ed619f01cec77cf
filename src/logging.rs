use crate::config::Field;
use crate::source::Source;

/// Request-scoped logging for resolution and persistence.
///
/// Every event carries the carrier's request ID so resolution decisions can
/// be correlated with the rest of the request's logs. Resolved values are
/// locale tags supplied by the client and are logged as-is.
#[derive(Debug)]
pub(crate) struct ResolutionLog<'a> {
    request_id: &'a str,
}

impl<'a> ResolutionLog<'a> {
    pub(crate) fn new(request_id: &'a str) -> Self {
        Self { request_id }
    }

    /// A configured source produced the field's value.
    pub(crate) fn resolved(&self, field: Field, source: Source, param: &str, value: &str) {
        tracing::debug!(
            request_id = %self.request_id,
            %field,
            %source,
            param,
            value,
            "locale attribute resolved"
        );
    }

    /// No source produced a value; the extra attributes did.
    pub(crate) fn fallback(&self, field: Field, value: &str) {
        tracing::debug!(
            request_id = %self.request_id,
            %field,
            value,
            "locale attribute taken from extra attributes"
        );
    }

    pub(crate) fn unresolved(&self, field: Field) {
        tracing::debug!(request_id = %self.request_id, %field, "locale attribute unresolved");
    }

    pub(crate) fn session_written(&self, session_key: &str, fields: usize) {
        tracing::trace!(
            request_id = %self.request_id,
            session_key,
            fields,
            "locale attributes persisted to session"
        );
    }

    pub(crate) fn session_unavailable(&self) {
        tracing::trace!(
            request_id = %self.request_id,
            "carrier has no writable session; skipping persistence"
        );
    }
}
