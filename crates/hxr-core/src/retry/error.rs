//! Error types shared by the retry executor and the polling waiter.

use super::policy::ErrorKind;

/// A policy or wait setting was rejected before any state changed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid value for `{field}`: {reason}")]
pub struct ConfigurationError {
    /// Name of the offending field (e.g. `backoff_factor`).
    pub field: &'static str,
    pub reason: String,
}

impl ConfigurationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure raised by one request operation, already classified for retry decisions.
///
/// The executor never wraps this type: a fatal error and the last error after
/// exhausting retries both reach the caller exactly as the operation raised them.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct RequestError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<curl::Error>,
}

impl RequestError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn with_source(kind: ErrorKind, source: curl::Error) -> Self {
        Self {
            kind,
            message: source.to_string(),
            source: Some(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
