//! Errors surfaced by the client façade.

use crate::poll::TimeoutExceeded;
use crate::retry::{ConfigurationError, RequestError};

use super::status::StatusMismatch;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("non-existing session alias '{0}'")]
    UnknownSession(String),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Fatal or retry-exhausted request error, exactly as the transport raised it.
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Timeout(#[from] TimeoutExceeded),
    #[error(transparent)]
    Status(#[from] StatusMismatch),
}
