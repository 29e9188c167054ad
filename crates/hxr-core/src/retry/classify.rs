//! Classify transport failures and attempt results for retry decisions.

use super::error::RequestError;
use super::policy::{ErrorKind, RetryPolicy};

/// Anything that exposes an HTTP status code.
pub trait HasStatus {
    fn status(&self) -> u16;
}

impl HasStatus for u16 {
    fn status(&self) -> u16 {
        *self
    }
}

/// Classify a curl error into an `ErrorKind`.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect() || e.is_couldnt_resolve_host() || e.is_couldnt_resolve_proxy() {
        return ErrorKind::Connect;
    }
    if e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
        || e.is_ssl_connect_error()
        || e.is_http2_error()
        || e.is_http2_stream_error()
    {
        return ErrorKind::Transport;
    }
    ErrorKind::Other
}

impl From<curl::Error> for RequestError {
    fn from(e: curl::Error) -> Self {
        let kind = classify_curl_error(&e);
        RequestError::with_source(kind, e)
    }
}

/// Result of one try, tagged once so the executor reconciles it in a single place.
#[derive(Debug)]
pub enum AttemptOutcome<R> {
    /// Response with a status the policy does not retry.
    Success(R),
    /// Response whose status is in `retry_on_status`.
    RetryableStatus(R),
    /// Error whose kind is in the retryable set.
    RetryableError(RequestError),
    /// Error the policy never retries.
    Fatal(RequestError),
}

impl<R: HasStatus> AttemptOutcome<R> {
    pub fn classify(policy: &RetryPolicy, result: Result<R, RequestError>) -> Self {
        match result {
            Ok(resp) if policy.should_retry_status(resp.status()) => {
                AttemptOutcome::RetryableStatus(resp)
            }
            Ok(resp) => AttemptOutcome::Success(resp),
            Err(e) if policy.should_retry_error(e.kind()) => AttemptOutcome::RetryableError(e),
            Err(e) => AttemptOutcome::Fatal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curl_timeout_and_connect() {
        // CURLE_OPERATION_TIMEDOUT = 28, CURLE_COULDNT_CONNECT = 7, CURLE_COULDNT_RESOLVE_HOST = 6
        assert_eq!(classify_curl_error(&curl::Error::new(28)), ErrorKind::Timeout);
        assert_eq!(classify_curl_error(&curl::Error::new(7)), ErrorKind::Connect);
        assert_eq!(classify_curl_error(&curl::Error::new(6)), ErrorKind::Connect);
    }

    #[test]
    fn curl_transport_and_other() {
        // CURLE_GOT_NOTHING = 52, CURLE_RECV_ERROR = 56, CURLE_URL_MALFORMAT = 3
        assert_eq!(classify_curl_error(&curl::Error::new(52)), ErrorKind::Transport);
        assert_eq!(classify_curl_error(&curl::Error::new(56)), ErrorKind::Transport);
        assert_eq!(classify_curl_error(&curl::Error::new(3)), ErrorKind::Other);
    }

    #[test]
    fn request_error_from_curl_keeps_source() {
        use std::error::Error as _;
        let err = RequestError::from(curl::Error::new(7));
        assert_eq!(err.kind(), ErrorKind::Connect);
        assert!(err.source().is_some());
    }

    #[test]
    fn outcome_tags() {
        let p = RetryPolicy::default();
        assert!(matches!(AttemptOutcome::classify(&p, Ok(200u16)), AttemptOutcome::Success(200)));
        assert!(matches!(
            AttemptOutcome::classify(&p, Ok(503u16)),
            AttemptOutcome::RetryableStatus(503)
        ));
        assert!(matches!(
            AttemptOutcome::<u16>::classify(&p, Err(RequestError::new(ErrorKind::Timeout, "t"))),
            AttemptOutcome::RetryableError(_)
        ));
        assert!(matches!(
            AttemptOutcome::<u16>::classify(&p, Err(RequestError::new(ErrorKind::Other, "x"))),
            AttemptOutcome::Fatal(_)
        ));
    }
}
