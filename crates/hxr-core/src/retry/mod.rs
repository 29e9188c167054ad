//! Retry policy, backoff and the bounded retry loop.
//!
//! Classification (retryable status vs. retryable error kind vs. fatal) lives
//! in the policy so callers never duplicate it; the loop in `run` is the only
//! place that waits and tries again.

mod backoff;
mod classify;
mod error;
mod policy;
mod run;
mod settings;

pub use backoff::backoff_delay;
pub use classify::{classify_curl_error, AttemptOutcome, HasStatus};
pub use error::{ConfigurationError, RequestError};
pub use policy::{
    default_retryable_errors, ErrorKind, RetryPolicy, RetrySummary, DEFAULT_BACKOFF_FACTOR,
    DEFAULT_BACKOFF_MAX, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_STATUS,
};
pub use run::run_with_retry;
pub use settings::{RetryOverrides, RetrySettings, StatusList};
