//! Time-bounded polling: repeat an operation at a fixed interval until it
//! reports the expected status or the wall-clock budget runs out.
//!
//! Unlike the retry loop this never classifies failures. Every error and every
//! unexpected status just means "not yet".

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::retry::{ConfigurationError, HasStatus, RequestError};
use crate::timer::Timer;

/// Condition a polled response must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedStatus {
    Code(u16),
    /// Accept any completed response.
    Any,
}

impl Default for ExpectedStatus {
    fn default() -> Self {
        ExpectedStatus::Code(200)
    }
}

impl From<u16> for ExpectedStatus {
    fn from(code: u16) -> Self {
        ExpectedStatus::Code(code)
    }
}

impl ExpectedStatus {
    pub fn matches(&self, status: u16) -> bool {
        match self {
            ExpectedStatus::Any => true,
            ExpectedStatus::Code(code) => *code == status,
        }
    }
}

/// Reason-phrase aliases, lowercase with `_` separators.
const NAMED_STATUSES: &[(&str, u16)] = &[
    ("continue", 100),
    ("switching_protocols", 101),
    ("ok", 200),
    ("created", 201),
    ("accepted", 202),
    ("no_content", 204),
    ("partial_content", 206),
    ("moved_permanently", 301),
    ("found", 302),
    ("see_other", 303),
    ("not_modified", 304),
    ("temporary_redirect", 307),
    ("permanent_redirect", 308),
    ("bad_request", 400),
    ("unauthorized", 401),
    ("forbidden", 403),
    ("not_found", 404),
    ("method_not_allowed", 405),
    ("not_acceptable", 406),
    ("request_timeout", 408),
    ("conflict", 409),
    ("gone", 410),
    ("precondition_failed", 412),
    ("payload_too_large", 413),
    ("unsupported_media_type", 415),
    ("unprocessable_entity", 422),
    ("too_many_requests", 429),
    ("internal_server_error", 500),
    ("not_implemented", 501),
    ("bad_gateway", 502),
    ("service_unavailable", 503),
    ("gateway_timeout", 504),
];

/// Status code for a name such as `OK`, `not_found` or `Service Unavailable`.
pub fn named_status(name: &str) -> Option<u16> {
    let key = name.trim().to_ascii_lowercase().replace(|c: char| c == ' ' || c == '-', "_");
    NAMED_STATUSES
        .iter()
        .find(|(n, _)| *n == key)
        .map(|(_, code)| *code)
}

impl FromStr for ExpectedStatus {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("any") || s.eq_ignore_ascii_case("anything") {
            return Ok(ExpectedStatus::Any);
        }
        if let Ok(code) = s.parse::<u16>() {
            return Ok(ExpectedStatus::Code(code));
        }
        named_status(s).map(ExpectedStatus::Code).ok_or_else(|| {
            ConfigurationError::new(
                "expected_status",
                format!("expected a status code, a status name or `any`, got `{s}`"),
            )
        })
    }
}

impl fmt::Display for ExpectedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedStatus::Code(code) => write!(f, "{code}"),
            ExpectedStatus::Any => f.write_str("any"),
        }
    }
}

/// Budget and cadence for `wait_until`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Total wall-clock budget.
    pub timeout: Duration,
    /// Constant delay between tries.
    pub interval: Duration,
    pub expected: ExpectedStatus,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            interval: Duration::from_secs(1),
            expected: ExpectedStatus::default(),
        }
    }
}

impl WaitOptions {
    /// Build from seconds, rejecting negative or non-finite values.
    pub fn from_secs(timeout: f64, interval: f64, expected: ExpectedStatus) -> Result<Self, ConfigurationError> {
        Ok(Self {
            timeout: secs("timeout", timeout)?,
            interval: secs("interval", interval)?,
            expected,
        })
    }
}

fn secs(field: &'static str, value: f64) -> Result<Duration, ConfigurationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigurationError::new(
            field,
            format!("must be a non-negative number of seconds, got {value}"),
        ));
    }
    Duration::try_from_secs_f64(value)
        .map_err(|e| ConfigurationError::new(field, e.to_string()))
}

/// The polling budget elapsed without the expected status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "request did not succeed within {:.2} seconds after {} attempts ({:.2} seconds elapsed)",
    .timeout.as_secs_f64(),
    .attempts,
    .elapsed.as_secs_f64()
)]
pub struct TimeoutExceeded {
    pub attempts: u32,
    pub elapsed: Duration,
    pub timeout: Duration,
}

/// Calls `op` until it returns a response matching `options.expected`.
///
/// A new try is only started while elapsed time is below the timeout, and the
/// interval sleep is skipped (ending the loop) when it would overshoot the
/// budget. A request already in flight is never interrupted.
pub fn wait_until<R, F, T>(timer: &T, options: &WaitOptions, mut op: F) -> Result<R, TimeoutExceeded>
where
    R: HasStatus,
    F: FnMut() -> Result<R, RequestError>,
    T: Timer + ?Sized,
{
    let start = timer.now();
    let mut attempts = 0u32;

    while timer.now().saturating_duration_since(start) < options.timeout {
        attempts += 1;
        match op() {
            Ok(resp) if options.expected.matches(resp.status()) => {
                tracing::info!(
                    "request completed on attempt {} after {:.2} seconds",
                    attempts,
                    timer.now().saturating_duration_since(start).as_secs_f64()
                );
                return Ok(resp);
            }
            Ok(resp) => {
                tracing::debug!(
                    "attempt {}: got status {}, expected {}",
                    attempts,
                    resp.status(),
                    options.expected
                );
            }
            Err(e) => {
                tracing::debug!("attempt {}: request failed with {}", attempts, e);
            }
        }

        let elapsed = timer.now().saturating_duration_since(start);
        let next_try = elapsed.checked_add(options.interval);
        if next_try.map_or(false, |t| t < options.timeout) {
            timer.sleep(options.interval);
        } else {
            break;
        }
    }

    Err(TimeoutExceeded {
        attempts,
        elapsed: timer.now().saturating_duration_since(start),
        timeout: options.timeout,
    })
}
