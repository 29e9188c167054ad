use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;
use super::settings::{RetryOverrides, RetrySettings};

/// Status codes retried when nothing else is configured.
pub const DEFAULT_RETRY_STATUS: [u16; 5] = [500, 502, 503, 504, 429];
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 0.3;
pub const DEFAULT_BACKOFF_MAX: f64 = 120.0;

/// Classification of a failed request operation.
///
/// Transport failures are mapped into these kinds once (see `classify`), so the
/// policy decides retryability without knowing which HTTP client raised them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Could not establish a connection (refused, DNS, proxy resolution).
    Connect,
    /// Connect or read timed out.
    Timeout,
    /// Connection-level failure after connecting (reset, empty reply, TLS handshake).
    Transport,
    /// Anything else (bad URL, unsupported protocol, local errors).
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Connect => "connect",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Transport => "transport",
            ErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// One resolved resilience configuration.
///
/// Fields are private so a policy can't change after validation; overrides
/// always build a new value (`with_overrides`, `with_retryable_errors`).
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff_factor: f64,
    backoff_max: f64,
    retry_on_status: Vec<u16>,
    retry_on_errors: BTreeSet<ErrorKind>,
    jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            backoff_max: DEFAULT_BACKOFF_MAX,
            retry_on_status: DEFAULT_RETRY_STATUS.to_vec(),
            retry_on_errors: default_retryable_errors(),
            jitter: true,
        }
    }
}

pub fn default_retryable_errors() -> BTreeSet<ErrorKind> {
    [ErrorKind::Connect, ErrorKind::Timeout, ErrorKind::Transport]
        .into_iter()
        .collect()
}

impl RetryPolicy {
    /// Validate settings and build a policy with the default retryable error kinds.
    pub fn from_settings(settings: &RetrySettings) -> Result<Self, ConfigurationError> {
        let retry_on_status = settings.retry_on_status.to_codes()?;
        check_backoff(settings.backoff_factor, settings.backoff_max)?;
        Ok(Self {
            max_retries: settings.max_retries,
            backoff_factor: settings.backoff_factor,
            backoff_max: settings.backoff_max,
            retry_on_status,
            retry_on_errors: default_retryable_errors(),
            jitter: settings.jitter,
        })
    }

    /// Copy this policy and substitute the explicitly supplied per-call fields.
    pub fn with_overrides(&self, overrides: &RetryOverrides) -> Result<Self, ConfigurationError> {
        let mut policy = self.clone();
        if let Some(max_retries) = overrides.max_retries {
            policy.max_retries = max_retries;
        }
        if let Some(factor) = overrides.backoff_factor {
            check_backoff(factor, policy.backoff_max)?;
            policy.backoff_factor = factor;
        }
        if let Some(status) = &overrides.retry_on_status {
            policy.retry_on_status = status.to_codes()?;
        }
        Ok(policy)
    }

    /// Copy this policy with a different set of retryable error kinds.
    pub fn with_retryable_errors(&self, kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        Self {
            retry_on_errors: kinds.into_iter().collect(),
            ..self.clone()
        }
    }

    /// Retries allowed after the first try.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total tries: the first one plus `max_retries`.
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    pub fn backoff_max(&self) -> f64 {
        self.backoff_max
    }

    pub fn retry_on_status(&self) -> &[u16] {
        &self.retry_on_status
    }

    pub fn retry_on_errors(&self) -> &BTreeSet<ErrorKind> {
        &self.retry_on_errors
    }

    pub fn jitter(&self) -> bool {
        self.jitter
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    pub fn should_retry_error(&self, kind: ErrorKind) -> bool {
        self.retry_on_errors.contains(&kind)
    }

    /// Plain view of the policy fields, as reported by `get_retry_config`.
    pub fn summary(&self) -> RetrySummary {
        RetrySummary {
            max_retries: self.max_retries,
            backoff_factor: self.backoff_factor,
            backoff_max: self.backoff_max,
            retry_on_status: self.retry_on_status.clone(),
            jitter: self.jitter,
        }
    }
}

/// Inspection view of a resolved policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrySummary {
    pub max_retries: u32,
    pub backoff_factor: f64,
    pub backoff_max: f64,
    pub retry_on_status: Vec<u16>,
    pub jitter: bool,
}

fn check_backoff(factor: f64, max: f64) -> Result<(), ConfigurationError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ConfigurationError::new(
            "backoff_factor",
            format!("must be a positive number of seconds, got {factor}"),
        ));
    }
    if !max.is_finite() || max < factor {
        return Err(ConfigurationError::new(
            "backoff_max",
            format!("must be a finite number >= backoff_factor ({factor}), got {max}"),
        ));
    }
    Ok(())
}
