//! Unvalidated retry settings as they arrive from callers and config files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;
use super::policy::{
    DEFAULT_BACKOFF_FACTOR, DEFAULT_BACKOFF_MAX, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_STATUS,
};

/// Retryable status codes, either already typed or as a comma-delimited list ("500,502,503").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusList {
    Codes(Vec<u16>),
    Text(String),
}

impl Default for StatusList {
    fn default() -> Self {
        StatusList::Codes(DEFAULT_RETRY_STATUS.to_vec())
    }
}

impl From<Vec<u16>> for StatusList {
    fn from(codes: Vec<u16>) -> Self {
        StatusList::Codes(codes)
    }
}

impl From<&str> for StatusList {
    fn from(text: &str) -> Self {
        StatusList::Text(text.to_string())
    }
}

impl FromStr for StatusList {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let list = StatusList::Text(s.to_string());
        list.to_codes()?;
        Ok(list)
    }
}

impl fmt::Display for StatusList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusList::Text(text) => f.write_str(text),
            StatusList::Codes(codes) => {
                let joined: Vec<String> = codes.iter().map(u16::to_string).collect();
                f.write_str(&joined.join(","))
            }
        }
    }
}

impl StatusList {
    /// Parse and validate into a de-duplicated list, keeping first-seen order.
    pub fn to_codes(&self) -> Result<Vec<u16>, ConfigurationError> {
        let parsed = match self {
            StatusList::Codes(codes) => codes.clone(),
            StatusList::Text(text) => parse_status_text(text)?,
        };
        if parsed.is_empty() {
            return Err(ConfigurationError::new(
                "retry_on_status",
                "at least one status code is required",
            ));
        }
        let mut codes = Vec::with_capacity(parsed.len());
        for code in parsed {
            if !(100..=599).contains(&code) {
                return Err(ConfigurationError::new(
                    "retry_on_status",
                    format!("{code} is not an HTTP status code"),
                ));
            }
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        Ok(codes)
    }
}

fn parse_status_text(text: &str) -> Result<Vec<u16>, ConfigurationError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|piece| {
            let piece = piece.trim();
            piece.parse::<u16>().map_err(|_| {
                ConfigurationError::new(
                    "retry_on_status",
                    format!("`{piece}` is not a numeric status code"),
                )
            })
        })
        .collect()
}

/// Full set of retry fields accepted by the global and per-session configuration calls.
///
/// Missing fields in a config file fall back to library defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub backoff_factor: f64,
    pub backoff_max: f64,
    pub retry_on_status: StatusList,
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            backoff_max: DEFAULT_BACKOFF_MAX,
            retry_on_status: StatusList::default(),
            jitter: true,
        }
    }
}

/// Per-call substitutions applied on top of the resolved policy. Never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryOverrides {
    pub max_retries: Option<u32>,
    pub backoff_factor: Option<f64>,
    pub retry_on_status: Option<StatusList>,
}

impl RetryOverrides {
    pub fn is_empty(&self) -> bool {
        self.max_retries.is_none() && self.backoff_factor.is_none() && self.retry_on_status.is_none()
    }
}
