//! Global default and per-alias retry policies.
//!
//! Readers take a read lock just long enough to clone an `Arc`, so a resolved
//! policy is always a complete value. Writers validate first and then swap the
//! whole entry, so a failed update leaves the registry untouched.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::retry::{ConfigurationError, RetryPolicy, RetrySettings, RetrySummary};

#[derive(Debug, Default)]
pub struct PolicyRegistry {
    global: RwLock<Arc<RetryPolicy>>,
    overrides: RwLock<HashMap<String, Arc<RetryPolicy>>>,
}

impl PolicyRegistry {
    /// Registry holding the library default policy and no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy in effect for `alias`: its override if one is set, else the global default.
    pub fn resolve(&self, alias: &str) -> Arc<RetryPolicy> {
        if let Some(policy) = self
            .overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(alias)
        {
            return Arc::clone(policy);
        }
        self.global()
    }

    pub fn global(&self) -> Arc<RetryPolicy> {
        Arc::clone(&self.global.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the global default.
    pub fn set_global(&self, settings: &RetrySettings) -> Result<(), ConfigurationError> {
        self.install_global(RetryPolicy::from_settings(settings)?);
        Ok(())
    }

    /// Replace the global default with an already validated policy.
    pub fn install_global(&self, policy: RetryPolicy) {
        tracing::info!(
            "global retry configuration set: max_retries={}, backoff_factor={}, retry_on_status={:?}",
            policy.max_retries(),
            policy.backoff_factor(),
            policy.retry_on_status()
        );
        *self.global.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(policy);
    }

    /// Insert or replace the override for `alias`.
    pub fn set_for_alias(&self, alias: &str, settings: &RetrySettings) -> Result<(), ConfigurationError> {
        self.install_for_alias(alias, RetryPolicy::from_settings(settings)?);
        Ok(())
    }

    pub fn install_for_alias(&self, alias: &str, policy: RetryPolicy) {
        tracing::info!(
            "session '{}' retry configuration set: max_retries={}, backoff_factor={}, retry_on_status={:?}",
            alias,
            policy.max_retries(),
            policy.backoff_factor(),
            policy.retry_on_status()
        );
        self.overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(alias.to_string(), Arc::new(policy));
    }

    /// Remove the override for `alias`. Returns false (and warns) if none existed.
    pub fn clear_for_alias(&self, alias: &str) -> bool {
        let removed = self
            .overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(alias)
            .is_some();
        if removed {
            tracing::info!("retry configuration cleared for session '{}'", alias);
        } else {
            tracing::warn!("no retry configuration found for session '{}'", alias);
        }
        removed
    }

    pub fn has_override(&self, alias: &str) -> bool {
        self.overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(alias)
    }

    /// Fields of the policy for `alias`, or of the global default when `alias` is `None`.
    pub fn describe(&self, alias: Option<&str>) -> RetrySummary {
        match alias {
            Some(alias) => self.resolve(alias).summary(),
            None => self.global().summary(),
        }
    }
}
