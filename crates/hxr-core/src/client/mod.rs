//! Client façade: sessions + retry policies + transport.
//!
//! `HttpClient` is the explicit context object callers create at startup and
//! drop at shutdown. It composes the session cache and the policy registry
//! rather than inheriting from them, and every operation takes an enumerated
//! options struct instead of free-form keyword arguments.

mod error;
mod status;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::HxrConfig;
use crate::poll::{wait_until, ExpectedStatus, WaitOptions};
use crate::registry::PolicyRegistry;
use crate::retry::{
    run_with_retry, RequestError, RetryOverrides, RetryPolicy, RetrySettings, RetrySummary,
};
use crate::session::{
    CurlTransport, HttpRequest, Method, RequestOptions, Response, Session, SessionCache,
    SessionConfig, Transport,
};
use crate::timer::{SystemTimer, Timer};

pub use error::ClientError;
pub use status::{check_response, check_status, StatusMismatch};

/// Per-call inputs of `retry_request`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryCall {
    /// Substitutions applied to the resolved policy for this call only.
    pub overrides: RetryOverrides,
    pub options: RequestOptions,
    /// Checked after the retry loop returns a response.
    pub expected_status: Option<ExpectedStatus>,
    /// Prefix for the status mismatch message.
    pub msg: Option<String>,
}

pub struct HttpClient {
    sessions: SessionCache,
    policies: PolicyRegistry,
    transport: Arc<dyn Transport>,
    timer: Arc<dyn Timer>,
    rng: Mutex<StdRng>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Client with the curl transport, real clock and an entropy-seeded jitter source.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client configured from a loaded config file.
    pub fn from_config(cfg: &HxrConfig) -> Result<Self, ClientError> {
        let client = Self::new();
        client.apply_config(cfg)?;
        Ok(client)
    }

    /// Apply the global retry section and register every configured session
    /// (with its retry override, if any).
    ///
    /// Every section is validated before anything is applied, so an invalid
    /// entry leaves the client unchanged.
    pub fn apply_config(&self, cfg: &HxrConfig) -> Result<(), ClientError> {
        let global = RetryPolicy::from_settings(&cfg.retry)?;
        let mut sessions = Vec::with_capacity(cfg.sessions.len());
        for (alias, section) in &cfg.sessions {
            let session = Session::new(alias, &section.session)?;
            let retry = section
                .retry
                .as_ref()
                .map(RetryPolicy::from_settings)
                .transpose()?;
            sessions.push((session, retry));
        }

        self.policies.install_global(global);
        for (session, retry) in sessions {
            tracing::info!("creating session: alias={}, url={}", session.alias, session.base_url);
            if let Some(policy) = retry {
                self.policies.install_for_alias(&session.alias, policy);
            }
            self.sessions.register(session);
        }
        Ok(())
    }

    pub fn policies(&self) -> &PolicyRegistry {
        &self.policies
    }

    // ---- sessions ----

    /// Create (or replace) the session registered under `alias`.
    pub fn create_session(&self, alias: &str, config: &SessionConfig) -> Result<(), ClientError> {
        let session = Session::new(alias, config)?;
        tracing::info!("creating session: alias={}, url={}", alias, config.url);
        self.sessions.register(session);
        Ok(())
    }

    pub fn session_exists(&self, alias: &str) -> bool {
        self.sessions.contains(alias)
    }

    pub fn session_aliases(&self) -> Vec<String> {
        self.sessions.aliases()
    }

    /// Merge `headers` into the session's default headers.
    pub fn update_session_headers(
        &self,
        alias: &str,
        headers: &BTreeMap<String, String>,
    ) -> Result<(), ClientError> {
        if self.sessions.update_headers(alias, headers) {
            Ok(())
        } else {
            Err(ClientError::UnknownSession(alias.to_string()))
        }
    }

    pub fn delete_all_sessions(&self) {
        tracing::info!("delete all sessions");
        self.sessions.clear();
    }

    fn session(&self, alias: &str) -> Result<Arc<Session>, ClientError> {
        self.sessions
            .get(alias)
            .ok_or_else(|| ClientError::UnknownSession(alias.to_string()))
    }

    // ---- retry configuration ----

    pub fn set_global_retry_config(&self, settings: &RetrySettings) -> Result<(), ClientError> {
        Ok(self.policies.set_global(settings)?)
    }

    pub fn set_session_retry_config(
        &self,
        alias: &str,
        settings: &RetrySettings,
    ) -> Result<(), ClientError> {
        Ok(self.policies.set_for_alias(alias, settings)?)
    }

    /// Policy fields for `alias`, or the global default for `None`.
    pub fn get_retry_config(&self, alias: Option<&str>) -> RetrySummary {
        self.policies.describe(alias)
    }

    /// Drop the override for `alias`; returns false if there was none.
    pub fn clear_session_retry_config(&self, alias: &str) -> bool {
        self.policies.clear_for_alias(alias)
    }

    // ---- requests ----

    /// Send `method target` on session `alias`, retrying per the effective policy.
    ///
    /// Precedence: `call.overrides` > the alias override > the global default.
    /// After exhausting retries on a retryable status the last response is
    /// returned; after exhausting retries on a retryable error that error is
    /// returned unchanged.
    pub fn retry_request(
        &self,
        alias: &str,
        method: Method,
        target: &str,
        call: &RetryCall,
    ) -> Result<Response, ClientError> {
        let session = self.session(alias)?;
        let resolved = self.policies.resolve(alias);
        let policy = if call.overrides.is_empty() {
            resolved
        } else {
            Arc::new(resolved.with_overrides(&call.overrides)?)
        };
        let request = session.prepare(method, target, &call.options)?;

        let mut rng = self.call_rng();
        let response = run_with_retry(&policy, self.timer.as_ref(), &mut rng, || self.send(&request))?;

        if let Some(expected) = call.expected_status {
            check_status(expected, &response, call.msg.as_deref())?;
        }
        Ok(response)
    }

    /// Send `method target` on session `alias` exactly once.
    ///
    /// With no `expected` status any 4xx or 5xx response fails with
    /// `ClientError::Status`; pass `ExpectedStatus::Any` to accept everything.
    pub fn request(
        &self,
        alias: &str,
        method: Method,
        target: &str,
        options: &RequestOptions,
        expected: Option<ExpectedStatus>,
        msg: Option<&str>,
    ) -> Result<Response, ClientError> {
        let session = self.session(alias)?;
        let request = session.prepare(method, target, options)?;
        let response = self.send(&request)?;
        check_response(expected, &response, msg)?;
        Ok(response)
    }

    /// Repeat `method target` on session `alias` every `wait.interval` until the
    /// response matches `wait.expected` or `wait.timeout` elapses.
    pub fn wait_until_succeeds(
        &self,
        alias: &str,
        method: Method,
        target: &str,
        wait: &WaitOptions,
        options: &RequestOptions,
    ) -> Result<Response, ClientError> {
        let session = self.session(alias)?;
        let request = session.prepare(method, target, options)?;
        Ok(wait_until(self.timer.as_ref(), wait, || self.send(&request))?)
    }

    fn send(&self, request: &HttpRequest) -> Result<Response, RequestError> {
        tracing::debug!("{} {}", request.method, request.url);
        let resp = self.transport.send(request)?;
        tracing::debug!("{} {} -> {} ({} bytes)", request.method, resp.url, resp.status, resp.body.len());
        Ok(resp)
    }

    /// Independent jitter source for one call, so concurrent calls don't share a lock
    /// for the length of their retry loops.
    fn call_rng(&self) -> StdRng {
        let seed: u64 = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen();
        StdRng::seed_from_u64(seed)
    }
}

/// Injects transport, clock and jitter seed (used by tests and embedders).
#[derive(Default)]
pub struct HttpClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    timer: Option<Arc<dyn Timer>>,
    seed: Option<u64>,
}

impl HttpClientBuilder {
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Fix the jitter seed so backoff delays are reproducible.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> HttpClient {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        HttpClient {
            sessions: SessionCache::new(),
            policies: PolicyRegistry::new(),
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(CurlTransport::default())),
            timer: self.timer.unwrap_or_else(|| Arc::new(SystemTimer)),
            rng: Mutex::new(rng),
        }
    }
}
