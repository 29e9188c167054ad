//! Named sessions: a base URL plus default headers and timeouts, looked up by alias.
//!
//! Sessions are plain data; sending goes through a `Transport` so the retry
//! and polling loops can run against a fake in tests.

mod request;
mod response;
mod transport;
mod url;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::{ConfigurationError, RequestError};

pub use self::url::{join_url, with_params};
pub use request::{Body, HttpRequest, Method, RequestOptions};
pub use response::Response;
pub use transport::{CurlTransport, Transport};

fn default_follow_redirects() -> bool {
    true
}

/// How to build a session (also the `[sessions.<alias>]` section of config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Base URL every request target is joined to.
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Whole-request timeout in seconds (none = no limit).
    #[serde(default)]
    pub timeout_secs: Option<f64>,
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,
}

impl SessionConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout_secs: None,
            follow_redirects: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub alias: String,
    pub base_url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
    pub follow_redirects: bool,
}

impl Session {
    /// Validate `config` and build a session.
    pub fn new(alias: &str, config: &SessionConfig) -> Result<Self, ConfigurationError> {
        let parsed = ::url::Url::parse(&config.url)
            .map_err(|e| ConfigurationError::new("url", format!("{}: {e}", config.url)))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigurationError::new(
                "url",
                format!("{} is not an http(s) base URL", config.url),
            ));
        }
        let timeout = match config.timeout_secs {
            None => None,
            Some(secs) if secs.is_finite() && secs > 0.0 => Duration::try_from_secs_f64(secs).ok(),
            Some(secs) => {
                return Err(ConfigurationError::new(
                    "timeout_secs",
                    format!("must be a positive number of seconds, got {secs}"),
                ))
            }
        };
        Ok(Self {
            alias: alias.to_string(),
            base_url: config.url.clone(),
            headers: config.headers.clone(),
            timeout,
            follow_redirects: config.follow_redirects,
        })
    }

    /// Build the request sent for `target`; per-request options win over session defaults.
    pub fn prepare(
        &self,
        method: Method,
        target: &str,
        options: &RequestOptions,
    ) -> Result<HttpRequest, RequestError> {
        let url = with_params(&join_url(&self.base_url, target), &options.params)?;

        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .filter(|(k, _)| !options.headers.iter().any(|(o, _)| o.eq_ignore_ascii_case(k)))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        headers.extend(options.headers.iter().cloned());

        if let Some(content_type) = options.body.as_ref().and_then(|b| b.content_type()) {
            if !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("content-type")) {
                headers.push(("Content-Type".to_string(), content_type.to_string()));
            }
        }

        Ok(HttpRequest {
            method,
            url,
            headers,
            body: options.body.as_ref().map(Body::to_bytes),
            timeout: options.timeout.or(self.timeout),
            follow_redirects: options.follow_redirects.unwrap_or(self.follow_redirects),
        })
    }
}

/// Alias -> session map shared by all callers of a client.
#[derive(Debug, Default)]
pub struct SessionCache {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session, replacing any previous one with the same alias.
    pub fn register(&self, session: Session) {
        let alias = session.alias.clone();
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(alias, Arc::new(session));
    }

    pub fn get(&self, alias: &str) -> Option<Arc<Session>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(alias)
            .cloned()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(alias)
    }

    /// Replace a session's headers in place, keeping the rest.
    pub fn update_headers(&self, alias: &str, headers: &BTreeMap<String, String>) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        match sessions.get_mut(alias) {
            Some(session) => {
                let mut updated = Session::clone(session);
                updated.headers.extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
                *session = Arc::new(updated);
                true
            }
            None => false,
        }
    }

    pub fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        aliases.sort();
        aliases
    }

    pub fn clear(&self) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let mut cfg = SessionConfig::new("http://api.local:8080/v1");
        cfg.headers.insert("Accept".into(), "text/plain".into());
        cfg.timeout_secs = Some(2.5);
        Session::new("api", &cfg).unwrap()
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(Session::new("x", &SessionConfig::new("ftp://host/")).is_err());
        let err = Session::new("x", &SessionConfig::new("not a url")).unwrap_err();
        assert_eq!(err.field, "url");
    }

    #[test]
    fn rejects_non_positive_timeout() {
        let mut cfg = SessionConfig::new("http://h");
        cfg.timeout_secs = Some(0.0);
        assert_eq!(Session::new("x", &cfg).unwrap_err().field, "timeout_secs");
    }

    #[test]
    fn prepare_merges_headers_and_defaults() {
        let s = session();
        let opts = RequestOptions {
            headers: vec![("accept".into(), "application/json".into())],
            params: vec![("page".into(), "2".into())],
            body: Some(Body::Json(serde_json::json!({"k": "v"}))),
            ..RequestOptions::default()
        };
        let req = s.prepare(Method::Post, "items", &opts).unwrap();
        assert_eq!(req.url, "http://api.local:8080/v1/items?page=2");
        assert_eq!(
            req.headers,
            vec![
                ("accept".to_string(), "application/json".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ]
        );
        assert_eq!(req.timeout, Some(Duration::from_millis(2500)));
        assert!(req.follow_redirects);
        assert_eq!(req.body.as_deref(), Some(br#"{"k":"v"}"#.as_slice()));
    }

    #[test]
    fn request_options_override_session() {
        let s = session();
        let opts = RequestOptions {
            timeout: Some(Duration::from_secs(9)),
            follow_redirects: Some(false),
            ..RequestOptions::default()
        };
        let req = s.prepare(Method::Get, "/health", &opts).unwrap();
        assert_eq!(req.url, "http://api.local:8080/v1/health");
        assert_eq!(req.timeout, Some(Duration::from_secs(9)));
        assert!(!req.follow_redirects);
        assert_eq!(req.headers, vec![("Accept".to_string(), "text/plain".to_string())]);
    }

    #[test]
    fn cache_register_update_clear() {
        let cache = SessionCache::new();
        assert!(cache.get("api").is_none());
        cache.register(session());
        assert!(cache.contains("api"));

        let mut extra = BTreeMap::new();
        extra.insert("X-Trace".to_string(), "1".to_string());
        assert!(cache.update_headers("api", &extra));
        assert!(!cache.update_headers("ghost", &extra));
        let s = cache.get("api").unwrap();
        assert_eq!(s.headers.get("X-Trace").map(String::as_str), Some("1"));
        assert_eq!(s.headers.get("Accept").map(String::as_str), Some("text/plain"));

        assert_eq!(cache.aliases(), vec!["api".to_string()]);
        cache.clear();
        assert!(!cache.contains("api"));
    }
}
