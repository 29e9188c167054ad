//! Request method, per-call options and the fully prepared request.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::retry::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "PATCH" => Method::Patch,
            "DELETE" => Method::Delete,
            "HEAD" => Method::Head,
            "OPTIONS" => Method::Options,
            _ => {
                return Err(ConfigurationError::new(
                    "method",
                    format!("unsupported HTTP method `{s}`"),
                ))
            }
        };
        Ok(method)
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Bytes(Vec<u8>),
    Text(String),
    /// Serialized on send; sets `Content-Type: application/json` unless a header overrides it.
    Json(serde_json::Value),
}

impl Body {
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        match self {
            Body::Bytes(b) => b.clone(),
            Body::Text(s) => s.as_bytes().to_vec(),
            Body::Json(v) => v.to_string().into_bytes(),
        }
    }

    pub(crate) fn content_type(&self) -> Option<&'static str> {
        match self {
            Body::Json(_) => Some("application/json"),
            Body::Bytes(_) | Body::Text(_) => None,
        }
    }
}

/// Everything a caller may set on a single request. Unknown options can't be expressed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Extra headers; a header with the same name as a session header replaces it.
    pub headers: Vec<(String, String)>,
    /// Query parameters appended to the target URL.
    pub params: Vec<(String, String)>,
    pub body: Option<Body>,
    /// Overrides the session timeout for this request.
    pub timeout: Option<Duration>,
    /// Overrides the session redirect setting for this request.
    pub follow_redirects: Option<bool>,
}

/// Request ready for the transport: absolute URL, merged headers, encoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub timeout: Option<Duration>,
    pub follow_redirects: bool,
}
