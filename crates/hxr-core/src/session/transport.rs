//! Blocking HTTP transport over libcurl's easy interface.

use std::str;
use std::time::Duration;

use crate::retry::RequestError;

use super::request::{HttpRequest, Method};
use super::response::{parse_header_lines, Response};

/// Performs one request. Implementations must not retry on their own.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<Response, RequestError>;
}

/// Transport built on `curl::easy::Easy`, one handle per request.
#[derive(Debug, Clone, Copy)]
pub struct CurlTransport {
    pub connect_timeout: Duration,
    pub max_redirects: u32,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            max_redirects: 10,
        }
    }
}

impl Transport for CurlTransport {
    fn send(&self, request: &HttpRequest) -> Result<Response, RequestError> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(&request.url)?;
        match (request.method, &request.body) {
            (Method::Get, None) => easy.get(true)?,
            (Method::Head, _) => easy.nobody(true)?,
            (method, _) => easy.custom_request(method.as_str())?,
        }
        if let Some(data) = &request.body {
            if request.method != Method::Head {
                easy.post_fields_copy(data)?;
            }
        }
        easy.follow_location(request.follow_redirects)?;
        easy.max_redirections(self.max_redirects)?;
        easy.connect_timeout(self.connect_timeout)?;
        if let Some(timeout) = request.timeout {
            easy.timeout(timeout)?;
        }

        let mut list = curl::easy::List::new();
        for (k, v) in &request.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if !request.headers.is_empty() {
            easy.http_headers(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()? as u16;
        let url = easy
            .effective_url()?
            .map(str::to_string)
            .unwrap_or_else(|| request.url.clone());

        Ok(Response {
            status,
            url,
            headers: parse_header_lines(&header_lines),
            body,
        })
    }
}
