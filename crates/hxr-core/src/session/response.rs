//! Completed HTTP response.

use crate::retry::HasStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    /// Effective URL after redirects.
    pub url: String,
    /// Header lines of the final response, in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn status(&self) -> u16 {
        self.status
    }

    /// First header with `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl HasStatus for Response {
    fn status(&self) -> u16 {
        self.status
    }
}

/// Parse collected header lines. Only the last response block is kept, so
/// headers of intermediate redirects are dropped.
pub(crate) fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let resp = Response {
            status: 200,
            url: "http://x/".into(),
            headers: vec![("Content-Type".into(), "text/plain".into())],
            body: b"hi".to_vec(),
        };
        assert_eq!(resp.header("content-type"), Some("text/plain"));
        assert_eq!(resp.text(), "hi");
        assert!(resp.is_success());
    }

    #[test]
    fn redirect_headers_are_dropped() {
        let lines: Vec<String> = [
            "HTTP/1.1 302 Found",
            "Location: /next",
            "",
            "HTTP/1.1 200 OK",
            "Content-Length: 2",
            "",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let headers = parse_header_lines(&lines);
        assert_eq!(headers, vec![("Content-Length".to_string(), "2".to_string())]);
    }
}
