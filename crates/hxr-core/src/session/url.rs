//! Joining a session base URL with a request target.

use crate::retry::{ErrorKind, RequestError};

/// `base` alone for an empty target, otherwise `base` + `target` with a "/"
/// inserted unless the target already starts with one. The base is used as
/// configured; a trailing slash on it is kept.
pub fn join_url(base: &str, target: &str) -> String {
    if target.is_empty() {
        return base.to_string();
    }
    let slash = if target.starts_with('/') { "" } else { "/" };
    format!("{base}{slash}{target}")
}

/// Append query parameters, keeping any already present in `url`.
pub fn with_params(url: &str, params: &[(String, String)]) -> Result<String, RequestError> {
    if params.is_empty() {
        return Ok(url.to_string());
    }
    let mut parsed = ::url::Url::parse(url)
        .map_err(|e| RequestError::new(ErrorKind::Other, format!("invalid URL {url}: {e}")))?;
    parsed
        .query_pairs_mut()
        .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    Ok(parsed.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_adds_single_slash() {
        assert_eq!(join_url("http://h", "api"), "http://h/api");
        assert_eq!(join_url("http://h", "/api"), "http://h/api");
        assert_eq!(join_url("http://h/v1", "items/3"), "http://h/v1/items/3");
    }

    #[test]
    fn empty_target_is_base() {
        assert_eq!(join_url("http://h/base/", ""), "http://h/base/");
    }

    #[test]
    fn base_trailing_slash_is_kept() {
        assert_eq!(join_url("http://h/", "/api"), "http://h//api");
        assert_eq!(join_url("http://h/", "api"), "http://h//api");
    }

    #[test]
    fn params_are_appended() {
        let params = vec![("q".to_string(), "a b".to_string()), ("n".to_string(), "1".to_string())];
        assert_eq!(
            with_params("http://h/s?x=0", &params).unwrap(),
            "http://h/s?x=0&q=a+b&n=1"
        );
        assert_eq!(with_params("http://h/s", &[]).unwrap(), "http://h/s");
    }

    #[test]
    fn params_on_invalid_url_fail_as_other() {
        let params = vec![("q".to_string(), "1".to_string())];
        let err = with_params("not a url", &params).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
