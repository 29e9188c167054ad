//! Status assertions applied to a finished request.

use crate::poll::ExpectedStatus;
use crate::session::Response;

/// The final response did not have the status the caller asked for.
///
/// `expected` is `None` for the implicit check of a plain request, which only
/// rejects 4xx and 5xx responses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}url {url}: {}", prefix(.msg), outcome(.expected, .actual))]
pub struct StatusMismatch {
    pub url: String,
    pub expected: Option<ExpectedStatus>,
    pub actual: u16,
    pub msg: Option<String>,
}

fn prefix(msg: &Option<String>) -> String {
    msg.as_deref().map(|m| format!("{m} ")).unwrap_or_default()
}

fn outcome(expected: &Option<ExpectedStatus>, actual: &u16) -> String {
    let actual = *actual;
    match expected {
        Some(expected) => format!("expected status {expected}, got {actual}"),
        None if actual >= 500 => format!("server error {actual}"),
        None => format!("client error {actual}"),
    }
}

/// Fail unless `resp` matches `expected`.
pub fn check_status(
    expected: ExpectedStatus,
    resp: &Response,
    msg: Option<&str>,
) -> Result<(), StatusMismatch> {
    if expected.matches(resp.status) {
        return Ok(());
    }
    Err(StatusMismatch {
        url: resp.url.clone(),
        expected: Some(expected),
        actual: resp.status,
        msg: msg.map(str::to_string),
    })
}

/// Like `check_status`, but without an expectation any 4xx or 5xx fails.
pub fn check_response(
    expected: Option<ExpectedStatus>,
    resp: &Response,
    msg: Option<&str>,
) -> Result<(), StatusMismatch> {
    match expected {
        Some(expected) => check_status(expected, resp, msg),
        None if resp.status >= 400 => Err(StatusMismatch {
            url: resp.url.clone(),
            expected: None,
            actual: resp.status,
            msg: msg.map(str::to_string),
        }),
        None => Ok(()),
    }
}
