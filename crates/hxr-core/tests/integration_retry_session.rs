//! Integration test: real curl transport against a local scripted server.
//!
//! Backoff is kept in the low milliseconds so the tests run quickly with the
//! real clock.

mod common;

use std::time::Duration;

use hxr_core::poll::{ExpectedStatus, WaitOptions};
use hxr_core::retry::{ErrorKind, RetryOverrides, RetrySettings, StatusList};
use hxr_core::session::{Method, RequestOptions, SessionConfig};
use hxr_core::{ClientError, HttpClient, RetryCall};

fn fast_retry(max_retries: u32, statuses: &[u16]) -> RetrySettings {
    RetrySettings {
        max_retries,
        backoff_factor: 0.005,
        backoff_max: 0.02,
        retry_on_status: StatusList::Codes(statuses.to_vec()),
        jitter: false,
    }
}

fn client_for(url: &str) -> HttpClient {
    let client = HttpClient::builder().rng_seed(5).build();
    client.create_session("srv", &SessionConfig::new(url)).unwrap();
    client
}

#[test]
fn retries_500_until_success() {
    let server = common::status_server::start(vec![500, 500, 200]);
    let client = client_for(&server.url);
    client
        .set_session_retry_config("srv", &fast_retry(2, &[500]))
        .unwrap();

    let resp = client
        .retry_request("srv", Method::Get, "/data", &RetryCall::default())
        .expect("request");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.text(), "status 200");
    assert_eq!(resp.header("content-type"), Some("text/plain"));
    assert_eq!(server.hits(), 3);
}

#[test]
fn exhausted_status_returns_last_response() {
    let server = common::status_server::start(vec![503]);
    let client = client_for(&server.url);
    client
        .set_session_retry_config("srv", &fast_retry(2, &[503]))
        .unwrap();

    let resp = client
        .retry_request("srv", Method::Post, "submit", &RetryCall::default())
        .expect("exhausted status is not an error");
    assert_eq!(resp.status, 503);
    assert_eq!(server.hits(), 3);
}

#[test]
fn non_retryable_status_returns_immediately() {
    let server = common::status_server::start(vec![404, 200]);
    let client = client_for(&server.url);
    client.set_global_retry_config(&fast_retry(3, &[500])).unwrap();

    let resp = client
        .retry_request("srv", Method::Get, "/missing", &RetryCall::default())
        .unwrap();
    assert_eq!(resp.status, 404);
    assert_eq!(server.hits(), 1);
}

#[test]
fn connection_refused_is_retried_then_reraised() {
    let client = client_for(&common::status_server::closed_port_url());
    client
        .set_session_retry_config("srv", &fast_retry(2, &[500]))
        .unwrap();

    let err = client
        .retry_request("srv", Method::Get, "/", &RetryCall::default())
        .unwrap_err();
    match err {
        ClientError::Request(e) => assert_eq!(e.kind(), ErrorKind::Connect),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn per_call_override_applies_to_one_call() {
    let server = common::status_server::start(vec![502, 502, 502, 200]);
    let client = client_for(&server.url);
    client
        .set_session_retry_config("srv", &fast_retry(5, &[500]))
        .unwrap();

    let call = RetryCall {
        overrides: RetryOverrides {
            max_retries: Some(1),
            retry_on_status: Some(StatusList::from("502")),
            ..RetryOverrides::default()
        },
        ..RetryCall::default()
    };
    let resp = client.retry_request("srv", Method::Get, "/", &call).unwrap();
    assert_eq!(resp.status, 502);
    assert_eq!(server.hits(), 2);
    assert_eq!(client.get_retry_config(Some("srv")).max_retries, 5);
}

#[test]
fn wait_until_succeeds_polls_until_ready() {
    let server = common::status_server::start(vec![503, 503, 200]);
    let client = client_for(&server.url);
    let wait = WaitOptions {
        timeout: Duration::from_secs(10),
        interval: Duration::from_millis(20),
        expected: ExpectedStatus::Code(200),
    };
    let resp = client
        .wait_until_succeeds("srv", Method::Get, "/health", &wait, &RequestOptions::default())
        .unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(server.hits(), 3);
}

#[test]
fn wait_until_succeeds_times_out() {
    let server = common::status_server::start(vec![503]);
    let client = client_for(&server.url);
    let wait = WaitOptions {
        timeout: Duration::from_millis(300),
        interval: Duration::from_millis(50),
        expected: ExpectedStatus::Code(200),
    };
    let err = client
        .wait_until_succeeds("srv", Method::Get, "/health", &wait, &RequestOptions::default())
        .unwrap_err();
    match err {
        ClientError::Timeout(t) => {
            assert!(t.attempts >= 1);
            assert!(t.elapsed < Duration::from_millis(300) + wait.interval + Duration::from_secs(1));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn plain_request_fails_on_server_error_without_retrying() {
    let server = common::status_server::start(vec![500, 200]);
    let client = client_for(&server.url);

    let err = client
        .request("srv", Method::Get, "/once", &RequestOptions::default(), None, None)
        .unwrap_err();
    match err {
        ClientError::Status(m) => {
            assert_eq!(m.actual, 500);
            assert_eq!(m.url, format!("{}/once", server.url));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.hits(), 1);

    let ok = client
        .request("srv", Method::Get, "/once", &RequestOptions::default(), None, None)
        .unwrap();
    assert_eq!(ok.status, 200);
    assert_eq!(server.hits(), 2);
}
