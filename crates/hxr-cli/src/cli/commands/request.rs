//! `hxr request` – one request, with retries unless `--no-retry`.

use anyhow::{Context, Result};
use hxr_core::poll::ExpectedStatus;
use hxr_core::retry::{RetryOverrides, StatusList};
use hxr_core::session::{Body, Method, RequestOptions};
use hxr_core::{HttpClient, RetryCall};

use super::print_response;

#[derive(Debug)]
pub struct RequestArgs {
    pub alias: String,
    pub method: Method,
    pub target: String,
    pub no_retry: bool,
    pub max_retries: Option<u32>,
    pub backoff_factor: Option<f64>,
    pub retry_on_status: Option<StatusList>,
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
    pub data: Option<String>,
    pub json: Option<String>,
    pub expect: Option<ExpectedStatus>,
    pub msg: Option<String>,
}

fn body(args: &RequestArgs) -> Result<Option<Body>> {
    if let Some(json) = &args.json {
        let value = serde_json::from_str(json).context("--json is not valid JSON")?;
        return Ok(Some(Body::Json(value)));
    }
    Ok(args.data.clone().map(Body::Text))
}

pub fn run_request(client: &HttpClient, args: RequestArgs) -> Result<()> {
    let options = RequestOptions {
        headers: args.headers.clone(),
        params: args.params.clone(),
        body: body(&args)?,
        ..RequestOptions::default()
    };

    let resp = if args.no_retry {
        client.request(
            &args.alias,
            args.method,
            &args.target,
            &options,
            args.expect,
            args.msg.as_deref(),
        )?
    } else {
        let call = RetryCall {
            overrides: RetryOverrides {
                max_retries: args.max_retries,
                backoff_factor: args.backoff_factor,
                retry_on_status: args.retry_on_status.clone(),
            },
            options,
            expected_status: args.expect,
            msg: args.msg.clone(),
        };
        client.retry_request(&args.alias, args.method, &args.target, &call)?
    };
    print_response(&resp);
    Ok(())
}
