//! `hxr wait` – poll until the expected status or timeout.

use anyhow::Result;
use hxr_core::poll::{ExpectedStatus, WaitOptions};
use hxr_core::session::{Method, RequestOptions};
use hxr_core::HttpClient;

use super::print_response;

#[derive(Debug)]
pub struct WaitArgs {
    pub alias: String,
    pub method: Method,
    pub target: String,
    pub timeout: f64,
    pub interval: f64,
    pub expect: ExpectedStatus,
    pub headers: Vec<(String, String)>,
}

pub fn run_wait(client: &HttpClient, args: WaitArgs) -> Result<()> {
    let wait = WaitOptions::from_secs(args.timeout, args.interval, args.expect)?;
    let options = RequestOptions {
        headers: args.headers,
        ..RequestOptions::default()
    };
    let resp = client.wait_until_succeeds(&args.alias, args.method, &args.target, &wait, &options)?;
    print_response(&resp);
    Ok(())
}
