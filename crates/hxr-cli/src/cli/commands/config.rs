//! `hxr config` – print the effective retry configuration.

use anyhow::{bail, Result};
use hxr_core::HttpClient;

pub fn run_config(client: &HttpClient, alias: Option<&str>) -> Result<()> {
    if let Some(alias) = alias {
        if !client.session_exists(alias) {
            bail!("unknown session alias: {alias}");
        }
    }
    let summary = client.get_retry_config(alias);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
