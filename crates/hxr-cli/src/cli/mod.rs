//! CLI for HXR retrying HTTP sessions.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hxr_core::config;
use hxr_core::poll::ExpectedStatus;
use hxr_core::retry::StatusList;
use hxr_core::session::Method;
use hxr_core::HttpClient;
use std::path::PathBuf;

use commands::{run_config, run_request, run_sessions, run_wait, RequestArgs, WaitArgs};

/// Top-level CLI for HXR.
#[derive(Debug, Parser)]
#[command(name = "hxr")]
#[command(about = "HXR: HTTP requests over named sessions with retry and polling", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/hxr/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Send one request, retrying on configured statuses and connection errors.
    Request {
        /// Session alias from the config file.
        alias: String,
        /// HTTP method (GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS).
        method: Method,
        /// Path appended to the session URL.
        target: String,
        /// Send exactly once; without --expect, any 4xx or 5xx status fails.
        #[arg(long, conflicts_with_all = ["max_retries", "backoff_factor", "retry_on_status"])]
        no_retry: bool,
        /// Retry at most N times for this call.
        #[arg(long, value_name = "N")]
        max_retries: Option<u32>,
        /// Backoff factor in seconds for this call.
        #[arg(long, value_name = "SECS")]
        backoff_factor: Option<f64>,
        /// Comma-separated statuses to retry on for this call (e.g. "500,503").
        #[arg(long, value_name = "CODES")]
        retry_on_status: Option<StatusList>,
        /// Extra header, "Name: value". May be repeated.
        #[arg(short = 'H', long = "header", value_name = "HEADER", value_parser = parse_header)]
        headers: Vec<(String, String)>,
        /// Query parameter, "key=value". May be repeated.
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, String)>,
        /// Raw request body.
        #[arg(long, conflicts_with = "json")]
        data: Option<String>,
        /// JSON request body.
        #[arg(long)]
        json: Option<String>,
        /// Fail unless the final status matches (a code or "any").
        #[arg(long, value_name = "STATUS")]
        expect: Option<ExpectedStatus>,
        /// Prefix for the status mismatch message.
        #[arg(long)]
        msg: Option<String>,
    },

    /// Repeat a request until it returns the expected status or the timeout elapses.
    Wait {
        alias: String,
        method: Method,
        target: String,
        /// Give up after this many seconds.
        #[arg(long, default_value = "60", value_name = "SECS")]
        timeout: f64,
        /// Seconds between attempts.
        #[arg(long, default_value = "1", value_name = "SECS")]
        interval: f64,
        /// Status to wait for (a code or "any").
        #[arg(long, default_value = "200", value_name = "STATUS")]
        expect: ExpectedStatus,
        /// Extra header, "Name: value". May be repeated.
        #[arg(short = 'H', long = "header", value_name = "HEADER", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },

    /// Print the retry configuration in effect (global, or for one session) as JSON.
    Config {
        /// Session alias; omit for the global default.
        alias: Option<String>,
    },

    /// List configured sessions.
    Sessions,
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected \"Name: value\", got {s:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("header name is empty in {s:?}"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    Ok((key.to_string(), value.to_string()))
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        let client = HttpClient::from_config(&cfg)?;

        match cli.command {
            CliCommand::Request {
                alias,
                method,
                target,
                no_retry,
                max_retries,
                backoff_factor,
                retry_on_status,
                headers,
                params,
                data,
                json,
                expect,
                msg,
            } => run_request(
                &client,
                RequestArgs {
                    alias,
                    method,
                    target,
                    no_retry,
                    max_retries,
                    backoff_factor,
                    retry_on_status,
                    headers,
                    params,
                    data,
                    json,
                    expect,
                    msg,
                },
            )?,
            CliCommand::Wait {
                alias,
                method,
                target,
                timeout,
                interval,
                expect,
                headers,
            } => run_wait(
                &client,
                WaitArgs {
                    alias,
                    method,
                    target,
                    timeout,
                    interval,
                    expect,
                    headers,
                },
            )?,
            CliCommand::Config { alias } => run_config(&client, alias.as_deref())?,
            CliCommand::Sessions => run_sessions(&client, &cfg),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
