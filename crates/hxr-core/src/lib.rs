//! Named HTTP sessions with retry policies and readiness polling.
//!
//! - `retry`: policy model, backoff, outcome classification and the bounded retry loop
//! - `registry`: global default and per-alias policy overrides
//! - `poll`: wall-clock-bounded "wait until ready" loop
//! - `session`: session settings, request preparation and the curl transport
//! - `client`: the façade combining all of the above

pub mod client;
pub mod config;
pub mod logging;
pub mod poll;
pub mod registry;
pub mod retry;
pub mod session;
pub mod timer;

pub use client::{ClientError, HttpClient, RetryCall};
