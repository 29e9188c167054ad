//! CLI command handlers, one file per command.

mod config;
mod request;
mod sessions;
mod wait;

pub use config::run_config;
pub use request::{run_request, RequestArgs};
pub use sessions::run_sessions;
pub use wait::{run_wait, WaitArgs};

use hxr_core::session::Response;

/// Status line on stderr, body on stdout, so output can be piped.
fn print_response(resp: &Response) {
    eprintln!("{} {}", resp.status(), resp.url);
    print!("{}", resp.text());
    if !resp.body.is_empty() && !resp.body.ends_with(b"\n") {
        println!();
    }
}
