//! `hxr sessions` – list configured sessions.

use hxr_core::config::HxrConfig;
use hxr_core::HttpClient;

pub fn run_sessions(client: &HttpClient, cfg: &HxrConfig) {
    let aliases = client.session_aliases();
    if aliases.is_empty() {
        println!("No sessions configured.");
        return;
    }
    println!("{:<16} {:<8} {}", "ALIAS", "RETRY", "URL");
    for alias in aliases {
        let url = cfg
            .sessions
            .get(&alias)
            .map(|s| s.session.url.as_str())
            .unwrap_or("-");
        let retry = if client.policies().has_override(&alias) {
            "session"
        } else {
            "global"
        };
        println!("{:<16} {:<8} {}", alias, retry, url);
    }
}
