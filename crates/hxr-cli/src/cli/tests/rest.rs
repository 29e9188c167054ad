//! Tests for config, sessions and the global --config flag.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_parse_config_global() {
    match parse(&["hxr", "config"]) {
        CliCommand::Config { alias } => assert!(alias.is_none()),
        _ => panic!("expected Config"),
    }
}

#[test]
fn cli_parse_config_alias() {
    match parse(&["hxr", "config", "billing"]) {
        CliCommand::Config { alias } => assert_eq!(alias.as_deref(), Some("billing")),
        _ => panic!("expected Config"),
    }
}

#[test]
fn cli_parse_sessions() {
    match parse(&["hxr", "sessions"]) {
        CliCommand::Sessions => {}
        _ => panic!("expected Sessions"),
    }
}

#[test]
fn cli_parse_config_path_flag() {
    let cli = Cli::try_parse_from(["hxr", "sessions", "--config", "/tmp/hxr.toml"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/hxr.toml")));

    let cli = Cli::try_parse_from(["hxr", "--config", "alt.toml", "config"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    assert!(matches!(cli.command, CliCommand::Config { alias: None }));
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["hxr"]).is_err());
}
