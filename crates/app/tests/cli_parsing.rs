//! Tests for command line parsing.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::path::PathBuf;

use clap::Parser;
use nexus::cli::{Cli, Command, EnvCommand, KeyPlacement};
use nexus_domain::{HttpMethod, RequestId};
use pretty_assertions::assert_eq;

#[test]
fn new_with_headers_params_and_body() {
    let cli = Cli::try_parse_from([
        "nexus",
        "new",
        "--name",
        "Create user",
        "-X",
        "post",
        "/users",
        "-H",
        "Accept: application/json",
        "--param",
        "page=2",
        "--json",
        r#"{"name":"a"}"#,
    ])
    .unwrap();

    let Command::New(args) = cli.command else {
        panic!("expected new, got {:?}", cli.command);
    };
    assert_eq!(args.name, "Create user");
    assert_eq!(args.method, HttpMethod::Post);
    assert_eq!(args.url, "/users");
    assert_eq!(
        args.headers,
        vec![("Accept".to_string(), "application/json".to_string())]
    );
    assert_eq!(args.params, vec![("page".to_string(), "2".to_string())]);
    assert_eq!(args.json.as_deref(), Some(r#"{"name":"a"}"#));
    assert_eq!(args.api_key_in, KeyPlacement::Query);
}

#[test]
fn new_defaults_to_get() {
    let cli = Cli::try_parse_from(["nexus", "new", "https://api.test"]).unwrap();
    let Command::New(args) = cli.command else {
        panic!("expected new");
    };
    assert_eq!(args.method, HttpMethod::Get);
    assert_eq!(args.name, "New Request");
}

#[test]
fn unsupported_method_is_rejected() {
    assert!(Cli::try_parse_from(["nexus", "new", "-X", "FETCH", "/"]).is_err());
}

#[test]
fn json_and_form_conflict() {
    let result = Cli::try_parse_from([
        "nexus", "new", "/", "--json", "{}", "--form", "a=1",
    ]);
    assert!(result.is_err());
}

#[test]
fn malformed_header_is_rejected() {
    assert!(Cli::try_parse_from(["nexus", "new", "/", "-H", "no-colon"]).is_err());
}

#[test]
fn send_takes_a_numeric_id() {
    let cli = Cli::try_parse_from(["nexus", "send", "12"]).unwrap();
    assert!(matches!(cli.command, Command::Send { id } if id == RequestId(12)));
    assert!(Cli::try_parse_from(["nexus", "send", "abc"]).is_err());
}

#[test]
fn global_flags_follow_subcommands() {
    let cli = Cli::try_parse_from([
        "nexus",
        "history",
        "-n",
        "5",
        "--state",
        "/tmp/s.json",
        "--config",
        "nexus.toml",
    ])
    .unwrap();

    assert_eq!(cli.state, Some(PathBuf::from("/tmp/s.json")));
    assert_eq!(cli.config, Some(PathBuf::from("nexus.toml")));
    assert!(matches!(
        cli.command,
        Command::History {
            limit: Some(5),
            clear: false,
            open: None
        }
    ));
}

#[test]
fn history_open_is_one_based_and_excludes_clear() {
    let cli = Cli::try_parse_from(["nexus", "history", "--open", "2"]).unwrap();
    assert!(matches!(cli.command, Command::History { open: Some(2), .. }));
    assert!(Cli::try_parse_from(["nexus", "history", "--open", "0"]).is_err());
    assert!(Cli::try_parse_from(["nexus", "history", "--open", "1", "--clear"]).is_err());
}

#[test]
fn edit_takes_optional_fields() {
    let cli = Cli::try_parse_from([
        "nexus", "edit", "3", "--name", "Renamed", "-X", "put", "-H", "Accept: text/plain",
    ])
    .unwrap();
    let Command::Edit(args) = cli.command else {
        panic!("expected edit");
    };
    assert_eq!(args.id, RequestId(3));
    assert_eq!(args.name.as_deref(), Some("Renamed"));
    assert_eq!(args.method, Some(HttpMethod::Put));
    assert!(args.url.is_none());
    assert_eq!(
        args.headers,
        vec![("Accept".to_string(), "text/plain".to_string())]
    );
    assert!(!args.is_empty());
}

#[test]
fn env_subcommands() {
    let cli = Cli::try_parse_from(["nexus", "env", "set", "dev", "host", "localhost"]).unwrap();
    let Command::Env(EnvCommand::Set { env, key, value }) = cli.command else {
        panic!("expected env set");
    };
    assert_eq!((env.as_str(), key.as_str(), value.as_str()), ("dev", "host", "localhost"));

    let cli = Cli::try_parse_from(["nexus", "env", "clear"]).unwrap();
    assert!(matches!(cli.command, Command::Env(EnvCommand::Clear)));
}

#[test]
fn settings_bearer_conflicts_with_clear() {
    assert!(
        Cli::try_parse_from(["nexus", "settings", "--bearer", "t", "--clear-auth"]).is_err()
    );
    let cli = Cli::try_parse_from(["nexus", "settings"]).unwrap();
    let Command::Settings(args) = cli.command else {
        panic!("expected settings");
    };
    assert!(args.is_empty());
}
