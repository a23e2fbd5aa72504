use clap::Parser;
use edge_negotiator::config::EdgeConfig;
use edge_negotiator::tooling::cli::{Cli, CliContext, Commands, ConfigCommands};

use crate::integration::support::{card_origin, site_origin, state};

fn context() -> CliContext {
    CliContext::with_state(EdgeConfig::default(), state(site_origin(), card_origin()))
}

fn probe(path: &str, accept: Option<&str>, method: &str, format: &str, body: bool) -> Commands {
    Commands::Probe {
        path: path.to_string(),
        accept: accept.map(|a| a.to_string()),
        method: method.to_string(),
        format: format.to_string(),
        body,
    }
}

#[test]
fn probe_json_contract_has_required_fields() {
    let output = context()
        .execute(&probe("/blog/slug/", Some("text/markdown"), "GET", "json", true))
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["method"], "GET");
    assert_eq!(parsed["path"], "/blog/slug/");
    assert_eq!(parsed["status"], 200);
    assert_eq!(parsed["body"], "# post");
    assert_eq!(parsed["body_bytes"], 6);
    let headers = parsed["headers"].as_object().expect("headers object");
    assert_eq!(headers["content-type"], "text/markdown; charset=utf-8");
    assert_eq!(headers["x-robots-tag"], "noindex, nofollow");
    assert_eq!(headers["vary"], "Accept");
}

#[test]
fn probe_routes_card_path_to_resolver() {
    let output = context()
        .execute(&probe("/card?format=json", None, "get", "json", false))
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["status"], 200);
    assert_eq!(parsed["headers"]["content-type"], "application/json");
    assert!(parsed.get("body").is_none());

    let output = context()
        .execute(&probe("/card", None, "OPTIONS", "json", false))
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["status"], 204);
    assert_eq!(parsed["body_bytes"], 0);
}

#[test]
fn probe_text_lists_status_and_headers() {
    let output = context()
        .execute(&probe("/retainer.html", Some("text/markdown"), "GET", "text", true))
        .unwrap();
    assert!(output.starts_with("GET /retainer.html -> 200 OK"));
    assert!(output.contains("x-llms-txt"));
    assert!(output.contains("<p>retainer</p>"));
    assert!(!output.contains("x-robots-tag"));
}

#[test]
fn probe_rejects_unparseable_paths() {
    assert!(context()
        .execute(&probe("not a path", None, "GET", "text", false))
        .is_err());
}

#[test]
fn cli_parses_subcommands() {
    let cli = Cli::try_parse_from([
        "edge",
        "probe",
        "/blog/slug/",
        "--accept",
        "text/markdown",
        "--format",
        "json",
    ])
    .unwrap();
    match cli.command {
        Commands::Probe {
            path,
            accept,
            method,
            format,
            body,
        } => {
            assert_eq!(path, "/blog/slug/");
            assert_eq!(accept.as_deref(), Some("text/markdown"));
            assert_eq!(method, "GET");
            assert_eq!(format, "json");
            assert!(!body);
        }
        _ => panic!("expected probe"),
    }

    let cli = Cli::try_parse_from(["edge", "serve", "--bind", "0.0.0.0:9000"]).unwrap();
    assert!(matches!(cli.command, Commands::Serve { bind: Some(addr), .. } if addr.port() == 9000));

    let cli = Cli::try_parse_from(["edge", "--config", "edge.toml", "config", "show"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Config {
            command: ConfigCommands::Show
        }
    ));
    assert!(cli.config.is_some());

    assert!(Cli::try_parse_from(["edge", "probe"]).is_err());
    assert!(Cli::try_parse_from(["edge", "--log-output", "syslog", "markdown-path", "/"]).is_err());
}

#[test]
fn markdown_path_command_output() {
    let output = context()
        .execute(&Commands::MarkdownPath {
            path: "/blog/slug".to_string(),
        })
        .unwrap();
    assert_eq!(output, "/blog/slug -> /blog/slug.md");
}
