//! CLI Tooling
//!
//! `edge serve` runs the server; `edge probe` pushes one request through the
//! same handlers and prints what a client would receive.

use crate::config::{ConfigLoader, EdgeConfig};
use crate::error::EdgeError;
use crate::logging::{LogFormat, LogOutput, LoggingConfig};
use crate::negotiator::{markdown_path, PathClass};
use crate::server::{self, EdgeState};
use crate::types::EdgeResponse;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use http::{Method, Request, Uri};
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Edge CLI - content negotiation for the blog and business card
#[derive(Parser)]
#[command(name = "edge")]
#[command(about = "Serve Markdown to agents, HTML to browsers, and the business card in many formats")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<LogOutput>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold logging flags into the loaded logging config.
    pub fn apply_logging_overrides(&self, logging: &mut LoggingConfig) {
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = self.log_format {
            logging.format = format;
        }
        if let Some(output) = self.log_output {
            logging.output = output;
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the edge server until interrupted
    Serve {
        /// Listen address (overrides server.bind)
        #[arg(long)]
        bind: Option<SocketAddr>,
        /// Serve from a local build directory instead of the HTTP origin
        #[arg(long)]
        origin_dir: Option<PathBuf>,
    },
    /// Send one request through the handlers and print the response
    Probe {
        /// Request path, optionally with a query string (`/card?format=json`)
        path: String,
        /// Accept header to send
        #[arg(long)]
        accept: Option<String>,
        /// HTTP method
        #[arg(long, default_value = "GET")]
        method: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Include the response body in the output
        #[arg(long)]
        body: bool,
    },
    /// Show how a page path is classified and which Markdown path it maps to
    MarkdownPath {
        /// Page path (`/blog/slug/`)
        path: String,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
}

/// CLI execution context: loaded configuration plus lazily built handlers.
pub struct CliContext {
    config: EdgeConfig,
    state: Option<EdgeState>,
}

impl CliContext {
    /// Load configuration from the standard sources and `config_path`.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, EdgeError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: EdgeConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Use prebuilt handlers instead of building origins from config.
    pub fn with_state(config: EdgeConfig, state: EdgeState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EdgeConfig {
        &mut self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, EdgeError> {
        match command {
            Commands::Serve { bind, origin_dir } => self.handle_serve(*bind, origin_dir.clone()),
            Commands::Probe {
                path,
                accept,
                method,
                format,
                body,
            } => self.handle_probe(path, accept.as_deref(), method, format, *body),
            Commands::MarkdownPath { path } => Ok(self.handle_markdown_path(path)),
            Commands::Config { command } => match command {
                ConfigCommands::Show => toml::to_string_pretty(&self.config)
                    .map_err(|e| EdgeError::Render(format!("config as TOML: {}", e))),
            },
        }
    }

    fn handle_serve(
        &self,
        bind: Option<SocketAddr>,
        origin_dir: Option<PathBuf>,
    ) -> Result<String, EdgeError> {
        let mut config = self.config.clone();
        if origin_dir.is_some() {
            config.origin.dir = origin_dir;
        }
        config.validate()?;

        let rt = runtime()?;
        rt.block_on(server::serve(&config, bind))?;
        Ok("Edge server stopped".to_string())
    }

    fn handle_probe(
        &self,
        path: &str,
        accept: Option<&str>,
        method: &str,
        format: &str,
        include_body: bool,
    ) -> Result<String, EdgeError> {
        if format != "text" && format != "json" {
            return Err(EdgeError::ConfigError(format!(
                "Invalid output format: {} (must be 'text' or 'json')",
                format
            )));
        }

        let uri: Uri = path
            .parse()
            .map_err(|e| EdgeError::InvalidPath(format!("{}: {}", path, e)))?;
        let method: Method = method
            .to_ascii_uppercase()
            .parse()
            .map_err(|e| EdgeError::InvalidPath(format!("Invalid method {}: {}", method, e)))?;

        let mut builder = Request::builder().method(method.clone()).uri(uri);
        if let Some(accept) = accept {
            builder = builder.header(http::header::ACCEPT, accept);
        }
        let (parts, ()) = builder
            .body(())
            .map_err(|e| EdgeError::InvalidPath(format!("{}: {}", path, e)))?
            .into_parts();

        let state = match &self.state {
            Some(state) => state.clone(),
            None => EdgeState::from_config(&self.config)?,
        };
        let rt = runtime()?;
        let response = rt.block_on(state.dispatch(&parts));

        if format == "json" {
            Ok(probe_json(&method, path, &response, include_body))
        } else {
            Ok(probe_text(&method, path, &response, include_body))
        }
    }

    fn handle_markdown_path(&self, path: &str) -> String {
        let page = path.split('?').next().unwrap_or(path);
        if page == self.config.card.route {
            return format!("{} -> card resolver (no markdown negotiation)", page);
        }
        match self.config.assets.classify(page) {
            PathClass::StaticAsset => format!("{} -> static asset (no markdown negotiation)", page),
            PathClass::Negotiable => format!("{} -> {}", page, markdown_path(page)),
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, EdgeError> {
    Ok(tokio::runtime::Runtime::new()?)
}

fn header_pairs(response: &EdgeResponse) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (name, value) in response.headers() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        match pairs.iter_mut().find(|(n, _)| n == name.as_str()) {
            Some((_, existing)) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => pairs.push((name.as_str().to_string(), value)),
        }
    }
    pairs.sort();
    pairs
}

fn probe_text(method: &Method, path: &str, response: &EdgeResponse, include_body: bool) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Header", "Value"]);
    for (name, value) in header_pairs(response) {
        table.add_row(vec![name, value]);
    }

    let mut out = format!("{} {} -> {}\n{}\n", method, path, response.status(), table);
    out.push_str(&format!("{} bytes", response.body().len()));
    if include_body {
        out.push_str("\n\n");
        out.push_str(&String::from_utf8_lossy(response.body()));
    }
    out
}

fn probe_json(method: &Method, path: &str, response: &EdgeResponse, include_body: bool) -> String {
    let headers: serde_json::Map<String, serde_json::Value> = header_pairs(response)
        .into_iter()
        .map(|(name, value)| (name, serde_json::Value::String(value)))
        .collect();
    let mut report = json!({
        "method": method.as_str(),
        "path": path,
        "status": response.status().as_u16(),
        "headers": headers,
        "body_bytes": response.body().len(),
    });
    if include_body {
        report["body"] = json!(String::from_utf8_lossy(response.body()));
    }
    serde_json::to_string_pretty(&report).unwrap_or_else(|_| report.to_string())
}
