//! Logging System
//!
//! `tracing` subscriber setup for the edge binary. [`LoggingConfig`] picks the
//! level, format, and destination; `EDGE_LOG*` variables win over it.

use crate::error::EdgeError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const ENV_FILTER: &str = "EDGE_LOG";
const ENV_FORMAT: &str = "EDGE_LOG_FORMAT";
const ENV_OUTPUT: &str = "EDGE_LOG_OUTPUT";
const ENV_MODULES: &str = "EDGE_LOG_MODULES";
const ENV_FILE: &str = "EDGE_LOG_FILE";

/// Line format of emitted events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("invalid log format '{}' (expected text or json)", other)),
        }
    }
}

/// Where events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogOutput {
    #[serde(rename = "stdout")]
    Stdout,
    #[default]
    #[serde(rename = "stderr")]
    Stderr,
    #[serde(rename = "file")]
    File,
    #[serde(rename = "file+stderr")]
    FileAndStderr,
    #[serde(rename = "both")]
    Both,
}

impl LogOutput {
    fn writes_file(self) -> bool {
        matches!(self, Self::File | Self::FileAndStderr)
    }
}

impl FromStr for LogOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            "file" => Ok(Self::File),
            "file+stderr" => Ok(Self::FileAndStderr),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "invalid log output '{}' (expected stdout, stderr, file, file+stderr, or both)",
                other
            )),
        }
    }
}

impl fmt::Display for LogOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
            Self::File => "file",
            Self::FileAndStderr => "file+stderr",
            Self::Both => "both",
        };
        f.write_str(name)
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    /// Base filter level: trace, debug, info, warn, error, off
    #[serde(default = "info_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    /// Used when `output` writes a file; unset means the platform state dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// ANSI colors for text output on a terminal stream
    #[serde(default = "enabled_by_default")]
    pub color: bool,

    /// Per-target levels, e.g. `edge_negotiator::card = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn info_level() -> String {
    "info".to_string()
}

fn enabled_by_default() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: info_level(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file: None,
            color: true,
            modules: HashMap::new(),
        }
    }
}

/// Log file location. An explicit path wins, then `EDGE_LOG_FILE`, then
/// `edge.log` under the platform state (or cache) directory.
pub fn resolve_log_file_path(explicit: Option<&Path>) -> Result<PathBuf, EdgeError> {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path.to_path_buf());
    }
    match std::env::var(ENV_FILE) {
        Ok(env_path) if !env_path.is_empty() => return Ok(PathBuf::from(env_path)),
        _ => {}
    }

    let dirs = directories::ProjectDirs::from("", "", "edge").ok_or_else(|| {
        EdgeError::ConfigError("Could not determine a state directory for the log file".into())
    })?;
    let base = dirs.state_dir().unwrap_or_else(|| dirs.cache_dir());
    Ok(base.join("edge.log"))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), EdgeError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    if !config.enabled {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .map_err(already_initialized);
    }

    let filter = build_env_filter(config)?;
    let format = effective_format(config)?;
    let output = effective_output(config)?;
    let writer = make_writer(output, config.file.as_deref())?;
    let ansi = config.color && !output.writes_file();

    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);
    let registry = Registry::default().with(filter);
    let result = match format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Text => registry.with(layer.with_ansi(ansi)).try_init(),
    };
    result.map_err(already_initialized)
}

fn already_initialized(e: impl fmt::Display) -> EdgeError {
    EdgeError::ConfigError(format!("Logging already initialized: {}", e))
}

fn make_writer(output: LogOutput, file: Option<&Path>) -> Result<BoxMakeWriter, EdgeError> {
    let writer = match output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::Both => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
        LogOutput::File => BoxMakeWriter::new(open_log_file(&resolve_log_file_path(file)?)?),
        LogOutput::FileAndStderr => {
            let log_file = open_log_file(&resolve_log_file_path(file)?)?;
            BoxMakeWriter::new(log_file.and(std::io::stderr))
        }
    };
    Ok(writer)
}

fn open_log_file(path: &Path) -> Result<Arc<File>, EdgeError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            EdgeError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(Arc::new)
        .map_err(|e| EdgeError::ConfigError(format!("Failed to open log file {:?}: {}", path, e)))
}

/// `EDGE_LOG` replaces the whole filter. Otherwise the configured level is
/// extended with `modules` and then `EDGE_LOG_MODULES` (`target=level,...`).
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, EdgeError> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_FILTER) {
        return Ok(filter);
    }
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let from_env = std::env::var(ENV_MODULES).unwrap_or_default();
    let env_pairs = from_env.split(',').filter_map(|spec| {
        let (target, level) = spec.split_once('=')?;
        Some((target.trim().to_string(), level.trim().to_string()))
    });

    let mut filter = EnvFilter::new(&config.level);
    for (target, level) in config
        .modules
        .iter()
        .map(|(t, l)| (t.clone(), l.clone()))
        .chain(env_pairs)
    {
        let directive = format!("{}={}", target, level)
            .parse()
            .map_err(|e| EdgeError::ConfigError(format!("Invalid log directive: {}", e)))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

fn effective_format(config: &LoggingConfig) -> Result<LogFormat, EdgeError> {
    match std::env::var(ENV_FORMAT) {
        Ok(value) => value.parse().map_err(EdgeError::ConfigError),
        Err(_) => Ok(config.format),
    }
}

fn effective_output(config: &LoggingConfig) -> Result<LogOutput, EdgeError> {
    match std::env::var(ENV_OUTPUT) {
        Ok(value) => value.parse().map_err(EdgeError::ConfigError),
        Err(_) => Ok(config.output),
    }
}
