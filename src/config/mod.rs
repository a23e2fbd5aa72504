//! Configuration
//!
//! `EdgeConfig` is assembled from built-in defaults, an optional TOML file, and
//! `EDGE__*` environment variables (see [`ConfigLoader`]). Every section is
//! fully defaulted so an empty source set yields a working configuration.

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

use crate::error::EdgeError;
use crate::logging::LoggingConfig;
use crate::negotiator::AssetRules;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_SITE_URL: &str = "https://www.speedshop.co";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub origin: OriginConfig,
    #[serde(default)]
    pub assets: AssetRules,
    #[serde(default)]
    pub card: CardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address, `host:port`.
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute site URL used in the `Link` header.
    #[serde(default = "default_site_url")]
    pub url: String,

    /// Site-relative discovery document path.
    #[serde(default = "default_llms_txt_path")]
    pub llms_txt_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginConfig {
    /// Origin base URL; defaults to the site URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Serve from a local build directory instead of an HTTP origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// HTTP client timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardConfig {
    #[serde(default = "default_card_route")]
    pub route: String,

    /// Card origin base URL; defaults to the site URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_url: Option<String>,
}

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_site_url() -> String {
    DEFAULT_SITE_URL.to_string()
}

fn default_llms_txt_path() -> String {
    "/llms.txt".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_card_route() -> String {
    "/card".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: default_site_url(),
            llms_txt_path: default_llms_txt_path(),
        }
    }
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            dir: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            route: default_card_route(),
            origin_url: None,
        }
    }
}

impl EdgeConfig {
    /// Origin the negotiator fetches pages from.
    pub fn origin_base_url(&self) -> &str {
        self.origin.base_url.as_deref().unwrap_or(&self.site.url)
    }

    /// Origin the card resolver fetches representations from.
    pub fn card_origin_url(&self) -> &str {
        self.card.origin_url.as_deref().unwrap_or(&self.site.url)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, EdgeError> {
        self.server.bind.parse().map_err(|e| {
            EdgeError::ConfigError(format!("Invalid bind address '{}': {}", self.server.bind, e))
        })
    }

    pub fn validate(&self) -> Result<(), EdgeError> {
        check_url("site.url", &self.site.url)?;
        check_url("origin.base_url", self.origin_base_url())?;
        check_url("card.origin_url", self.card_origin_url())?;
        check_route("site.llms_txt_path", &self.site.llms_txt_path)?;
        check_route("card.route", &self.card.route)?;
        if let Some(bad) = self.card.route.chars().find(|c| ROUTE_SYNTAX.contains(c)) {
            return Err(EdgeError::ConfigError(format!(
                "card.route must be a literal path, found '{}' in '{}'",
                bad, self.card.route
            )));
        }
        if self.origin.timeout_secs == 0 {
            return Err(EdgeError::ConfigError(
                "origin.timeout_secs must be positive".to_string(),
            ));
        }
        self.bind_addr()?;
        Ok(())
    }
}

/// Characters the router treats as path parameters or wildcards.
const ROUTE_SYNTAX: [char; 4] = [':', '*', '{', '}'];

fn check_url(field: &str, value: &str) -> Result<(), EdgeError> {
    let invalid = |reason: String| {
        EdgeError::ConfigError(format!(
            "{} must be an http(s) URL, got '{}': {}",
            field, value, reason
        ))
    };
    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid("missing host".to_string())),
    }
}

fn check_route(field: &str, value: &str) -> Result<(), EdgeError> {
    if value.starts_with('/') {
        Ok(())
    } else {
        Err(EdgeError::ConfigError(format!(
            "{} must start with '/', got '{}'",
            field, value
        )))
    }
}
