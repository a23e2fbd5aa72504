//! Path classification and Markdown path derivation.

use http::header::{HeaderMap, ACCEPT};
use serde::{Deserialize, Serialize};

/// Media type an agent sends in `Accept` to ask for Markdown.
pub const MARKDOWN_MEDIA_TYPE: &str = "text/markdown";

/// How the negotiator routes a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Fetched as-is; never negotiated.
    StaticAsset,
    /// Eligible for Markdown negotiation.
    Negotiable,
}

/// Membership lists that mark a path as a static asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRules {
    /// Path prefixes (`/assets/`).
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,

    /// Path suffixes, including the leading dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Exact discovery document paths.
    #[serde(default = "default_discovery_paths")]
    pub discovery_paths: Vec<String>,
}

fn default_prefixes() -> Vec<String> {
    ["/assets/", "/card"].iter().map(|s| s.to_string()).collect()
}

fn default_extensions() -> Vec<String> {
    [
        ".css", ".js", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".woff", ".woff2", ".ttf",
        ".pdf", ".epub", ".md",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_discovery_paths() -> Vec<String> {
    ["/llms.txt", "/llms-full.txt"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for AssetRules {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
            extensions: default_extensions(),
            discovery_paths: default_discovery_paths(),
        }
    }
}

impl AssetRules {
    pub fn is_static_asset(&self, path: &str) -> bool {
        self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
            || self.extensions.iter().any(|e| path.ends_with(e.as_str()))
            || self.discovery_paths.iter().any(|d| path == d)
    }

    pub fn classify(&self, path: &str) -> PathClass {
        if self.is_static_asset(path) {
            PathClass::StaticAsset
        } else {
            PathClass::Negotiable
        }
    }
}

/// True when any `Accept` value mentions `text/markdown`.
pub fn wants_markdown(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains(MARKDOWN_MEDIA_TYPE))
}

pub fn is_markdown_path(path: &str) -> bool {
    path.ends_with(".md")
}

/// Derive the Markdown sibling of a page path.
///
/// `/blog/slug/` becomes `/blog/slug/index.md`, `/retainer.html` becomes
/// `/retainer.md`, anything else gets `.md` appended.
pub fn markdown_path(path: &str) -> String {
    if path.ends_with('/') {
        format!("{}index.md", path)
    } else if let Some(stem) = path.strip_suffix(".html") {
        format!("{}.md", stem)
    } else {
        format!("{}.md", path)
    }
}
