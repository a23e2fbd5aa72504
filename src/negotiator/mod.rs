//! Agent Content Negotiator
//!
//! Sits in front of the whole site. Requests whose `Accept` mentions
//! `text/markdown` get the Markdown sibling of the page when origin has one;
//! everyone else gets the page as stored. Every response carries the
//! discovery headers from [`HeaderPolicy`].

pub mod classify;
pub mod headers;

pub use classify::{markdown_path, wants_markdown, AssetRules, PathClass};
pub use headers::{merge_vary, HeaderPolicy};

use crate::config::EdgeConfig;
use crate::error::EdgeError;
use crate::origin::Origin;
use crate::types::{EdgeResponse, FetchOptions, OriginResponse};
use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use http::request::Parts;
use http::{Response, StatusCode};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of the opportunistic Markdown fetch.
#[derive(Debug)]
pub enum MarkdownLookup {
    Found(OriginResponse),
    Unavailable(MarkdownMiss),
}

/// Why the Markdown representation could not be served.
#[derive(Debug)]
pub enum MarkdownMiss {
    /// Origin answered with a non-2xx status.
    Status(StatusCode),
    /// Origin could not be reached or the body could not be read.
    Error(EdgeError),
}

pub struct AgentNegotiator {
    origin: Arc<dyn Origin>,
    rules: AssetRules,
    policy: HeaderPolicy,
}

impl AgentNegotiator {
    pub fn new(origin: Arc<dyn Origin>, rules: AssetRules, policy: HeaderPolicy) -> Self {
        Self {
            origin,
            rules,
            policy,
        }
    }

    pub fn from_config(config: &EdgeConfig, origin: Arc<dyn Origin>) -> Result<Self, EdgeError> {
        let policy = HeaderPolicy::new(&config.site.url, &config.site.llms_txt_path)?;
        Ok(Self::new(origin, config.assets.clone(), policy))
    }

    /// Route one request. Never fails: origin errors become responses.
    pub async fn handle(&self, request: &Parts) -> EdgeResponse {
        let path = request.uri.path();

        if self.rules.classify(path) == PathClass::StaticAsset {
            let is_markdown = classify::is_markdown_path(path);
            debug!(path, is_markdown, "Serving static asset");
            return self.passthrough(path, is_markdown).await;
        }

        if wants_markdown(&request.headers) {
            match self.lookup_markdown(path).await {
                MarkdownLookup::Found(found) => {
                    debug!(path, "Serving markdown representation");
                    return self.markdown_response(found);
                }
                MarkdownLookup::Unavailable(miss) => {
                    debug!(path, ?miss, "Markdown unavailable, falling back to HTML");
                }
            }
        }

        self.passthrough(path, false).await
    }

    /// Fetch the Markdown sibling of `path`, bypassing caches.
    pub async fn lookup_markdown(&self, path: &str) -> MarkdownLookup {
        let md_path = markdown_path(path);
        match self.origin.fetch(&md_path, FetchOptions::bypass()).await {
            Ok(res) if res.is_success() => MarkdownLookup::Found(res),
            Ok(res) => MarkdownLookup::Unavailable(MarkdownMiss::Status(res.status)),
            Err(err) => MarkdownLookup::Unavailable(MarkdownMiss::Error(err)),
        }
    }

    fn markdown_response(&self, found: OriginResponse) -> EdgeResponse {
        self.shape(StatusCode::OK, found.headers, found.body, true)
    }

    async fn passthrough(&self, path: &str, is_markdown: bool) -> EdgeResponse {
        match self.origin.fetch(path, FetchOptions::cached()).await {
            Ok(res) => self.shape(res.status, res.headers, res.body, is_markdown),
            Err(err) => {
                warn!(path, error = %err, "Origin fetch failed");
                let mut headers = HeaderMap::new();
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                );
                self.shape(
                    StatusCode::BAD_GATEWAY,
                    headers,
                    Bytes::from(err.to_string()),
                    false,
                )
            }
        }
    }

    fn shape(
        &self,
        status: StatusCode,
        mut headers: HeaderMap,
        body: Bytes,
        is_markdown: bool,
    ) -> EdgeResponse {
        self.policy.apply(&mut headers, is_markdown);
        let mut response = Response::new(body);
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}
