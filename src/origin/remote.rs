use super::Origin;
use crate::error::EdgeError;
use crate::types::{FetchOptions, OriginResponse};
use async_trait::async_trait;
use http::header::{HeaderMap, CACHE_CONTROL, PRAGMA};
use std::time::Duration;

const HOP_BY_HOP: [&str; 3] = ["connection", "keep-alive", "transfer-encoding"];

/// Origin reached over HTTP, e.g. object storage behind a CDN.
pub struct HttpOrigin {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOrigin {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EdgeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EdgeError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a request path.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl Origin for HttpOrigin {
    async fn fetch(&self, path: &str, options: FetchOptions) -> Result<OriginResponse, EdgeError> {
        let url = self.url_for(path);
        let mut request = self.client.get(&url);
        if options.bypass_cache {
            request = request
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }

        let response = request
            .send()
            .await
            .map_err(|e| EdgeError::OriginUnreachable(format!("{}: {}", url, e)))?;
        let status = response.status();
        let mut headers = response.headers().clone();
        strip_hop_by_hop(&mut headers);

        let body = response
            .bytes()
            .await
            .map_err(|e| EdgeError::Decode(format!("Failed to read body from {}: {}", url, e)))?;

        tracing::debug!(%url, status = status.as_u16(), bytes = body.len(), "Origin fetch");
        Ok(OriginResponse::new(status, headers, body))
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}
