//! Origin Store Access
//!
//! The edge handlers never talk to storage directly. They go through the
//! [`Origin`] trait, a keyed fetch against wherever the site's representations
//! live: a remote HTTP origin, a local build directory, or an in-memory map.

mod dir;
mod memory;
mod remote;

pub use dir::DirOrigin;
pub use memory::{FetchRecord, StaticOrigin};
pub use remote::HttpOrigin;

use crate::config::OriginConfig;
use crate::error::EdgeError;
use crate::types::{FetchOptions, OriginResponse};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Fetch capability against the origin store.
///
/// `path` is an absolute request path (`/blog/slug.md`). A non-2xx status is
/// a successful fetch; `Err` means no response was obtained at all.
#[async_trait]
pub trait Origin: Send + Sync {
    async fn fetch(&self, path: &str, options: FetchOptions) -> Result<OriginResponse, EdgeError>;
}

#[async_trait]
impl<T: Origin + ?Sized> Origin for Arc<T> {
    async fn fetch(&self, path: &str, options: FetchOptions) -> Result<OriginResponse, EdgeError> {
        (**self).fetch(path, options).await
    }
}

/// Build the origin for `base_url`, or the local directory origin when
/// `origin.dir` is configured.
pub fn build_origin(config: &OriginConfig, base_url: &str) -> Result<Arc<dyn Origin>, EdgeError> {
    if let Some(dir) = &config.dir {
        tracing::debug!(dir = %dir.display(), "Using local directory origin");
        return Ok(Arc::new(DirOrigin::new(dir.clone())));
    }
    let origin = HttpOrigin::new(base_url, Duration::from_secs(config.timeout_secs))?;
    Ok(Arc::new(origin))
}
