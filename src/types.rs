//! Core types shared by the origin layer and the edge handlers.

use crate::error::EdgeError;
use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};

/// Response produced by every handler. Bodies are fully buffered.
pub type EdgeResponse = Response<Bytes>;

/// Per-fetch options passed to an [`Origin`](crate::origin::Origin).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Skip any cache between the edge and the origin store.
    pub bypass_cache: bool,
}

impl FetchOptions {
    pub fn cached() -> Self {
        Self {
            bypass_cache: false,
        }
    }

    pub fn bypass() -> Self {
        Self { bypass_cache: true }
    }
}

/// Buffered response from the origin store.
#[derive(Debug, Clone)]
pub struct OriginResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl OriginResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Fail with [`EdgeError::UpstreamStatus`] unless the status is 2xx.
    pub fn require_success(self) -> Result<Self, EdgeError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(EdgeError::UpstreamStatus(self.status.as_u16()))
        }
    }

    /// Decode the body as UTF-8 text.
    pub fn into_text(self) -> Result<String, EdgeError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| EdgeError::Decode(format!("body is not valid UTF-8: {}", e)))
    }
}
