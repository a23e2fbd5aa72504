use super::Origin;
use crate::error::EdgeError;
use crate::types::{FetchOptions, OriginResponse};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};

/// One observed call to [`StaticOrigin::fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRecord {
    pub path: String,
    pub bypass_cache: bool,
}

#[derive(Debug, Clone)]
struct StoredObject {
    status: StatusCode,
    content_type: Option<&'static str>,
    body: Bytes,
}

/// In-memory origin.
///
/// Unknown paths answer 404. Paths registered with [`StaticOrigin::fail`]
/// produce a transport error instead of a response. Every call is logged.
#[derive(Default)]
pub struct StaticOrigin {
    objects: RwLock<HashMap<String, StoredObject>>,
    failures: RwLock<HashSet<String>>,
    fetches: Mutex<Vec<FetchRecord>>,
}

impl StaticOrigin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(
        self,
        path: &str,
        content_type: &'static str,
        body: impl Into<Bytes>,
    ) -> Self {
        self.insert(path, content_type, body);
        self
    }

    /// Store a 200 response at `path`.
    pub fn insert(&self, path: &str, content_type: &'static str, body: impl Into<Bytes>) {
        self.objects.write().insert(
            path.to_string(),
            StoredObject {
                status: StatusCode::OK,
                content_type: Some(content_type),
                body: body.into(),
            },
        );
    }

    /// Store an arbitrary status at `path`.
    pub fn insert_status(&self, path: &str, status: StatusCode, body: impl Into<Bytes>) {
        self.objects.write().insert(
            path.to_string(),
            StoredObject {
                status,
                content_type: None,
                body: body.into(),
            },
        );
    }

    /// Make fetches of `path` fail without a response.
    pub fn fail(&self, path: &str) {
        self.failures.write().insert(path.to_string());
    }

    pub fn fetches(&self) -> Vec<FetchRecord> {
        self.fetches.lock().clone()
    }
}

#[async_trait]
impl Origin for StaticOrigin {
    async fn fetch(&self, path: &str, options: FetchOptions) -> Result<OriginResponse, EdgeError> {
        self.fetches.lock().push(FetchRecord {
            path: path.to_string(),
            bypass_cache: options.bypass_cache,
        });

        if self.failures.read().contains(path) {
            return Err(EdgeError::OriginUnreachable(format!(
                "connection refused: {}",
                path
            )));
        }

        let stored = self.objects.read().get(path).cloned();
        let Some(object) = stored else {
            return Ok(OriginResponse::new(
                StatusCode::NOT_FOUND,
                HeaderMap::new(),
                "Not Found",
            ));
        };

        let mut headers = HeaderMap::new();
        if let Some(content_type) = object.content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        Ok(OriginResponse::new(object.status, headers, object.body))
    }
}
