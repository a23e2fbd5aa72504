use super::Origin;
use crate::error::EdgeError;
use crate::types::{FetchOptions, OriginResponse};
use async_trait::async_trait;
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use std::path::{Path, PathBuf};

/// Origin backed by a local build directory (`_site/`).
///
/// Mirrors a plain static file server: a trailing `/` or a directory path
/// serves `index.html`, anything missing is a 404. The cache flag is ignored.
pub struct DirOrigin {
    root: PathBuf,
}

impl DirOrigin {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Map a request path onto the root. `None` if the path escapes it.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let mut resolved = self.root.clone();
        for segment in path.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return None,
                name => resolved.push(name),
            }
        }
        if path.ends_with('/') {
            resolved.push("index.html");
        }
        Some(resolved)
    }
}

#[async_trait]
impl Origin for DirOrigin {
    async fn fetch(&self, path: &str, _options: FetchOptions) -> Result<OriginResponse, EdgeError> {
        let Some(mut file) = self.resolve(path) else {
            tracing::debug!(path, "Rejected path outside origin root");
            return Ok(not_found());
        };

        let is_dir = tokio::fs::metadata(&file)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if is_dir {
            file.push("index.html");
        }

        match tokio::fs::read(&file).await {
            Ok(bytes) => {
                let mut headers = HeaderMap::new();
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type_for(&file)));
                Ok(OriginResponse::new(StatusCode::OK, headers, bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(not_found()),
            Err(e) => Err(EdgeError::Io(e)),
        }
    }
}

fn not_found() -> OriginResponse {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    OriginResponse::new(StatusCode::NOT_FOUND, headers, "Not Found")
}

fn content_type_for(file: &Path) -> &'static str {
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "md" => "text/markdown; charset=utf-8",
        "txt" => "text/plain; charset=utf-8",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "yaml" | "yml" => "application/x-yaml",
        "vcf" => "text/vcard",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "pdf" => "application/pdf",
        "epub" => "application/epub+zip",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}
