//! Card Format Resolver
//!
//! Serves a single business card resource in one of several fixed
//! representations. The format comes from `?format=`, then from `Accept`, then
//! falls back to plain text. `help` is built locally; everything else is read
//! from the card origin.

pub mod formats;

pub use formats::{determine_format, format_param, BodyKind, CardFormat, Representation};

use crate::error::EdgeError;
use crate::origin::Origin;
use crate::types::{EdgeResponse, FetchOptions, OriginResponse};
use bytes::Bytes;
use http::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_RANGES, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_MAX_AGE, CACHE_CONTROL, CONTENT_ENCODING,
    CONTENT_TYPE, VARY,
};
use http::request::Parts;
use http::{Method, Response, StatusCode};
use std::sync::Arc;
use tracing::{debug, warn};

pub const CARD_CACHE_CONTROL: &str = "public, max-age=3600";

/// Value of the `Accept` capability header on preflight responses.
pub const SUPPORTED_TYPES_HEADER: &str = "application/json, text/html, text/vcard, text/x-vcard, application/xml, application/x-yaml, text/yaml, image/svg+xml, image/jpeg, audio/wav, text/plain";

pub const HELP_TEXT: &str = "Available formats:
/card                (text)
/card?format=json    (JSON)
/card?format=html    (HTML)
/card?format=vcard   (vCard)
/card?format=wav     (Audio)
/card?format=qrcode  (QR Code)
/card?format=xml     (XML)
/card?format=yaml    (YAML)";

pub struct CardResolver {
    origin: Arc<dyn Origin>,
    route: String,
}

impl CardResolver {
    /// `route` is the path the card is served at, `/card` by default.
    pub fn new(origin: Arc<dyn Origin>, route: impl Into<String>) -> Self {
        Self {
            origin,
            route: route.into(),
        }
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub async fn handle(&self, request: &Parts) -> EdgeResponse {
        if request.method == Method::OPTIONS && request.uri.path() == self.route {
            return preflight_response();
        }

        let format = select_format(request);
        debug!(%format, "Resolved card format");

        match self.dispatch(format).await {
            Ok(response) => response,
            Err(err) => {
                warn!(%format, error = %err, "Card format failed");
                error_response(format, &err)
            }
        }
    }

    async fn dispatch(&self, format: CardFormat) -> Result<EdgeResponse, EdgeError> {
        let repr = format.representation();
        match repr.kind {
            BodyKind::Synthesized => Ok(help_response()),
            BodyKind::Audio => {
                let fetched = self.fetch(repr).await?;
                let mut response = card_response(StatusCode::OK, repr.content_type, fetched.body);
                let headers = response.headers_mut();
                headers.insert(CONTENT_ENCODING, HeaderValue::from_static("identity"));
                headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));
                Ok(response)
            }
            BodyKind::Binary => {
                let fetched = self.fetch(repr).await?;
                Ok(card_response(StatusCode::OK, repr.content_type, fetched.body))
            }
            BodyKind::Text => {
                let text = self.fetch(repr).await?.into_text()?;
                Ok(card_response(
                    StatusCode::OK,
                    repr.content_type,
                    Bytes::from(text),
                ))
            }
        }
    }

    async fn fetch(&self, repr: &Representation) -> Result<OriginResponse, EdgeError> {
        let key = repr.key.ok_or_else(|| {
            EdgeError::ConfigError(format!("format {} has no origin key", repr.format))
        })?;
        self.origin
            .fetch(&format!("/{}", key), FetchOptions::cached())
            .await?
            .require_success()
    }
}

/// Format for a request: query parameter first, then `Accept`.
pub fn select_format(request: &Parts) -> CardFormat {
    let param = format_param(request.uri.query());
    let accept = request
        .headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join(", ");
    determine_format(param.as_deref(), &accept)
}

fn common_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(CARD_CACHE_CONTROL));
    headers.insert(VARY, HeaderValue::from_static("Accept"));
    headers
}

fn card_response(status: StatusCode, content_type: &'static str, body: Bytes) -> EdgeResponse {
    let mut headers = common_headers();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

fn preflight_response() -> EdgeResponse {
    let mut headers = common_headers();
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Accept"));
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
    headers.insert(ACCEPT, HeaderValue::from_static(SUPPORTED_TYPES_HEADER));

    let mut response = Response::new(Bytes::new());
    *response.status_mut() = StatusCode::NO_CONTENT;
    *response.headers_mut() = headers;
    response
}

fn help_response() -> EdgeResponse {
    card_response(StatusCode::OK, "text/plain", Bytes::from_static(HELP_TEXT.as_bytes()))
}

fn error_response(format: CardFormat, err: &EdgeError) -> EdgeResponse {
    let body = format!(
        "Error loading business card format ({}): {}",
        format,
        error_message(err)
    );
    card_response(StatusCode::INTERNAL_SERVER_ERROR, "text/plain", Bytes::from(body))
}

fn error_message(err: &EdgeError) -> String {
    match err {
        EdgeError::UpstreamStatus(_) => err.to_string(),
        EdgeError::OriginUnreachable(detail) | EdgeError::Decode(detail) => detail.clone(),
        other => other.to_string(),
    }
}
