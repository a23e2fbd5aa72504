//! Discovery header policy.
//!
//! Every negotiated response advertises the discovery document through `Link`
//! and `X-Llms-Txt`, and varies on `Accept`. Markdown responses additionally
//! opt out of indexing and get an authoritative Markdown content type.

use crate::error::EdgeError;
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, LINK, VARY};

pub const X_LLMS_TXT: HeaderName = HeaderName::from_static("x-llms-txt");
pub const X_ROBOTS_TAG: HeaderName = HeaderName::from_static("x-robots-tag");

pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";
pub const ROBOTS_NOINDEX: &str = "noindex, nofollow";

/// Precomputed discovery header values.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    link: HeaderValue,
    llms_txt: HeaderValue,
}

impl HeaderPolicy {
    /// `site_url` is the absolute base (`https://www.speedshop.co`),
    /// `llms_txt_path` the site-relative discovery path (`/llms.txt`).
    pub fn new(site_url: &str, llms_txt_path: &str) -> Result<Self, EdgeError> {
        let link = format!(
            "<{}{}>; rel=\"llms-txt\"",
            site_url.trim_end_matches('/'),
            llms_txt_path
        );
        let link = HeaderValue::from_str(&link)
            .map_err(|e| EdgeError::ConfigError(format!("Invalid Link header value: {}", e)))?;
        let llms_txt = HeaderValue::from_str(llms_txt_path)
            .map_err(|e| EdgeError::ConfigError(format!("Invalid llms.txt path: {}", e)))?;
        Ok(Self { link, llms_txt })
    }

    pub fn link(&self) -> &HeaderValue {
        &self.link
    }

    /// Stamp the policy onto `headers`. Policy headers overwrite; `Vary` merges.
    pub fn apply(&self, headers: &mut HeaderMap, is_markdown: bool) {
        headers.insert(LINK, self.link.clone());
        headers.insert(X_LLMS_TXT, self.llms_txt.clone());

        if is_markdown {
            headers.insert(X_ROBOTS_TAG, HeaderValue::from_static(ROBOTS_NOINDEX));
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(MARKDOWN_CONTENT_TYPE));
        }

        merge_vary(headers);
    }
}

/// Ensure `Vary` lists `Accept` exactly once without dropping other tokens.
///
/// Tokens compare case-insensitively and whole, so `Accept-Encoding` does not
/// satisfy `Accept`. `Vary: *` already covers every request header. Multiple
/// `Vary` lines are folded into one value when `Accept` has to be added.
pub fn merge_vary(headers: &mut HeaderMap) {
    let tokens: Vec<String> = headers
        .get_all(VARY)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .flat_map(|v| {
            v.split(',')
                .map(|t| t.trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|t| !t.is_empty())
        .collect();

    if tokens
        .iter()
        .any(|t| t == "*" || t.eq_ignore_ascii_case("accept"))
    {
        return;
    }

    let mut merged = tokens.join(", ");
    if merged.is_empty() {
        merged.push_str("Accept");
    } else {
        merged.push_str(", Accept");
    }

    match HeaderValue::from_str(&merged) {
        Ok(value) => {
            headers.insert(VARY, value);
        }
        Err(_) => {
            headers.append(VARY, HeaderValue::from_static("Accept"));
        }
    }
}
