use http::header::{CONTENT_TYPE, LINK, VARY};
use http::StatusCode;

use crate::integration::support::{body_text, card_origin, get, site_origin, state};

const LINK_VALUE: &str = "<https://www.speedshop.co/llms.txt>; rel=\"llms-txt\"";

#[tokio::test]
async fn markdown_agent_gets_markdown_for_directory_page() {
    let site = site_origin();
    let res = get(
        state(site.clone(), card_origin()),
        "/blog/slug/",
        Some("text/markdown, text/html;q=0.5"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], "text/markdown; charset=utf-8");
    assert_eq!(res.headers()["x-robots-tag"], "noindex, nofollow");
    assert_eq!(res.headers()[LINK], LINK_VALUE);
    assert_eq!(res.headers()["x-llms-txt"], "/llms.txt");
    assert_eq!(res.headers()[VARY], "Accept");
    assert_eq!(body_text(res).await, "# post");

    let fetches = site.fetches();
    assert_eq!(fetches.len(), 1);
    assert_eq!(fetches[0].path, "/blog/slug/index.md");
    assert!(fetches[0].bypass_cache);
}

#[tokio::test]
async fn markdown_agent_gets_markdown_for_bare_and_root_paths() {
    let res = get(state(site_origin(), card_origin()), "/blog/bare", Some("text/markdown")).await;
    assert_eq!(body_text(res).await, "# bare");

    let res = get(state(site_origin(), card_origin()), "/", Some("text/markdown")).await;
    assert_eq!(body_text(res).await, "# home");
}

#[tokio::test]
async fn markdown_miss_serves_html_without_markdown_headers() {
    let res = get(
        state(site_origin(), card_origin()),
        "/retainer.html",
        Some("text/markdown"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], "text/html");
    assert!(res.headers().get("x-robots-tag").is_none());
    assert_eq!(res.headers()[LINK], LINK_VALUE);
    assert_eq!(body_text(res).await, "<p>retainer</p>");
}

#[tokio::test]
async fn markdown_origin_failure_serves_html() {
    let site = site_origin();
    site.fail("/blog/slug/index.md");
    let res = get(state(site, card_origin()), "/blog/slug/", Some("text/markdown")).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("x-robots-tag").is_none());
    assert_eq!(body_text(res).await, "<p>post</p>");
}

#[tokio::test]
async fn browsers_get_html_with_discovery_headers() {
    let res = get(
        state(site_origin(), card_origin()),
        "/blog/slug/",
        Some("text/html,application/xhtml+xml"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[LINK], LINK_VALUE);
    assert_eq!(res.headers()[VARY], "Accept");
    assert_eq!(body_text(res).await, "<p>post</p>");
}

#[tokio::test]
async fn missing_pages_keep_origin_status() {
    let res = get(state(site_origin(), card_origin()), "/nowhere", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers()[LINK], LINK_VALUE);
}

#[tokio::test]
async fn discovery_document_is_a_static_asset() {
    let site = site_origin();
    let res = get(state(site.clone(), card_origin()), "/llms.txt", Some("text/markdown")).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], "text/plain");
    assert!(res.headers().get("x-robots-tag").is_none());
    assert_eq!(site.fetches().len(), 1);
    assert!(!site.fetches()[0].bypass_cache);
}

#[tokio::test]
async fn static_assets_pass_through() {
    let res = get(state(site_origin(), card_origin()), "/assets/app.css", None).await;
    assert_eq!(res.headers()[CONTENT_TYPE], "text/css");
    assert_eq!(res.headers()[VARY], "Accept");
    assert_eq!(body_text(res).await, "body{}");
}
