use http::header::{ACCESS_CONTROL_ALLOW_METHODS, CACHE_CONTROL, CONTENT_ENCODING, CONTENT_TYPE, VARY};
use http::{Method, StatusCode};

use crate::integration::support::{
    body_bytes, body_text, card_origin, get, send, site_origin, state,
};

#[tokio::test]
async fn json_param_wins_over_accept() {
    let res = get(
        state(site_origin(), card_origin()),
        "/card?format=json",
        Some("text/vcard"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], "application/json");
    assert_eq!(res.headers()[CACHE_CONTROL], "public, max-age=3600");
    assert_eq!(res.headers()[VARY], "Accept");
    assert_eq!(body_text(res).await, r#"{"name":"Nate"}"#);
}

#[tokio::test]
async fn vcard_accept_selects_vcard() {
    let res = get(state(site_origin(), card_origin()), "/card", Some("text/vcard")).await;
    assert_eq!(res.headers()[CONTENT_TYPE], "text/vcard");
}

#[tokio::test]
async fn no_preference_serves_plain_text() {
    let res = get(state(site_origin(), card_origin()), "/card", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], "text/plain");
    assert_eq!(body_text(res).await, "Nate Berkopec");
}

#[tokio::test]
async fn options_is_a_preflight() {
    let res = send(
        state(site_origin(), card_origin()),
        Method::OPTIONS,
        "/card",
        None,
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let methods = res.headers()[ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .to_string();
    assert!(methods.contains("GET"));
    assert!(methods.contains("OPTIONS"));
    assert!(body_bytes(res).await.is_empty());
}

#[tokio::test]
async fn wav_keeps_bytes_and_disables_compression() {
    let res = get(state(site_origin(), card_origin()), "/card?format=wav", None).await;
    assert_eq!(res.headers()[CONTENT_TYPE], "audio/wav");
    assert_eq!(res.headers()[CONTENT_ENCODING], "identity");
    assert_eq!(res.headers()["accept-ranges"], "bytes");
    assert_eq!(body_bytes(res).await, vec![0x52u8, 0x49, 0x46, 0x46]);
}

#[tokio::test]
async fn origin_failure_is_a_500_naming_the_format() {
    let card = card_origin();
    card.fail("/card.xml");
    let res = get(state(site_origin(), card), "/card?format=xml", None).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.headers()[CONTENT_TYPE], "text/plain");
    assert_eq!(res.headers()[CACHE_CONTROL], "public, max-age=3600");
    assert!(body_text(res).await.contains("xml"));
}

#[tokio::test]
async fn card_route_does_not_touch_site_origin() {
    let site = site_origin();
    let res = get(state(site.clone(), card_origin()), "/card?format=help", None).await;
    assert!(body_text(res).await.starts_with("Available formats:"));
    assert!(site.fetches().is_empty());
}

#[tokio::test]
async fn card_subpaths_fall_through_to_negotiator() {
    let site = site_origin();
    let res = get(state(site.clone(), card_origin()), "/card/extra", Some("text/markdown")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().get("link").is_some());
    assert_eq!(site.fetches().len(), 1);
    assert_eq!(site.fetches()[0].path, "/card/extra");
}
