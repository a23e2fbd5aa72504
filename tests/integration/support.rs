use std::sync::Arc;

use axum::body::Body;
use axum::response::Response;
use edge_negotiator::config::EdgeConfig;
use edge_negotiator::origin::StaticOrigin;
use edge_negotiator::server::{router, EdgeState};
use http::header::ACCEPT;
use http::{Method, Request};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub fn site_origin() -> Arc<StaticOrigin> {
    Arc::new(
        StaticOrigin::new()
            .with_object("/", "text/html", "<h1>home</h1>")
            .with_object("/index.md", "text/markdown", "# home")
            .with_object("/blog/slug/", "text/html", "<p>post</p>")
            .with_object("/blog/slug/index.md", "text/markdown", "# post")
            .with_object("/blog/bare", "text/html", "<p>bare</p>")
            .with_object("/blog/bare.md", "text/markdown", "# bare")
            .with_object("/retainer.html", "text/html", "<p>retainer</p>")
            .with_object("/llms.txt", "text/plain", "# Speedshop")
            .with_object("/assets/app.css", "text/css", "body{}"),
    )
}

pub fn card_origin() -> Arc<StaticOrigin> {
    Arc::new(
        StaticOrigin::new()
            .with_object("/card.json", "application/json", r#"{"name":"Nate"}"#)
            .with_object("/card.html", "text/html", "<h1>Nate</h1>")
            .with_object("/card.vcf", "text/vcard", "BEGIN:VCARD\nEND:VCARD")
            .with_object("/card.xml", "application/xml", "<card/>")
            .with_object("/card.yaml", "application/x-yaml", "name: Nate")
            .with_object("/card.svg", "image/svg+xml", "<svg/>")
            .with_object("/card.jpg", "image/jpeg", vec![0xffu8, 0xd8, 0xff])
            .with_object("/card.wav", "audio/wav", vec![0x52u8, 0x49, 0x46, 0x46])
            .with_object("/card.txt", "text/plain", "Nate Berkopec"),
    )
}

pub fn state(site: Arc<StaticOrigin>, card: Arc<StaticOrigin>) -> EdgeState {
    EdgeState::with_origins(&EdgeConfig::default(), site, card).unwrap()
}

pub async fn send(
    state: EdgeState,
    method: Method,
    uri: &str,
    accept: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(accept) = accept {
        builder = builder.header(ACCEPT, accept);
    }
    router(state)
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn get(state: EdgeState, uri: &str, accept: Option<&str>) -> Response {
    send(state, Method::GET, uri, accept).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
