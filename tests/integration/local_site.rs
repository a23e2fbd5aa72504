use std::fs;

use edge_negotiator::config::EdgeConfig;
use edge_negotiator::server::EdgeState;
use http::header::CONTENT_TYPE;
use http::StatusCode;
use tempfile::TempDir;

use crate::integration::support::{body_text, get};

fn build_site() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("2020/01/02/fast-rails")).unwrap();
    fs::write(root.join("index.html"), "<h1>home</h1>").unwrap();
    fs::write(root.join("2020/01/02/fast-rails.html"), "<p>fast</p>").unwrap();
    fs::write(root.join("2020/01/02/fast-rails.md"), "# Fast Rails").unwrap();
    fs::write(root.join("llms.txt"), "# Speedshop\n").unwrap();
    fs::write(root.join("card.txt"), "Nate").unwrap();
    fs::write(root.join("card.json"), "{}").unwrap();
    temp
}

fn local_state(temp: &TempDir) -> EdgeState {
    let mut config = EdgeConfig::default();
    config.origin.dir = Some(temp.path().to_path_buf());
    config.validate().unwrap();
    EdgeState::from_config(&config).unwrap()
}

#[tokio::test]
async fn html_page_negotiates_to_sibling_markdown() {
    let temp = build_site();
    let res = get(
        local_state(&temp),
        "/2020/01/02/fast-rails.html",
        Some("text/markdown"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], "text/markdown; charset=utf-8");
    assert_eq!(body_text(res).await, "# Fast Rails");
}

#[tokio::test]
async fn root_without_markdown_falls_back_to_index_html() {
    let temp = build_site();
    let res = get(local_state(&temp), "/", Some("text/markdown")).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
    assert_eq!(body_text(res).await, "<h1>home</h1>");
}

#[tokio::test]
async fn card_is_served_from_the_same_directory() {
    let temp = build_site();
    let res = get(local_state(&temp), "/card", None).await;
    assert_eq!(res.headers()[CONTENT_TYPE], "text/plain");
    assert_eq!(body_text(res).await, "Nate");

    let res = get(local_state(&temp), "/card?format=vcard", None).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(res).await.contains("(vcard): Upstream 404"));
}
