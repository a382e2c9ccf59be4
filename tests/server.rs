//! Integration test: the form endpoints, with a local upstream page.

mod common;

use std::sync::Arc;

use mp4_dl::{server, PageResolver};
use serde_json::json;

const PAGE: &str =
    "... https://a.com/x.mp4 ... https://a.com/x.mp4 ... https://a.com/x.t.mp4 ...";

fn form_body(video_url: &str) -> String {
    format!("videoUrl={}", video_url)
}

#[tokio::test]
async fn api_returns_urls_and_id() {
    let upstream = common::page_server::start(PAGE);
    let routes = server::routes(Arc::new(PageResolver::new()));

    let res = warp::test::request()
        .method("POST")
        .path("/api/extract")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(form_body(&upstream.url("/path/clip-name.mp4")))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 200);
    let payload: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(
        payload,
        json!({ "mp4Urls": ["https://a.com/x.mp4"], "videoId": "clip-name" })
    );
}

#[tokio::test]
async fn api_propagates_upstream_status() {
    let upstream = common::page_server::start_with_status("404 Not Found", "gone");
    let routes = server::routes(Arc::new(PageResolver::new()));

    let res = warp::test::request()
        .method("POST")
        .path("/api/extract")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(form_body(&upstream.url("/missing")))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 404);
    let payload: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
    assert!(payload["error"].as_str().unwrap().contains("Failed to fetch video"));
    assert!(payload.get("mp4Urls").is_none());
}

#[tokio::test]
async fn api_reports_transport_failure_as_500() {
    let routes = server::routes(Arc::new(PageResolver::new()));

    let res = warp::test::request()
        .method("POST")
        .path("/api/extract")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(form_body(&format!(
            "{}/clip.mp4",
            common::page_server::closed_url()
        )))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 500);
    let payload: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
    assert!(!payload["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn index_renders_form() {
    let routes = server::routes(Arc::new(PageResolver::new()));

    let res = warp::test::request().method("GET").path("/").reply(&routes).await;

    assert_eq!(res.status(), 200);
    let html = String::from_utf8_lossy(res.body());
    assert!(html.contains(r#"<form method="post">"#));
    assert!(html.contains("Please ensure the video URL is correct"));
}

#[tokio::test]
async fn form_post_renders_results() {
    let upstream = common::page_server::start(PAGE);
    let routes = server::routes(Arc::new(PageResolver::new()));

    let res = warp::test::request()
        .method("POST")
        .path("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(form_body(&upstream.url("/path/clip-name.mp4")))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 200);
    let html = String::from_utf8_lossy(res.body());
    assert!(html.contains("Video ID: clip-name"));
    assert!(html.contains(
        r#"<a href="&#x2F;download?url=https%3A%2F%2Fa.com%2Fx.mp4&amp;id=clip-name">Download clip-name.mp4</a>"#
    ));
    assert_eq!(html.matches("<video").count(), 1);
}

#[tokio::test]
async fn form_post_renders_error_text() {
    let upstream = common::page_server::start_with_status("404 Not Found", "gone");
    let routes = server::routes(Arc::new(PageResolver::new()));

    let res = warp::test::request()
        .method("POST")
        .path("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(form_body(&upstream.url("/missing")))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 404);
    let html = String::from_utf8_lossy(res.body());
    assert!(html.contains(r#"<p class="error">"#));
}

#[tokio::test]
async fn download_route_serves_named_attachment() {
    let body: Vec<u8> = (0u8..=255).cycle().take(64 * 1024).collect();
    let media = common::page_server::start(body.clone());
    let routes = server::routes(Arc::new(PageResolver::new()));

    let res = warp::test::request()
        .method("GET")
        .path(&format!(
            "/download?url={}&id=clip-name",
            urlencoding::encode(&media.url("/cdn/x.mp4"))
        ))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()["content-disposition"],
        "attachment; filename=\"clip-name.mp4\""
    );
    assert_eq!(res.headers()["content-type"], "video/mp4");
    assert_eq!(res.body().as_ref(), body.as_slice());
    assert!(media.requests()[0].starts_with("GET /cdn/x.mp4 "));
}

#[tokio::test]
async fn download_route_without_id_falls_back() {
    let media = common::page_server::start("bytes");
    let routes = server::routes(Arc::new(PageResolver::new()));

    let res = warp::test::request()
        .method("GET")
        .path(&format!(
            "/download?url={}",
            urlencoding::encode(&media.url("/x.mp4"))
        ))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()["content-disposition"],
        "attachment; filename=\"video.mp4\""
    );
}

#[tokio::test]
async fn download_route_reports_upstream_failure() {
    let media = common::page_server::start_with_status("404 Not Found", "gone");
    let routes = server::routes(Arc::new(PageResolver::new()));

    let res = warp::test::request()
        .method("GET")
        .path(&format!(
            "/download?url={}&id=clip-name",
            urlencoding::encode(&media.url("/x.mp4"))
        ))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), 502);
    assert!(res.headers().get("content-disposition").is_none());
}
