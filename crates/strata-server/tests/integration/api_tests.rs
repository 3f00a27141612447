use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use strata_core::AppError;

use crate::integration::common::{setup_failing_fetch_app, setup_test_app};

async fn json_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn scrape_request(url: &str) -> Request<Body> {
    let body = serde_json::json!({ "url": url });
    Request::post("/scrape")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn healthz_returns_ok() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn scrape_returns_wrapped_result() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(scrape_request("https://acme.test/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let result = &json["result"];

    assert_eq!(result["url"], "https://acme.test/");
    assert!(result["scrapedAt"].is_string());
    assert_eq!(result["meta"]["title"], "Acme");
    assert_eq!(result["sections"][0]["id"], "nav-0");
    assert_eq!(result["sections"][1]["type"], "section");
    assert_eq!(result["interactions"]["scrolls"], 0);
    assert_eq!(result["errors"][0]["phase"], "render");
    assert_eq!(app.renderer.calls(), 1);
}

#[tokio::test]
async fn invalid_url_returns_400() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(scrape_request("not a url"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "invalid_url");
    assert!(app.fetcher.requested.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unsupported_scheme_returns_400() {
    let app = setup_test_app();

    let response = app
        .router
        .oneshot(scrape_request("ftp://acme.test/file"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["message"].as_str().unwrap().contains("ftp"));
}

#[tokio::test]
async fn fetch_failure_is_reported_in_result() {
    let app = setup_failing_fetch_app(AppError::HttpStatus(404));

    let response = app
        .router
        .oneshot(scrape_request("https://acme.test/missing"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let result = &json["result"];

    assert_eq!(
        result["errors"],
        serde_json::json!([{ "message": "HTTP 404", "phase": "fetch" }])
    );
    assert_eq!(result["sections"], serde_json::json!([]));
    assert_eq!(result["meta"]["language"], "en");
    assert_eq!(app.renderer.calls(), 0);
}
