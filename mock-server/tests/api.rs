use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_log, failing_app, Received, PDF_BYTES, PNG_BYTES};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn render_request(body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri("/render")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- health ---

#[tokio::test]
async fn health_returns_200() {
    let resp = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn failing_health_returns_500() {
    let resp = failing_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// --- render ---

#[tokio::test]
async fn render_pdf_returns_pdf_bytes() {
    let resp = app()
        .oneshot(render_request(r#"{"format":"pdf","html":"<h1>Hi</h1>"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "application/pdf");
    assert_eq!(body_bytes(resp).await.as_ref(), PDF_BYTES);
}

#[tokio::test]
async fn render_png_returns_png_bytes() {
    let resp = app()
        .oneshot(render_request(r#"{"format":"png","url":"https://example.com","width":800}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "image/png");
    assert_eq!(body_bytes(resp).await.as_ref(), PNG_BYTES);
}

#[tokio::test]
async fn render_validation_error_is_json() {
    let resp = app()
        .oneshot(render_request(
            r#"{"format":"png","html":"x","quantize":{"colors":300}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "colors must be between 2 and 256");
}

#[tokio::test]
async fn render_unknown_field_is_rejected() {
    let resp = app()
        .oneshot(render_request(r#"{"format":"pdf","html":"x","dpi":300}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("invalid request"));
}

#[tokio::test]
async fn render_malformed_json_is_rejected() {
    let resp = app().oneshot(render_request("{not json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn failing_render_has_plain_text_body() {
    let resp = failing_app()
        .oneshot(render_request(r#"{"format":"pdf","html":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = body_bytes(resp).await;
    assert!(serde_json::from_slice::<serde_json::Value>(&body).is_err());
}

// --- request log ---

#[tokio::test]
async fn received_bodies_are_recorded_in_order() {
    use tower::Service;

    let received = Received::default();
    let mut app = app_with_log(received.clone()).into_service();

    for body in [
        r#"{"format":"pdf","html":"first"}"#,
        r#"{"format":"svg","url":"https://example.com"}"#,
    ] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(render_request(body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/_received"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let logged: Vec<serde_json::Value> = body_json(resp).await;
    assert_eq!(logged.len(), 2);
    assert_eq!(logged[0]["html"], "first");
    assert_eq!(logged[1]["format"], "svg");
    assert_eq!(received.read().await.len(), 2);
}
