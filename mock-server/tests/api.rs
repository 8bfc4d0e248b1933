use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, EchoGet, EchoPost};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn post_request(content_type: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri("/post")
        .header(http::header::CONTENT_TYPE, content_type)
        .body(body.to_string())
        .unwrap()
}

// --- get ---

#[tokio::test]
async fn get_echoes_request_headers() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/get")
                .header("x-trace-id", "42")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "application/json");
    let echo: EchoGet = body_json(resp).await;
    assert_eq!(echo.headers.get("x-trace-id").map(String::as_str), Some("42"));
}

// --- post ---

#[tokio::test]
async fn post_echoes_json_body() {
    let resp = app()
        .oneshot(post_request("application/json", r#"{"msg":"Go fetch!"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: EchoPost = body_json(resp).await;
    assert_eq!(echo.data, r#"{"msg":"Go fetch!"}"#);
    assert_eq!(echo.json, Some(serde_json::json!({"msg": "Go fetch!"})));
    assert_eq!(
        echo.headers.get("content-type").map(String::as_str),
        Some("application/json")
    );
}

#[tokio::test]
async fn post_with_non_json_body_has_null_json() {
    let resp = app()
        .oneshot(post_request("text/plain", "Hello world!"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: EchoPost = body_json(resp).await;
    assert_eq!(echo.data, "Hello world!");
    assert!(echo.json.is_none());
}

#[tokio::test]
async fn get_on_post_route_is_405() {
    let resp = app()
        .oneshot(Request::builder().uri("/post").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- html ---

#[tokio::test]
async fn html_is_served_as_text_html() {
    let resp = app()
        .oneshot(Request::builder().uri("/html").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[http::header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert_eq!(&body_bytes(resp).await[..], b"<p>not json</p>");
}

// --- fallback ---

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app()
        .oneshot(Request::builder().uri("/nope").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
