use std::collections::BTreeMap;

use axum::{
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;

/// Body returned by `/get`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EchoGet {
    pub headers: BTreeMap<String, String>,
}

/// Body returned by `/post`. `json` is `null` when the request body was not
/// valid JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EchoPost {
    pub data: String,
    pub headers: BTreeMap<String, String>,
    pub json: Option<Value>,
}

pub fn app() -> Router {
    Router::new()
        .route("/get", get(echo_get))
        .route("/post", post(echo_post))
        .route("/html", get(html))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo_get(headers: HeaderMap) -> Json<EchoGet> {
    Json(EchoGet {
        headers: header_map(&headers),
    })
}

async fn echo_post(headers: HeaderMap, body: String) -> Json<EchoPost> {
    let json: Option<Value> = serde_json::from_str(&body).ok();
    tracing::debug!(bytes = body.len(), parsed = json.is_some(), "echoing POST body");
    Json(EchoPost {
        data: body,
        headers: header_map(&headers),
        json,
    })
}

async fn html() -> (StatusCode, [(header::HeaderName, &'static str); 1], &'static str) {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        "<p>not json</p>",
    )
}

/// Header names come out of `HeaderMap` lower-cased. Values that are not
/// visible ASCII are skipped.
fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
