//! JSON content negotiation for a hook-based HTTP client.
//!
//! # Overview
//! Two hooks sit around every call a [`Client`] makes. Before a request is
//! sent, a structured body is encoded to JSON text and `content-type` /
//! `content-length` are set. After a response arrives, it can be checked
//! with [`Classifiable::is_json`] and decoded with [`JsonDecodable::json`].
//!
//! # Design
//! - The core performs no I/O. A caller-supplied [`Transport`] executes the
//!   round-trip; the hooks only see [`HttpRequest`] / [`HttpResponse`] data.
//! - Request bodies are a tagged [`Body`]; only `Body::Structured` is
//!   encoded, everything else passes through.
//! - Hooks signal completion through a `Result` future, and the client awaits
//!   each one before advancing, so nothing is transmitted until the pre-send
//!   hooks are done.
//!
//! ```rust,no_run
//! use fetch_json::{json, Body, Client, JsonDecodable, Transport};
//!
//! async fn post(transport: impl Transport + 'static) -> Result<(), fetch_json::Error> {
//!     let client = Client::new(transport).with(json());
//!     let body = serde_json::json!({"msg": "Go fetch!"});
//!     let res = client.post("http://localhost:3000/post", Body::structured(body)).await?;
//!     let echoed = res.json().await?;
//!     println!("{echoed}");
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod client;
pub mod error;
pub mod http;
pub mod middleware;

pub use classify::{is_json, Classifiable};
pub use client::{AfterHook, BeforeHook, BoxFuture, Client, HookRegistry, Plugin, Transport};
pub use error::Error;
pub use http::{Body, BodyStream, Headers, HttpMethod, HttpRequest, HttpResponse, Record};
pub use middleware::{
    after_middleware, before_middleware, json, json_with, DecodeJson, EncodeJson, Json,
    JsonDecodable, JsonOptions,
};
