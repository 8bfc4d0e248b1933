//! JSON content negotiation hooks.
//!
//! # Design
//! The pre-send hook encodes `Body::Structured` payloads to JSON text and
//! sets `content-type` and `content-length`. Every other body passes through
//! untouched. The post-receive hook leaves the response as it is: the JSON
//! check and decoder are capabilities of the response type itself
//! (`Classifiable`, `JsonDecodable`), so there is nothing to attach at
//! runtime.
//!
//! Both hooks edit the message in place through `&mut` and signal completion
//! by resolving their future, which lets them sit in an async pipeline even
//! though neither suspends.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::classify::Classifiable;
use crate::client::{AfterHook, BeforeHook, BoxFuture, HookRegistry, Plugin};
use crate::error::Error;
use crate::http::{Body, HttpRequest, HttpResponse, CONTENT_LENGTH, CONTENT_TYPE};

const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Settings for the request side of the middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonOptions {
    content_type: String,
}

impl JsonOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the `content-type` written on encoded requests.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }
}

/// Encodes a structured request body with the default options.
///
/// On a serialization error the request is left exactly as it was.
pub async fn before_middleware(request: &mut HttpRequest) -> Result<(), Error> {
    encode_body(request, &JsonOptions::default())
}

/// Prepares a response for JSON consumption. Never fails.
pub async fn after_middleware(response: &mut HttpResponse) -> Result<(), Error> {
    trace!(
        status = response.status,
        is_json = response.is_json(),
        "response passed JSON middleware"
    );
    Ok(())
}

fn encode_body(request: &mut HttpRequest, options: &JsonOptions) -> Result<(), Error> {
    let Some(Body::Structured(record)) = &request.body else {
        return Ok(());
    };

    let value = record.to_value().map_err(|e| {
        warn!(url = %request.url, error = %e, "request body could not be encoded as JSON");
        Error::Serialization(e)
    })?;
    let Value::Object(map) = value else {
        trace!(url = %request.url, "structured body is not a record, leaving it as is");
        return Ok(());
    };
    let json = serde_json::to_string(&map).map_err(Error::Serialization)?;

    debug!(url = %request.url, length = json.len(), "encoded request body as JSON");
    request
        .headers
        .insert(CONTENT_TYPE, options.content_type.as_str());
    request.headers.insert(CONTENT_LENGTH, json.len().to_string());
    request.body = Some(Body::Text(json));
    Ok(())
}

/// A message whose body can be decoded as JSON.
pub trait JsonDecodable {
    /// Reads the body text and parses it. Each call reads and parses again.
    fn json(&self) -> BoxFuture<'_, Result<Value, Error>>;
}

impl JsonDecodable for HttpResponse {
    fn json(&self) -> BoxFuture<'_, Result<Value, Error>> {
        Box::pin(self.json_as::<Value>())
    }
}

impl HttpResponse {
    /// Parses the body into `T`.
    pub async fn json_as<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let text = self.text().await?;
        serde_json::from_str(&text).map_err(Error::Parse)
    }
}

/// Pre-send hook that encodes structured bodies.
#[derive(Debug, Clone, Default)]
pub struct EncodeJson {
    options: JsonOptions,
}

impl EncodeJson {
    pub fn new(options: JsonOptions) -> Self {
        Self { options }
    }
}

impl BeforeHook for EncodeJson {
    fn call<'a>(&'a self, request: &'a mut HttpRequest) -> BoxFuture<'a, Result<(), Error>> {
        Box::pin(async move { encode_body(request, &self.options) })
    }
}

/// Post-receive hook paired with [`EncodeJson`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeJson;

impl AfterHook for DecodeJson {
    fn call<'a>(&'a self, response: &'a mut HttpResponse) -> BoxFuture<'a, Result<(), Error>> {
        Box::pin(after_middleware(response))
    }
}

/// Installer that registers the JSON hooks on any [`HookRegistry`].
///
/// Obtained from [`json`] or [`json_with`]. Each call to
/// [`register`](Json::register) adds a fresh pair of hooks.
#[derive(Debug, Clone, Default)]
pub struct Json {
    options: JsonOptions,
}

impl Json {
    pub fn register<R: HookRegistry>(&self, registry: &mut R) {
        registry
            .before(Arc::new(EncodeJson::new(self.options.clone())))
            .after(Arc::new(DecodeJson));
    }
}

impl<R: HookRegistry> Plugin<R> for Json {
    fn install(self, registry: &mut R) {
        self.register(registry);
    }
}

/// Returns an installer for the JSON hooks with default options.
///
/// ```rust,no_run
/// # use fetch_json::{json, Client, Transport};
/// # fn build(transport: impl Transport + 'static) -> Client {
/// Client::new(transport).with(json())
/// # }
/// ```
pub fn json() -> Json {
    json_with(JsonOptions::default())
}

/// Like [`json`], with custom options for the request side.
pub fn json_with(options: JsonOptions) -> Json {
    Json { options }
}
