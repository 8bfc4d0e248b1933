//! HTTP message types that flow through the hook pipeline.
//!
//! # Design
//! Requests and responses are plain data. The core never opens a socket:
//! a `Transport` supplied by the caller turns an `HttpRequest` into an
//! `HttpResponse`, and the hooks only ever see these values.
//!
//! Request bodies are a tagged variant. Only `Body::Structured` is a
//! candidate for JSON encoding; bytes, text and streams pass through the
//! pipeline untouched, so no runtime type inspection is needed.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::io::{self, Read};

use bytes::Bytes;
use serde::Serialize;

use crate::error::Error;

pub const CONTENT_TYPE: &str = "content-type";
pub const CONTENT_LENGTH: &str = "content-length";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header name to value mapping with unique keys.
///
/// Names are stored exactly as inserted. The surrounding client is expected
/// to hand over lower-cased names; nothing here folds case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Sets `name` to `value`, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Headers {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Converts a value to a JSON tree without naming its concrete type.
trait JsonTree {
    fn to_json_tree(&self) -> serde_json::Result<serde_json::Value>;
}

impl<T: Serialize> JsonTree for T {
    fn to_json_tree(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// A key-value record waiting to be encoded as a JSON object.
///
/// Serialization is deferred until the request goes through the JSON
/// middleware, which is where a failure (for example a map whose keys are
/// not strings) gets reported. Only values that serialize to a JSON object
/// are encoded there; arrays, strings, numbers and `null` pass through.
pub struct Record(Box<dyn JsonTree + Send + Sync>);

impl Record {
    pub fn new<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self(Box::new(value))
    }

    pub(crate) fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        self.0.to_json_tree()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self::new(map)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Record(..)")
    }
}

/// Opaque readable body. The pipeline hands it to the transport as is.
pub struct BodyStream(Box<dyn Read + Send + Sync>);

impl BodyStream {
    pub fn new(reader: impl Read + Send + Sync + 'static) -> Self {
        Self(Box::new(reader))
    }
}

impl Read for BodyStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BodyStream(..)")
    }
}

/// Outbound request payload.
#[derive(Debug)]
pub enum Body {
    Bytes(Bytes),
    Text(String),
    Stream(BodyStream),
    Structured(Record),
}

impl Body {
    /// Wraps a serializable value as a `Body::Structured`. Only values that
    /// serialize to a JSON object are encoded by the JSON middleware.
    pub fn structured<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Body::Structured(Record::new(value))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(bytes))
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<BodyStream> for Body {
    fn from(stream: BodyStream) -> Self {
        Body::Stream(stream)
    }
}

impl From<Record> for Body {
    fn from(record: Record) -> Self {
        Body::Structured(record)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Body {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Body::Structured(map.into())
    }
}

/// An outbound HTTP request described as plain data.
///
/// Pre-send hooks receive it by `&mut` and edit it in place before the
/// transport sees it.
#[derive(Debug)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Body>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// An inbound HTTP response described as plain data.
///
/// Built by the transport once the round-trip completes; post-receive hooks
/// see it before application code does.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, headers: Headers, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Reads the full payload as UTF-8 text.
    pub async fn text(&self) -> Result<String, Error> {
        let text = std::str::from_utf8(&self.body)?;
        Ok(text.to_string())
    }
}
