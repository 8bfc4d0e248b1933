//! Hook pipeline around a caller-supplied transport.
//!
//! # Design
//! `Client` owns no connection state. It keeps an ordered list of pre-send
//! and post-receive hooks plus a `Transport` that performs the actual
//! round-trip, so the hooks stay deterministic and testable without a
//! network.
//!
//! Hooks complete by returning a `Result` future instead of calling a
//! continuation. `send` awaits each one before moving on, so a request is
//! never transmitted until every pre-send hook has finished, and an error
//! from any of them aborts the call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::Error;
use crate::http::{Body, HttpMethod, HttpRequest, HttpResponse};

/// A heap-allocated, type-erased future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Runs on every outbound request before it is handed to the transport.
pub trait BeforeHook: Send + Sync {
    fn call<'a>(&'a self, request: &'a mut HttpRequest) -> BoxFuture<'a, Result<(), Error>>;
}

/// Runs on every inbound response before application code receives it.
pub trait AfterHook: Send + Sync {
    fn call<'a>(&'a self, response: &'a mut HttpResponse) -> BoxFuture<'a, Result<(), Error>>;
}

/// Anything that accepts pre-send and post-receive hooks.
///
/// Both methods return `self` so registrations chain.
pub trait HookRegistry {
    fn before(&mut self, hook: Arc<dyn BeforeHook>) -> &mut Self;
    fn after(&mut self, hook: Arc<dyn AfterHook>) -> &mut Self;
}

/// Something that configures a registry, such as the JSON middleware.
///
/// Any `FnOnce(&mut R)` closure is a plugin.
pub trait Plugin<R> {
    fn install(self, registry: &mut R);
}

impl<R, F: FnOnce(&mut R)> Plugin<R> for F {
    fn install(self, registry: &mut R) {
        self(registry)
    }
}

/// Executes a request against the network.
///
/// Implemented by the caller; the core never performs I/O.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> BoxFuture<'static, Result<HttpResponse, Error>>;
}

/// Client that threads every request and response through its hooks.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    before: Vec<Arc<dyn BeforeHook>>,
    after: Vec<Arc<dyn AfterHook>>,
}

impl Client {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Applies a plugin, typically one that registers hooks.
    pub fn with(mut self, plugin: impl Plugin<Self>) -> Self {
        plugin.install(&mut self);
        self
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponse, Error> {
        self.send(HttpRequest::new(HttpMethod::Get, url)).await
    }

    pub async fn post(&self, url: &str, body: impl Into<Body>) -> Result<HttpResponse, Error> {
        self.send(HttpRequest::new(HttpMethod::Post, url).with_body(body))
            .await
    }

    /// Runs pre-send hooks in registration order, executes the request,
    /// then runs post-receive hooks in registration order.
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, Error> {
        for hook in &self.before {
            hook.call(&mut request).await?;
        }
        debug!(method = %request.method, url = %request.url, "sending request");

        let mut response = self.transport.execute(request).await?;
        trace!(status = response.status, "response received");

        for hook in &self.after {
            hook.call(&mut response).await?;
        }
        Ok(response)
    }
}

impl HookRegistry for Client {
    fn before(&mut self, hook: Arc<dyn BeforeHook>) -> &mut Self {
        self.before.push(hook);
        self
    }

    fn after(&mut self, hook: Arc<dyn AfterHook>) -> &mut Self {
        self.after.push(hook);
        self
    }
}
