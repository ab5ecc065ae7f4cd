//! Forge client: request building, response parsing and pooled transports.
//!
//! # Design
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! blocking and async entry points only differ in which transport executes the
//! request in between, so payload construction and error mapping exist once.
//!
//! Transport handles are created on first use and cached. `close()` drops
//! them (a later call creates fresh ones) and `Drop` closes as well, so a
//! client scoped to a block releases its connections when the block ends.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

use crate::builder::RenderRequestBuilder;
use crate::config::ClientConfig;
use crate::error::{ForgeError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::payload::{RenderPayload, RenderSource};
use crate::transport;

const USER_AGENT: &str = concat!("forge-sdk/", env!("CARGO_PKG_VERSION"));

/// Client for a Forge rendering server.
///
/// Construct once per server and share it; builders created by
/// [`render_html`](Self::render_html) and friends borrow it.
pub struct ForgeClient {
    base_url: String,
    timeout: Duration,
    blocking: Mutex<Option<ureq::Agent>>,
    nonblocking: Mutex<Option<reqwest::Client>>,
}

impl fmt::Debug for ForgeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForgeClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ForgeClient {
    /// Client for `base_url` with the default 120 second timeout.
    pub fn new(base_url: &str) -> Self {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            blocking: Mutex::new(None),
            nonblocking: Mutex::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start a render request from an HTML string.
    pub fn render_html(&self, html: impl Into<String>) -> RenderRequestBuilder<'_> {
        self.render(RenderSource::Html(html.into()))
    }

    /// Start a render request from a URL the server will load.
    pub fn render_url(&self, url: impl Into<String>) -> RenderRequestBuilder<'_> {
        self.render(RenderSource::Url(url.into()))
    }

    /// Start a render request. No I/O happens until the builder is sent.
    pub fn render(&self, source: RenderSource) -> RenderRequestBuilder<'_> {
        RenderRequestBuilder::new(self, source)
    }

    /// `true` if `GET /health` answers 200. Transport failures count as
    /// unhealthy rather than errors.
    pub async fn health(&self) -> bool {
        let response = match self.async_handle() {
            Ok(client) => transport::execute_async(&client, self.build_health()).await,
            Err(err) => Err(err),
        };
        self.fold_health(response)
    }

    /// Blocking variant of [`health`](Self::health).
    pub fn health_sync(&self) -> bool {
        let response = transport::execute_blocking(&self.blocking_handle(), self.build_health());
        self.fold_health(response)
    }

    /// Release pooled connections. Safe to call repeatedly or on a client
    /// that never sent anything.
    pub fn close(&self) {
        if lock(&self.blocking).take().is_some() {
            debug!(base_url = %self.base_url, "closed blocking transport");
        }
        if lock(&self.nonblocking).take().is_some() {
            debug!(base_url = %self.base_url, "closed async transport");
        }
    }

    pub fn build_health(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/health", self.base_url),
            headers: vec![("user-agent".to_string(), USER_AGENT.to_string())],
            body: None,
        }
    }

    pub fn parse_health(&self, response: HttpResponse) -> bool {
        response.status == 200
    }

    pub fn build_render(&self, payload: &RenderPayload) -> Result<HttpRequest> {
        if payload.source.is_empty() {
            return Err(ForgeError::EmptySource);
        }
        if let Some(field) = payload.non_finite_field() {
            return Err(ForgeError::InvalidValue(field));
        }
        let body = serde_json::to_string(payload)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/render", self.base_url),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("user-agent".to_string(), USER_AGENT.to_string()),
            ],
            body: Some(body),
        })
    }

    /// Return the rendered bytes untouched on 200, otherwise a `Server` error
    /// carrying the `error` field of the JSON body or `"HTTP <status>"`.
    pub fn parse_render(&self, response: HttpResponse) -> Result<Vec<u8>> {
        if response.status == 200 {
            debug!(
                content_type = response.header("content-type").unwrap_or("-"),
                bytes = response.body.len(),
                "render succeeded"
            );
            return Ok(response.body);
        }
        let message = serde_json::from_slice::<serde_json::Value>(&response.body)
            .ok()
            .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        warn!(status = response.status, %message, "render rejected by server");
        Err(ForgeError::Server {
            status: response.status,
            message,
        })
    }

    pub(crate) fn send_blocking(&self, payload: &RenderPayload) -> Result<Vec<u8>> {
        let request = self.build_render(payload)?;
        let response = transport::execute_blocking(&self.blocking_handle(), request)?;
        self.parse_render(response)
    }

    pub(crate) async fn send_async(&self, payload: &RenderPayload) -> Result<Vec<u8>> {
        let request = self.build_render(payload)?;
        let client = self.async_handle()?;
        let response = transport::execute_async(&client, request).await?;
        self.parse_render(response)
    }

    fn fold_health(&self, response: Result<HttpResponse>) -> bool {
        match response {
            Ok(response) => self.parse_health(response),
            Err(err) => {
                debug!(base_url = %self.base_url, error = %err, "health check failed");
                false
            }
        }
    }

    fn blocking_handle(&self) -> ureq::Agent {
        lock(&self.blocking)
            .get_or_insert_with(|| {
                debug!(base_url = %self.base_url, "opening blocking transport");
                transport::blocking_agent(self.timeout)
            })
            .clone()
    }

    fn async_handle(&self) -> Result<reqwest::Client> {
        let mut slot = lock(&self.nonblocking);
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        debug!(base_url = %self.base_url, "opening async transport");
        let client = transport::async_client(self.timeout)?;
        *slot = Some(client.clone());
        Ok(client)
    }
}

impl Drop for ForgeClient {
    fn drop(&mut self) {
        self.close();
    }
}
