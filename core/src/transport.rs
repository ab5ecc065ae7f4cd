//! Executes `HttpRequest`s over the network.
//!
//! # Design
//! Blocking calls go through a `ureq::Agent`, async calls through a
//! `reqwest::Client`. Both are connection pools that are cheap to clone and
//! safe to share between threads, so `ForgeClient` hands out clones and the
//! functions here stay stateless. Non-200 statuses are returned as data; only
//! failures that prevent a complete response become errors.

use std::time::Duration;

use tracing::debug;

use crate::error::{ForgeError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub(crate) fn blocking_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

pub(crate) fn async_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(ForgeError::connection)
}

/// Perform `request` on the calling thread.
pub(crate) fn execute_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse> {
    debug!(method = ?request.method, url = %request.url, "sending request");

    let result = match request.method {
        HttpMethod::Get => {
            let mut builder = agent.get(&request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        HttpMethod::Post => {
            let mut builder = agent.post(&request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            match &request.body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    };
    let mut response = result.map_err(ForgeError::connection)?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    // Rendered documents regularly exceed ureq's default body cap.
    let body = response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_vec()
        .map_err(ForgeError::connection)?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

/// Perform `request` without blocking the executor.
pub(crate) async fn execute_async(client: &reqwest::Client, request: HttpRequest) -> Result<HttpResponse> {
    debug!(method = ?request.method, url = %request.url, "sending request");

    let method = match request.method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
    };
    let mut builder = client.request(method, &request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(body) = request.body {
        builder = builder.body(body);
    }
    let response = builder.send().await.map_err(ForgeError::connection)?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let body = response.bytes().await.map_err(ForgeError::connection)?.to_vec();

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
