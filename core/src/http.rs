//! HTTP exchanges described as plain data.
//!
//! # Design
//! `ForgeClient` builds `HttpRequest` values and interprets `HttpResponse`
//! values without touching the network; the transport module turns one into
//! the other. Keeping the boundary as data means the blocking and async paths
//! share the exact same request construction and error mapping, and both can
//! be unit tested without a server.

/// HTTP method for a request. The render API only needs these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL including the client's base.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data. The body is kept as raw bytes
/// because successful renders are binary documents.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
