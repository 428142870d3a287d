//! HTTP transport types and the network seam.
//!
//! # Design
//! Requests and responses are described as plain data. `ApiClient` builds an
//! `HttpRequest`, hands it to a `Transport`, and parses the `HttpResponse` it
//! gets back. The transport is the only place that touches the network, so
//! the client can be exercised in tests with a canned transport.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `ApiClient::build_request`. `url` is absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Failures that happen before a response is received.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request was never sent (malformed URL, bad header value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("timeout of {}ms exceeded", .after.as_millis())]
    Timeout { after: Duration },

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("network error: {0}")]
    Other(String),
}

/// Executes one request and returns the raw response.
///
/// Any status code is a successful round-trip; only failures to obtain a
/// response are errors.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by a `reqwest::Client` with a fixed timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    fn map_error(&self, error: reqwest::Error) -> TransportError {
        if error.is_builder() {
            TransportError::InvalidRequest(error.to_string())
        } else if error.is_timeout() {
            TransportError::Timeout {
                after: self.timeout,
            }
        } else if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else {
            TransportError::Other(error.to_string())
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_owned(), value.to_owned()))
            })
            .collect();
        let body = response.text().await.map_err(|e| self.map_error(e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_are_uppercase() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: String::new(),
        };
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert!(response.header("authorization").is_none());
    }

    #[test]
    fn success_range_is_2xx() {
        let mut response = HttpResponse {
            status: 201,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(response.is_success());
        response.status = 302;
        assert!(!response.is_success());
    }

    #[test]
    fn timeout_message_reports_millis() {
        let err = TransportError::Timeout {
            after: Duration::from_secs(10),
        };
        assert_eq!(err.to_string(), "timeout of 10000ms exceeded");
    }
}
