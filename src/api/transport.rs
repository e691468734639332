//! Wire access to the backend.

use super::{ApiError, ApiResult};
use serde_json::Value;

/// HTTP verbs used by the resource clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// Status and body of a response, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues one request against the backend.
///
/// Implementations only fail with [`ApiError::Transport`]; status codes are
/// returned as-is and classified by the resource client.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> ApiResult<RawResponse>;
}

/// Transport backed by a blocking `reqwest` client.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Creates a transport rooted at `base_url` (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> ApiResult<RawResponse> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Patch => self.client.patch(&url),
            Method::Delete => self.client.delete(&url),
        };
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                ApiError::Transport(format!("cannot connect to {}", self.base_url))
            } else {
                ApiError::Transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| ApiError::Transport(format!("failed to read response body: {e}")))?;

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalised() {
        let transport = HttpTransport::new("http://localhost:8000/api/").unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn success_range() {
        let ok = RawResponse { status: 204, body: String::new() };
        let bad = RawResponse { status: 404, body: String::new() };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}
