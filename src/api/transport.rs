//! The request/response seam between the API clients and the network.
//!
//! Clients build an [`ApiRequest`] and hand it to a [`Transport`]. The
//! production implementation is [`HttpTransport`], a blocking reqwest client
//! rooted at `<site>/wp-json/wp/v2`. Tests swap in a recording mock so client
//! logic runs without a server.

use super::ApiError;
use reqwest::header::{AUTHORIZATION, HeaderMap};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Path prefix of the `wp/v2` namespace under the site root.
pub const API_PREFIX: &str = "/wp-json/wp/v2";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// One API call, relative to the `wp/v2` namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Route below the namespace, e.g. `posts` or `posts/12`.
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Full `Authorization` header value.
    pub authorization: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            authorization: None,
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            authorization: None,
            body: Some(body),
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn authorization(mut self, header: &str) -> Self {
        self.authorization = Some(header.to_string());
        self
    }

    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status line, the WordPress pagination headers, and body text.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub reason: String,
    /// `X-WP-Total`: number of matching records.
    pub total: Option<u32>,
    /// `X-WP-TotalPages`: number of pages at the requested page size.
    pub total_pages: Option<u32>,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode a read response. Non-2xx becomes [`ApiError::Status`].
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if !self.is_success() {
            return Err(ApiError::Status {
                status: self.status,
                reason: self.reason.clone(),
            });
        }
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Decode a write response. Non-2xx becomes [`ApiError::Rejected`] with
    /// the body passed through untouched.
    pub fn written<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if !self.is_success() {
            return Err(ApiError::Rejected {
                status: self.status,
                body: self.body.clone(),
            });
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Sends API requests. Implementations perform exactly one exchange per call.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        (**self).send(request)
    }
}

/// Blocking reqwest transport.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base: String,
}

impl HttpTransport {
    /// `site_url` is the WordPress site root; the `wp/v2` prefix is appended.
    pub fn new(site_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("press-front/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base: format!("{}{}", site_url.trim_end_matches('/'), API_PREFIX),
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}/{}", self.base, request.path.trim_start_matches('/'));
        debug!(method = %request.method, %url, query = ?request.query, "api request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        builder = builder.query(&request.query);
        if let Some(auth) = &request.authorization {
            builder = builder.header(AUTHORIZATION, auth);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder
            .send()
            .map_err(|e| ApiError::Transport(format!("{} {url}: {e}", request.method)))?;

        let status = resp.status();
        let total = header_u32(resp.headers(), "x-wp-total");
        let total_pages = header_u32(resp.headers(), "x-wp-totalpages");
        let body = resp
            .text()
            .map_err(|e| ApiError::Transport(format!("read body: {e}")))?;
        debug!(status = status.as_u16(), bytes = body.len(), "api response");

        Ok(ApiResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            total,
            total_pages,
            body,
        })
    }
}

fn header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
