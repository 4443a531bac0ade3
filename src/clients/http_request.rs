//! HTTP request types.
//!
//! This module provides the [`HttpRequest`] type and its builder. Requests
//! carry a fully composed URL; see [`build_resource_path`](crate::rest::build_resource_path).

use std::collections::HashMap;
use std::fmt;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used by the topology builder API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// Read one resource or a collection.
    Get,
    /// Create a resource.
    Post,
    /// Conditionally replace a resource.
    Put,
    /// Remove a resource.
    Delete,
}

impl HttpMethod {
    /// Returns `true` for methods that must carry a JSON body.
    #[must_use]
    pub const fn requires_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// An HTTP request to be sent to the API.
///
/// Use [`HttpRequest::builder`] to construct requests. A body is always sent
/// as JSON with `Content-Type: application/json`.
///
/// # Example
///
/// ```rust
/// use tbclient::clients::{HttpRequest, HttpMethod};
/// use serde_json::json;
///
/// let get = HttpRequest::builder(HttpMethod::Get, "http://localhost:8080/topologies")
///     .build()
///     .unwrap();
///
/// let put = HttpRequest::builder(HttpMethod::Put, "http://localhost:8080/topologies/abc")
///     .body(json!({"name": "Updated"}))
///     .header("If-Match", "\"3\"")
///     .build()
///     .unwrap();
/// assert_eq!(put.headers.get("If-Match"), Some(&"\"3\"".to_string()));
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The absolute URL for this request.
    pub url: String,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// Headers added on top of the client's default headers.
    pub headers: HashMap<String, String>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, url: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, url)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `http_method` is `Post` or `Put` but `body` is `None`
    /// - `http_method` is `Get` or `Delete` but `body` is `Some`
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        match (self.http_method.requires_body(), self.body.is_some()) {
            (true, false) => Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            }),
            (false, true) => Err(InvalidHttpRequestError::UnexpectedBody {
                method: self.http_method.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    url: String,
    body: Option<serde_json::Value>,
    headers: HashMap<String, String>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            http_method: method,
            url: url.into(),
            body: None,
            headers: HashMap::new(),
        }
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a single header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Adds every header from the map, replacing existing keys.
    #[must_use]
    #[allow(clippy::implicit_hasher)]
    pub fn headers(mut self, headers: &HashMap<String, String>) -> Self {
        for (key, value) in headers {
            self.headers.insert(key.clone(), value.clone());
        }
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            url: self.url,
            body: self.body,
            headers: self.headers,
        };
        request.verify()?;
        Ok(request)
    }
}
