//! HTTP transport for the topology builder API.
//!
//! This module provides the [`HttpClient`] type. One `HttpClient` is built
//! from the shared [`ClientConfig`] for every resource operation, so no
//! connection state is shared between calls.

use std::collections::HashMap;

use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::ClientConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the topology builder API.
///
/// The client handles:
/// - Default headers: `Authorization`, `Accept`, `User-Agent`
/// - `Accept-Encoding: identity` when compression is disabled
/// - `Content-Type: application/json` for requests with a body
/// - Debug logging of bodies when the configuration asks for it
///
/// It never inspects status codes: every response, successful or not, is
/// returned to the caller. Only transport failures become an [`HttpError`].
///
/// # Example
///
/// ```rust,ignore
/// use tbclient::ClientConfig;
/// use tbclient::clients::{HttpClient, HttpRequest, HttpMethod};
///
/// let config = ClientConfig::new(None, "token");
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "http://localhost:8080/topologies")
///     .build()?;
/// let response = client.request(request).await?;
/// println!("{}", response.code);
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// Whether bodies are logged.
    debug: bool,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g. TLS backend initialization failure).
    pub fn new(config: &ClientConfig) -> Result<Self, HttpError> {
        let user_agent = config.user_agent().map_or_else(
            || format!("tbclient-rust v{SDK_VERSION}"),
            ToString::to_string,
        );

        let mut default_headers = HashMap::new();
        default_headers.insert("Authorization".to_string(), config.token().bearer_header());
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("User-Agent".to_string(), user_agent);

        if config.disable_gzip() {
            default_headers.insert("Accept-Encoding".to_string(), "identity".to_string());
        }

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            default_headers,
            debug: config.debug(),
        })
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request and returns the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - The request could not be sent or no response arrived (`Network`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let headers = self.merged_headers(&request);

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        match (&request.body, self.debug) {
            (Some(body), true) => {
                tracing::debug!(method = %request.http_method, url = %request.url, body = %body, "sending request");
            }
            _ => tracing::debug!(method = %request.http_method, url = %request.url, "sending request"),
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body = res.text().await?;

        if self.debug {
            tracing::debug!(status = code, url = %request.url, body = %body, "received response");
        } else {
            tracing::debug!(status = code, url = %request.url, "received response");
        }

        Ok(HttpResponse::new(code, res_headers, body))
    }

    /// Combines default, content-type and per-request headers.
    ///
    /// Header names are case-insensitive, so keys are lowercased and a
    /// later header replaces an earlier one whatever its casing.
    fn merged_headers(&self, request: &HttpRequest) -> HashMap<String, String> {
        let content_type = request
            .body
            .as_ref()
            .map(|_| ("Content-Type", "application/json"));

        self.default_headers
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .chain(content_type)
            .chain(
                request
                    .headers
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            )
            .map(|(key, value)| (key.to_ascii_lowercase(), value.to_string()))
            .collect()
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
