//! HTTP response type.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

/// Name of the response header carrying a resource's version token.
pub const ETAG_HEADER: &str = "etag";

/// Name of the response header carrying the server-side request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// An HTTP response as received from the API.
///
/// Header names are stored lowercased; a header may appear multiple times.
/// The body is kept as raw text so that the caller decides how to decode it.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use tbclient::clients::HttpResponse;
///
/// let mut headers = HashMap::new();
/// headers.insert("etag".to_string(), vec!["\"7\"".to_string()]);
///
/// let response = HttpResponse::new(200, headers, r#"{"uid":"abc"}"#.to_string());
/// assert!(response.is_ok());
/// assert_eq!(response.etag(), Some("\"7\""));
/// ```
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (lowercased names, possibly multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(code: u16, headers: HashMap<String, Vec<String>>, body: String) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` if the status code is 2xx.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, matching the name case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `ETag` header value, if present and non-empty.
    #[must_use]
    pub fn etag(&self) -> Option<&str> {
        self.header(ETAG_HEADER).filter(|value| !value.is_empty())
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header(REQUEST_ID_HEADER)
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
