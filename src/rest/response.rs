//! Response wrapper for single-resource operations.
//!
//! [`ResourceResponse<T>`] pairs a decoded resource with the version token
//! the server sent alongside it. It implements `Deref<Target = T>`, so the
//! resource's fields can be read through the wrapper directly:
//!
//! ```rust,ignore
//! let response = service.get_versioned("abc").await?;
//! println!("{} at version {:?}", response.name, response.version());
//! let topology: Topology = response.into_inner();
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;

use crate::clients::HttpResponse;
use crate::rest::ResourceError;

/// An opaque resource revision marker, taken from the `ETag` header.
///
/// The client never interprets it; it is only sent back in `If-Match`.
///
/// # Example
///
/// ```rust
/// use tbclient::rest::VersionToken;
///
/// let token = VersionToken::new("W/\"3\"");
/// assert_eq!(token.as_str(), "W/\"3\"");
/// assert_eq!(token.to_string(), "W/\"3\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(String);

impl VersionToken {
    /// Wraps a raw `ETag` value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw header value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A decoded resource together with its version token.
///
/// # Example
///
/// ```rust
/// use tbclient::rest::{ResourceResponse, VersionToken};
///
/// let response = ResourceResponse::new(vec![1, 2, 3], Some(VersionToken::new("\"1\"")), None);
///
/// // Deref to the inner value
/// assert_eq!(response.len(), 3);
/// assert_eq!(response.version().map(VersionToken::as_str), Some("\"1\""));
/// ```
#[derive(Debug, Clone)]
pub struct ResourceResponse<T> {
    /// The resource data.
    data: T,
    /// Version token from the `ETag` header.
    version: Option<VersionToken>,
    /// Request ID from the `X-Request-Id` header.
    request_id: Option<String>,
}

impl<T> ResourceResponse<T> {
    /// Creates a new `ResourceResponse`.
    #[must_use]
    pub const fn new(data: T, version: Option<VersionToken>, request_id: Option<String>) -> Self {
        Self {
            data,
            version,
            request_id,
        }
    }

    /// Consumes the response and returns the inner data.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Consumes the response and returns the data and its version token.
    #[must_use]
    pub fn into_parts(self) -> (T, Option<VersionToken>) {
        (self.data, self.version)
    }

    /// Returns the version token, if the server sent one.
    #[must_use]
    pub const fn version(&self) -> Option<&VersionToken> {
        self.version.as_ref()
    }

    /// Returns the request ID, if the server sent one.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

impl<T: Clone> ResourceResponse<T> {
    /// Builds a response for a 2xx reply that carried no body.
    ///
    /// The server accepted `submitted` as is; the version token and request
    /// id are still taken from the headers.
    #[must_use]
    pub fn from_empty_response(response: &HttpResponse, submitted: &T) -> Self {
        Self {
            data: submitted.clone(),
            version: response.etag().map(VersionToken::new),
            request_id: response.request_id().map(ToString::to_string),
        }
    }
}

impl<T: DeserializeOwned> ResourceResponse<T> {
    /// Decodes a successful HTTP response.
    ///
    /// # Arguments
    ///
    /// * `response` - A 2xx response whose body is a single resource
    /// * `resource` - The resource type name, used in error messages
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Decode`] if the body does not decode into `T`.
    pub fn from_http_response(
        response: &HttpResponse,
        resource: &'static str,
    ) -> Result<Self, ResourceError> {
        let data = response
            .json::<T>()
            .map_err(|source| ResourceError::Decode { resource, source })?;

        Ok(Self {
            data,
            version: response.etag().map(VersionToken::new),
            request_id: response.request_id().map(ToString::to_string),
        })
    }
}

impl<T> Deref for ResourceResponse<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for ResourceResponse<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}
