//! Error translation for resource operations.
//!
//! This is the single place where a non-2xx response becomes a domain error.
//! Resource operations hand every unsuccessful [`HttpResponse`] to
//! [`ResourceError::from_http_response`] and never look at status codes
//! themselves.
//!
//! # Error Taxonomy
//!
//! - [`ResourceError::Http`]: no response was obtained (network, invalid request)
//! - [`ResourceError::Api`]: a non-2xx response, carrying an [`ApiError`]
//! - [`ResourceError::Decode`] / [`ResourceError::Encode`]: JSON (de)serialization failed
//! - [`ResourceError::MissingVersionToken`]: a read returned no `ETag`
//! - [`UpdateError`]: which phase of the read-then-write update failed
//!
//! # Example
//!
//! ```rust,ignore
//! use tbclient::rest::{ResourceError, UpdateError};
//!
//! match client.update_topology(&topology).await {
//!     Ok(updated) => println!("Updated {}", updated.name),
//!     Err(e) if e.is_conflict() => println!("Someone else changed it first"),
//!     Err(UpdateError::Read(e)) => println!("Could not read current version: {e}"),
//!     Err(e) => println!("Update failed: {e}"),
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clients::{HttpError, HttpResponse};

/// A structured error object returned by the server in an error body.
///
/// The shape follows the `vnd.error` convention. All fields are optional and
/// unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorError {
    /// Server-side log reference for the failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logref: Option<String>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The field or request path the error refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Error bodies are normally an array, but a lone object is accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum VendorErrorBody {
    Many(Vec<VendorError>),
    One(VendorError),
}

/// A non-2xx response from the API.
///
/// Carries the status code and the vendor errors from the body verbatim.
/// When the body is absent or cannot be decoded, `errors` is empty.
///
/// # Example
///
/// ```rust
/// use tbclient::rest::ApiError;
///
/// let error = ApiError::from_parts(409, r#"[{"message":"Version mismatch"}]"#, None);
/// assert!(error.is_conflict());
/// assert_eq!(error.errors[0].message.as_deref(), Some("Version mismatch"));
///
/// let error = ApiError::from_parts(500, "<html>oops</html>", None);
/// assert!(error.errors.is_empty());
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("API error (HTTP {status}){}", describe(.errors))]
pub struct ApiError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// Vendor errors decoded from the response body (possibly empty).
    pub errors: Vec<VendorError>,
    /// Request id from the `X-Request-Id` header, if present.
    pub request_id: Option<String>,
}

impl ApiError {
    /// Translates a raw status and body into an `ApiError`.
    ///
    /// Never fails: a malformed or empty body yields an empty `errors` list.
    #[must_use]
    pub fn from_parts(status: u16, body: &str, request_id: Option<&str>) -> Self {
        let errors = match serde_json::from_str::<VendorErrorBody>(body) {
            Ok(VendorErrorBody::Many(errors)) => errors,
            Ok(VendorErrorBody::One(error)) => vec![error],
            Err(_) => Vec::new(),
        };

        Self {
            status,
            errors,
            request_id: request_id.map(ToString::to_string),
        }
    }

    /// Translates an HTTP response into an `ApiError`.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        Self::from_parts(response.code, &response.body, response.request_id())
    }

    /// Returns `true` if the status denotes a missing resource (404).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Returns `true` if the status denotes a rejected conditional write
    /// (409 Conflict or 412 Precondition Failed).
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self.status, 409 | 412)
    }

    /// Returns the messages of all vendor errors that carry one.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.errors
            .iter()
            .filter_map(|e| e.message.as_deref())
            .collect()
    }
}

fn describe(errors: &[VendorError]) -> String {
    let messages: Vec<&str> = errors.iter().filter_map(|e| e.message.as_deref()).collect();
    if messages.is_empty() {
        String::new()
    } else {
        format!(": {}", messages.join("; "))
    }
}

/// Error type for resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The server answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request could not be sent or no response was received.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A successful response body could not be decoded.
    #[error("Failed to decode {resource} response: {source}")]
    Decode {
        /// The resource type name.
        resource: &'static str,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The resource could not be serialized into a request body.
    #[error("Failed to encode {resource} request body: {source}")]
    Encode {
        /// The resource type name.
        resource: &'static str,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A read returned the resource without an `ETag`.
    #[error("{resource} {uid} was returned without a version token")]
    MissingVersionToken {
        /// The resource type name.
        resource: &'static str,
        /// The uid that was read.
        uid: String,
    },
}

impl ResourceError {
    /// Translates a non-2xx response into a `ResourceError::Api`.
    #[must_use]
    pub fn from_http_response(response: &HttpResponse) -> Self {
        Self::Api(ApiError::from_response(response))
    }

    /// Returns the API error, if the server answered with a non-2xx status.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the HTTP status of an API error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(|e| e.status)
    }

    /// Returns `true` for a 404 API error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_not_found)
    }

    /// Returns `true` for a 409/412 API error.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_conflict)
    }

    /// Returns the request id of an API error, if available.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.api_error().and_then(|e| e.request_id.as_deref())
    }
}

/// Error type for the two-phase update.
///
/// An update first reads the resource to obtain its version token, then
/// sends a conditional write. The variant tells which phase failed.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// The resource has no uid, so there is nothing to address.
    #[error("Cannot update {resource} without a uid")]
    MissingUid {
        /// The resource type name.
        resource: &'static str,
    },

    /// Reading the current version failed; nothing was written.
    #[error("Failed to read current version: {0}")]
    Read(#[source] ResourceError),

    /// The conditional write failed or was rejected.
    #[error("Conditional write failed: {0}")]
    Write(#[source] ResourceError),
}

impl UpdateError {
    /// Returns the error of the phase that failed.
    #[must_use]
    pub const fn phase_error(&self) -> Option<&ResourceError> {
        match self {
            Self::Read(e) | Self::Write(e) => Some(e),
            Self::MissingUid { .. } => None,
        }
    }

    /// Returns `true` if the server rejected the write because the version
    /// changed after it was read.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Write(e) if e.is_conflict())
    }
}
