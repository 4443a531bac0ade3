//! Transport-level error types.
//!
//! These errors mean no usable HTTP response was obtained: the request was
//! rejected before sending, or the network round-trip failed. A response with
//! a non-2xx status is *not* an [`HttpError`]; it is translated into an
//! [`ApiError`](crate::rest::ApiError) by the resource layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use tbclient::clients::{HttpClient, HttpError};
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Status {}", response.code),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when an HTTP request fails validation before it is sent.
///
/// # Example
///
/// ```rust
/// use tbclient::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::MissingBody {
///     method: "put".to_string(),
/// };
///
/// assert_eq!(error.to_string(), "Cannot use put without specifying data.");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A GET or DELETE request was given a body.
    #[error("Cannot send data with {method}.")]
    UnexpectedBody {
        /// The HTTP method that does not accept a body.
        method: String,
    },
}

/// Unified error type for transport failures.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network, DNS, TLS or timeout error reported by the transport.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
