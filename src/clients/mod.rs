//! HTTP transport types for the topology builder API.
//!
//! This module is the transport the resource layer is built on. It knows how
//! to authenticate and send a request, and how to capture a response; it
//! knows nothing about resources or status-code semantics.
//!
//! # Overview
//!
//! - [`HttpClient`]: the async transport, built per call from a [`ClientConfig`](crate::ClientConfig)
//! - [`HttpRequest`]: a request with an absolute URL and optional JSON body
//! - [`HttpResponse`]: status, lowercased headers and raw body
//! - [`HttpMethod`]: GET, POST, PUT, DELETE
//! - [`HttpError`]: transport failures (invalid request, network)
//!
//! # Example
//!
//! ```rust,ignore
//! use tbclient::ClientConfig;
//! use tbclient::clients::{HttpClient, HttpRequest, HttpMethod};
//!
//! let config = ClientConfig::new(None, "token");
//! let client = HttpClient::new(&config)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "http://localhost:8080/topologies")
//!     .build()?;
//!
//! let response = client.request(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! None. Every request is attempted exactly once; timeouts and connection
//! handling are left to reqwest.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{HttpResponse, ETAG_HEADER, REQUEST_ID_HEADER};
