//! Generic resource access layer.
//!
//! This module performs CRUD against any resource type bound through
//! [`RestResource`], with:
//!
//! - **Path scoping**: [`build_resource_path`] nests collections under
//!   `/topologies/{uid}`
//! - **Embedded collections**: [`Collection`] and [`EmbeddedData`] unwrap
//!   `{"_embedded": {...}}` list responses
//! - **Optimistic concurrency**: [`ResourceService::update`] reads the
//!   `ETag` and writes with `If-Match`
//! - **Error translation**: [`ResourceError::from_http_response`] turns every
//!   non-2xx response into an [`ApiError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tbclient::ClientConfig;
//! use tbclient::rest::{ResourceService, UpdateError};
//! use tbclient::rest::resources::Topology;
//!
//! let config = Arc::new(ClientConfig::new(None, "token"));
//! let service = ResourceService::<Topology>::new(config);
//!
//! let all = service.get_all().await?;
//! let one = service.get_one("abc").await?;
//!
//! match service.update("abc", &one).await {
//!     Ok(updated) => println!("Now {}", updated.name),
//!     Err(e) if e.is_conflict() => println!("Changed concurrently, re-read and retry"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

mod collection;
mod errors;
mod path;
mod resource;
mod response;
mod service;

pub mod resources;

pub use collection::{Collection, CollectionService, EmbeddedData};
pub use errors::{ApiError, ResourceError, UpdateError, VendorError};
pub use path::{build_resource_path, scope_prefix, SCOPE_ROOT};
pub use resource::RestResource;
pub use response::{ResourceResponse, VersionToken};
pub use service::{ResourceService, IF_MATCH_HEADER};
