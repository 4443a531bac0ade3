//! # Topology Builder API client
//!
//! A typed async client for the topology builder resource-management API,
//! which exposes hierarchical, versioned resources over HTTP with JSON
//! payloads.
//!
//! ## Overview
//!
//! This crate provides:
//! - Immutable configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - A [`Client`] handing out services bound to one resource type each
//! - Generic CRUD in [`rest`]: collection listing with `_embedded` unwrapping,
//!   single-resource get/create/delete, and `ETag`/`If-Match` updates
//! - Uniform translation of non-2xx responses into [`rest::ApiError`]
//! - A thin async HTTP transport in [`clients`]
//!
//! ## Quick Start
//!
//! ```rust
//! use tbclient::{Client, ClientConfig};
//!
//! let config = ClientConfig::builder("my-token")
//!     .host("https://tbv3.example.com/api")
//!     .build();
//!
//! let client = Client::new(config);
//! ```
//!
//! ## Working with Topologies
//!
//! ```rust,ignore
//! use tbclient::{Client, ClientConfig};
//! use tbclient::rest::resources::Topology;
//!
//! let client = Client::new(ClientConfig::new(None, "my-token"));
//!
//! let created = client.create_topology(&Topology::new("Demo")).await?;
//! let uid = created.uid.clone().unwrap();
//!
//! let mut topology = client.get_topology(&uid).await?;
//! topology.description = "Updated".to_string();
//! match client.update_topology(&topology).await {
//!     Ok(updated) => println!("Updated {}", updated.name),
//!     Err(e) if e.is_conflict() => println!("Modified concurrently"),
//!     Err(e) => eprintln!("{e}"),
//! }
//!
//! client.delete_topology(&uid).await?;
//! ```
//!
//! ## Nested Resources
//!
//! Resource types other than topologies live under a topology. Bind them with
//! [`rest::RestResource`] and use a scoped service:
//!
//! ```rust,ignore
//! let vms = client.scoped_service::<Vm>(&topology_uid).get_all().await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: the default host is only a constant fallback
//! - **No hidden retries**: every failure is returned to the caller
//! - **Thread-safe**: all types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod client;
pub mod clients;
pub mod config;
pub mod rest;

pub use client::Client;
pub use config::{AuthToken, ClientConfig, ClientConfigBuilder, DEFAULT_HOST_URL};

pub use clients::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};

pub use rest::resources::{Topology, TopologyCollection};
pub use rest::{ApiError, ResourceError, UpdateError, VendorError};
