//! Entry point for talking to the topology builder API.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::rest::{ResourceService, RestResource};

/// A client for the topology builder API.
///
/// Holds the shared, immutable configuration and hands out services bound to
/// one resource type each. Cloning a `Client` is cheap.
///
/// # Example
///
/// ```rust
/// use tbclient::{Client, ClientConfig};
/// use tbclient::rest::resources::Topology;
///
/// let client = Client::new(ClientConfig::new(Some("http://h"), "token"));
///
/// let topologies = client.service::<Topology>();
/// assert_eq!(topologies.collection().collection_url(), "http://h/topologies");
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
}

// Verify Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl Client {
    /// Creates a client from a configuration.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns a top-level service for resource type `R`.
    #[must_use]
    pub fn service<R: RestResource>(&self) -> ResourceService<R> {
        ResourceService::new(Arc::clone(&self.config))
    }

    /// Returns a service for resource type `R` nested under a topology.
    ///
    /// The scope is dropped for resources that cannot be nested, such as
    /// [`Topology`](crate::Topology).
    #[must_use]
    pub fn scoped_service<R: RestResource>(
        &self,
        topology_uid: impl Into<String>,
    ) -> ResourceService<R> {
        ResourceService::scoped(Arc::clone(&self.config), topology_uid)
    }
}
