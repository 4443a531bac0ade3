//! Topology resource.
//!
//! A topology is the top-level resource of the service; every other resource
//! type is nested under one. Topologies themselves are never scoped.
//!
//! # Example
//!
//! ```rust,ignore
//! use tbclient::{Client, ClientConfig};
//! use tbclient::rest::resources::Topology;
//!
//! let client = Client::new(ClientConfig::new(None, "token"));
//!
//! let mut topology = client.create_topology(&Topology::new("Demo")).await?;
//! topology.notes = "Shared with the team".to_string();
//! let topology = client.update_topology(&topology).await?;
//!
//! for t in client.get_all_topologies().await? {
//!     println!("{} {}", t.uid.as_deref().unwrap_or("-"), t.name);
//! }
//!
//! client.delete_topology(topology.uid.as_deref().unwrap()).await?;
//! ```

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::rest::{EmbeddedData, ResourceError, ResourceService, RestResource, UpdateError};

/// A topology.
///
/// `uid` is assigned by the server and is absent on a topology that has not
/// been created yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topology {
    /// Server-assigned unique id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Free-text notes for users of the topology.
    #[serde(default)]
    pub notes: String,
    /// Data center the topology runs in (e.g. "LON").
    #[serde(default)]
    pub datacenter: String,
}

impl Topology {
    /// Creates a not-yet-created topology with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// The `_embedded` payload of a topology list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopologyCollection {
    /// The listed topologies.
    #[serde(default)]
    pub topologies: Vec<Topology>,
}

impl EmbeddedData<Topology> for TopologyCollection {
    fn into_items(self) -> Vec<Topology> {
        self.topologies
    }
}

impl RestResource for Topology {
    type Embedded = TopologyCollection;

    const NAME: &'static str = "Topology";
    const PATH: &'static str = "/topologies";
    const SCOPED: bool = false;

    fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }
}

impl Client {
    fn topology_service(&self) -> ResourceService<Topology> {
        self.service::<Topology>()
    }

    /// Lists all topologies visible to the token.
    ///
    /// # Errors
    ///
    /// See [`ResourceService::get_all`].
    pub async fn get_all_topologies(&self) -> Result<Vec<Topology>, ResourceError> {
        self.topology_service().get_all().await
    }

    /// Fetches one topology.
    ///
    /// # Errors
    ///
    /// See [`ResourceService::get_one`].
    pub async fn get_topology(&self, uid: &str) -> Result<Topology, ResourceError> {
        self.topology_service().get_one(uid).await
    }

    /// Creates a topology.
    ///
    /// # Errors
    ///
    /// See [`ResourceService::create`].
    pub async fn create_topology(&self, topology: &Topology) -> Result<Topology, ResourceError> {
        self.topology_service().create(topology).await
    }

    /// Updates a topology, addressed by its own uid.
    ///
    /// # Errors
    ///
    /// See [`ResourceService::update_resource`].
    pub async fn update_topology(&self, topology: &Topology) -> Result<Topology, UpdateError> {
        self.topology_service().update_resource(topology).await
    }

    /// Deletes a topology. Deleting a missing topology succeeds.
    ///
    /// # Errors
    ///
    /// See [`ResourceService::delete`].
    pub async fn delete_topology(&self, uid: &str) -> Result<(), ResourceError> {
        self.topology_service().delete(uid).await
    }
}
