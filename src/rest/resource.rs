//! Resource bindings.
//!
//! A resource type is bound to the generic services by implementing
//! [`RestResource`]: its collection path, its display name, and the envelope
//! type its list responses use.
//!
//! # Implementing a Resource
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use tbclient::rest::{EmbeddedData, RestResource};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Vm {
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     pub uid: Option<String>,
//!     pub name: String,
//! }
//!
//! #[derive(Debug, Default, Deserialize)]
//! pub struct VmCollection {
//!     #[serde(default)]
//!     pub vms: Vec<Vm>,
//! }
//!
//! impl EmbeddedData<Vm> for VmCollection {
//!     fn into_items(self) -> Vec<Vm> {
//!         self.vms
//!     }
//! }
//!
//! impl RestResource for Vm {
//!     type Embedded = VmCollection;
//!
//!     const NAME: &'static str = "Vm";
//!     const PATH: &'static str = "/vms";
//!
//!     fn uid(&self) -> Option<&str> {
//!         self.uid.as_deref()
//!     }
//! }
//! ```

use serde::{de::DeserializeOwned, Serialize};

use crate::rest::EmbeddedData;

/// A resource type that the generic services can read and write.
///
/// # Associated Types
///
/// - `Embedded`: the value found under `_embedded` in list responses
///
/// # Associated Constants
///
/// - `NAME`: the resource name used in errors and logs (e.g. "Topology")
/// - `PATH`: the collection path, with a leading slash (e.g. "/topologies")
/// - `SCOPED`: whether the collection may be nested under a topology
pub trait RestResource: Serialize + DeserializeOwned + Clone + Send + Sync + Sized {
    /// The embedded-collection envelope used by list responses.
    type Embedded: EmbeddedData<Self> + DeserializeOwned + Send;

    /// The singular name of the resource.
    const NAME: &'static str;

    /// The collection path of the resource.
    const PATH: &'static str;

    /// Whether listings may be scoped to a parent topology.
    ///
    /// A service for a resource with `SCOPED = false` ignores any scope it is
    /// given.
    const SCOPED: bool = true;

    /// Returns the resource's uid, or `None` if it has not been created yet.
    fn uid(&self) -> Option<&str>;
}
