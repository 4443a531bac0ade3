//! Resource definitions for the topology builder API.
//!
//! Each resource binds a Rust type to the generic services through
//! [`RestResource`](crate::rest::RestResource).
//!
//! # Available Resources
//!
//! - [`Topology`]: top-level container, with [`TopologyCollection`] as its
//!   list payload

mod topology;

pub use topology::{Topology, TopologyCollection};
