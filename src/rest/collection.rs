//! Read-only access to resource collections.
//!
//! List endpoints answer with a HATEOAS envelope:
//!
//! ```json
//! { "_embedded": { "topologies": [ { "uid": "a" }, { "uid": "b" } ] } }
//! ```
//!
//! [`Collection`] models the outer `_embedded` member and [`EmbeddedData`]
//! the resource-specific inner object. The server omits `_embedded` for an
//! empty collection, which unwraps to an empty `Vec`.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Deserialize;

use crate::clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
};
use crate::config::ClientConfig;
use crate::rest::{build_resource_path, ResourceError, RestResource};

/// An embedded-collection payload that can yield its resources.
pub trait EmbeddedData<R> {
    /// Extracts the resources, consuming the payload.
    fn into_items(self) -> Vec<R>;
}

/// The `{"_embedded": ...}` envelope of a list response.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use tbclient::rest::{Collection, EmbeddedData};
///
/// #[derive(Deserialize)]
/// struct Names {
///     names: Vec<String>,
/// }
///
/// impl EmbeddedData<String> for Names {
///     fn into_items(self) -> Vec<String> {
///         self.names
///     }
/// }
///
/// let full: Collection<Names> =
///     serde_json::from_str(r#"{"_embedded":{"names":["a","b"]}}"#).unwrap();
/// assert_eq!(full.into_items(), vec!["a", "b"]);
///
/// let empty: Collection<Names> = serde_json::from_str("{}").unwrap();
/// assert!(empty.into_items().is_empty());
/// ```
#[derive(Debug, Deserialize)]
pub struct Collection<RC> {
    /// The embedded payload, absent for an empty collection.
    #[serde(rename = "_embedded")]
    pub embedded: Option<RC>,
}

impl<RC> Collection<RC> {
    /// Unwraps the envelope into a plain list of resources.
    #[must_use]
    pub fn into_items<R>(self) -> Vec<R>
    where
        RC: EmbeddedData<R>,
    {
        self.embedded
            .map(<RC as EmbeddedData<R>>::into_items)
            .unwrap_or_default()
    }
}

/// Generic read-only accessor for one resource collection.
///
/// Bound to one resource type and one optional scoping topology for its
/// whole lifetime. The service holds no connection state: each call builds
/// its own [`HttpClient`] from the shared configuration, so one service value
/// can serve concurrent callers.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use tbclient::rest::CollectionService;
///
/// let service = CollectionService::<Vm>::scoped(Arc::new(config), "topology-uid");
/// let vms = service.get_all().await?; // GET {host}/topologies/topology-uid/vms
/// ```
#[derive(Debug)]
pub struct CollectionService<R> {
    config: Arc<ClientConfig>,
    topology_uid: Option<String>,
    request_headers: HashMap<String, String>,
    resource: PhantomData<fn() -> R>,
}

// A derived Clone would require `R: Clone` on the marker only.
impl<R> Clone for CollectionService<R> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            topology_uid: self.topology_uid.clone(),
            request_headers: self.request_headers.clone(),
            resource: PhantomData,
        }
    }
}

impl<R: RestResource> CollectionService<R> {
    /// Creates a top-level service.
    #[must_use]
    pub fn new(config: Arc<ClientConfig>) -> Self {
        Self {
            config,
            topology_uid: None,
            request_headers: HashMap::new(),
            resource: PhantomData,
        }
    }

    /// Creates a service nested under a topology.
    ///
    /// An empty uid is the same as no scope, and so is any uid for a
    /// resource that is not [`SCOPED`](RestResource::SCOPED).
    #[must_use]
    pub fn scoped(config: Arc<ClientConfig>, topology_uid: impl Into<String>) -> Self {
        let topology_uid = Some(topology_uid.into()).filter(|uid| R::SCOPED && !uid.is_empty());
        Self {
            topology_uid,
            ..Self::new(config)
        }
    }

    /// Adds a header sent with every request this service issues.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_headers.insert(key.into(), value.into());
        self
    }

    /// Returns the shared configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the scoping topology uid, if any.
    #[must_use]
    pub fn topology_uid(&self) -> Option<&str> {
        self.topology_uid.as_deref()
    }

    /// Returns the extra request headers of this service.
    #[must_use]
    pub const fn request_headers(&self) -> &HashMap<String, String> {
        &self.request_headers
    }

    /// Returns the collection URL, including the scope prefix.
    #[must_use]
    pub fn collection_url(&self) -> String {
        build_resource_path(
            self.config.host_url(),
            self.topology_uid.as_deref(),
            R::PATH,
            None,
        )
    }

    /// Fetches every resource in the collection.
    ///
    /// An empty collection yields an empty `Vec`.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::Api`] for a non-2xx response
    /// - [`ResourceError::Http`] if no response was received
    /// - [`ResourceError::Decode`] if the envelope cannot be decoded
    pub async fn get_all(&self) -> Result<Vec<R>, ResourceError> {
        let url = self.collection_url();
        let response = self.send(self.request(HttpMethod::Get, url)).await?;

        if !response.is_ok() {
            return Err(ResourceError::from_http_response(&response));
        }

        if response.body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let collection: Collection<R::Embedded> =
            response.json().map_err(|source| ResourceError::Decode {
                resource: R::NAME,
                source,
            })?;

        Ok(collection.into_items())
    }

    /// Starts a request carrying this service's headers.
    pub(crate) fn request(&self, method: HttpMethod, url: String) -> HttpRequestBuilder {
        HttpRequest::builder(method, url).headers(&self.request_headers)
    }

    /// Builds a fresh transport and sends the request.
    pub(crate) async fn send(
        &self,
        builder: HttpRequestBuilder,
    ) -> Result<HttpResponse, ResourceError> {
        let request = builder.build().map_err(HttpError::from)?;
        let client = HttpClient::new(&self.config)?;
        Ok(client.request(request).await?)
    }
}

// Verify services are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CollectionService<crate::rest::resources::Topology>>();
};
