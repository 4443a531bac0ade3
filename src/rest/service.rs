//! Single-resource CRUD on top of [`CollectionService`].
//!
//! # Optimistic Concurrency
//!
//! [`ResourceService::update`] is a two-phase operation:
//!
//! 1. **Read**: GET the resource and take its `ETag` as a [`VersionToken`].
//! 2. **Conditional write**: PUT the new body with `If-Match: <token>`.
//!
//! Between the two phases another client may change the resource. The client
//! does not lock or retry; the server rejects the write with 409 or 412 and
//! the caller receives [`UpdateError::Write`]. Failures of the read phase are
//! reported as [`UpdateError::Read`], and nothing is written in that case.
//! Both phases are public ([`get_versioned`](ResourceService::get_versioned)
//! and [`put_if_match`](ResourceService::put_if_match)) for callers that want
//! to hold a token across their own logic.
//!
//! # Empty Write Responses
//!
//! A create or conditional write may succeed with an empty body (e.g. 204).
//! The submitted resource is then returned as the accepted representation,
//! with the version token from the response headers.
//!
//! # Deletion
//!
//! [`ResourceService::delete`] treats a 404 as success, so deleting twice is
//! not an error. Reading a missing resource still fails with a 404 `ApiError`.

use std::sync::Arc;

use crate::clients::{HttpMethod, HttpResponse};
use crate::config::ClientConfig;
use crate::rest::{
    build_resource_path, CollectionService, ResourceError, ResourceResponse, RestResource,
    UpdateError, VersionToken,
};

/// Header carrying the expected version on a conditional write.
pub const IF_MATCH_HEADER: &str = "If-Match";

/// Generic CRUD accessor for one resource type.
///
/// Single-resource operations address `{host}{path}/{uid}`; resources are
/// globally addressable by uid, so the scoping topology only applies to
/// [`get_all`](Self::get_all). Creation always targets the top-level
/// collection.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use tbclient::rest::ResourceService;
/// use tbclient::rest::resources::Topology;
///
/// let service = ResourceService::<Topology>::new(Arc::new(config));
///
/// let created = service.create(&Topology::new("Demo")).await?;
/// let uid = created.uid.clone().unwrap();
///
/// let mut changed = service.get_one(&uid).await?;
/// changed.description = "Updated".to_string();
/// let updated = service.update(&uid, &changed).await?;
///
/// service.delete(&uid).await?;
/// service.delete(&uid).await?; // still Ok
/// ```
#[derive(Debug)]
pub struct ResourceService<R> {
    collection: CollectionService<R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
        }
    }
}

impl<R: RestResource> ResourceService<R> {
    /// Creates a top-level service.
    #[must_use]
    pub fn new(config: Arc<ClientConfig>) -> Self {
        Self {
            collection: CollectionService::new(config),
        }
    }

    /// Creates a service whose collection is nested under a topology.
    #[must_use]
    pub fn scoped(config: Arc<ClientConfig>, topology_uid: impl Into<String>) -> Self {
        Self {
            collection: CollectionService::scoped(config, topology_uid),
        }
    }

    /// Adds a header sent with every request this service issues.
    #[must_use]
    pub fn with_header(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            collection: self.collection.with_header(key, value),
        }
    }

    /// Returns the underlying read-only collection service.
    #[must_use]
    pub const fn collection(&self) -> &CollectionService<R> {
        &self.collection
    }

    /// Returns the URL of a single resource.
    #[must_use]
    pub fn resource_url(&self, uid: &str) -> String {
        build_resource_path(self.collection.config().host_url(), None, R::PATH, Some(uid))
    }

    /// Fetches every resource in the (possibly scoped) collection.
    ///
    /// # Errors
    ///
    /// See [`CollectionService::get_all`].
    pub async fn get_all(&self) -> Result<Vec<R>, ResourceError> {
        self.collection.get_all().await
    }

    /// Fetches one resource by uid.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::Api`] for a non-2xx response, including 404
    /// - [`ResourceError::Http`] if no response was received
    /// - [`ResourceError::Decode`] if the body is not a valid resource
    pub async fn get_one(&self, uid: &str) -> Result<R, ResourceError> {
        Ok(self.get_versioned(uid).await?.into_inner())
    }

    /// Fetches one resource by uid together with its version token.
    ///
    /// This is the read phase of [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// Same as [`get_one`](Self::get_one).
    pub async fn get_versioned(&self, uid: &str) -> Result<ResourceResponse<R>, ResourceError> {
        let url = self.resource_url(uid);
        let response = self
            .collection
            .send(self.collection.request(HttpMethod::Get, url))
            .await?;

        if !response.is_ok() {
            return Err(ResourceError::from_http_response(&response));
        }

        ResourceResponse::from_http_response(&response, R::NAME)
    }

    /// Creates a resource and returns the server's representation of it.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::Encode`] if the resource cannot be serialized
    /// - [`ResourceError::Api`] for a non-2xx response
    /// - [`ResourceError::Http`] if no response was received
    /// - [`ResourceError::Decode`] if the created representation is invalid
    pub async fn create(&self, resource: &R) -> Result<R, ResourceError> {
        let body = encode(resource)?;
        let url = build_resource_path(self.collection.config().host_url(), None, R::PATH, None);

        let response = self
            .collection
            .send(self.collection.request(HttpMethod::Post, url).body(body))
            .await?;

        if !response.is_ok() {
            return Err(ResourceError::from_http_response(&response));
        }

        let created = decode_written(&response, resource)?;
        tracing::debug!(resource = R::NAME, uid = ?created.uid(), "created resource");
        Ok(created.into_inner())
    }

    /// Replaces a resource only if its current version still matches.
    ///
    /// This is the write phase of [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// - [`ResourceError::Api`] with a 409/412 status if the version changed
    /// - any other error as for [`create`](Self::create)
    pub async fn put_if_match(
        &self,
        uid: &str,
        resource: &R,
        version: &VersionToken,
    ) -> Result<ResourceResponse<R>, ResourceError> {
        let body = encode(resource)?;
        let url = self.resource_url(uid);

        let response = self
            .collection
            .send(
                self.collection
                    .request(HttpMethod::Put, url)
                    .header(IF_MATCH_HEADER, version.as_str())
                    .body(body),
            )
            .await?;

        if !response.is_ok() {
            return Err(ResourceError::from_http_response(&response));
        }

        decode_written(&response, resource)
    }

    /// Updates a resource using read-then-conditional-write.
    ///
    /// # Errors
    ///
    /// - [`UpdateError::Read`] if the current version could not be read,
    ///   including when the server sent no `ETag`
    /// - [`UpdateError::Write`] if the conditional write failed; use
    ///   [`UpdateError::is_conflict`] to detect a concurrent modification
    pub async fn update(&self, uid: &str, resource: &R) -> Result<R, UpdateError> {
        let (_, version) = self
            .get_versioned(uid)
            .await
            .map_err(UpdateError::Read)?
            .into_parts();

        let version = version.ok_or_else(|| {
            UpdateError::Read(ResourceError::MissingVersionToken {
                resource: R::NAME,
                uid: uid.to_string(),
            })
        })?;

        let updated = self
            .put_if_match(uid, resource, &version)
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    tracing::warn!(
                        resource = R::NAME,
                        uid,
                        version = %version,
                        "conditional write rejected, resource changed since it was read"
                    );
                }
                UpdateError::Write(e)
            })?;

        Ok(updated.into_inner())
    }

    /// Updates a resource addressed by its own uid.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::MissingUid`] if the resource has no uid,
    /// otherwise as for [`update`](Self::update).
    pub async fn update_resource(&self, resource: &R) -> Result<R, UpdateError> {
        let uid = resource
            .uid()
            .filter(|uid| !uid.is_empty())
            .ok_or(UpdateError::MissingUid { resource: R::NAME })?;
        self.update(uid, resource).await
    }

    /// Deletes a resource. A missing resource counts as deleted.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::Api`] for a non-2xx response other than 404
    /// - [`ResourceError::Http`] if no response was received
    pub async fn delete(&self, uid: &str) -> Result<(), ResourceError> {
        let url = self.resource_url(uid);
        let response = self
            .collection
            .send(self.collection.request(HttpMethod::Delete, url))
            .await?;

        if response.is_ok() {
            return Ok(());
        }

        match ResourceError::from_http_response(&response) {
            e if e.is_not_found() => {
                tracing::debug!(resource = R::NAME, uid, "resource already absent");
                Ok(())
            }
            e => Err(e),
        }
    }
}

/// Decodes the reply to a create or conditional write.
fn decode_written<R: RestResource>(
    response: &HttpResponse,
    submitted: &R,
) -> Result<ResourceResponse<R>, ResourceError> {
    if response.body.trim().is_empty() {
        return Ok(ResourceResponse::from_empty_response(response, submitted));
    }
    ResourceResponse::from_http_response(response, R::NAME)
}

fn encode<R: RestResource>(resource: &R) -> Result<serde_json::Value, ResourceError> {
    serde_json::to_value(resource).map_err(|source| ResourceError::Encode {
        resource: R::NAME,
        source,
    })
}

// Verify services are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceService<crate::rest::resources::Topology>>();
};
