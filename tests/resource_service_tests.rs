//! Integration tests for the generic resource services.
//!
//! A mock server stands in for the topology builder API. The tests cover
//! collection unwrapping, scoping, the two-phase update, idempotent delete
//! and error translation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tbclient::rest::{
    EmbeddedData, ResourceError, ResourceService, RestResource, UpdateError, VersionToken,
};
use tbclient::{ClientConfig, HttpError, Topology};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// ============================================================================
// Nested resource used to exercise scoping
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Vm {
    #[serde(skip_serializing_if = "Option::is_none")]
    uid: Option<String>,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct VmCollection {
    #[serde(default)]
    vms: Vec<Vm>,
}

impl EmbeddedData<Vm> for VmCollection {
    fn into_items(self) -> Vec<Vm> {
        self.vms
    }
}

impl RestResource for Vm {
    type Embedded = VmCollection;

    const NAME: &'static str = "Vm";
    const PATH: &'static str = "/vms";

    fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }
}

fn config_for(server: &MockServer) -> Arc<ClientConfig> {
    Arc::new(ClientConfig::new(Some(&server.uri()), "test-token"))
}

fn topology_service(server: &MockServer) -> ResourceService<Topology> {
    ResourceService::new(config_for(server))
}

fn topology_json(uid: &str, name: &str) -> serde_json::Value {
    json!({"uid": uid, "name": name, "description": "", "notes": "", "datacenter": "LON"})
}

// ============================================================================
// get_all
// ============================================================================

#[tokio::test]
async fn test_get_all_unwraps_embedded_collection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/topologies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_embedded": {"topologies": [topology_json("a", "A"), topology_json("b", "B")]},
            "_links": {"self": {"href": "/topologies"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let topologies = assert_ok!(topology_service(&server).get_all().await);

    assert_eq!(topologies.len(), 2);
    assert_eq!(topologies[0].uid.as_deref(), Some("a"));
    assert_eq!(topologies[1].name, "B");
}

#[tokio::test]
async fn test_get_all_without_embedded_member_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/topologies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_links": {"self": {"href": "/topologies"}}
        })))
        .mount(&server)
        .await;

    let topologies = assert_ok!(topology_service(&server).get_all().await);
    assert!(topologies.is_empty());
}

#[tokio::test]
async fn test_get_all_with_empty_list_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/topologies"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"_embedded": {"topologies": []}})),
        )
        .mount(&server)
        .await;

    let topologies = assert_ok!(topology_service(&server).get_all().await);
    assert_eq!(topologies.len(), 0);
}

#[tokio::test]
async fn test_scoped_get_all_uses_topology_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/topologies/T1/vms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_embedded": {"vms": [{"uid": "vm1", "name": "Jump host"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = ResourceService::<Vm>::scoped(config_for(&server), "T1");
    let vms = assert_ok!(service.get_all().await);

    assert_eq!(
        vms,
        vec![Vm {
            uid: Some("vm1".to_string()),
            name: "Jump host".to_string()
        }]
    );
}

#[tokio::test]
async fn test_get_all_error_is_translated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/topologies"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!([{"logref": "x", "message": "Forbidden"}])),
        )
        .mount(&server)
        .await;

    let error = assert_err!(topology_service(&server).get_all().await);
    let api = error.api_error().unwrap();
    assert_eq!(api.status, 403);
    assert_eq!(api.messages(), vec!["Forbidden"]);
}

// ============================================================================
// get_one / create
// ============================================================================

#[tokio::test]
async fn test_create_then_get_returns_same_resource() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/topologies"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"name": "Demo", "description": "", "notes": "", "datacenter": "LON"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(topology_json("new-uid", "Demo")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/topologies/new-uid"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"1\"")
                .set_body_json(topology_json("new-uid", "Demo")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = topology_service(&server);
    let mut topology = Topology::new("Demo");
    topology.datacenter = "LON".to_string();

    let created = assert_ok!(service.create(&topology).await);
    assert_eq!(created.uid.as_deref(), Some("new-uid"));

    let fetched = assert_ok!(service.get_one("new-uid").await);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_is_never_scoped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/vms"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"uid": "vm9", "name": "n"})))
        .expect(1)
        .mount(&server)
        .await;

    let service = ResourceService::<Vm>::scoped(config_for(&server), "T1");
    let created = assert_ok!(
        service
            .create(&Vm {
                uid: None,
                name: "n".to_string()
            })
            .await
    );
    assert_eq!(created.uid.as_deref(), Some("vm9"));
}

#[tokio::test]
async fn test_create_validation_error_carries_vendor_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/topologies"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!([
            {"logref": "ValidationError", "message": "must not be blank", "path": "name"}
        ])))
        .mount(&server)
        .await;

    let error = assert_err!(topology_service(&server).create(&Topology::new("")).await);
    let api = error.api_error().unwrap();
    assert_eq!(api.status, 400);
    assert_eq!(api.errors[0].path.as_deref(), Some("name"));
    assert_eq!(api.errors[0].logref.as_deref(), Some("ValidationError"));
}

#[tokio::test]
async fn test_get_one_missing_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/topologies/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let error = assert_err!(topology_service(&server).get_one("nope").await);
    assert!(error.is_not_found());
    assert_eq!(error.status(), Some(404));
    assert!(error.api_error().unwrap().errors.is_empty());
}

#[tokio::test]
async fn test_get_one_malformed_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/topologies/bad"))
        .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
        .mount(&server)
        .await;

    let error = assert_err!(topology_service(&server).get_one("bad").await);
    assert!(matches!(
        error,
        ResourceError::Decode {
            resource: "Topology",
            ..
        }
    ));
}

#[tokio::test]
async fn test_service_headers_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/topologies/a"))
        .and(header("X-Client", "integration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(topology_json("a", "A")))
        .expect(1)
        .mount(&server)
        .await;

    let service = topology_service(&server).with_header("X-Client", "integration");
    assert_ok!(service.get_one("a").await);
}

// ============================================================================
// update
// ============================================================================

#[tokio::test]
async fn test_update_sends_version_from_preceding_read() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/topologies/t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"3\"")
                .set_body_json(topology_json("t1", "Old")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/topologies/t1"))
        .and(header("If-Match", "\"3\""))
        .and(header("Content-Type", "application/json"))
        .and(body_json(topology_json("t1", "New")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"4\"")
                .set_body_json(topology_json("t1", "New")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut topology = Topology::new("New");
    topology.uid = Some("t1".to_string());
    topology.datacenter = "LON".to_string();

    let updated = assert_ok!(topology_service(&server).update("t1", &topology).await);
    assert_eq!(updated.name, "New");
}

#[tokio::test]
async fn test_put_if_match_returns_new_version() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/topologies/t1"))
        .and(header("If-Match", "\"7\""))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"8\"")
                .set_body_json(topology_json("t1", "X")),
        )
        .mount(&server)
        .await;

    let response = assert_ok!(
        topology_service(&server)
            .put_if_match("t1", &Topology::new("X"), &VersionToken::new("\"7\""))
            .await
    );
    assert_eq!(response.version(), Some(&VersionToken::new("\"8\"")));
    assert_eq!(response.name, "X");
}

#[tokio::test]
async fn test_stale_version_is_rejected_in_write_phase() {
    let server = MockServer::start().await;

    // Another client moved the resource from "1" to "2" after our read.
    Mock::given(method("PUT"))
        .and(path("/topologies/t1"))
        .and(header("If-Match", "\"2\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(topology_json("t1", "Theirs")))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/topologies/t1"))
        .respond_with(
            ResponseTemplate::new(412)
                .set_body_json(json!([{"message": "Resource version mismatch"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = topology_service(&server);
    let stale = VersionToken::new("\"1\"");

    let error = assert_err!(service.put_if_match("t1", &Topology::new("Mine"), &stale).await);
    assert!(error.is_conflict());
    assert_eq!(
        error.api_error().unwrap().messages(),
        vec!["Resource version mismatch"]
    );
}

#[tokio::test]
async fn test_update_conflict_surfaces_as_write_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/topologies/t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"1\"")
                .set_body_json(topology_json("t1", "Old")),
        )
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/topologies/t1"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;

    let error = assert_err!(
        topology_service(&server)
            .update("t1", &Topology::new("Mine"))
            .await
    );
    assert!(error.is_conflict());
    assert!(matches!(error, UpdateError::Write(_)));
}

#[tokio::test]
async fn test_update_read_failure_aborts_before_write() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/topologies/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = assert_err!(
        topology_service(&server)
            .update("gone", &Topology::new("x"))
            .await
    );
    assert!(!error.is_conflict());
    match error {
        UpdateError::Read(e) => assert!(e.is_not_found()),
        other => panic!("Expected read-phase error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_update_without_etag_aborts_before_write() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/topologies/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(topology_json("t1", "Old")))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = assert_err!(
        topology_service(&server)
            .update("t1", &Topology::new("x"))
            .await
    );
    assert!(matches!(
        error,
        UpdateError::Read(ResourceError::MissingVersionToken { .. })
    ));
}

#[tokio::test]
async fn test_update_with_empty_write_response_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/topologies/t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"1\"")
                .set_body_json(topology_json("t1", "Old")),
        )
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/topologies/t1"))
        .and(header("If-Match", "\"1\""))
        .respond_with(ResponseTemplate::new(204).insert_header("ETag", "\"2\""))
        .expect(1)
        .mount(&server)
        .await;

    let mut topology = Topology::new("New");
    topology.uid = Some("t1".to_string());

    let updated = assert_ok!(topology_service(&server).update("t1", &topology).await);
    assert_eq!(updated, topology);

    let written = assert_ok!(
        topology_service(&server)
            .put_if_match("t1", &topology, &VersionToken::new("\"1\""))
            .await
    );
    assert_eq!(written.version(), Some(&VersionToken::new("\"2\"")));
}

#[tokio::test]
async fn test_create_with_empty_response_returns_submitted_resource() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/topologies"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let topology = Topology::new("Demo");
    let created = assert_ok!(topology_service(&server).create(&topology).await);
    assert_eq!(created, topology);
}

/// Accepts the write and answers with the body it received.
struct AcceptWrite;

impl Respond for AcceptWrite {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("ETag", "\"2\"")
            .set_body_bytes(request.body.clone())
    }
}

#[tokio::test]
async fn test_concurrent_updates_yield_one_success_and_one_conflict() {
    let server = MockServer::start().await;

    // Both readers see version "1".
    Mock::given(method("GET"))
        .and(path("/topologies/t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"1\"")
                .set_body_json(topology_json("t1", "Original")),
        )
        .expect(2)
        .mount(&server)
        .await;

    // The first conditional write moves the resource to "2".
    Mock::given(method("PUT"))
        .and(path("/topologies/t1"))
        .and(header("If-Match", "\"1\""))
        .respond_with(AcceptWrite)
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    // Any later write with the stale token is rejected.
    Mock::given(method("PUT"))
        .and(path("/topologies/t1"))
        .respond_with(
            ResponseTemplate::new(412)
                .set_body_json(json!([{"message": "Resource version mismatch"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = topology_service(&server);
    let mut alice = topology_json("t1", "Alice");
    alice["datacenter"] = json!("LON");
    let alice: Topology = serde_json::from_value(alice).unwrap();
    let mut bob = alice.clone();
    bob.name = "Bob".to_string();

    let (first, second) = tokio::join!(service.update("t1", &alice), service.update("t1", &bob));

    let (accepted, winner, error) = match (first, second) {
        (Ok(updated), Err(error)) => (updated, &alice, error),
        (Err(error), Ok(updated)) => (updated, &bob, error),
        other => panic!("Expected exactly one success, got: {other:?}"),
    };

    assert!(error.is_conflict());
    assert!(matches!(error, UpdateError::Write(_)));
    // The server stored the payload of the successful call only.
    assert_eq!(&accepted, winner);
}

#[tokio::test]
async fn test_losing_payload_is_never_accepted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/topologies/t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"1\"")
                .set_body_json(topology_json("t1", "Original")),
        )
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/topologies/t1"))
        .and(body_json(topology_json("t1", "First")))
        .respond_with(AcceptWrite)
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/topologies/t1"))
        .and(body_json(topology_json("t1", "Second")))
        .respond_with(ResponseTemplate::new(412))
        .expect(1)
        .mount(&server)
        .await;

    let service = topology_service(&server);
    let first: Topology = serde_json::from_value(topology_json("t1", "First")).unwrap();
    let second: Topology = serde_json::from_value(topology_json("t1", "Second")).unwrap();

    // Same stale token for both writers, as after two concurrent reads.
    let version = VersionToken::new("\"1\"");
    let accepted = assert_ok!(service.put_if_match("t1", &first, &version).await);
    assert_eq!(accepted.name, "First");

    let error = assert_err!(service.put_if_match("t1", &second, &version).await);
    assert!(error.is_conflict());
}

// ============================================================================
// delete
// ============================================================================

#[tokio::test]
async fn test_delete_is_idempotent() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/topologies/t1"))
        .respond_with(ResponseTemplate::new(204))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/topologies/t1"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let service = topology_service(&server);
    assert_ok!(service.delete("t1").await);
    assert_ok!(service.delete("t1").await);
}

#[tokio::test]
async fn test_delete_other_errors_are_translated() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/topologies/locked"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!([{"message": "Topology is running"}])),
        )
        .mount(&server)
        .await;

    let error = assert_err!(topology_service(&server).delete("locked").await);
    assert_eq!(error.status(), Some(500));
    assert!(error.to_string().contains("Topology is running"));
}

// ============================================================================
// transport
// ============================================================================

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let config = Arc::new(ClientConfig::new(Some("http://127.0.0.1:1"), "t"));
    let service = ResourceService::<Topology>::new(config);

    let error = assert_err!(service.get_all().await);
    assert!(matches!(error, ResourceError::Http(HttpError::Network(_))));
    assert!(error.api_error().is_none());
}
