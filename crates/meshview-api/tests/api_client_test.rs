#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use meshview_api::{ApiClient, CreateEgressRequest, Error, ExternalClientPatch};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        base_url,
        "test-token".to_string().into(),
    );
    (server, client)
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn requests_carry_bearer_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client.list_nodes().await.unwrap();
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let result = client.list_nodes().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

// ── Nodes ───────────────────────────────────────────────────────────

#[tokio::test]
async fn list_nodes_parses_role_flags() {
    let (server, client) = setup().await;

    let body = json!([{
        "id": "2fab6f39-2dbc-4d64-9a5c-1adbd750a4a5",
        "hostid": "h1",
        "network": "office",
        "address": "10.10.0.1",
        "isegressgateway": true,
        "egressgatewayranges": ["192.168.0.0/24", "172.16.0.0/16"],
        "egressgatewaynatenabled": true
    }]);

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let nodes = client.list_nodes().await.unwrap();
    assert_eq!(nodes.len(), 1);
    assert!(nodes[0].isegressgateway);
    assert!(!nodes[0].isingressgateway);
    assert_eq!(nodes[0].egressgatewayranges.len(), 2);
}

#[tokio::test]
async fn create_egress_sends_string_nat_flag() {
    let (server, client) = setup().await;

    let expected = json!({
        "ranges": ["10.1.0.0/16"],
        "natEnabled": "yes"
    });

    Mock::given(method("POST"))
        .and(path("/api/nodes/office/n1/createegress"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "n1",
            "network": "office",
            "isegressgateway": true,
            "egressgatewayranges": ["10.1.0.0/16"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let req = CreateEgressRequest::new(vec!["10.1.0.0/16".into()], true);
    let node = client.create_egress("n1", "office", &req).await.unwrap();
    assert!(node.isegressgateway);
}

#[tokio::test]
async fn delete_egress_hits_role_path() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/nodes/office/n1/deleteegress"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_egress("n1", "office").await.unwrap();
}

// ── External clients ────────────────────────────────────────────────

#[tokio::test]
async fn update_external_client_sends_patch() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/extclients/office/laptop"))
        .and(body_json(json!({"enabled": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientid": "laptop",
            "network": "office",
            "enabled": false,
            "ingressgatewayid": "n1"
        })))
        .mount(&server)
        .await;

    let patch = ExternalClientPatch {
        enabled: Some(false),
        ..ExternalClientPatch::default()
    };
    let updated = client
        .update_external_client("laptop", "office", &patch)
        .await
        .unwrap();
    assert!(!updated.enabled);
}

#[tokio::test]
async fn delete_external_client_is_network_scoped() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/extclients/office/laptop"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_external_client("laptop", "office").await.unwrap();
}

// ── ACLs ────────────────────────────────────────────────────────────

#[tokio::test]
async fn acl_round_trip_returns_server_shape() {
    let (server, client) = setup().await;

    let stored = json!({
        "n1": {"n2": 2},
        "n2": {"n1": 2}
    });

    Mock::given(method("PUT"))
        .and(path("/api/networks/office/acls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&stored))
        .mount(&server)
        .await;

    let mut container = meshview_api::WireAclContainer::new();
    container.insert("n1".into(), [("n2".to_string(), 1u8)].into_iter().collect());
    container.insert("n2".into(), [("n1".to_string(), 1u8)].into_iter().collect());

    // Server is authoritative: response differs from what we sent.
    let result = client.update_acls("office", &container).await.unwrap();
    assert_eq!(result["n1"]["n2"], 2);
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn controller_error_body_message_is_surfaced() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/dns/office/www"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "Code": 400,
            "Message": "cannot delete default dns entry"
        })))
        .mount(&server)
        .await;

    let result = client.delete_dns("office", "www").await;
    match result {
        Err(Error::Controller { message, status }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "cannot delete default dns entry");
        }
        other => panic!("expected Controller error, got: {other:?}"),
    }
}
