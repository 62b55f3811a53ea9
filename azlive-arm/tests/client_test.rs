// Control-plane client tests against a mock ARM endpoint.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use azlive_arm::types::{
    AccessControl, IpAccessControl, IpRange, LiveEvent, LiveEventInput, LiveEventProperties,
};
use azlive_arm::{login_with_service_principal, ArmError, ClientOptions, MediaServicesClient,
    ServicePrincipal};

const SUB: &str = "00000000-0000-0000-0000-000000000000";

fn account_path(suffix: &str) -> String {
    format!(
        "/subscriptions/{SUB}/resourceGroups/rg-live/providers/Microsoft.Media/mediaservices/mediatest{suffix}"
    )
}

fn client_for(server: &MockServer) -> MediaServicesClient {
    MediaServicesClient::new(
        server.uri(),
        SUB,
        "rg-live",
        "mediatest",
        "test-token",
        ClientOptions {
            long_running_retry: Duration::from_millis(10),
        },
    )
}

fn minimal_live_event() -> LiveEvent {
    LiveEvent {
        name: None,
        location: Some("westeurope".to_string()),
        properties: LiveEventProperties {
            description: None,
            use_static_hostname: Some(true),
            input: LiveEventInput {
                streaming_protocol: "RTMP".to_string(),
                access_control: Some(AccessControl {
                    ip: IpAccessControl {
                        allow: vec![IpRange::allow_all()],
                    },
                }),
                access_token: None,
                endpoints: vec![],
            },
            preview: None,
            encoding: None,
            stream_options: vec!["LowLatency".to_string()],
            provisioning_state: None,
            resource_state: None,
        },
    }
}

#[tokio::test]
async fn login_exchanges_credentials_for_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/contoso.onmicrosoft.com/oauth2/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=app-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "tok-123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let principal = ServicePrincipal {
        client_id: "app-id".to_string(),
        client_secret: "app-secret".to_string(),
        tenant_domain: "contoso.onmicrosoft.com".to_string(),
    };
    let token = login_with_service_principal(&principal, &server.uri())
        .await
        .unwrap();
    assert_eq!(token.access_token, "tok-123");
}

#[tokio::test]
async fn login_failure_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret"
        })))
        .mount(&server)
        .await;

    let principal = ServicePrincipal {
        client_id: "app-id".to_string(),
        client_secret: "wrong".to_string(),
        tenant_domain: "contoso.onmicrosoft.com".to_string(),
    };
    let err = login_with_service_principal(&principal, &server.uri())
        .await
        .unwrap_err();
    assert!(matches!(err, ArmError::Auth(_)));
}

#[tokio::test]
async fn create_live_event_polls_until_succeeded() {
    let server = MockServer::start().await;
    let event_path = account_path("/liveEvents/liveEvent-t1");

    Mock::given(method("PUT"))
        .and(path(event_path.clone()))
        .and(query_param("autoStart", "false"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "name": "liveEvent-t1",
            "properties": {
                "input": { "streamingProtocol": "RTMP" },
                "provisioningState": "InProgress"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    // first poll still in progress, second poll terminal
    Mock::given(method("GET"))
        .and(path(event_path.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "liveEvent-t1",
            "properties": {
                "input": { "streamingProtocol": "RTMP" },
                "provisioningState": "InProgress"
            }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(event_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "liveEvent-t1",
            "properties": {
                "input": { "streamingProtocol": "RTMP" },
                "provisioningState": "Succeeded",
                "resourceState": "Stopped"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let event = client
        .create_live_event("liveEvent-t1", &minimal_live_event())
        .await
        .unwrap();
    assert_eq!(
        event.properties.provisioning_state.as_deref(),
        Some("Succeeded")
    );
}

#[tokio::test]
async fn failed_provisioning_becomes_operation_error() {
    let server = MockServer::start().await;
    let event_path = account_path("/liveEvents/liveEvent-t2");

    Mock::given(method("PUT"))
        .and(path(event_path.clone()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "name": "liveEvent-t2",
            "properties": { "input": { "streamingProtocol": "RTMP" } }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(event_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "liveEvent-t2",
            "properties": {
                "input": { "streamingProtocol": "RTMP" },
                "provisioningState": "Failed"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .create_live_event("liveEvent-t2", &minimal_live_event())
        .await
        .unwrap_err();
    match err {
        ArmError::Operation { resource, state } => {
            assert_eq!(resource, "liveEvent-t2");
            assert_eq!(state, "Failed");
        }
        other => panic!("expected operation error, got {other:?}"),
    }
}

#[tokio::test]
async fn get_live_output_maps_404_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": "ResourceNotFound", "message": "not found" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let output = client
        .get_live_output("liveEvent-t3", "liveOutput-t3")
        .await
        .unwrap();
    assert!(output.is_none());
}

#[tokio::test]
async fn delete_live_event_polls_until_gone() {
    let server = MockServer::start().await;
    let event_path = account_path("/liveEvents/liveEvent-t4");

    Mock::given(method("DELETE"))
        .and(path(event_path.clone()))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;
    // still visible on the first poll, gone on the second
    Mock::given(method("GET"))
        .and(path(event_path.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "liveEvent-t4",
            "properties": {
                "input": { "streamingProtocol": "RTMP" },
                "resourceState": "Deleting"
            }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(event_path))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.delete_live_event("liveEvent-t4").await.unwrap();
}

#[tokio::test]
async fn arm_error_body_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": "BadRequest",
                "message": "The account was not found."
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_media_service().await.unwrap_err();
    match err {
        ArmError::Api { code, message } => {
            assert_eq!(code, "BadRequest");
            assert_eq!(message, "The account was not found.");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn start_streaming_endpoint_does_not_poll() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(account_path("/streamingEndpoints/default/start")))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;
    // fire-and-forget: the endpoint is never re-fetched after the start
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.start_streaming_endpoint("default").await.unwrap();
}
