//! Integration tests for IP-based location lookup using wiremock.

use std::sync::Arc;
use std::time::Duration;

use weatherapp_core::{Coordinates, FetchError, IpLocationService, LocationResolver};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver_for(server: &MockServer, granted: bool) -> LocationResolver {
    let service =
        IpLocationService::new(format!("{}/json", server.uri()), granted, Duration::from_secs(5))
            .unwrap();
    LocationResolver::new(Arc::new(service))
}

#[tokio::test]
async fn test_successful_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "lat": 52.52,
            "lon": 13.405
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let coords = resolver_for(&mock_server, true).resolve_current_location().await.unwrap();

    assert_eq!(coords, Coordinates::new(52.52, 13.405));
}

#[tokio::test]
async fn test_permission_denied_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = resolver_for(&mock_server, false)
        .resolve_current_location()
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::PermissionDenied);
}

#[tokio::test]
async fn test_failed_lookup_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail",
            "message": "private range"
        })))
        .mount(&mock_server)
        .await;

    let err = resolver_for(&mock_server, true)
        .resolve_current_location()
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::LocationUnavailable);
}

#[tokio::test]
async fn test_server_error_is_platform_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = resolver_for(&mock_server, true)
        .resolve_current_location()
        .await
        .unwrap_err();

    match err {
        FetchError::Platform(msg) => assert!(msg.contains("503"), "message: {msg}"),
        other => panic!("expected platform error, got {other:?}"),
    }
}
