mod common;

use std::sync::Arc;

use common::MockServer;
use platon_api::{
    ACCESS_TOKEN, ApiConfig, Error, MemorySecretStore, PlatformApi, PlatonClient, SecretStore,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn resource_body() -> String {
    json!({
        "resource": {
            "id": "res-1",
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-01T10:00:00Z",
            "name": "Fractions",
            "type": "EXERCISE",
            "status": "DRAFT",
            "ownerId": "owner-1",
            "permissions": { "read": true, "write": true, "member": true, "watcher": false, "waiting": false }
        }
    })
    .to_string()
}

fn refresh_body(token: &str) -> String {
    json!({ "resource": { "accessToken": token } }).to_string()
}

fn client(server: &MockServer, secrets: Arc<MemorySecretStore>) -> PlatonClient {
    PlatonClient::new(ApiConfig::new(server.base.clone()), secrets).unwrap()
}

#[tokio::test]
async fn test_get_resource_sends_bearer_token() {
    let server = MockServer::start(vec![(200, resource_body())]).await;
    let secrets = Arc::new(MemorySecretStore::with_tokens("access-1", "refresh-1"));

    let resource = client(&server, secrets).get_resource("res-1").await.unwrap();

    assert_eq!(resource.name, "Fractions");
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/v1/resources/res-1?expands=parent");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer access-1"));
}

#[tokio::test]
async fn test_forbidden_refreshes_once_and_fails() {
    let server = MockServer::start(vec![
        (403, "{}".to_string()),
        (200, refresh_body("access-2")),
        (200, resource_body()),
    ])
    .await;
    let secrets = Arc::new(MemorySecretStore::with_tokens("access-1", "refresh-1"));

    let err = client(&server, Arc::clone(&secrets))
        .get_resource("res-1")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(secrets.get(ACCESS_TOKEN).unwrap().as_deref(), Some("access-2"));

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/v1/resources/res-1?expands=parent");
    assert_eq!(requests[1].method, "POST");
    assert_eq!(requests[1].path, "/api/v1/auth/refresh/");
    assert!(requests[1].body_text().contains(r#""refresh":"refresh-1""#));
}

#[tokio::test]
async fn test_next_request_uses_refreshed_token() {
    let server = MockServer::start(vec![
        (403, "{}".to_string()),
        (200, refresh_body("access-2")),
        (200, resource_body()),
    ])
    .await;
    let secrets = Arc::new(MemorySecretStore::with_tokens("access-1", "refresh-1"));
    let client = client(&server, Arc::clone(&secrets));

    assert!(client.get_resource("res-1").await.is_err());
    let resource = client.get_resource("res-1").await.unwrap();

    assert_eq!(resource.id, "res-1");
    let requests = server.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer access-1"));
    assert_eq!(requests[2].authorization.as_deref(), Some("Bearer access-2"));
}

#[tokio::test]
async fn test_failed_refresh_is_reported() {
    let server = MockServer::start(vec![(403, "{}".to_string()), (401, "{}".to_string())]).await;
    let secrets = Arc::new(MemorySecretStore::with_tokens("access-1", "refresh-1"));

    let err = client(&server, secrets).get_user("jdoe").await.unwrap_err();

    assert!(matches!(err, Error::RefreshFailed { .. }));
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn test_missing_access_token_sends_nothing() {
    let server = MockServer::start(vec![(200, resource_body())]).await;
    let secrets = Arc::new(MemorySecretStore::new());

    let err = client(&server, secrets).get_resource("res-1").await.unwrap_err();

    assert!(matches!(err, Error::MissingCredential { key } if key == ACCESS_TOKEN));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_not_found_maps_to_status_error() {
    let server = MockServer::start(vec![(404, "{}".to_string())]).await;
    let secrets = Arc::new(MemorySecretStore::with_tokens("a", "r"));

    let err = client(&server, secrets).get_resource("nope").await.unwrap_err();

    assert!(matches!(err, Error::Status { status: 404, ref method, .. } if method == "GET"));
}

#[tokio::test]
async fn test_download_bundle_writes_body() {
    let server = MockServer::start(vec![(200, "BUNDLE-BYTES".to_string())]).await;
    let secrets = Arc::new(MemorySecretStore::with_tokens("a", "r"));
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("nested/bundle.git");

    client(&server, secrets)
        .download_bundle("res-1", &dest)
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "BUNDLE-BYTES");
    assert_eq!(server.requests()[0].path, "/api/v1/files/res-1/?bundle");
}

#[tokio::test]
async fn test_upload_bundle_is_multipart() {
    let server = MockServer::start(vec![(200, "{}".to_string())]).await;
    let secrets = Arc::new(MemorySecretStore::with_tokens("a", "r"));
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("bundle.git");
    std::fs::write(&bundle, "local history").unwrap();

    client(&server, secrets)
        .upload_bundle("res-1", &bundle)
        .await
        .unwrap();

    let request = &server.requests()[0];
    assert_eq!(request.method, "PUT");
    assert_eq!(request.path, "/api/v1/files/res-1/");
    assert!(
        request
            .content_type
            .as_deref()
            .unwrap()
            .starts_with("multipart/form-data")
    );
    let body = request.body_text();
    assert!(body.contains(r#"name="bundle""#));
    assert!(body.contains(r#"filename="bundle.git""#));
    assert!(body.contains("local history"));
}
