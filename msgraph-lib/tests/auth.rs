//! Token acquisition and managed token tests against a local mock server.

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use httpmock::prelude::*;
use msgraph_lib::Error;
use msgraph_lib::GraphClient;
use msgraph_lib::api::RequestOptions;
use msgraph_lib::auth::TokenSource;
use msgraph_lib::error::AuthError;
use msgraph_lib::error::HttpErrorKind;
use reqwest::StatusCode;
use serde_json::json;

const TOKEN_FORM: &str = "grant_type=client_credentials\
    &scope=https%3A%2F%2Fgraph.microsoft.com%2F.default\
    &client_id=app-id\
    &client_secret=app-secret";

/// Client whose Graph calls and token requests both go to `server`.
fn client(server: &MockServer) -> GraphClient {
    GraphClient::builder()
        .base_url(server.base_url())
        .authority(server.base_url())
        .build()
        .unwrap()
}

async fn token_endpoint<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
    let body = json!({
        "token_type": "Bearer",
        "expires_in": 3599,
        "ext_expires_in": 3599,
        "access_token": token
    });

    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/tenant-id/oauth2/v2.0/token")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(TOKEN_FORM);
            then.status(200)
                .header("content-type", "application/json; charset=utf-8")
                .body(body.to_string());
        })
        .await
}

#[tokio::test]
async fn test_acquire_token() {
    let server = MockServer::start_async().await;
    let mock = token_endpoint(&server, "tok").await;
    let client = client(&server);

    let (payload, status) = client
        .acquire_token("app-id", "app-secret", "tenant-id")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload.access_token, "tok");
    assert_eq!(payload.token_type.as_deref(), Some("Bearer"));
    assert_eq!(payload.expires_in, Some(3599));
    assert!(!client.is_managed());
    assert_eq!(client.token(), None);
}

#[tokio::test]
async fn test_acquire_token_rejected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/tenant-id/oauth2/v2.0/token");
            then.status(401)
                .header("content-type", "application/json")
                .body(
                    json!({
                        "error": "invalid_client",
                        "error_description": "AADSTS7000215: Invalid client secret provided."
                    })
                    .to_string(),
                );
        })
        .await;

    let err = client(&server)
        .acquire_token("app-id", "wrong", "tenant-id")
        .await
        .unwrap_err();

    assert_eq!(err.http_kind(), Some(HttpErrorKind::Unauthorized));
    assert_eq!(err.as_http().unwrap().detail().unwrap().code, "invalid_client");
}

#[tokio::test]
async fn test_acquire_token_without_access_token() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/tenant-id/oauth2/v2.0/token");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"token_type":"Bearer"}"#);
        })
        .await;

    let err = client(&server)
        .acquire_token("app-id", "app-secret", "tenant-id")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Auth(AuthError::MissingAccessToken)));
}

#[tokio::test]
async fn test_managed_token_authorizes_calls() {
    let server = MockServer::start_async().await;
    let token_mock = token_endpoint(&server, "managed-tok").await;
    let users_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1.0/users")
                .header("authorization", "Bearer managed-tok");
            then.status(200)
                .header("content-type", "application/json")
                .body(json!({ "value": [{ "id": "u0" }] }).to_string());
        })
        .await;
    let client = client(&server);

    client
        .manage_token("app-id", "app-secret", "tenant-id")
        .await
        .unwrap();

    assert!(client.is_managed());
    assert_eq!(client.token().as_deref(), Some("managed-tok"));

    let response = client.list_users_bulk(&RequestOptions::new()).await.unwrap();
    assert_eq!(response.content.get("value").unwrap()[0]["id"], "u0");

    token_mock.assert_async().await;
    users_mock.assert_async().await;

    let err = client
        .manage_token("app-id", "app-secret", "tenant-id")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::AlreadyManaged)));

    client.stop_token_management().await;
    assert!(!client.is_managed());
    assert_eq!(client.token(), None);

    let err = client.list_users_bulk(&RequestOptions::new()).await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::AuthenticationRequired)));
}

#[tokio::test]
async fn test_explicit_token_wins_over_managed_token() {
    let server = MockServer::start_async().await;
    token_endpoint(&server, "managed-tok").await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1.0/users/u1")
                .header("authorization", "bearer explicit");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id":"u1"}"#);
        })
        .await;
    let client = client(&server);

    client
        .manage_token("app-id", "app-secret", "tenant-id")
        .await
        .unwrap();

    client
        .get_user("u1", &RequestOptions::new().with_token("bearer explicit"))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_manage_token_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/tenant-id/oauth2/v2.0/token");
            then.status(400)
                .header("content-type", "application/json")
                .body(r#"{"error":"invalid_request","error_description":"AADSTS900144"}"#);
        })
        .await;
    let client = client(&server);

    let err = client
        .manage_token("app-id", "app-secret", "tenant-id")
        .await
        .unwrap_err();

    match err {
        Error::Auth(AuthError::TokenManagement(source)) => {
            assert_eq!(source.http_kind(), Some(HttpErrorKind::BadRequest));
        }
        other => panic!("expected token management error, got {:?}", other),
    }
    assert!(!client.is_managed());
    assert_eq!(client.token(), None);
}

#[tokio::test]
async fn test_empty_explicit_token_uses_managed_token() {
    let server = MockServer::start_async().await;
    token_endpoint(&server, "managed-tok").await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1.0/users/u1")
                .header("authorization", "Bearer managed-tok");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id":"u1"}"#);
        })
        .await;
    let client = client(&server);

    client
        .manage_token("app-id", "app-secret", "tenant-id")
        .await
        .unwrap();

    client
        .get_user("u1", &RequestOptions::new().with_token(""))
        .await
        .unwrap();

    mock.assert_async().await;
}

/// Hands out `static-1`, `static-2`, ... on each fetch.
#[derive(Default)]
struct CountingSource {
    fetches: AtomicUsize,
}

#[async_trait]
impl TokenSource for CountingSource {
    async fn fetch_token(&self) -> Result<String, Error> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("static-{}", n))
    }
}

#[tokio::test]
async fn test_manage_token_with_custom_source() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1.0/users/u1")
                .header("authorization", "Bearer static-1");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id":"u1"}"#);
        })
        .await;
    let client = client(&server);

    client
        .manage_token_with(CountingSource::default())
        .await
        .unwrap();

    assert!(client.is_managed());
    assert_eq!(client.token().as_deref(), Some("static-1"));

    client.get_user("u1", &RequestOptions::new()).await.unwrap();
    mock.assert_async().await;

    let err = client
        .manage_token_with(CountingSource::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::AlreadyManaged)));

    client.stop_token_management().await;
}
