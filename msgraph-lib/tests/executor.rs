//! Request executor tests against a local mock server.

use std::time::Duration;

use httpmock::prelude::*;
use msgraph_lib::Content;
use msgraph_lib::Error;
use msgraph_lib::GraphClient;
use msgraph_lib::api::DriveOwner;
use msgraph_lib::api::RequestOptions;
use msgraph_lib::api::query::Constraint;
use msgraph_lib::api::query::Filter;
use msgraph_lib::api::query::ODataQuery;
use msgraph_lib::api::query::Operator;
use msgraph_lib::error::ApiError;
use msgraph_lib::error::HttpErrorKind;
use reqwest::StatusCode;
use serde_json::json;

fn client(server: &MockServer) -> GraphClient {
    GraphClient::builder()
        .base_url(server.base_url())
        .build()
        .unwrap()
}

fn with_token() -> RequestOptions {
    RequestOptions::new().with_token("tok")
}

#[tokio::test]
async fn test_json_response() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1.0/users/u1")
                .header("authorization", "Bearer tok")
                .header("content-type", "application/json");
            then.status(200)
                .header("content-type", "application/json; odata.metadata=minimal")
                .body(r#"{"id":"u1","displayName":"Adele Vance"}"#);
        })
        .await;

    let response = client(&server)
        .get_user("u1", &with_token())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.content,
        Content::Json(json!({ "id": "u1", "displayName": "Adele Vance" }))
    );
}

#[tokio::test]
async fn test_non_json_response_is_bytes() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1.0/users/u1/messages/m1/$value");
            then.status(200)
                .header("content-type", "text/plain")
                .body("MIME-Version: 1.0\r\n");
        })
        .await;

    let response = client(&server)
        .get_mail("u1", "m1", true, &with_token())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        response.content.as_bytes(),
        Some("MIME-Version: 1.0\r\n".as_bytes())
    );
}

#[tokio::test]
async fn test_drive_item_content() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1.0/sites/s1/drive/items/i1/content");
            then.status(200)
                .header("content-type", "application/octet-stream")
                .body(vec![0u8, 159, 146, 150]);
        })
        .await;

    let response = client(&server)
        .get_drive_item_content(DriveOwner::Sites, "s1", "i1", &with_token())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.content.as_bytes(), Some(&[0u8, 159, 146, 150][..]));
}

#[tokio::test]
async fn test_too_many_requests() {
    let server = MockServer::start_async().await;
    let body = json!({
        "error": { "code": "TooManyRequests", "message": "Please retry again later." }
    });
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1.0/users/u1");
            then.status(429)
                .header("content-type", "application/json")
                .header("retry-after", "10")
                .body(body.to_string());
        })
        .await;

    let err = client(&server)
        .get_user("u1", &with_token())
        .await
        .unwrap_err();

    mock.assert_async().await;
    let http = err.as_http().unwrap();
    assert_eq!(http.kind, HttpErrorKind::TooManyRequests);
    assert_eq!(http.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(http.url, server.url("/v1.0/users/u1"));
    assert_eq!(http.content, Content::Json(body));
    assert_eq!(http.headers["retry-after"], "10");
    assert_eq!(http.retry_after(), Some(Duration::from_secs(10)));
    assert!(http.is_retryable());
    assert_eq!(http.detail().unwrap().code, "TooManyRequests");
}

#[tokio::test]
async fn test_unmapped_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1.0/users/u1");
            then.status(418).body("teapot");
        })
        .await;

    let err = client(&server)
        .get_user("u1", &with_token())
        .await
        .unwrap_err();

    assert_eq!(err.http_kind(), Some(HttpErrorKind::UnknownError));
    assert_eq!(err.status_code(), Some(StatusCode::IM_A_TEAPOT));
    assert_eq!(
        err.as_http().unwrap().content.as_bytes(),
        Some("teapot".as_bytes())
    );
}

#[tokio::test]
async fn test_expected_statuses_override() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1.0/users/gone");
            then.status(404)
                .header("content-type", "application/json")
                .body(r#"{"error":{"code":"Request_ResourceNotFound","message":"nope"}}"#);
        })
        .await;

    let options = with_token().with_expected_statuses([StatusCode::NOT_FOUND]);
    let response = client(&server).get_user("gone", &options).await.unwrap();

    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let err = client(&server)
        .get_user("gone", &with_token())
        .await
        .unwrap_err();
    assert_eq!(err.http_kind(), Some(HttpErrorKind::NotFound));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let client = GraphClient::builder()
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();

    let err = client.get_user("u1", &with_token()).await.unwrap_err();

    assert!(matches!(err, Error::Api(ApiError::Network(_))));
    assert!(err.as_http().is_none());
}

#[tokio::test]
async fn test_query_values_survive_reserved_characters() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1.0/users/u1/messages")
                .query_param("$filter", "startswith(subject, 'C# R&D a+b')")
                .query_param("$select", "id,subject");
            then.status(200)
                .header("content-type", "application/json")
                .body(json!({ "value": [{ "id": "m1" }] }).to_string());
        })
        .await;

    let mut query = ODataQuery::new();
    query.set_filter(Filter::single(
        Constraint::new("subject", Operator::StartsWith, "C# R&D a+b").unwrap(),
    ));
    query.set_select(["id", "subject"]).unwrap();

    let response = client(&server)
        .list_user_mails_bulk("u1", &with_token().with_query(query))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.content.get("value").unwrap()[0]["id"], "m1");
}

#[tokio::test]
async fn test_malformed_error_body_keeps_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1.0/users/u1");
            then.status(500)
                .header("content-type", "application/json")
                .body("<html>Service Unavailable</html>");
        })
        .await;

    let err = client(&server)
        .get_user("u1", &with_token())
        .await
        .unwrap_err();

    let http = err.as_http().unwrap();
    assert_eq!(http.kind, HttpErrorKind::InternalServerError);
    assert_eq!(http.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        http.content.as_bytes(),
        Some("<html>Service Unavailable</html>".as_bytes())
    );
    assert!(http.detail().is_none());
}
