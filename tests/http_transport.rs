//! HTTP-level tests of the transport and API client using wiremock.

use std::sync::Arc;

use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rillet::api::ApiClient;
use rillet::app::RilletError;
use rillet::domain::{Priority, SourceType};
use rillet::transport::{Credentials, HttpTransport, Transport};

fn transport(server: &MockServer, credentials: Credentials) -> HttpTransport {
    HttpTransport::new(server.uri(), credentials).unwrap()
}

async fn authorization_headers(server: &MockServer) -> Vec<Option<String>> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| {
            r.headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .collect()
}

#[tokio::test]
async fn test_basic_auth_sent_with_full_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/settings"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"maximumConcurrentTransfers": 2}"#))
        .mount(&server)
        .await;

    let transport = transport(&server, Credentials::new("user", "pass"));
    let body = assert_ok!(transport.get("/settings").await);

    assert_eq!(body, Some(json!({"maximumConcurrentTransfers": 2})));
}

#[tokio::test]
async fn test_no_auth_without_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    transport(&server, Credentials::default())
        .get("/subscriptions?offset=0")
        .await
        .unwrap();
    transport(&server, Credentials::new("user", ""))
        .get("/subscriptions?offset=0")
        .await
        .unwrap();

    assert_eq!(authorization_headers(&server).await, vec![None, None]);
}

#[tokio::test]
async fn test_empty_success_body_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/articles/7"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let body = transport(&server, Credentials::default())
        .delete("/articles/7")
        .await
        .unwrap();
    assert!(body.is_none());
}

#[tokio::test]
async fn test_error_status_carries_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subscriptions/99"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"{"error": "Subscription not found"}"#),
        )
        .mount(&server)
        .await;

    let api = ApiClient::new(Arc::new(transport(&server, Credentials::default())));
    let err = api.get_subscription(99).await.unwrap_err();

    match &err {
        RilletError::Status { status, body } => {
            assert_eq!(*status, 404);
            assert_eq!(body.as_ref().unwrap()["error"], "Subscription not found");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Subscription not found"));
}

#[tokio::test]
async fn test_post_requires_created_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subscriptions"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "source": "https://example.com/feed.xml",
            "sourceType": 0,
            "downloadEnclosures": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id": 4, "sourceType": 0}"#))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/transfers"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let api = ApiClient::new(Arc::new(transport(&server, Credentials::default())));

    let created = api
        .add_subscription("https://example.com/feed.xml", SourceType::Url, true)
        .await
        .unwrap();
    assert_eq!(created.unwrap()["id"], 4);

    let err = assert_err!(api.add_download("https://example.com/a.mp3", None).await);
    assert!(matches!(err, RilletError::Status { status: 200, body: None }));
}

#[tokio::test]
async fn test_article_listing_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/articles"))
        .and(query_param("sort", "date"))
        .and(query_param("sortDescending", "true"))
        .and(query_param("subscriptionId", "3"))
        .and(query_param("offset", "40"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{"id": 41, "subscriptionId": 3, "title": "Episode 41", "read": false}]"#,
        ))
        .mount(&server)
        .await;

    let api = ApiClient::new(Arc::new(transport(&server, Credentials::default())));
    let articles = api.get_articles(3, 40, 20).await.unwrap();

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "Episode 41");
}

#[tokio::test]
async fn test_priority_update_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/transfers/abc"))
        .and(body_json(json!({"priority": 2})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(Arc::new(transport(&server, Credentials::new("u", "p"))));
    api.set_download_priority("abc", Priority::Low).await.unwrap();
}
