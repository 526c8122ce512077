// tests/integration/http_transport.rs
//! The client over real HTTP, against a local mock of the private API.

use super::fixtures::{page_with_children, service_error, PAGE_ID};
use clap::Parser;
use notion_blocks::{
    ActiveUser, ApiBaseUrl, AppError, ClientConfig, CommandLineInput, NotionClient,
    NotionErrorCode, NotionHttpClient, Session, SessionToken,
};
use std::sync::Arc;

const ENDPOINT: &str = "/api/v3/loadPageChunk";

fn client_for(server: &mockito::Server) -> NotionClient {
    let session = Session::new(
        SessionToken::new("tok123").unwrap(),
        Some(ActiveUser::new("user-7").unwrap()),
    );
    let base = ApiBaseUrl::parse(&format!("{}/api/v3", server.url())).unwrap();
    let http_client = NotionHttpClient::new(&session, base).unwrap();
    NotionClient::new(Arc::new(http_client))
}

#[tokio::test]
async fn get_page_over_http() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .match_header("cookie", "token_v2=tok123; x-active-user-header=user-7")
        .match_header("x-notion-active-user-header", "user-7")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "pageId": PAGE_ID,
            "chunkNumber": 0
        })))
        .with_status(200)
        .with_body(page_with_children().to_string())
        .expect(1)
        .create_async()
        .await;

    let page = client_for(&server)
        .get_page("1429989fe8ac4effbc3e7404be81a66e")
        .await
        .unwrap()
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.title(), Some("My Page"));
}

#[tokio::test]
async fn current_user_comes_from_response_header() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", ENDPOINT)
        .with_status(200)
        .with_header("x-notion-user-id", "5f3a0c1e-user")
        .with_body(page_with_children().to_string())
        .create_async()
        .await;

    let user = client_for(&server).current_user_id(PAGE_ID).await.unwrap();
    assert_eq!(user.as_deref(), Some("5f3a0c1e-user"));
}

#[tokio::test]
async fn rejected_session_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .with_status(401)
        .with_body(service_error())
        .expect(1)
        .create_async()
        .await;

    let err = client_for(&server).get_page(PAGE_ID).await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(
        err,
        AppError::NotionService {
            code: NotionErrorCode::Unauthorized,
            ..
        }
    ));
}

#[tokio::test]
async fn empty_answers_exhaust_the_ceiling() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .with_status(200)
        .with_body(r#"{"recordMap":{}}"#)
        .expect(11)
        .create_async()
        .await;

    let page = client_for(&server).get_page(PAGE_ID).await.unwrap();

    mock.assert_async().await;
    assert!(page.is_none());
}

#[tokio::test]
async fn client_from_resolved_configuration() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .match_header("cookie", "token_v2=envtok; x-active-user-header=")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({"limit": 25})))
        .with_status(200)
        .with_body(page_with_children().to_string())
        .create_async()
        .await;

    let base_url = format!("{}/api/v3", server.url());
    let cli = CommandLineInput::parse_from([
        "notion-blocks",
        "children-ids",
        PAGE_ID,
        "--base-url",
        base_url.as_str(),
        "--limit",
        "25",
    ]);
    let config = ClientConfig::resolve_with(cli, |name| {
        (name == "NOTION_TOKEN_V2").then(|| "envtok".to_string())
    })
    .unwrap();

    let client = NotionClient::from_config(&config).unwrap();
    let ids = client.children_ids(PAGE_ID).await.unwrap();

    mock.assert_async().await;
    assert_eq!(ids.len(), 3);
}
