// tests/integration/resolver_flow.rs
//! End-to-end resolution over recorded record maps.

use super::fixtures::*;
use notion_blocks::{AppError, NotionClient};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn client_over(transport: FixtureTransport) -> (NotionClient, Arc<FixtureTransport>) {
    let transport = Arc::new(transport);
    (NotionClient::new(transport.clone()), transport)
}

#[tokio::test]
async fn resolves_page_from_compact_id() {
    let (client, _) = client_over(FixtureTransport::new(page_with_children()));

    let page = client
        .get_page("1429989fe8ac4effbc3e7404be81a66e")
        .await
        .unwrap()
        .expect("page should be available");

    assert_eq!(page.id().as_str(), PAGE_ID);
    assert_eq!(page.title(), Some("My Page"));
    assert_eq!(
        page.parent_id().map(|id| id.as_str()),
        Some("7a0b3c2d-1e4f-4a5b-8c6d-9e0f1a2b3c4d")
    );
    let children: Vec<&str> = page.children().iter().map(|id| id.as_str()).collect();
    assert_eq!(children, vec![TEXT_ID, DIVIDER_ID, SUB_PAGE_ID]);
}

#[tokio::test]
async fn resolves_page_from_url() {
    let (client, _) = client_over(FixtureTransport::new(page_with_children()));
    let page = client
        .get_page("https://www.notion.so/My-Page-1429989fe8ac4effbc3e7404be81a66e")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(page.title(), Some("My Page"));

    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["block_type"], "page");
    assert_eq!(json["title"], "My Page");
}

#[tokio::test]
async fn non_page_root_is_rejected() {
    let (client, _) = client_over(FixtureTransport::new(page_with_children()));
    let err = client.get_page(TEXT_ID).await.unwrap_err();
    match err {
        AppError::NotAPage { id, actual_type } => {
            assert_eq!(id.as_str(), TEXT_ID);
            assert_eq!(actual_type, "text");
        }
        other => panic!("expected NotAPage, got {other:?}"),
    }
}

#[tokio::test]
async fn children_keep_document_order_and_title_policy() {
    for concurrency in [1, 16] {
        let (client, _) = client_over(FixtureTransport::new(page_with_children()));
        let client = client.with_concurrency(concurrency);

        let children = client.children(PAGE_ID).await.unwrap();
        let summary: Vec<(&str, &str, Option<&str>)> = children
            .iter()
            .map(|block| (block.id().as_str(), block.type_name(), block.title()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (TEXT_ID, "text", Some("Hello world")),
                (DIVIDER_ID, "divider", None),
                (SUB_PAGE_ID, "page", Some("Sub page")),
            ]
        );
    }
}

#[tokio::test]
async fn transient_empty_answers_are_retried() {
    let (client, transport) =
        client_over(FixtureTransport::new(page_with_children()).empty_first(PAGE_ID, 9));

    let page = client.get_page(PAGE_ID).await.unwrap();
    assert!(page.is_some());
    assert_eq!(transport.requests_for(PAGE_ID), 10);
}

#[tokio::test]
async fn exhausted_retries_report_absence() {
    let (client, transport) =
        client_over(FixtureTransport::new(page_with_children()).empty_first(PAGE_ID, 11));

    assert!(client.get_page(PAGE_ID).await.unwrap().is_none());
    assert_eq!(transport.requests_for(PAGE_ID), 11);
}

#[tokio::test]
async fn children_ids_of_unavailable_block_are_empty() {
    let (client, _) =
        client_over(FixtureTransport::new(page_with_children()).empty_first(PAGE_ID, 11));
    assert!(client.children_ids(PAGE_ID).await.unwrap().is_empty());
}

#[tokio::test]
async fn tree_skips_blocks_missing_from_the_service() {
    let (client, transport) = client_over(FixtureTransport::new(page_with_children()));

    let tree = client.tree(PAGE_ID, 3).await.unwrap().unwrap();
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.depth(), 2);
    assert!(tree.children[2].children.is_empty());
    assert_eq!(
        transport.requests_for("550e8400-e29b-41d4-a716-446655440004"),
        1
    );
}

#[tokio::test]
async fn last_child_and_props() {
    let (client, _) = client_over(FixtureTransport::new(page_with_children()));

    let last = client.last_child_id(PAGE_ID).await.unwrap();
    assert_eq!(last.map(|id| id.to_string()), Some(SUB_PAGE_ID.to_string()));

    let props = client.block_props_and_format(PAGE_ID, "Untitled").await.unwrap();
    assert_eq!(props.properties["title"][0][0], "My");
    assert_eq!(props.format["page_icon"], "📘");
}

#[tokio::test]
async fn collection_view_metadata() {
    let (client, _) = client_over(FixtureTransport::new(collection_view()));

    let info = client
        .collection_info(COLLECTION_VIEW_ID)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        info.collection_id.map(|id| id.to_string()),
        Some("9b8a7c6d-5e4f-4321-a0b9-c8d7e6f5a4b3".to_string())
    );
    assert_eq!(info.view_ids.len(), 2);
    assert_eq!(info.title.as_deref(), Some("Reading list"));
}
