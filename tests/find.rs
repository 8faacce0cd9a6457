mod support;

use dab_rust::{Crud, FindParams, SortSpec};
use serde_json::json;
use support::seeded_adapter;

#[tokio::test]
async fn find_all_in_insertion_order() {
    let adapter = seeded_adapter().await;

    let docs = adapter.find(FindParams::default()).await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].id("_id"), Some("jack-bauer"));
    assert_eq!(docs[1].id("_id"), Some("james-bond"));
    assert_eq!(docs[0].get("name"), Some(&json!("Jack Bauer")));
}

#[tokio::test]
async fn find_with_equality_filter() {
    let adapter = seeded_adapter().await;

    let docs = adapter
        .find(FindParams {
            query: json!({ "name": "James Bond" }),
            ..FindParams::default()
        })
        .await
        .unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id("_id"), Some("james-bond"));
}

#[tokio::test]
async fn find_with_no_match() {
    let adapter = seeded_adapter().await;

    let docs = adapter
        .find(FindParams {
            query: json!({ "name": "Austin Powers" }),
            ..FindParams::default()
        })
        .await
        .unwrap();

    assert!(docs.is_empty());
}

#[tokio::test]
async fn find_second_page() {
    let adapter = seeded_adapter().await;

    let docs = adapter
        .find(FindParams {
            limit: Some(1),
            page: Some(2),
            ..FindParams::default()
        })
        .await
        .unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id("_id"), Some("james-bond"));
}

#[tokio::test]
async fn find_page_past_the_end() {
    let adapter = seeded_adapter().await;

    let docs = adapter
        .find(FindParams {
            limit: Some(1),
            page: Some(5),
            ..FindParams::default()
        })
        .await
        .unwrap();

    assert!(docs.is_empty());
}

#[tokio::test]
async fn find_sorted_descending() {
    let adapter = seeded_adapter().await;

    let docs = adapter
        .find(FindParams {
            sort: vec![SortSpec::desc("name")],
            ..FindParams::default()
        })
        .await
        .unwrap();

    assert_eq!(docs[0].id("_id"), Some("james-bond"));
    assert_eq!(docs[1].id("_id"), Some("jack-bauer"));
}

#[tokio::test]
async fn find_sorted_ascending() {
    let adapter = seeded_adapter().await;

    let docs = adapter
        .find(FindParams {
            sort: vec![SortSpec::asc("name")],
            ..FindParams::default()
        })
        .await
        .unwrap();

    assert_eq!(docs[0].id("_id"), Some("jack-bauer"));
    assert_eq!(docs[1].id("_id"), Some("james-bond"));
}
