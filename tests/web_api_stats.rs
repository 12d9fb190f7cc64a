//! Web API Stats Tests
//!
//! Integration tests for the JSON and HTML statistics endpoints.

mod common;

use common::{api_key_header, create_test_app, create_test_app_with, upload_form, TEST_API_KEY};
use filedrop::web::page::StatsPage;
use serde_json::Value;

async fn get_stats(app: &common::TestApp) -> Value {
    let response = app
        .server
        .get("/getstats")
        .add_header(api_key_header(), TEST_API_KEY.to_string())
        .await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn test_stats_empty_root() {
    let app = create_test_app();

    let json = get_stats(&app).await;

    assert_eq!(json["folders"], 0);
    assert_eq!(json["files"], 0);
    assert_eq!(json["bytes"], 0);
    assert_eq!(json["size"], "0 B");
}

#[tokio::test]
async fn test_stats_after_upload() {
    let app = create_test_app();
    let before = get_stats(&app).await;

    app.server
        .post("/upload")
        .add_header(api_key_header(), TEST_API_KEY.to_string())
        .multipart(upload_form(&[("a.bin", &[1u8; 100]), ("b.bin", &[2u8; 924])]))
        .await
        .assert_status_ok();

    let after = get_stats(&app).await;

    assert_eq!(
        after["folders"].as_u64().unwrap(),
        before["folders"].as_u64().unwrap() + 1
    );
    assert_eq!(
        after["files"].as_u64().unwrap(),
        before["files"].as_u64().unwrap() + 2
    );
    assert_eq!(
        after["bytes"].as_u64().unwrap(),
        before["bytes"].as_u64().unwrap() + 1024
    );
    assert_eq!(after["size"], "1.00 KB");
}

#[tokio::test]
async fn test_stats_counts_nested_folders() {
    let app = create_test_app();
    std::fs::create_dir_all(app.root.join("a").join("b")).unwrap();
    std::fs::write(app.root.join("a").join("b").join("deep.txt"), "deep").unwrap();
    std::fs::write(app.root.join("top.txt"), "top").unwrap();

    let json = get_stats(&app).await;

    assert_eq!(json["folders"], 2);
    assert_eq!(json["files"], 2);
    assert_eq!(json["bytes"], 7);
}

#[tokio::test]
async fn test_stats_page_renders_numbers() {
    let app = create_test_app();
    std::fs::create_dir(app.root.join("batch")).unwrap();
    std::fs::write(app.root.join("batch").join("a.bin"), vec![0u8; 1536]).unwrap();

    let response = app.server.get("/stats").await;

    response.assert_status_ok();
    assert!(response
        .header("content-type")
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = response.text();
    assert!(html.contains(r#"<td id="folders">1</td>"#));
    assert!(html.contains(r#"<td id="files">1</td>"#));
    assert!(html.contains(r#"<td id="size">1.50 KB</td>"#));
}

#[tokio::test]
async fn test_stats_page_custom_template() {
    let page = StatsPage::new("<p>{{files}} files, {{size}}</p>");
    let app = create_test_app_with(|state| state.with_stats_page(page));
    std::fs::write(app.root.join("one.txt"), "1").unwrap();

    let response = app.server.get("/stats").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "<p>1 files, 1 B</p>");
}

#[tokio::test]
async fn test_stats_reflects_external_changes() {
    let app = create_test_app();
    assert_eq!(get_stats(&app).await["files"], 0);

    std::fs::write(app.root.join("dropped-in.txt"), "hello").unwrap();

    let json = get_stats(&app).await;
    assert_eq!(json["files"], 1);
    assert_eq!(json["bytes"], 5);
}
