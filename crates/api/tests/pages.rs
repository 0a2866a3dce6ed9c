//! Integration tests for the rendered pages.

mod common;

use axum::http::StatusCode;
use common::{body_text, get};

#[tokio::test]
async fn index_lists_registered_models() {
    let app = common::build_test_app();
    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<title>Test Shelf</title>"));
    assert!(html.contains("POST /api/"));
    assert!(html.contains("admin/book-list"));
    assert!(html.contains("find-bestseller"));
    assert!(!html.contains("#title#"));
}

#[tokio::test]
async fn books_page_knows_the_api_root() {
    let app = common::build_test_app();
    let response = get(app, "/books").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"data-api-root="/api""#));
}

#[tokio::test]
async fn missing_template_returns_404() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::test_config();
    config.template_dir = dir.path().to_path_buf();
    let app = common::build_app_with(config);

    let response = get(app, "/books").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
