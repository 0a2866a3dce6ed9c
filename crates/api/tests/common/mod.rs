#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use bookshelf_api::config::ServerConfig;
use bookshelf_api::router::build_app_router;
use bookshelf_api::state::AppState;
use bookshelf_db::DataLayer;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn workspace_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join(name)
}

/// Build a test `ServerConfig` pointing at the workspace views and assets.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        static_dir: workspace_dir("public"),
        template_dir: workspace_dir("views"),
        app_title: "Test Shelf".to_string(),
        ..ServerConfig::default()
    }
}

/// Build the full application router over freshly seeded in-memory data.
pub fn build_test_app() -> Router {
    build_app_with(test_config())
}

pub fn build_app_with(config: ServerConfig) -> Router {
    let state = AppState::new(config, Arc::new(DataLayer::in_memory())).unwrap();
    build_app_router(state).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a JSON body, optionally as a user with the given roles.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    user: Option<(&str, &str)>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some((name, roles)) = user {
        builder = builder
            .header("x-user-name", name)
            .header("x-user-roles", roles);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

pub const EDITOR: Option<(&str, &str)> = Some(("ed", "editor"));
pub const ADMIN: Option<(&str, &str)> = Some(("root", "admin"));
