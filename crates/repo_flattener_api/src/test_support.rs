//! Helpers shared by the HTTP tests.
//!
//! Handlers run against the real GitHub client pointed at a `wiremock` server.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response},
};
use github_client::{create_token_client, GitHubClient};
use http_body_util::BodyExt;
use repo_flattener_core::{FlattenerConfig, RepositoryFlattener};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::AppState;

pub(crate) const DEMO_URL: &str = "https://github.com/octo/demo";

pub(crate) fn state_for(server: &MockServer) -> AppState {
    let octocrab = create_token_client("test-token", &server.uri()).unwrap();
    let client = GitHubClient::new(octocrab);
    AppState::new(Arc::new(RepositoryFlattener::new(
        Arc::new(client),
        FlattenerConfig::default(),
    )))
}

pub(crate) fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(crate) async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Mounts `octo/demo` with default branch `main` at commit `abc123`.
///
/// The tree holds `readme.md`, `src/main.rs`, `logo.png` (binary) and
/// `big.bin`, which is above the size ceiling.
pub(crate) async fn mount_demo_repository(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "demo",
            "full_name": "octo/demo",
            "default_branch": "main"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/commits/main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sha": "abc123" })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/git/trees/abc123"))
        .and(query_param("recursive", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": "abc123",
            "truncated": false,
            "tree": [
                { "path": "readme.md", "mode": "100644", "type": "blob", "sha": "b1", "size": 7 },
                { "path": "src", "mode": "040000", "type": "tree", "sha": "t-src" },
                { "path": "src/main.rs", "mode": "100644", "type": "blob", "sha": "b2", "size": 13 },
                { "path": "logo.png", "mode": "100644", "type": "blob", "sha": "b3", "size": 4 },
                { "path": "big.bin", "mode": "100644", "type": "blob", "sha": "b4", "size": 5242880 }
            ]
        })))
        .mount(server)
        .await;

    mount_file(server, "readme.md", "IyBEZW1vCg==").await;
    mount_file(server, "src/main.rs", "Zm4gbWFpbigpIHt9Cg==").await;
    mount_file(server, "logo.png", "3q2+7w==").await;
}

/// Mounts the contents of `file_path` at commit `abc123`.
pub(crate) async fn mount_file(server: &MockServer, file_path: &str, base64: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/octo/demo/contents/{}", file_path)))
        .and(query_param("ref", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "file",
            "name": file_path.rsplit('/').next().unwrap_or(file_path),
            "path": file_path,
            "sha": format!("sha-{}", file_path),
            "size": 0,
            "encoding": "base64",
            "content": format!("{}\n", base64)
        })))
        .mount(server)
        .await;
}
