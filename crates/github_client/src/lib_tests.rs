//! Unit tests for the github_client crate.

use super::*; // Import items from lib.rs
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate}; // For constructing mock bodies

// --- Test Constants ---
const TEST_TOKEN: &str = "test-token";

fn create_client(mock_server: &MockServer) -> GitHubClient {
    let octocrab = create_token_client(TEST_TOKEN, &mock_server.uri()).unwrap();
    GitHubClient::new(octocrab)
}

#[test]
fn test_encode_path_keeps_separators() {
    assert_eq!(encode_path("src/lib.rs"), "src/lib.rs");
    assert_eq!(encode_path("/docs/my file.md/"), "docs/my%20file.md");
    assert_eq!(encode_path("a#b/c?d"), "a%23b/c%3Fd");
}

#[test]
fn test_encode_escapes_slashes_in_refs() {
    assert_eq!(encode("feature/login"), "feature%2Flogin");
    assert_eq!(encode("v1.2.3"), "v1.2.3");
}

#[tokio::test]
async fn test_get_repository_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/demo"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "demo",
            "full_name": "octo/demo",
            "default_branch": "main",
            "private": false
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let result = client.get_repository("octo", "demo").await;

    if let Err(e) = &result {
        eprintln!("get_repository error: {e:?}");
    }
    let metadata = result.unwrap();
    assert_eq!(metadata.default_branch, "main");
    assert_eq!(metadata.full_name, "octo/demo");
}

#[tokio::test]
async fn test_get_commit_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/commits/main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": "abc123",
            "commit": { "tree": { "sha": "tree123" } }
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let commit = client.get_commit("octo", "demo", "main").await.unwrap();

    assert_eq!(commit.sha, "abc123");
    assert_eq!(commit.tree_sha(), Some("tree123"));
}

#[tokio::test]
async fn test_get_commit_with_slash_in_branch_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/commits/feature%2Flogin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sha": "def456" })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let commit = client
        .get_commit("octo", "demo", "feature/login")
        .await
        .unwrap();

    assert_eq!(commit.sha, "def456");
}

#[tokio::test]
async fn test_get_tree_recursive() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/git/trees/abc123"))
        .and(query_param("recursive", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": "abc123",
            "truncated": false,
            "tree": [
                { "path": "README.md", "mode": "100644", "type": "blob", "sha": "b1", "size": 10 },
                { "path": "src", "mode": "040000", "type": "tree", "sha": "t1" },
                { "path": "src/lib.rs", "mode": "100644", "type": "blob", "sha": "b2", "size": 20 }
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let tree = client.get_tree("octo", "demo", "abc123", true).await.unwrap();

    assert_eq!(tree.tree.len(), 3);
    assert_eq!(tree.tree[2].path, "src/lib.rs");
}

#[tokio::test]
async fn test_get_contents_passes_ref() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/contents/docs/my%20file.md"))
        .and(query_param("ref", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "file",
            "name": "my file.md",
            "path": "docs/my file.md",
            "sha": "b3",
            "size": 5,
            "encoding": "base64",
            "content": "aGVsbG8=\n"
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let contents = client
        .get_contents("octo", "demo", "docs/my file.md", "abc123")
        .await
        .unwrap();

    assert_eq!(contents.path, "docs/my file.md");
    assert!(contents.has_inline_content());
}

#[tokio::test]
async fn test_list_languages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Rust": 120000,
            "Shell": 300
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let languages = client.list_languages("octo", "demo").await.unwrap();

    assert_eq!(languages.get("Rust"), Some(&120000));
    assert_eq!(languages.get("Shell"), Some(&300));
}

#[tokio::test]
async fn test_not_found_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let result = client.get_repository("octo", "missing").await;

    assert!(
        matches!(result, Err(Error::NotFound(ref resource)) if resource == "octo/missing"),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn test_bad_credentials_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/demo"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let result = client.get_repository("octo", "demo").await;

    match result {
        Err(Error::AuthError(message)) => {
            assert_eq!(message, "Bad credentials");
            assert!(!message.contains(TEST_TOKEN));
        }
        other => panic!("expected AuthError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/demo"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "API rate limit exceeded for user ID 1.",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let result = client.get_repository("octo", "demo").await;

    assert!(matches!(result, Err(Error::RateLimitExceeded)));
}

#[tokio::test]
async fn test_unprocessable_is_upstream_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/commits/nope"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "No commit found for SHA: nope",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let result = client.get_commit("octo", "demo", "nope").await;

    match result {
        Err(Error::Upstream { status, message }) => {
            assert_eq!(status, Some(422));
            assert_eq!(message, "No commit found for SHA: nope");
        }
        other => panic!("expected Upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/demo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "name": "demo",
                    "full_name": "octo/demo",
                    "default_branch": "main"
                }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server).with_timeout(Duration::from_millis(50));
    let result = client.get_repository("octo", "demo").await;

    assert!(
        matches!(result, Err(Error::Timeout(d)) if d == Duration::from_millis(50)),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn test_default_timeout() {
    let octocrab = create_token_client(TEST_TOKEN, DEFAULT_API_URL).unwrap();
    let client = GitHubClient::new(octocrab);

    assert_eq!(client.timeout(), DEFAULT_REQUEST_TIMEOUT);
}
