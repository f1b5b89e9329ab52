//! Integration tests for the GitHub listing source against a local stub server

use crate::integration::test_utils::{branch_body, StubResponse, StubServer};
use repotree::source::{GitHubConfig, GitHubTreeSource, PathRecordSource, RepoRef};
use repotree::{build_hierarchy, FlatRecord, SourceError};

const TREE_BODY: &str = r#"{
    "sha": "c0ffee",
    "url": "https://example.invalid/tree",
    "tree": [
        {"path": "README.md", "mode": "100644", "type": "blob", "sha": "1", "size": 42},
        {"path": "src", "mode": "040000", "type": "tree", "sha": "2"},
        {"path": "src/lib.rs", "mode": "100644", "type": "blob", "sha": "3", "size": 100},
        {"path": "third_party/dep", "mode": "160000", "type": "commit", "sha": "4"}
    ],
    "truncated": false
}"#;

fn source_for(server: &StubServer, token: Option<&str>) -> GitHubTreeSource {
    let config = GitHubConfig {
        api_base: server.base_url.clone(),
        token: token.map(str::to_string),
        request_timeout_secs: 10,
        ..GitHubConfig::default()
    };
    GitHubTreeSource::new(RepoRef::new("octo", "demo"), "main".to_string(), &config).unwrap()
}

#[tokio::test]
async fn test_fetch_records_resolves_branch_then_tree() {
    let server = StubServer::start(vec![
        StubResponse::json(200, branch_body("c0ffee")),
        StubResponse::json(200, TREE_BODY),
    ]);
    let source = source_for(&server, Some("secret-token"));

    let records = source.fetch_records().await.unwrap();
    assert_eq!(
        records,
        vec![
            FlatRecord::blob("README.md", 42),
            FlatRecord::tree("src"),
            FlatRecord::blob("src/lib.rs", 100),
        ]
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("get /repos/octo/demo/branches/main "));
    assert!(requests[1].starts_with("get /repos/octo/demo/git/trees/c0ffee?recursive=1 "));
    for request in &requests {
        assert!(request.contains("authorization: bearer secret-token"));
        assert!(request.contains("accept: application/vnd.github.v3+json"));
        assert!(request.contains("user-agent: repotree/"));
    }
}

#[tokio::test]
async fn test_fetched_records_build_expected_tree() {
    let server = StubServer::start(vec![
        StubResponse::json(200, branch_body("c0ffee")),
        StubResponse::json(200, TREE_BODY),
    ]);
    let records = source_for(&server, None).fetch_records().await.unwrap();
    let root = build_hierarchy(&records);

    assert_eq!(root.size(), 142);
    assert_eq!(root.find("src").unwrap().size(), 100);
    assert!(root.find("third_party").is_none());
}

#[tokio::test]
async fn test_truncated_listing_still_returns_records() {
    let body = r#"{"sha":"abc","tree":[{"path":"a.txt","type":"blob","size":1}],"truncated":true}"#;
    let server = StubServer::start(vec![
        StubResponse::json(200, branch_body("abc")),
        StubResponse::json(200, body),
    ]);
    let records = source_for(&server, None).fetch_records().await.unwrap();
    assert_eq!(records, vec![FlatRecord::blob("a.txt", 1)]);
}

#[tokio::test]
async fn test_missing_branch_is_not_found() {
    let server = StubServer::start(vec![StubResponse::json(
        404,
        r#"{"message":"Branch not found"}"#,
    )]);
    let err = source_for(&server, None).fetch_records().await.unwrap_err();
    match err {
        SourceError::NotFound(detail) => assert!(detail.contains("Branch not found")),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_bad_credentials_is_auth_failed() {
    let server = StubServer::start(vec![StubResponse::json(
        401,
        r#"{"message":"Bad credentials"}"#,
    )]);
    let err = source_for(&server, Some("wrong")).fetch_records().await.unwrap_err();
    assert!(matches!(err, SourceError::AuthFailed(_)));
}

#[tokio::test]
async fn test_forbidden_with_exhausted_quota_is_rate_limited() {
    let server = StubServer::start(vec![StubResponse::json(
        403,
        r#"{"message":"API rate limit exceeded"}"#,
    )
    .with_header("x-ratelimit-remaining", "0")]);
    let err = source_for(&server, None).fetch_records().await.unwrap_err();
    assert!(matches!(err, SourceError::RateLimited(_)));
}

#[tokio::test]
async fn test_forbidden_with_quota_left_is_auth_failed() {
    let server = StubServer::start(vec![StubResponse::json(
        403,
        r#"{"message":"Resource not accessible"}"#,
    )
    .with_header("x-ratelimit-remaining", "4999")]);
    let err = source_for(&server, None).fetch_records().await.unwrap_err();
    assert!(matches!(err, SourceError::AuthFailed(_)));
}

#[tokio::test]
async fn test_too_many_requests_is_rate_limited() {
    let server = StubServer::start(vec![StubResponse::json(429, "{}")]);
    let err = source_for(&server, None).fetch_records().await.unwrap_err();
    assert!(matches!(err, SourceError::RateLimited(_)));
}

#[tokio::test]
async fn test_tree_listing_failure_after_branch_lookup() {
    let server = StubServer::start(vec![
        StubResponse::json(200, branch_body("abc")),
        StubResponse::json(500, r#"{"message":"boom"}"#),
    ]);
    let err = source_for(&server, None).fetch_records().await.unwrap_err();
    assert!(matches!(err, SourceError::RequestFailed(_)));
}

#[tokio::test]
async fn test_malformed_tree_body() {
    let server = StubServer::start(vec![
        StubResponse::json(200, branch_body("abc")),
        StubResponse::json(200, r#"{"unexpected": true}"#),
    ]);
    let err = source_for(&server, None).fetch_records().await.unwrap_err();
    assert!(matches!(err, SourceError::MalformedResponse(_)));
}
