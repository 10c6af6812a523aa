use super::*;
use std::error::Error as StdError;

#[test]
fn test_not_found_from_status() {
    let error = Error::from_status(StatusCode::NOT_FOUND, "Not Found", "octo/demo@main");

    assert!(matches!(error, Error::NotFound(ref resource) if resource == "octo/demo@main"));
    assert_eq!(error.to_string(), "Resource not found: octo/demo@main");
    assert_eq!(error.status(), Some(404));
}

#[test]
fn test_auth_error_from_unauthorized_and_forbidden() {
    let unauthorized = Error::from_status(StatusCode::UNAUTHORIZED, "Bad credentials", "octo/demo");
    let forbidden = Error::from_status(
        StatusCode::FORBIDDEN,
        "Resource not accessible by integration",
        "octo/demo",
    );

    assert_eq!(
        unauthorized.to_string(),
        "Authentication failed: Bad credentials"
    );
    assert!(matches!(forbidden, Error::AuthError(_)));
}

#[test]
fn test_rate_limit_from_status() {
    let forbidden = Error::from_status(
        StatusCode::FORBIDDEN,
        "API rate limit exceeded for 10.0.0.1.",
        "octo/demo",
    );
    let too_many = Error::from_status(StatusCode::TOO_MANY_REQUESTS, "slow down", "octo/demo");

    assert!(matches!(forbidden, Error::RateLimitExceeded));
    assert!(matches!(too_many, Error::RateLimitExceeded));
    assert_eq!(too_many.to_string(), "Rate limit exceeded");
}

#[test]
fn test_upstream_error_from_server_error() {
    let error = Error::from_status(
        StatusCode::BAD_GATEWAY,
        "Server Error",
        "octo/demo",
    );

    assert_eq!(
        error.to_string(),
        "GitHub API request failed with status 502: Server Error"
    );
    assert_eq!(error.status(), Some(502));
    assert!(error.source().is_none());
}

#[test]
fn test_upstream_error_without_status() {
    let error = Error::Upstream {
        status: None,
        message: "connection reset".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "GitHub API request failed: connection reset"
    );
    assert_eq!(error.status(), None);
}

#[test]
fn test_timeout_error() {
    let error = Error::Timeout(std::time::Duration::from_secs(5));

    assert_eq!(error.to_string(), "Request to GitHub timed out after 5s");
    assert_eq!(error.status(), None);
}

#[test]
fn test_error_is_send_sync() {
    // This test verifies that Error implements Send and Sync traits
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}
