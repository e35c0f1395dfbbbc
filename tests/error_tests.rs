// Provider error classification tests
// Author: kelexine (https://github.com/kelexine)

use copystream::error::{classify_provider_error, AppError, ErrorKind};

fn classify(text: &str) -> ErrorKind {
    classify_provider_error(&AppError::Provider(text.to_string())).kind
}

#[test]
fn test_each_kind_has_a_trigger() {
    assert_eq!(classify("connection refused by host"), ErrorKind::ConnectionError);
    assert_eq!(classify("HTTP 429: too many requests"), ErrorKind::RateLimit);
    assert_eq!(classify("invalid api key provided"), ErrorKind::Authentication);
    assert_eq!(classify("insufficient_quota: billing limit"), ErrorKind::QuotaExceeded);
    assert_eq!(classify("bad request: missing field"), ErrorKind::InvalidRequest);
    assert_eq!(classify("model not found: gpt-99"), ErrorKind::ModelError);
    assert_eq!(classify("rejected by content_filter"), ErrorKind::ContentFilter);
    assert_eq!(classify("operation timed out"), ErrorKind::Timeout);
}

#[test]
fn test_rate_limit_distinct_from_auth_and_timeout() {
    let rate = classify_provider_error(&AppError::Provider("rate limit exceeded".to_string()));
    let auth = classify_provider_error(&AppError::Provider("authentication failed".to_string()));
    let timeout = classify_provider_error(&AppError::Provider("request timed out".to_string()));

    assert_eq!(rate.kind, ErrorKind::RateLimit);
    assert_ne!(rate.message, auth.message);
    assert_ne!(rate.message, timeout.message);
}

#[test]
fn test_rules_apply_in_table_order() {
    // Mentions both a connection failure and a timeout; the connection rule
    // sits higher in the table, so it wins.
    assert_eq!(
        classify("connection attempt timed out"),
        ErrorKind::ConnectionError
    );

    // The provider wraps bad credentials and policy rejections in
    // `invalid_request_error`; the specific rules still win over the
    // generic wrapper sitting at the bottom of the table.
    assert_eq!(
        classify("HTTP 401 Unauthorized: invalid_request_error: Incorrect API key provided"),
        ErrorKind::Authentication
    );
    assert_eq!(
        classify("invalid_request_error: flagged by our safety system"),
        ErrorKind::ContentFilter
    );
}

#[test]
fn test_unmatched_text_falls_through_to_unknown() {
    let classified =
        classify_provider_error(&AppError::Provider("something inexplicable".to_string()));
    assert_eq!(classified.kind, ErrorKind::Unknown);
    assert!(!classified.message.is_empty());
}

#[test]
fn test_original_text_is_preserved_for_logging() {
    let classified =
        classify_provider_error(&AppError::Provider("HTTP 429: rate limit".to_string()));
    assert!(classified.original.contains("HTTP 429"));
    // The user-safe message never repeats the raw provider text.
    assert!(!classified.message.contains("HTTP 429"));
}

#[test]
fn test_kind_tag_serializes_snake_case() {
    let classified = classify_provider_error(&AppError::Provider("rate limit".to_string()));
    let json = serde_json::to_string(&classified.details()).unwrap();
    assert_eq!(json, r#"{"error_type":"rate_limit"}"#);
}

#[test]
fn test_matching_is_case_insensitive() {
    assert_eq!(classify("RATE LIMIT EXCEEDED"), ErrorKind::RateLimit);
    assert_eq!(classify("Request Timed Out"), ErrorKind::Timeout);
}
