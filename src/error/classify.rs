// Provider error classification
// Author: kelexine (https://github.com/kelexine)

use super::AppError;
use serde::{Deserialize, Serialize};

/// Stable kind tags for provider failures, surfaced to clients in place of
/// raw error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ConnectionError,
    RateLimit,
    Authentication,
    QuotaExceeded,
    InvalidRequest,
    ModelError,
    ContentFilter,
    Timeout,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConnectionError => "connection_error",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::Authentication => "authentication",
            ErrorKind::QuotaExceeded => "quota_exceeded",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::ModelError => "model_error",
            ErrorKind::ContentFilter => "content_filter",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Unknown => "unknown",
        }
    }
}

/// A provider failure reduced to a user-safe message and a stable kind tag.
///
/// `original` holds the raw error description for server-side logging only;
/// it must never be sent to a client.
#[derive(Debug, Clone)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub message: &'static str,
    pub original: String,
}

impl ClassifiedError {
    /// The structured payload that is safe to put on the wire.
    pub fn details(&self) -> ErrorDetails {
        ErrorDetails {
            error_type: self.kind,
        }
    }
}

/// Client-facing error detail object carried by progress events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub error_type: ErrorKind,
}

struct Rule {
    needles: &'static [&'static str],
    kind: ErrorKind,
    message: &'static str,
}

// Best-effort substring matching over the flattened error description,
// evaluated top to bottom. First match wins, so every specific rule sits
// above the generic `invalid_request` catch-all: the provider wraps bad
// credentials and content-policy rejections in `invalid_request_error`,
// and the wrapper must not swallow them.
const RULES: &[Rule] = &[
    Rule {
        needles: &["apiconnectionerror", "connection"],
        kind: ErrorKind::ConnectionError,
        message: "Could not connect to the AI service. Please check your internet connection.",
    },
    Rule {
        needles: &["rate limit", "rate_limit", "too many requests", "429"],
        kind: ErrorKind::RateLimit,
        message: "API rate limit exceeded. Please try again in a few minutes.",
    },
    Rule {
        needles: &[
            "authenticationerror",
            "authentication",
            "unauthorized",
            "invalid api key",
            "incorrect api key",
            "auth",
            "401",
        ],
        kind: ErrorKind::Authentication,
        message: "Authentication error. Please check your API key.",
    },
    Rule {
        needles: &["insufficient_quota", "quota", "billing"],
        kind: ErrorKind::QuotaExceeded,
        message: "Your API quota has been exceeded. Please check your billing details.",
    },
    Rule {
        needles: &["model not found", "model_not_found", "does not exist", "unavailable"],
        kind: ErrorKind::ModelError,
        message: "The requested AI model is currently unavailable.",
    },
    Rule {
        needles: &["content_filter", "content filter", "policy", "safety"],
        kind: ErrorKind::ContentFilter,
        message: "Your request was flagged by content filters. Please modify your content and try again.",
    },
    Rule {
        needles: &["timeout", "timed out"],
        kind: ErrorKind::Timeout,
        message: "The request timed out. Please try again with simpler inputs.",
    },
    Rule {
        needles: &["invalid_request", "bad request", "validation"],
        kind: ErrorKind::InvalidRequest,
        message: "Invalid request. Please check your inputs and try again.",
    },
];

const UNKNOWN_MESSAGE: &str = "An error occurred with the AI service. Please try again later.";

/// Map a provider failure onto a stable `(kind, user-safe message)` pair.
///
/// The match is advisory: it inspects the error's variant name and display
/// text as a lowercased haystack and applies the first rule whose needle
/// appears. Anything unmatched falls through to `unknown`.
pub fn classify_provider_error(error: &AppError) -> ClassifiedError {
    let original = error.to_string();
    let haystack = format!("{:?} {}", error, original).to_lowercase();

    for rule in RULES {
        if rule.needles.iter().any(|needle| haystack.contains(needle)) {
            return ClassifiedError {
                kind: rule.kind,
                message: rule.message,
                original,
            };
        }
    }

    ClassifiedError {
        kind: ErrorKind::Unknown,
        message: UNKNOWN_MESSAGE,
        original,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_classification() {
        let error = AppError::Provider("HTTP 429: rate limit exceeded".to_string());
        let classified = classify_provider_error(&error);
        assert_eq!(classified.kind, ErrorKind::RateLimit);
    }

    #[test]
    fn test_wrapped_bad_key_is_authentication() {
        // The provider reports a bad credential as a 401 with type
        // `invalid_request_error`; the wrapper must not win.
        let error = AppError::Provider(
            "HTTP 401 Unauthorized: invalid_request_error: Incorrect API key provided".to_string(),
        );
        let classified = classify_provider_error(&error);
        assert_eq!(classified.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_wrapped_policy_rejection_is_content_filter() {
        let error = AppError::Provider(
            "HTTP 400: invalid_request_error: rejected as a result of our safety system"
                .to_string(),
        );
        let classified = classify_provider_error(&error);
        assert_eq!(classified.kind, ErrorKind::ContentFilter);
    }

    #[test]
    fn test_unknown_fallback() {
        let error = AppError::Provider("something inexplicable".to_string());
        let classified = classify_provider_error(&error);
        assert_eq!(classified.kind, ErrorKind::Unknown);
        assert_eq!(classified.message, UNKNOWN_MESSAGE);
    }

    #[test]
    fn test_kind_tags_serialize_snake_case() {
        let details = ErrorDetails {
            error_type: ErrorKind::RateLimit,
        };
        let json = serde_json::to_string(&details).unwrap();
        assert_eq!(json, r#"{"error_type":"rate_limit"}"#);
    }
}
