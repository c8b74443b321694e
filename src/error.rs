//! Error types for the Pokédex data client
//!
//! A single logical fetch may span several physical attempts. Each failed
//! attempt produces a [`RequestError`]; the caller only ever sees a
//! [`FetchError`], once the retry budget is spent or a non-retryable
//! failure occurs.

use std::time::Duration;

use thiserror::Error;

/// Failure of a single physical request attempt
///
/// Every variant is retryable; the retry loop absorbs these until the
/// configured budget runs out.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request did not complete within the configured window
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// A response arrived but its status indicates failure
    #[error("server responded with HTTP {status}")]
    HttpStatus {
        /// HTTP status code returned by the upstream API
        status: u16,
    },

    /// Transport-level failure (DNS, connection refused or reset, ...)
    #[error("network error: {0}")]
    Network(String),
}

impl RequestError {
    /// Whether the retry loop may try again after this failure
    pub fn is_retryable(&self) -> bool {
        match self {
            RequestError::Timeout(_) | RequestError::HttpStatus { .. } | RequestError::Network(_) => {
                true
            }
        }
    }

    /// HTTP status carried by this failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::HttpStatus { status } => Some(*status),
            _ => None,
        }
    }
}

/// Terminal error returned to callers of the data client
#[derive(Debug, Error)]
pub enum FetchError {
    /// Every attempt failed; carries the last failure
    #[error("request to {url} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Target URL of the logical fetch
        url: String,
        /// Number of physical attempts made (initial request plus retries)
        attempts: u32,
        /// Failure of the final attempt
        #[source]
        source: RequestError,
    },

    /// The response body was not the JSON document we expected
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// URL whose body failed to decode
        url: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The request parameters were rejected before any network call
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    /// HTTP status of the last failed attempt, if the failure was a status error
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::RetriesExhausted { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Whether this is a decode failure
    pub fn is_decode(&self) -> bool {
        matches!(self, FetchError::Decode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_request_errors_are_retryable() {
        assert!(RequestError::Timeout(Duration::from_secs(10)).is_retryable());
        assert!(RequestError::HttpStatus { status: 503 }.is_retryable());
        assert!(RequestError::Network("connection reset".to_string()).is_retryable());
    }

    #[test]
    fn test_timeout_message_includes_millis() {
        let err = RequestError::Timeout(Duration::from_millis(10_000));
        assert_eq!(err.to_string(), "request timed out after 10000ms");
    }

    #[test]
    fn test_retries_exhausted_exposes_status() {
        let err = FetchError::RetriesExhausted {
            url: "https://example.test/pokemon/1".to_string(),
            attempts: 4,
            source: RequestError::HttpStatus { status: 404 },
        };
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_decode());
        let msg = err.to_string();
        assert!(msg.contains("4 attempts"));
        assert!(msg.contains("HTTP 404"));
    }

    #[test]
    fn test_network_failure_has_no_status() {
        let err = FetchError::RetriesExhausted {
            url: "u".to_string(),
            attempts: 4,
            source: RequestError::Network("dns".to_string()),
        };
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_decode_error_is_flagged() {
        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = FetchError::Decode {
            url: "u".to_string(),
            source,
        };
        assert!(err.is_decode());
        assert!(err.to_string().starts_with("failed to decode response from u"));
    }
}
