use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for every backend operation.
///
/// Each variant names the `backend` that produced it (`"postgrest"`,
/// `"memory"`, ...) plus variant-specific context. All variants are
/// serializable so a frontend can render structured failures.
///
/// # Retryable Errors
///
/// The following variants represent transient failures:
/// - [`Network`](Self::Network) — connectivity issues, 502/503/504
/// - [`Timeout`](Self::Timeout) — request timed out
/// - [`RateLimited`](Self::RateLimited) — HTTP 429
///
/// The REST backend retries these for read requests only. Writes are never
/// retried automatically.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum BackendError {
    /// A network-level error occurred (connection refused, bad gateway, ...).
    #[error("[{backend}] Network error: {detail}")]
    Network {
        /// Backend that produced the error.
        backend: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("[{backend}] Request timeout: {detail}")]
    Timeout {
        /// Backend that produced the error.
        backend: String,
        /// Error details.
        detail: String,
    },

    /// The API key or access token was rejected (HTTP 401).
    #[error("[{backend}] Unauthorized{}", fmt_raw(.raw_message))]
    Unauthorized {
        /// Backend that produced the error.
        backend: String,
        /// Original error message, if available.
        raw_message: Option<String>,
    },

    /// Row-level security or grants denied the operation (HTTP 403).
    #[error("[{backend}] Permission denied{}", fmt_raw(.raw_message))]
    PermissionDenied {
        /// Backend that produced the error.
        backend: String,
        /// Original error message, if available.
        raw_message: Option<String>,
    },

    /// The table or row does not exist.
    #[error("[{backend}] {resource} not found{}", fmt_raw(.raw_message))]
    NotFound {
        /// Backend that produced the error.
        backend: String,
        /// What was looked up (table name or `table#id`).
        resource: String,
        /// Original error message, if available.
        raw_message: Option<String>,
    },

    /// A unique constraint or concurrent update conflict (HTTP 409).
    #[error("[{backend}] Conflict{}", fmt_raw(.raw_message))]
    Conflict {
        /// Backend that produced the error.
        backend: String,
        /// Original error message, if available.
        raw_message: Option<String>,
    },

    /// The backend rejected the request payload or filter (HTTP 400).
    #[error("[{backend}] Invalid request: {detail}")]
    InvalidRequest {
        /// Backend that produced the error.
        backend: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The API rate limit has been exceeded.
    #[error("[{backend}] Rate limited{}", fmt_retry(.retry_after))]
    RateLimited {
        /// Backend that produced the error.
        backend: String,
        /// Suggested wait time in seconds, if provided.
        retry_after: Option<u64>,
        /// Original error message, if available.
        raw_message: Option<String>,
    },

    /// Failed to parse the backend's response.
    #[error("[{backend}] Parse error: {detail}")]
    Parse {
        /// Backend that produced the error.
        backend: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    #[error("[{backend}] Serialization error: {detail}")]
    Serialization {
        /// Backend that produced the error.
        backend: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// The backend is misconfigured (bad base URL, missing key, ...).
    #[error("[{backend}] Configuration error: {detail}")]
    Configuration {
        /// Backend that produced the error.
        backend: String,
        /// Details about the configuration problem.
        detail: String,
    },

    /// An unrecognized error.
    #[error("[{backend}] {raw_message}")]
    Unknown {
        /// Backend that produced the error.
        backend: String,
        /// Raw error code, if available.
        raw_code: Option<String>,
        /// Raw error message.
        raw_message: String,
    },
}

fn fmt_raw(raw: &Option<String>) -> String {
    raw.as_ref().map(|m| format!(": {m}")).unwrap_or_default()
}

fn fmt_retry(retry_after: &Option<u64>) -> String {
    retry_after
        .map(|secs| format!(" (retry after {secs}s)"))
        .unwrap_or_default()
}

impl BackendError {
    /// 是否为预期行为（权限、资源不存在、请求内容错误等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. }
                | Self::PermissionDenied { .. }
                | Self::NotFound { .. }
                | Self::Conflict { .. }
                | Self::InvalidRequest { .. }
        )
    }

    /// Whether a read request that failed with this error may be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

/// Convenience type alias for `Result<T, BackendError>`.
pub type Result<T> = std::result::Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network_error() {
        let e = BackendError::Network {
            backend: "postgrest".to_string(),
            detail: "connection refused".to_string(),
        };
        assert_eq!(e.to_string(), "[postgrest] Network error: connection refused");
    }

    #[test]
    fn display_unauthorized_with_message() {
        let e = BackendError::Unauthorized {
            backend: "postgrest".to_string(),
            raw_message: Some("JWT expired".to_string()),
        };
        assert_eq!(e.to_string(), "[postgrest] Unauthorized: JWT expired");
    }

    #[test]
    fn display_unauthorized_without_message() {
        let e = BackendError::Unauthorized {
            backend: "postgrest".to_string(),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[postgrest] Unauthorized");
    }

    #[test]
    fn display_not_found() {
        let e = BackendError::NotFound {
            backend: "memory".to_string(),
            resource: "printers#7".to_string(),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[memory] printers#7 not found");
    }

    #[test]
    fn display_rate_limited_with_retry() {
        let e = BackendError::RateLimited {
            backend: "postgrest".to_string(),
            retry_after: Some(12),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[postgrest] Rate limited (retry after 12s)");
    }

    #[test]
    fn expected_vs_unexpected() {
        let conflict = BackendError::Conflict {
            backend: "postgrest".to_string(),
            raw_message: None,
        };
        let timeout = BackendError::Timeout {
            backend: "postgrest".to_string(),
            detail: "30s".to_string(),
        };
        assert!(conflict.is_expected());
        assert!(!conflict.is_retryable());
        assert!(!timeout.is_expected());
        assert!(timeout.is_retryable());
    }

    #[test]
    fn serializes_with_code_tag() {
        let e = BackendError::Parse {
            backend: "postgrest".to_string(),
            detail: "eof".to_string(),
        };
        let json = serde_json::to_value(&e).unwrap_or_default();
        assert_eq!(json["code"], "Parse");
        assert_eq!(json["detail"], "eof");
    }
}
