//! Generic HTTP client tools
//!
//! Shared request plumbing for HTTP backends: sending, status mapping,
//! logging, JSON parsing and retrying transient failures of read requests.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{BackendError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 创建带超时配置的 HTTP Client
pub fn create_http_client(backend_name: &str, request_timeout: Duration) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(request_timeout)
        .build()
        .map_err(|e| BackendError::Configuration {
            backend: backend_name.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the status code and response text.
    ///
    /// Transport failures become [`BackendError::Timeout`] /
    /// [`BackendError::Network`]; HTTP 429 and 502–504 are surfaced as
    /// retryable errors before the body is handed back. Other statuses are
    /// returned to the caller for backend-specific mapping.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        backend_name: &str,
        method_name: &str,
        url: &str,
    ) -> Result<(u16, String)> {
        log::debug!("[{backend_name}] {method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout {
                    backend: backend_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                BackendError::Network {
                    backend: backend_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{backend_name}] Response Status: {status_code}");

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{backend_name}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(BackendError::RateLimited {
                backend: backend_name.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{backend_name}] Server error (HTTP {status_code})");
            return Err(BackendError::Network {
                backend: backend_name.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| BackendError::Network {
                backend: backend_name.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{backend_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON response body.
    pub fn parse_json<T>(response_text: &str, backend_name: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{backend_name}] JSON parse failed: {e}");
            log::error!(
                "[{backend_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            BackendError::Parse {
                backend: backend_name.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Performs an HTTP request with retries on transient failures.
    ///
    /// Only use this for idempotent reads: a write that timed out may have
    /// been applied.
    ///
    /// # Retry strategy
    /// - Only [`BackendError::is_retryable`] errors are retried
    /// - Exponential backoff: 100ms, 200ms, 400ms, ... (maximum 10 seconds)
    /// - `Retry-After` on HTTP 429 is honored (capped at 30 seconds)
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        backend_name: &str,
        method_name: &str,
        url: &str,
        max_retries: u32,
    ) -> Result<(u16, String)> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, backend_name, method_name, url).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder can only be sent once
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{backend_name}] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, backend_name, method_name, url)
                    .await;
            };

            match Self::execute_request(req, backend_name, method_name, url).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[{}] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        backend_name,
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| BackendError::Network {
            backend: backend_name.to_string(),
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

/// `Retry-After` (capped at 30s) for rate limits, exponential backoff otherwise.
fn retry_delay(error: &BackendError, attempt: u32) -> Duration {
    if let BackendError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(30))
    } else {
        backoff_delay(attempt)
    }
}

/// 100ms, 200ms, 400ms, 800ms, 1.6s, ... capped at 10s
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20); // Prevent 2^attempt from overflowing
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff_delay(0), Duration::from_millis(100));
        assert_eq!(backoff_delay(1), Duration::from_millis(200));
        assert_eq!(backoff_delay(3), Duration::from_millis(800));
    }

    #[test]
    fn backoff_capped_at_10s() {
        assert_eq!(backoff_delay(7), Duration::from_millis(10_000));
        assert_eq!(backoff_delay(63), Duration::from_millis(10_000));
    }

    #[test]
    fn rate_limit_honors_retry_after() {
        let e = BackendError::RateLimited {
            backend: "test".into(),
            retry_after: Some(5),
            raw_message: None,
        };
        assert_eq!(retry_delay(&e, 0), Duration::from_secs(5));

        let e = BackendError::RateLimited {
            backend: "test".into(),
            retry_after: Some(600),
            raw_message: None,
        };
        assert_eq!(retry_delay(&e, 0), Duration::from_secs(30));
    }

    #[test]
    fn network_error_uses_backoff() {
        let e = BackendError::Network {
            backend: "test".into(),
            detail: "reset".into(),
        };
        assert_eq!(retry_delay(&e, 2), Duration::from_millis(400));
    }

    #[test]
    fn parse_json_valid() {
        let result: Result<Vec<i64>> = HttpUtils::parse_json("[3,2,1]", "test");
        assert!(matches!(&result, Ok(v) if v == &[3, 2, 1]), "{result:?}");
    }

    #[test]
    fn parse_json_invalid() {
        let result: Result<Vec<i64>> = HttpUtils::parse_json("<html>", "test");
        assert!(
            matches!(&result, Err(BackendError::Parse { .. })),
            "{result:?}"
        );
    }

    #[test]
    fn client_builds() {
        assert!(create_http_client("test", Duration::from_secs(5)).is_ok());
    }
}
