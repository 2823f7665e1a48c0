//! PostgREST error mapping

use serde::Deserialize;

use crate::error::BackendError;

use super::BACKEND_NAME;

/// PostgREST error body: `{"code":"23505","message":"...","details":...,"hint":...}`
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// Map a non-2xx PostgREST response to a [`BackendError`].
pub(crate) fn map_status(status: u16, body: &str, resource: &str) -> BackendError {
    let parsed: Option<PostgrestErrorBody> = serde_json::from_str(body).ok();
    let code = parsed.as_ref().and_then(|b| b.code.clone());
    let message = parsed
        .as_ref()
        .and_then(|b| match (&b.message, &b.details) {
            (Some(m), Some(d)) if !d.is_empty() => Some(format!("{m} ({d})")),
            (Some(m), _) => Some(m.clone()),
            (None, d) => d.clone(),
        })
        .unwrap_or_else(|| body.to_string());
    let backend = BACKEND_NAME.to_string();

    match (status, code.as_deref()) {
        // 23505 unique_violation 可能以 409 返回
        (409, _) | (_, Some("23505")) => BackendError::Conflict {
            backend,
            raw_message: Some(message),
        },
        // PGRST301: JWT expired / invalid
        (401, _) | (_, Some("PGRST301")) => BackendError::Unauthorized {
            backend,
            raw_message: Some(message),
        },
        // 42501 insufficient_privilege (RLS)
        (403, _) | (_, Some("42501")) => BackendError::PermissionDenied {
            backend,
            raw_message: Some(message),
        },
        (404, _) | (_, Some("42P01")) => BackendError::NotFound {
            backend,
            resource: resource.to_string(),
            raw_message: Some(message),
        },
        (400 | 406 | 422, _) => BackendError::InvalidRequest {
            backend,
            detail: message,
        },
        (500..=599, _) => BackendError::Network {
            backend,
            detail: format!("HTTP {status}: {message}"),
        },
        _ => BackendError::Unknown {
            backend,
            raw_code: code.or_else(|| Some(status.to_string())),
            raw_message: message,
        },
    }
}
